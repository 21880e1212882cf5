//! # Configuration Module
//!
//! This module provides the run configuration and the per-run test session state.

pub mod config;
pub mod session;
