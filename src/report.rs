//! Human-readable run report written to stdout.
//!
//! Diagnostics go through `tracing` on stderr. This module only prints the
//! user-facing pass/fail lines and the summary so the two never interleave
//! within a line.

use std::io::{self, Write};

use crate::checks::CheckOutcome;

const RULE_WIDTH: usize = 50;

/// Writes the report to any `Write` sink.
pub struct Reporter<W: Write> {
    out: W,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn banner(&mut self) -> io::Result<()> {
        writeln!(self.out, "🚀 Starting OCR Platform Backend API Tests")?;
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))
    }

    pub fn group(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out, "{}", title)
    }

    pub fn outcome(&mut self, outcome: &CheckOutcome) -> io::Result<()> {
        let status = if outcome.passed { "✅ PASS" } else { "❌ FAIL" };
        writeln!(self.out, "{} {}", status, outcome.name)?;
        if !outcome.detail.is_empty() {
            writeln!(self.out, "   Details: {}", outcome.detail)?;
        }
        writeln!(self.out)
    }

    pub fn summary(&mut self, passed: usize, total: usize) -> io::Result<()> {
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(self.out, "📋 Test Summary: {}/{} tests passed", passed, total)?;
        if passed == total {
            writeln!(self.out, "🎉 All tests passed!")?;
        } else {
            writeln!(self.out, "⚠️  {} tests failed", total - passed)?;
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Reporter<Vec<u8>>) -> io::Result<()>) -> String {
        let mut reporter = Reporter::new(Vec::new());
        f(&mut reporter).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_outcome_lines() {
        let text = render(|r| r.outcome(&CheckOutcome::pass("GET /api/stats", "Total docs: 1")));
        assert_eq!(text, "✅ PASS GET /api/stats\n   Details: Total docs: 1\n\n");

        let text = render(|r| {
            r.outcome(&CheckOutcome {
                name: "GET /api/auth/me".to_string(),
                passed: false,
                detail: String::new(),
                category: Some("transport"),
            })
        });
        assert_eq!(text, "❌ FAIL GET /api/auth/me\n\n");
    }

    #[test]
    fn test_summary_lines() {
        let text = render(|r| r.summary(15, 15));
        assert!(text.contains("📋 Test Summary: 15/15 tests passed"));
        assert!(text.contains("🎉 All tests passed!"));

        let text = render(|r| r.summary(12, 15));
        assert!(text.contains("⚠️  3 tests failed"));
    }
}
