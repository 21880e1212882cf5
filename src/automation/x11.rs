// # X11 Input Backend
//
// Synthetic pointer input through the XTest extension. Each click is sent as
// three fake events on the root window of the default screen:
//
// | Event | Detail | Purpose |
// |-------|--------|---------|
// | `MotionNotify` | 0 (absolute) | warp the pointer to the target |
// | `ButtonPress` | button number | press |
// | `ButtonRelease` | button number | release |
//
// The display is taken from `$DISPLAY`. Wayland sessions only work through
// XWayland, and only for XWayland clients.

use tracing::debug;
use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::xproto::{self, Window};
use x11rb::protocol::xtest::{self, ConnectionExt as _};
use x11rb::rust_connection::RustConnection;

use super::{InputBackend, MouseButton};
use crate::error::{HarnessError, HarnessResult};

const BACKEND: &str = "x11-xtest";

fn backend_error(reason: impl ToString) -> HarnessError {
    HarnessError::automation(BACKEND, reason.to_string())
}

/// XTest-backed [`InputBackend`].
pub struct X11Backend {
    conn: RustConnection,
    root: Window,
}

impl X11Backend {
    /// Connects to `$DISPLAY` and checks that XTest is available.
    pub fn connect() -> HarnessResult<Self> {
        let (conn, screen_num) = x11rb::connect(None)
            .map_err(backend_error)
            .map_err(|e| e.with_recovery_suggestion("check that $DISPLAY points at a running X server"))?;

        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|screen| screen.root)
            .ok_or_else(|| backend_error(format!("screen {} not found", screen_num)))?;

        let xtest = conn
            .extension_information(xtest::X11_EXTENSION_NAME)
            .map_err(backend_error)?;
        if xtest.is_none() {
            return Err(backend_error("XTEST extension is not available on this display"));
        }

        debug!(screen = screen_num, root, "connected to X server");
        Ok(Self { conn, root })
    }

    fn fake_input(&self, event_type: u8, detail: u8, x: i16, y: i16) -> HarnessResult<()> {
        self.conn
            .xtest_fake_input(event_type, detail, x11rb::CURRENT_TIME, self.root, x, y, 0)
            .map_err(backend_error)?
            .check()
            .map_err(backend_error)
    }
}

impl InputBackend for X11Backend {
    fn name(&self) -> &'static str {
        BACKEND
    }

    fn click(&mut self, x: i16, y: i16, button: MouseButton) -> HarnessResult<()> {
        let code = button.x11_code();
        self.fake_input(xproto::MOTION_NOTIFY_EVENT, 0, x, y)?;
        self.fake_input(xproto::BUTTON_PRESS_EVENT, code, x, y)?;
        self.fake_input(xproto::BUTTON_RELEASE_EVENT, code, x, y)?;
        self.conn.flush().map_err(backend_error)
    }
}
