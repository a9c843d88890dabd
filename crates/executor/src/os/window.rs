//! Top-level window handles and the window-management seam.

use super::OsResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque OS window identifier (HWND on Windows, client address on Hyprland).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHandle(pub i64);

impl WindowHandle {
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Minimize,
    Maximize,
    Restore,
}

impl WindowState {
    pub fn as_str(self) -> &'static str {
        match self {
            WindowState::Minimize => "minimize",
            WindowState::Maximize => "maximize",
            WindowState::Restore => "restore",
        }
    }

    /// `ShowWindow` command value.
    pub fn show_command(self) -> i32 {
        match self {
            WindowState::Minimize => 2,
            WindowState::Maximize => 3,
            WindowState::Restore => 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub width: i32,
    pub height: i32,
}

impl WindowRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            width: right - left,
            height: bottom - top,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowInfo {
    pub hwnd: WindowHandle,
    pub title: String,
    pub class_name: String,
    pub rect: WindowRect,
    pub is_visible: bool,
}

/// Window enumeration and state changes.
#[async_trait]
pub trait WindowManager: Send + Sync {
    /// The focused top-level window, `None` when nothing has focus.
    async fn foreground(&self) -> OsResult<Option<WindowHandle>>;

    async fn describe(&self, handle: WindowHandle) -> OsResult<WindowInfo>;

    async fn set_state(&self, handle: WindowHandle, state: WindowState) -> OsResult<()>;

    /// Ask the window to close. Returns once the request is queued.
    async fn post_close(&self, handle: WindowHandle) -> OsResult<()>;
}
