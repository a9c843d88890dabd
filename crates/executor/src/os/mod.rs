//! OS primitive layer - key injection, window control, process utilities
//!
//! Each concern sits behind an async trait so the executor can be driven
//! against the native backend or a recording mock:
//! - Key injection (`input`)
//! - Window management (`window`)
//! - Process spawning and utility commands (`process`)
//! - Power commands and the per-platform command table (`platform`)
//! - System metrics (`metrics`)
//! - A recording backend for tests (`recording`)

pub mod hyprland;
pub mod input;
pub mod keys;
pub mod metrics;
pub mod platform;
pub mod process;
#[cfg(any(test, feature = "test-util"))]
pub mod recording;
pub mod window;

#[cfg(target_os = "windows")]
pub mod win32;

/// OS primitive error types
#[derive(Debug, thiserror::Error)]
pub enum OsError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Command '{command}' timed out after {after_ms}ms")]
    Timeout { command: String, after_ms: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type OsResult<T> = Result<T, OsError>;

pub use input::KeyInjector;
pub use keys::KeyCode;
pub use platform::{Platform, PowerAction};
pub use process::{
    CommandLine, CommandOutput, CommandRunner, NativeCommandRunner, ProcessLauncher,
    ProcessRecord, ShellLauncher,
};
pub use window::{WindowHandle, WindowInfo, WindowManager, WindowRect, WindowState};
