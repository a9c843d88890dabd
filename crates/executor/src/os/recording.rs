//! Recording backend - implements every OS seam without touching the OS.
//!
//! Each call is appended to an event log as a short line (`down 0x11`,
//! `run taskkill /f /im notepad.exe`, `close 0x2a`), which tests assert on.

use super::input::KeyInjector;
use super::keys::KeyCode;
use super::process::{CommandLine, CommandOutput, CommandRunner, ProcessLauncher};
use super::window::{WindowHandle, WindowInfo, WindowManager, WindowRect, WindowState};
use super::{OsError, OsResult};
use crate::executor::Backends;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

pub struct RecordingBackend {
    events: Mutex<Vec<String>>,
    foreground: Mutex<Option<WindowHandle>>,
    failing_key: Mutex<Option<KeyCode>>,
    failing_press: Mutex<Option<usize>>,
    presses: Mutex<usize>,
    outputs: Mutex<HashMap<String, CommandOutput>>,
    next_pid: Mutex<u32>,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            foreground: Mutex::new(Some(WindowHandle(0x2a))),
            failing_key: Mutex::new(None),
            failing_press: Mutex::new(None),
            presses: Mutex::new(0),
            outputs: Mutex::new(HashMap::new()),
            next_pid: Mutex::new(4242),
        }
    }
}

impl RecordingBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// All four seams backed by this recorder.
    pub fn backends(self: &Arc<Self>) -> Backends {
        Backends {
            keys: self.clone(),
            windows: self.clone(),
            launcher: self.clone(),
            commands: self.clone(),
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    pub fn set_foreground(&self, handle: Option<WindowHandle>) {
        *self.foreground.lock() = handle;
    }

    /// Make `key_down` fail for this key.
    pub fn fail_key(&self, code: KeyCode) {
        *self.failing_key.lock() = Some(code);
    }

    /// Make the `nth` call to `key_down` (1-based) fail, whatever the key.
    pub fn fail_press(&self, nth: usize) {
        *self.failing_press.lock() = Some(nth);
    }

    /// Canned output for every run of `program`. Unknown programs succeed
    /// with empty output.
    pub fn respond(&self, program: &str, output: CommandOutput) {
        self.outputs.lock().insert(program.to_string(), output);
    }

    fn record(&self, event: String) {
        self.events.lock().push(event);
    }
}

#[async_trait]
impl KeyInjector for RecordingBackend {
    async fn key_down(&self, code: KeyCode) -> OsResult<()> {
        let press = {
            let mut presses = self.presses.lock();
            *presses += 1;
            *presses
        };
        if *self.failing_key.lock() == Some(code) || *self.failing_press.lock() == Some(press) {
            return Err(OsError::OperationFailed(format!("key {code} rejected")));
        }
        self.record(format!("down {code}"));
        Ok(())
    }

    async fn key_up(&self, code: KeyCode) -> OsResult<()> {
        self.record(format!("up {code}"));
        Ok(())
    }
}

#[async_trait]
impl WindowManager for RecordingBackend {
    async fn foreground(&self) -> OsResult<Option<WindowHandle>> {
        Ok(*self.foreground.lock())
    }

    async fn describe(&self, handle: WindowHandle) -> OsResult<WindowInfo> {
        self.record(format!("describe {handle}"));
        Ok(WindowInfo {
            hwnd: handle,
            title: "Recorded Window".to_string(),
            class_name: "RecordedClass".to_string(),
            rect: WindowRect::new(0, 0, 800, 600),
            is_visible: true,
        })
    }

    async fn set_state(&self, handle: WindowHandle, state: WindowState) -> OsResult<()> {
        self.record(format!("{} {handle}", state.as_str()));
        Ok(())
    }

    async fn post_close(&self, handle: WindowHandle) -> OsResult<()> {
        self.record(format!("close {handle}"));
        Ok(())
    }
}

#[async_trait]
impl ProcessLauncher for RecordingBackend {
    async fn spawn_shell(&self, command_line: &str, working_dir: Option<&Path>) -> OsResult<u32> {
        match working_dir {
            Some(dir) => self.record(format!("spawn {command_line} in {}", dir.display())),
            None => self.record(format!("spawn {command_line}")),
        }
        let mut pid = self.next_pid.lock();
        *pid += 1;
        Ok(*pid)
    }
}

#[async_trait]
impl CommandRunner for RecordingBackend {
    async fn run(&self, command: &CommandLine) -> OsResult<CommandOutput> {
        self.record(format!("run {command}"));
        let canned = self.outputs.lock().get(&command.program).cloned();
        Ok(canned.unwrap_or(CommandOutput {
            success: true,
            code: Some(0),
            ..CommandOutput::default()
        }))
    }
}
