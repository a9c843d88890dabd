//! Synthetic keyboard input.

use super::keys::KeyCode;
use super::process::{CommandLine, CommandRunner};
use super::{OsError, OsResult};
use async_trait::async_trait;
use std::sync::Arc;

/// One key transition at the OS input layer.
#[async_trait]
pub trait KeyInjector: Send + Sync {
    async fn key_down(&self, code: KeyCode) -> OsResult<()>;
    async fn key_up(&self, code: KeyCode) -> OsResult<()>;
}

/// Linux evdev code for a virtual-key code, when one exists.
pub fn evdev_code(code: KeyCode) -> Option<u16> {
    let evdev = match code.0 {
        0x08 => 14,  // backspace
        0x09 => 15,  // tab
        0x0D => 28,  // enter
        0x10 => 42,  // left shift
        0x11 => 29,  // left ctrl
        0x12 => 56,  // left alt
        0x1B => 1,   // esc
        0x20 => 57,  // space
        0x25 => 105, // left
        0x26 => 103, // up
        0x27 => 106, // right
        0x28 => 108, // down
        0x2E => 111, // delete
        0x30 => 11,
        n @ 0x31..=0x39 => u16::from(n - 0x31) + 2,
        n @ 0x41..=0x5A => letter_evdev(n)?,
        0x5B => 125, // left meta
        n @ 0x70..=0x79 => u16::from(n - 0x70) + 59, // F1-F10
        0x7A => 87,
        0x7B => 88,
        0xAD => 113, // mute
        0xAE => 114, // volume down
        0xAF => 115, // volume up
        0xB0 => 163, // next song
        0xB1 => 165, // previous song
        0xB2 => 166, // stop cd
        0xB3 => 164, // play/pause
        0xE8 => 224, // brightness down
        0xE9 => 225, // brightness up
        _ => return None,
    };
    Some(evdev)
}

fn letter_evdev(vk: u8) -> Option<u16> {
    const ROWS: [(u8, u16); 26] = [
        (b'Q', 16), (b'W', 17), (b'E', 18), (b'R', 19), (b'T', 20),
        (b'Y', 21), (b'U', 22), (b'I', 23), (b'O', 24), (b'P', 25),
        (b'A', 30), (b'S', 31), (b'D', 32), (b'F', 33), (b'G', 34),
        (b'H', 35), (b'J', 36), (b'K', 37), (b'L', 38),
        (b'Z', 44), (b'X', 45), (b'C', 46), (b'V', 47), (b'B', 48),
        (b'N', 49), (b'M', 50),
    ];
    ROWS.iter()
        .find(|(letter, _)| *letter == vk)
        .map(|(_, evdev)| *evdev)
}

/// Wayland key injection through `ydotool key <code>:<state>`.
pub struct YdotoolInjector {
    runner: Arc<dyn CommandRunner>,
}

impl YdotoolInjector {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    async fn send(&self, code: KeyCode, pressed: bool) -> OsResult<()> {
        let evdev = evdev_code(code).ok_or_else(|| {
            OsError::InvalidArgument(format!("no keyboard mapping for key code {code}"))
        })?;
        let state = if pressed { 1 } else { 0 };
        let command = CommandLine::new("ydotool")
            .arg("key")
            .arg(format!("{evdev}:{state}"));

        let output = self.runner.run(&command).await?;
        if output.success {
            return Ok(());
        }
        Err(OsError::OperationFailed(output.error_text()))
    }
}

#[async_trait]
impl KeyInjector for YdotoolInjector {
    async fn key_down(&self, code: KeyCode) -> OsResult<()> {
        self.send(code, true).await
    }

    async fn key_up(&self, code: KeyCode) -> OsResult<()> {
        self.send(code, false).await
    }
}
