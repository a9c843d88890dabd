//! Virtual-key code table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Windows-style virtual-key identifier.
///
/// The numeric values are the canonical wire format: clients send them in
/// `/api/hotkey/custom` and every backend translates from this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u8);

impl KeyCode {
    pub const BACKSPACE: KeyCode = KeyCode(0x08);
    pub const TAB: KeyCode = KeyCode(0x09);
    pub const ENTER: KeyCode = KeyCode(0x0D);
    pub const SHIFT: KeyCode = KeyCode(0x10);
    pub const CONTROL: KeyCode = KeyCode(0x11);
    pub const ALT: KeyCode = KeyCode(0x12);
    pub const ESCAPE: KeyCode = KeyCode(0x1B);
    pub const SPACE: KeyCode = KeyCode(0x20);
    pub const LEFT: KeyCode = KeyCode(0x25);
    pub const UP: KeyCode = KeyCode(0x26);
    pub const RIGHT: KeyCode = KeyCode(0x27);
    pub const DOWN: KeyCode = KeyCode(0x28);
    pub const DELETE: KeyCode = KeyCode(0x2E);
    pub const LEFT_WIN: KeyCode = KeyCode(0x5B);

    pub const F1: KeyCode = KeyCode(0x70);
    pub const F12: KeyCode = KeyCode(0x7B);

    pub const VOLUME_MUTE: KeyCode = KeyCode(0xAD);
    pub const VOLUME_DOWN: KeyCode = KeyCode(0xAE);
    pub const VOLUME_UP: KeyCode = KeyCode(0xAF);

    pub const MEDIA_NEXT: KeyCode = KeyCode(0xB0);
    pub const MEDIA_PREV: KeyCode = KeyCode(0xB1);
    pub const MEDIA_STOP: KeyCode = KeyCode(0xB2);
    pub const MEDIA_PLAY_PAUSE: KeyCode = KeyCode(0xB3);

    pub const BRIGHTNESS_DOWN: KeyCode = KeyCode(0xE8);
    pub const BRIGHTNESS_UP: KeyCode = KeyCode(0xE9);
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
