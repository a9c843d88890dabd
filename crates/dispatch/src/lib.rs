//! Maps `(category, action, params)` requests onto executor calls.

pub mod actions;
pub mod dispatcher;
pub mod error;
pub mod params;

pub use actions::{
    AppAction, BrightnessAction, Category, HotkeyAction, MediaAction, SystemAction,
    VolumeAction, WindowAction,
};
pub use dispatcher::{Command, Dispatcher};
pub use error::DispatchError;
pub use params::Params;
