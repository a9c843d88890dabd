//! Action names per category.
//!
//! Each category gets a closed enum so an unknown name can be answered with
//! the list of valid ones, and the dispatcher match stays exhaustive.

use std::fmt;
use std::str::FromStr;

/// The name did not match any variant. Carries the rejected text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownName(pub String);

macro_rules! name_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $( $variant:ident => $text:literal ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            /// Every variant, in the order clients see them listed.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }

            pub fn names() -> Vec<&'static str> {
                Self::ALL.iter().map(|item| item.as_str()).collect()
            }
        }

        impl FromStr for $name {
            type Err = UnknownName;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    _ => Err(UnknownName(s.to_string())),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

name_enum! {
    /// A group of related actions sharing one parameter policy.
    Category {
        Volume => "volume",
        Media => "media",
        Brightness => "brightness",
        App => "app",
        Window => "window",
        System => "system",
        Hotkey => "hotkey",
    }
}

name_enum! {
    VolumeAction {
        Up => "up",
        Down => "down",
        Mute => "mute",
    }
}

name_enum! {
    /// `play` and `pause` both send the single play/pause toggle key.
    MediaAction {
        Play => "play",
        Pause => "pause",
        Stop => "stop",
        Next => "next",
        Previous => "previous",
    }
}

name_enum! {
    BrightnessAction {
        Up => "up",
        Down => "down",
    }
}

name_enum! {
    AppAction {
        Launch => "launch",
        Kill => "kill",
        Processes => "processes",
    }
}

name_enum! {
    WindowAction {
        Minimize => "minimize",
        Maximize => "maximize",
        Restore => "restore",
        Close => "close",
        Info => "info",
    }
}

name_enum! {
    SystemAction {
        Lock => "lock",
        Shutdown => "shutdown",
        Restart => "restart",
        Sleep => "sleep",
        Info => "info",
    }
}

name_enum! {
    HotkeyAction {
        AltTab => "alt_tab",
        CtrlC => "ctrl_c",
        CtrlV => "ctrl_v",
        WinD => "win_d",
        Custom => "custom",
    }
}

impl Category {
    /// Valid action names for this category.
    pub fn actions(self) -> Vec<&'static str> {
        match self {
            Category::Volume => VolumeAction::names(),
            Category::Media => MediaAction::names(),
            Category::Brightness => BrightnessAction::names(),
            Category::App => AppAction::names(),
            Category::Window => WindowAction::names(),
            Category::System => SystemAction::names(),
            Category::Hotkey => HotkeyAction::names(),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Category::Volume => "Volume control",
            Category::Media => "Media playback control",
            Category::Brightness => "Screen brightness control",
            Category::App => "Application launch, termination and process listing",
            Category::Window => "Window control",
            Category::System => "Power state and system information",
            Category::Hotkey => "Keyboard shortcuts",
        }
    }

    /// Parameters the category's actions read.
    pub fn parameters(self) -> &'static [&'static str] {
        match self {
            Category::Volume | Category::Brightness => &["steps"],
            Category::Media => &[],
            Category::App => &["path", "args", "working_dir", "name"],
            Category::Window => &["hwnd"],
            Category::System => &["force"],
            Category::Hotkey => &["keys"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(*category));
        }
        assert_eq!("alt_tab".parse::<HotkeyAction>(), Ok(HotkeyAction::AltTab));
        assert_eq!(
            "louder".parse::<VolumeAction>(),
            Err(UnknownName("louder".to_string()))
        );
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!("Volume".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_actions_listing() {
        assert_eq!(Category::Volume.actions(), vec!["up", "down", "mute"]);
        assert_eq!(
            Category::Media.actions(),
            vec!["play", "pause", "stop", "next", "previous"]
        );
        assert!(Category::ALL.iter().all(|c| !c.actions().is_empty()));
    }
}
