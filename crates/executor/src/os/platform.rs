//! Per-platform utility command table: kill, process listing, power state.

use super::process::{CommandLine, ProcessTableFormat};

/// Which OS toolset the executor drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Win32 APIs plus `taskkill` / `tasklist` / `shutdown`.
    Windows,
    /// Hyprland compositor plus `pkill` / `ps` / `systemctl`.
    Hyprland,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    Lock,
    Shutdown,
    Restart,
    Sleep,
}

impl PowerAction {
    /// Action name reported back to clients.
    pub fn as_str(self) -> &'static str {
        match self {
            PowerAction::Lock => "lock_screen",
            PowerAction::Shutdown => "shutdown",
            PowerAction::Restart => "restart",
            PowerAction::Sleep => "sleep",
        }
    }
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Hyprland => "hyprland",
        }
    }

    pub fn native() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Hyprland
        }
    }

    /// Forced terminate-by-name.
    pub fn kill_command(self, name: &str) -> CommandLine {
        match self {
            Platform::Windows => CommandLine::new("taskkill").args(["/f", "/im", name]),
            Platform::Hyprland => CommandLine::new("pkill").args(["-9", "-x", name]),
        }
    }

    pub fn process_list_command(self) -> (CommandLine, ProcessTableFormat) {
        match self {
            Platform::Windows => (
                CommandLine::new("tasklist").args(["/fo", "csv"]),
                ProcessTableFormat::TasklistCsv,
            ),
            Platform::Hyprland => (
                CommandLine::new("ps").args(["-eo", "comm,pid,rss"]),
                ProcessTableFormat::PsColumns,
            ),
        }
    }

    /// Power-state command. `force` skips negotiation with running applications
    /// and only applies to shutdown and restart.
    pub fn power_command(self, action: PowerAction, force: bool) -> CommandLine {
        match (self, action) {
            (Platform::Windows, PowerAction::Lock) => {
                CommandLine::new("rundll32.exe").arg("user32.dll,LockWorkStation")
            }
            (Platform::Windows, PowerAction::Shutdown) => {
                windows_shutdown("/s", force)
            }
            (Platform::Windows, PowerAction::Restart) => {
                windows_shutdown("/r", force)
            }
            (Platform::Windows, PowerAction::Sleep) => CommandLine::new("rundll32.exe")
                .args(["powrprof.dll,SetSuspendState", "0,1,0"]),
            (Platform::Hyprland, PowerAction::Lock) => {
                CommandLine::new("loginctl").arg("lock-session")
            }
            (Platform::Hyprland, PowerAction::Shutdown) => systemctl("poweroff", force),
            (Platform::Hyprland, PowerAction::Restart) => systemctl("reboot", force),
            (Platform::Hyprland, PowerAction::Sleep) => systemctl("suspend", false),
        }
    }
}

fn windows_shutdown(mode: &str, force: bool) -> CommandLine {
    let command = CommandLine::new("shutdown").args([mode, "/t", "0"]);
    if force {
        command.arg("/f")
    } else {
        command
    }
}

fn systemctl(verb: &str, force: bool) -> CommandLine {
    let command = CommandLine::new("systemctl").arg(verb);
    if force {
        command.arg("-i")
    } else {
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_force_flag() {
        let plain = Platform::Windows.power_command(PowerAction::Shutdown, false);
        assert_eq!(plain.to_string(), "shutdown /s /t 0");
        let forced = Platform::Windows.power_command(PowerAction::Restart, true);
        assert_eq!(forced.to_string(), "shutdown /r /t 0 /f");
    }

    #[test]
    fn test_hyprland_force_flag() {
        let forced = Platform::Hyprland.power_command(PowerAction::Shutdown, true);
        assert_eq!(forced.args, vec!["poweroff", "-i"]);
        let sleep = Platform::Hyprland.power_command(PowerAction::Sleep, true);
        assert_eq!(sleep.args, vec!["suspend"]);
    }

    #[test]
    fn test_kill_command_is_forced_and_by_name() {
        assert_eq!(
            Platform::Windows.kill_command("notepad.exe").to_string(),
            "taskkill /f /im notepad.exe"
        );
        assert_eq!(
            Platform::Hyprland.kill_command("gedit").args,
            vec!["-9", "-x", "gedit"]
        );
    }
}
