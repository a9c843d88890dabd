//! The OS action executor: one side effect per call, one `ActionResult` back.

use crate::os::input::KeyInjector;
use crate::os::keys::KeyCode;
use crate::os::platform::{Platform, PowerAction};
use crate::os::process::{
    parse_process_table, program_exists, shell_command_line, CommandRunner, NativeCommandRunner,
    ProcessLauncher, ShellLauncher,
};
use crate::os::window::{WindowHandle, WindowManager, WindowState};
use crate::os::{metrics, OsError, OsResult};
use crate::result::ActionResult;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Maximum number of process rows returned by `list_processes`.
pub const PROCESS_LIST_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Up,
    Down,
}

impl StepDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            StepDirection::Up => "up",
            StepDirection::Down => "down",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            StepDirection::Up => "raised",
            StepDirection::Down => "lowered",
        }
    }
}

/// Media transport keys. Play and pause share one toggle key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    PlayPause,
    Stop,
    Next,
    Previous,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::PlayPause => "play_pause",
            MediaKind::Stop => "stop",
            MediaKind::Next => "next",
            MediaKind::Previous => "previous",
        }
    }

    pub fn key(self) -> KeyCode {
        match self {
            MediaKind::PlayPause => KeyCode::MEDIA_PLAY_PAUSE,
            MediaKind::Stop => KeyCode::MEDIA_STOP,
            MediaKind::Next => KeyCode::MEDIA_NEXT,
            MediaKind::Previous => KeyCode::MEDIA_PREV,
        }
    }
}

/// Delays used when synthesizing key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyTiming {
    /// Time between key-down and key-up of a single tap.
    pub hold: Duration,
    /// Pause between repeated volume taps.
    pub volume_pace: Duration,
    /// Pause between repeated brightness taps.
    pub brightness_pace: Duration,
    /// Pause after each press and release inside a combination.
    pub combo_gap: Duration,
}

impl Default for KeyTiming {
    fn default() -> Self {
        Self {
            hold: Duration::from_millis(50),
            volume_pace: Duration::from_millis(100),
            brightness_pace: Duration::from_millis(200),
            combo_gap: Duration::from_millis(50),
        }
    }
}

impl KeyTiming {
    pub fn instant() -> Self {
        Self {
            hold: Duration::ZERO,
            volume_pace: Duration::ZERO,
            brightness_pace: Duration::ZERO,
            combo_gap: Duration::ZERO,
        }
    }
}

/// The OS primitives an executor drives.
#[derive(Clone)]
pub struct Backends {
    pub keys: Arc<dyn KeyInjector>,
    pub windows: Arc<dyn WindowManager>,
    pub launcher: Arc<dyn ProcessLauncher>,
    pub commands: Arc<dyn CommandRunner>,
}

impl Backends {
    #[cfg(target_os = "windows")]
    pub fn native(command_timeout: Option<Duration>) -> Self {
        use crate::os::win32::{Win32Input, Win32Windows};

        Self {
            keys: Arc::new(Win32Input),
            windows: Arc::new(Win32Windows),
            launcher: Arc::new(ShellLauncher),
            commands: Arc::new(NativeCommandRunner::new(command_timeout)),
        }
    }

    #[cfg(not(target_os = "windows"))]
    pub fn native(command_timeout: Option<Duration>) -> Self {
        use crate::os::hyprland::HyprlandWindows;
        use crate::os::input::YdotoolInjector;

        let commands: Arc<dyn CommandRunner> =
            Arc::new(NativeCommandRunner::new(command_timeout));
        Self {
            keys: Arc::new(YdotoolInjector::new(Arc::clone(&commands))),
            windows: Arc::new(HyprlandWindows::new(Arc::clone(&commands))),
            launcher: Arc::new(ShellLauncher),
            commands,
        }
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        sleep(duration).await;
    }
}

fn settle(label: &str, outcome: OsResult<ActionResult>) -> ActionResult {
    match outcome {
        Ok(result) => {
            info!("{} succeeded", label);
            result
        }
        Err(e) => {
            warn!("{} failed: {}", label, e);
            ActionResult::failure(format!("{label} failed: {e}"))
        }
    }
}

/// Executes OS actions. Holds no per-request state, so one instance is
/// shared by every concurrent request.
pub struct ActionExecutor {
    platform: Platform,
    backends: Backends,
    timing: KeyTiming,
}

impl ActionExecutor {
    pub fn new(platform: Platform, backends: Backends, timing: KeyTiming) -> Self {
        Self {
            platform,
            backends,
            timing,
        }
    }

    /// Executor wired to this machine's native backends.
    pub fn native(timing: KeyTiming, command_timeout: Option<Duration>) -> Self {
        Self::new(Platform::native(), Backends::native(command_timeout), timing)
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    async fn tap(&self, code: KeyCode, hold: Duration) -> OsResult<()> {
        self.backends.keys.key_down(code).await?;
        pause(hold).await;
        self.backends.keys.key_up(code).await
    }

    /// Press and release one key, holding it for `hold`.
    pub async fn send_key_event(&self, code: KeyCode, hold: Duration) -> ActionResult {
        let outcome = self
            .tap(code, hold)
            .await
            .map(|()| ActionResult::ok("send_key_event", format!("Key {code} sent")));
        settle("Key event", outcome)
    }

    async fn repeat_key(
        &self,
        kind: &str,
        direction: StepDirection,
        code: KeyCode,
        steps: u32,
        pace: Duration,
    ) -> ActionResult {
        let steps = steps.max(1);
        for step in 1..=steps {
            if let Err(e) = self.tap(code, self.timing.hold).await {
                warn!("{} {} failed at step {}: {}", kind, direction.as_str(), step, e);
                return ActionResult::failure(format!(
                    "{kind} {} failed at step {step}: {e}",
                    direction.as_str()
                ));
            }
            if steps > 1 {
                pause(pace).await;
            }
        }

        info!("{} {} x{}", kind, direction.as_str(), steps);
        ActionResult::ok(
            format!("{}_{}", kind.to_lowercase(), direction.as_str()),
            format!("{kind} {} {steps} step(s)", direction.verb()),
        )
        .with("steps", steps)
    }

    // =================== Volume ===================

    pub async fn volume_step(&self, direction: StepDirection, steps: u32) -> ActionResult {
        let code = match direction {
            StepDirection::Up => KeyCode::VOLUME_UP,
            StepDirection::Down => KeyCode::VOLUME_DOWN,
        };
        self.repeat_key("Volume", direction, code, steps, self.timing.volume_pace)
            .await
    }

    /// Toggle mute. The executor does not know the resulting mute state.
    pub async fn volume_mute(&self) -> ActionResult {
        let outcome = self
            .tap(KeyCode::VOLUME_MUTE, self.timing.hold)
            .await
            .map(|()| ActionResult::ok("volume_mute", "Mute toggled"));
        settle("Mute toggle", outcome)
    }

    // =================== Media ===================

    pub async fn media_control(&self, kind: MediaKind) -> ActionResult {
        let outcome = self.tap(kind.key(), self.timing.hold).await.map(|()| {
            ActionResult::ok(
                format!("media_{}", kind.as_str()),
                format!("Media {} command sent", kind.as_str()),
            )
        });
        settle(&format!("Media {}", kind.as_str()), outcome)
    }

    // =================== Brightness ===================

    pub async fn brightness_step(&self, direction: StepDirection, steps: u32) -> ActionResult {
        let code = match direction {
            StepDirection::Up => KeyCode::BRIGHTNESS_UP,
            StepDirection::Down => KeyCode::BRIGHTNESS_DOWN,
        };
        self.repeat_key(
            "Brightness",
            direction,
            code,
            steps,
            self.timing.brightness_pace,
        )
        .await
    }

    // =================== Applications ===================

    /// Launch `path` detached through the shell. Nothing is spawned when the
    /// program cannot be found.
    pub async fn launch_application(
        &self,
        path: &str,
        args: &str,
        working_dir: &str,
    ) -> ActionResult {
        if !program_exists(path) {
            warn!("Application not found: {}", path);
            return ActionResult::failure(format!("Application not found: {path}"));
        }

        let command_line = shell_command_line(path, args);
        let working_dir = Some(working_dir.trim())
            .filter(|dir| !dir.is_empty())
            .map(Path::new);
        let display_name = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string());

        info!("Launching: {}", command_line);
        let outcome = self
            .backends
            .launcher
            .spawn_shell(&command_line, working_dir)
            .await
            .map(|pid| {
                ActionResult::ok("launch_app", format!("Application launched: {display_name}"))
                    .with("pid", pid)
            });
        settle("Application launch", outcome)
    }

    /// Force-terminate every process with this image name.
    pub async fn kill_process(&self, name: &str) -> ActionResult {
        let command = self.platform.kill_command(name);
        match self.backends.commands.run(&command).await {
            Ok(output) if output.success => {
                info!("Process terminated: {}", name);
                ActionResult::ok("kill_process", format!("Process terminated: {name}"))
            }
            Ok(output) => {
                let text = output.error_text();
                warn!("Failed to terminate {}: {}", name, text);
                ActionResult::failure(format!("Failed to terminate process: {text}"))
            }
            Err(e) => settle("Process termination", Err(e)),
        }
    }

    pub async fn list_processes(&self) -> ActionResult {
        let (command, format) = self.platform.process_list_command();
        let output = match self.backends.commands.run(&command).await {
            Ok(output) if output.success => output,
            Ok(output) => {
                return settle(
                    "Process listing",
                    Err(OsError::OperationFailed(output.error_text())),
                )
            }
            Err(e) => return settle("Process listing", Err(e)),
        };

        let mut processes = parse_process_table(format, &output.stdout);
        let total = processes.len();
        processes.truncate(PROCESS_LIST_LIMIT);

        info!("Listed {} processes", total);
        ActionResult::ok("list_processes", format!("Found {total} processes"))
            .with("processes", json!(processes))
            .with("total_count", total)
    }

    // =================== Windows ===================

    async fn resolve_window(&self, target: Option<WindowHandle>) -> OsResult<WindowHandle> {
        let handle = match target {
            Some(handle) => Some(handle),
            None => self.backends.windows.foreground().await?,
        };
        handle
            .filter(|handle| !handle.is_null())
            .ok_or_else(|| OsError::NotFound("no target window".to_string()))
    }

    pub async fn get_active_window(&self) -> ActionResult {
        let outcome = async {
            let handle = self
                .backends
                .windows
                .foreground()
                .await?
                .filter(|handle| !handle.is_null())
                .ok_or_else(|| OsError::NotFound("no active window".to_string()))?;
            let info = self.backends.windows.describe(handle).await?;
            Ok::<_, OsError>(
                ActionResult::ok("window_info", format!("Active window: {}", info.title))
                    .with("window", json!(info)),
            )
        }
        .await;
        settle("Active window lookup", outcome)
    }

    /// Apply `state` to `target`, or to the foreground window when no target is given.
    pub async fn set_window_state(
        &self,
        target: Option<WindowHandle>,
        state: WindowState,
    ) -> ActionResult {
        let outcome = async {
            let handle = self.resolve_window(target).await?;
            self.backends.windows.set_state(handle, state).await?;
            Ok::<_, OsError>(ActionResult::ok(
                format!("{}_window", state.as_str()),
                format!("Window {} done", state.as_str()),
            )
            .with("hwnd", handle.0))
        }
        .await;
        settle(&format!("Window {}", state.as_str()), outcome)
    }

    /// Post a close request. Success means the request was sent, not that
    /// the window actually closed.
    pub async fn close_window(&self, target: Option<WindowHandle>) -> ActionResult {
        let outcome = async {
            let handle = self.resolve_window(target).await?;
            self.backends.windows.post_close(handle).await?;
            Ok::<_, OsError>(
                ActionResult::ok("close_window", "Window close request sent")
                    .with("hwnd", handle.0),
            )
        }
        .await;
        settle("Window close", outcome)
    }

    // =================== Power ===================

    async fn power(&self, action: PowerAction, force: bool, message: &str) -> ActionResult {
        let command = self.platform.power_command(action, force);
        info!("Issuing power command: {}", command);
        let outcome = match self.backends.commands.run(&command).await {
            Ok(output) if output.success => Ok(ActionResult::ok(action.as_str(), message)),
            Ok(output) => Err(OsError::OperationFailed(output.error_text())),
            Err(e) => Err(e),
        };
        settle(&format!("Power {}", action.as_str()), outcome)
    }

    pub async fn lock_screen(&self) -> ActionResult {
        self.power(PowerAction::Lock, false, "Screen locked").await
    }

    pub async fn shutdown(&self, force: bool) -> ActionResult {
        self.power(PowerAction::Shutdown, force, "Shutdown command sent")
            .await
    }

    pub async fn restart(&self, force: bool) -> ActionResult {
        self.power(PowerAction::Restart, force, "Restart command sent")
            .await
    }

    pub async fn sleep_system(&self) -> ActionResult {
        self.power(PowerAction::Sleep, false, "Sleep command sent").await
    }

    pub async fn system_info(&self) -> ActionResult {
        let outcome = metrics::system_info().await.map(|info| {
            ActionResult::ok("system_info", "System information collected")
                .with("system_info", json!(info))
        });
        settle("System info", outcome)
    }

    // =================== Hotkeys ===================

    /// Press `codes` in order, then release them in reverse order so modifiers
    /// stay held while the final key goes down. Keys already pressed are
    /// always released, even when a later press fails.
    pub async fn send_key_combination(&self, codes: &[KeyCode]) -> ActionResult {
        let gap = self.timing.combo_gap;
        let mut pressed = Vec::with_capacity(codes.len());
        let mut first_error = None;

        for &code in codes {
            match self.backends.keys.key_down(code).await {
                Ok(()) => {
                    pressed.push(code);
                    pause(gap).await;
                }
                Err(e) => {
                    first_error = Some(e);
                    break;
                }
            }
        }

        for &code in pressed.iter().rev() {
            if let Err(e) = self.backends.keys.key_up(code).await {
                first_error.get_or_insert(e);
            }
            pause(gap).await;
        }

        let labels: Vec<String> = codes.iter().map(KeyCode::to_string).collect();
        let outcome = match first_error {
            Some(e) => Err(e),
            None => Ok(ActionResult::ok(
                "send_key_combination",
                format!("Key combination sent: [{}]", labels.join(", ")),
            )
            .with("keys", json!(codes))),
        };
        settle("Key combination", outcome)
    }

    pub async fn send_alt_tab(&self) -> ActionResult {
        self.send_key_combination(&[KeyCode::ALT, KeyCode::TAB]).await
    }

    pub async fn send_ctrl_c(&self) -> ActionResult {
        self.send_key_combination(&[KeyCode::CONTROL, KeyCode(b'C')])
            .await
    }

    pub async fn send_ctrl_v(&self) -> ActionResult {
        self.send_key_combination(&[KeyCode::CONTROL, KeyCode(b'V')])
            .await
    }

    pub async fn send_win_d(&self) -> ActionResult {
        self.send_key_combination(&[KeyCode::LEFT_WIN, KeyCode(b'D')])
            .await
    }
}
