use crate::actions::{
    AppAction, BrightnessAction, Category, HotkeyAction, MediaAction, SystemAction,
    VolumeAction, WindowAction,
};
use crate::error::DispatchError;
use crate::params::Params;
use remote_pc_executor::os::keys::KeyCode;
use remote_pc_executor::os::window::{WindowHandle, WindowState};
use remote_pc_executor::{ActionExecutor, ActionResult, MediaKind, StepDirection};
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, warn};

/// A fully validated action, ready to run against the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    VolumeStep { direction: StepDirection, steps: u32 },
    VolumeMute,
    Media(MediaKind),
    BrightnessStep { direction: StepDirection, steps: u32 },
    Launch { path: String, args: String, working_dir: String },
    Kill { name: String },
    ListProcesses,
    SetWindowState { target: Option<WindowHandle>, state: WindowState },
    CloseWindow { target: Option<WindowHandle> },
    WindowInfo,
    Lock,
    Shutdown { force: bool },
    Restart { force: bool },
    Sleep,
    SystemInfo,
    AltTab,
    CtrlC,
    CtrlV,
    WinD,
    KeyCombination(Vec<KeyCode>),
}

fn parse_action<A: FromStr>(category: Category, action: &str) -> Result<A, DispatchError> {
    action.parse().map_err(|_| DispatchError::UnknownAction {
        category,
        action: action.to_string(),
        available: category.actions(),
    })
}

impl Command {
    /// Select the action and coerce its parameters. Validation failures are
    /// reported here, before anything touches the OS.
    pub fn resolve(
        category: Category,
        action: &str,
        params: &Params,
    ) -> Result<Command, DispatchError> {
        let command = match category {
            Category::Volume => match parse_action::<VolumeAction>(category, action)? {
                VolumeAction::Up => Command::VolumeStep {
                    direction: StepDirection::Up,
                    steps: params.steps(),
                },
                VolumeAction::Down => Command::VolumeStep {
                    direction: StepDirection::Down,
                    steps: params.steps(),
                },
                VolumeAction::Mute => Command::VolumeMute,
            },
            Category::Media => match parse_action::<MediaAction>(category, action)? {
                MediaAction::Play | MediaAction::Pause => Command::Media(MediaKind::PlayPause),
                MediaAction::Stop => Command::Media(MediaKind::Stop),
                MediaAction::Next => Command::Media(MediaKind::Next),
                MediaAction::Previous => Command::Media(MediaKind::Previous),
            },
            Category::Brightness => match parse_action::<BrightnessAction>(category, action)? {
                BrightnessAction::Up => Command::BrightnessStep {
                    direction: StepDirection::Up,
                    steps: params.steps(),
                },
                BrightnessAction::Down => Command::BrightnessStep {
                    direction: StepDirection::Down,
                    steps: params.steps(),
                },
            },
            Category::App => match parse_action::<AppAction>(category, action)? {
                AppAction::Launch => Command::Launch {
                    path: params
                        .required(
                            "path",
                            json!({"path": "C:\\Windows\\System32\\notepad.exe"}),
                        )?
                        .to_string(),
                    args: params.optional("args").to_string(),
                    working_dir: params.optional("working_dir").to_string(),
                },
                AppAction::Kill => Command::Kill {
                    name: params
                        .required("name", json!({"name": "notepad.exe"}))?
                        .to_string(),
                },
                AppAction::Processes => Command::ListProcesses,
            },
            Category::Window => {
                let target = params.hwnd();
                match parse_action::<WindowAction>(category, action)? {
                    WindowAction::Minimize => Command::SetWindowState {
                        target,
                        state: WindowState::Minimize,
                    },
                    WindowAction::Maximize => Command::SetWindowState {
                        target,
                        state: WindowState::Maximize,
                    },
                    WindowAction::Restore => Command::SetWindowState {
                        target,
                        state: WindowState::Restore,
                    },
                    WindowAction::Close => Command::CloseWindow { target },
                    WindowAction::Info => Command::WindowInfo,
                }
            }
            Category::System => match parse_action::<SystemAction>(category, action)? {
                SystemAction::Lock => Command::Lock,
                SystemAction::Shutdown => Command::Shutdown {
                    force: params.force(),
                },
                SystemAction::Restart => Command::Restart {
                    force: params.force(),
                },
                SystemAction::Sleep => Command::Sleep,
                SystemAction::Info => Command::SystemInfo,
            },
            Category::Hotkey => match parse_action::<HotkeyAction>(category, action)? {
                HotkeyAction::AltTab => Command::AltTab,
                HotkeyAction::CtrlC => Command::CtrlC,
                HotkeyAction::CtrlV => Command::CtrlV,
                HotkeyAction::WinD => Command::WinD,
                HotkeyAction::Custom => Command::KeyCombination(params.keys()?),
            },
        };
        Ok(command)
    }

    pub async fn run(self, executor: &ActionExecutor) -> ActionResult {
        match self {
            Command::VolumeStep { direction, steps } => {
                executor.volume_step(direction, steps).await
            }
            Command::VolumeMute => executor.volume_mute().await,
            Command::Media(kind) => executor.media_control(kind).await,
            Command::BrightnessStep { direction, steps } => {
                executor.brightness_step(direction, steps).await
            }
            Command::Launch {
                path,
                args,
                working_dir,
            } => {
                executor
                    .launch_application(&path, &args, &working_dir)
                    .await
            }
            Command::Kill { name } => executor.kill_process(&name).await,
            Command::ListProcesses => executor.list_processes().await,
            Command::SetWindowState { target, state } => {
                executor.set_window_state(target, state).await
            }
            Command::CloseWindow { target } => executor.close_window(target).await,
            Command::WindowInfo => executor.get_active_window().await,
            Command::Lock => executor.lock_screen().await,
            Command::Shutdown { force } => executor.shutdown(force).await,
            Command::Restart { force } => executor.restart(force).await,
            Command::Sleep => executor.sleep_system().await,
            Command::SystemInfo => executor.system_info().await,
            Command::AltTab => executor.send_alt_tab().await,
            Command::CtrlC => executor.send_ctrl_c().await,
            Command::CtrlV => executor.send_ctrl_v().await,
            Command::WinD => executor.send_win_d().await,
            Command::KeyCombination(codes) => executor.send_key_combination(&codes).await,
        }
    }
}

/// Routes `(category, action, params)` to one executor call.
pub struct Dispatcher {
    executor: Arc<ActionExecutor>,
}

impl Dispatcher {
    pub fn new(executor: Arc<ActionExecutor>) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &Arc<ActionExecutor> {
        &self.executor
    }

    pub async fn invoke(
        &self,
        category: &str,
        action: &str,
        params: &Params,
    ) -> Result<ActionResult, DispatchError> {
        info!("Dispatching {}/{}", category, action);

        let category: Category =
            category
                .parse()
                .map_err(|_| DispatchError::UnknownCategory {
                    category: category.to_string(),
                    available: Category::names(),
                })?;

        let command = Command::resolve(category, action, params).map_err(|e| {
            warn!("Rejected {}/{}: {}", category, action, e);
            e
        })?;

        self.execute_with_protection(command).await
    }

    async fn execute_with_protection(
        &self,
        command: Command,
    ) -> Result<ActionResult, DispatchError> {
        let executor = Arc::clone(&self.executor);

        // Spawn task to isolate panics
        let handle = tokio::spawn(async move { command.run(&executor).await });

        match handle.await {
            Ok(result) => Ok(result),
            Err(join_err) if join_err.is_panic() => {
                error!("Action execution panicked");
                Err(DispatchError::Internal("action execution panicked".into()))
            }
            Err(_) => {
                error!("Action execution cancelled");
                Err(DispatchError::Internal("action execution cancelled".into()))
            }
        }
    }
}
