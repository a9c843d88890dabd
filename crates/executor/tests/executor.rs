use remote_pc_executor::os::keys::KeyCode;
use remote_pc_executor::os::recording::RecordingBackend;
use remote_pc_executor::os::window::{WindowHandle, WindowState};
use remote_pc_executor::os::CommandOutput;
use remote_pc_executor::{
    ActionExecutor, KeyTiming, MediaKind, Platform, StepDirection, PROCESS_LIST_LIMIT,
};
use std::sync::Arc;

fn executor(platform: Platform) -> (ActionExecutor, Arc<RecordingBackend>) {
    let backend = RecordingBackend::new();
    let executor = ActionExecutor::new(platform, backend.backends(), KeyTiming::instant());
    (executor, backend)
}

#[tokio::test]
async fn test_volume_up_taps_key_per_step() {
    let (executor, backend) = executor(Platform::Windows);

    let result = executor.volume_step(StepDirection::Up, 3).await;

    assert!(result.success);
    assert_eq!(result.action.as_deref(), Some("volume_up"));
    assert_eq!(result.get("steps"), Some(&serde_json::json!(3)));
    assert_eq!(
        backend.events(),
        vec!["down 0xaf", "up 0xaf", "down 0xaf", "up 0xaf", "down 0xaf", "up 0xaf"]
    );
}

#[tokio::test]
async fn test_zero_steps_means_one() {
    let (executor, backend) = executor(Platform::Windows);

    let result = executor.brightness_step(StepDirection::Down, 0).await;

    assert!(result.success);
    assert_eq!(result.get("steps"), Some(&serde_json::json!(1)));
    assert_eq!(backend.events(), vec!["down 0xe8", "up 0xe8"]);
}

#[tokio::test]
async fn test_volume_step_stops_at_first_failed_press() {
    let (executor, backend) = executor(Platform::Windows);
    backend.fail_press(2);

    let result = executor.volume_step(StepDirection::Up, 3).await;

    assert!(!result.success);
    assert!(result.message.starts_with("Volume up failed at step 2"));
    assert_eq!(backend.events(), vec!["down 0xaf", "up 0xaf"]);
}

#[tokio::test]
async fn test_media_and_mute_are_single_taps() {
    let (executor, backend) = executor(Platform::Windows);

    assert!(executor.media_control(MediaKind::Next).await.success);
    assert!(executor.volume_mute().await.success);

    assert_eq!(
        backend.events(),
        vec!["down 0xb0", "up 0xb0", "down 0xad", "up 0xad"]
    );
}

#[tokio::test]
async fn test_combination_releases_in_reverse() {
    let (executor, backend) = executor(Platform::Windows);

    let result = executor
        .send_key_combination(&[KeyCode::CONTROL, KeyCode::SHIFT, KeyCode::ESCAPE])
        .await;

    assert!(result.success);
    assert_eq!(
        backend.events(),
        vec!["down 0x11", "down 0x10", "down 0x1b", "up 0x1b", "up 0x10", "up 0x11"]
    );
}

#[tokio::test]
async fn test_combination_failure_releases_pressed_keys() {
    let (executor, backend) = executor(Platform::Windows);
    backend.fail_key(KeyCode::ESCAPE);

    let result = executor
        .send_key_combination(&[KeyCode::CONTROL, KeyCode::SHIFT, KeyCode::ESCAPE])
        .await;

    assert!(!result.success);
    assert!(result.message.contains("rejected"));
    assert_eq!(
        backend.events(),
        vec!["down 0x11", "down 0x10", "up 0x10", "up 0x11"]
    );
}

#[tokio::test]
async fn test_hotkey_shortcuts() {
    let (executor, backend) = executor(Platform::Windows);

    assert!(executor.send_win_d().await.success);
    assert_eq!(
        backend.events(),
        vec!["down 0x5b", "down 0x44", "up 0x44", "up 0x5b"]
    );
}

#[tokio::test]
async fn test_launch_missing_absolute_path_does_not_spawn() {
    let (executor, backend) = executor(Platform::Windows);
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.exe");
    let missing = missing.to_string_lossy().to_string();

    let result = executor.launch_application(&missing, "", "").await;

    assert!(!result.success);
    assert_eq!(result.message, format!("Application not found: {missing}"));
    assert!(backend.events().is_empty());
}

#[tokio::test]
async fn test_launch_existing_program_spawns_with_args_and_dir() {
    let (executor, backend) = executor(Platform::Windows);
    let dir = tempfile::tempdir().unwrap();
    let program = dir.path().join("tool.exe");
    std::fs::write(&program, b"").unwrap();
    let program = program.to_string_lossy().to_string();
    let cwd = dir.path().to_string_lossy().to_string();

    let result = executor.launch_application(&program, "--flag", &cwd).await;

    assert!(result.success, "{}", result.message);
    assert_eq!(result.message, "Application launched: tool.exe");
    assert!(result.get("pid").is_some());
    assert_eq!(
        backend.events(),
        vec![format!("spawn \"{program}\" --flag in {cwd}")]
    );
}

#[tokio::test]
async fn test_kill_process_success_and_failure() {
    let (executor, backend) = executor(Platform::Windows);

    let ok = executor.kill_process("notepad.exe").await;
    assert!(ok.success);
    assert_eq!(ok.message, "Process terminated: notepad.exe");
    assert_eq!(backend.events(), vec!["run taskkill /f /im notepad.exe"]);

    backend.respond(
        "taskkill",
        CommandOutput {
            success: false,
            code: Some(128),
            stdout: String::new(),
            stderr: "ERROR: The process \"ghost.exe\" not found.".to_string(),
        },
    );
    let failed = executor.kill_process("ghost.exe").await;
    assert!(!failed.success);
    assert_eq!(
        failed.message,
        "Failed to terminate process: ERROR: The process \"ghost.exe\" not found."
    );
}

#[tokio::test]
async fn test_list_processes_truncates_but_counts_all() {
    let (executor, backend) = executor(Platform::Hyprland);
    let mut table = String::from("COMMAND PID RSS\n");
    for pid in 1..=60 {
        table.push_str(&format!("proc{pid} {pid} {}\n", pid * 10));
    }
    backend.respond(
        "ps",
        CommandOutput {
            success: true,
            code: Some(0),
            stdout: table,
            stderr: String::new(),
        },
    );

    let result = executor.list_processes().await;

    assert!(result.success);
    assert_eq!(result.message, "Found 60 processes");
    assert_eq!(result.get("total_count"), Some(&serde_json::json!(60)));
    let processes = result.get("processes").unwrap().as_array().unwrap();
    assert_eq!(processes.len(), PROCESS_LIST_LIMIT);
    assert_eq!(processes[0]["name"], "proc1");
    assert_eq!(processes[0]["memory_kb"], 10);
}

#[tokio::test]
async fn test_close_uses_explicit_handle() {
    let (executor, backend) = executor(Platform::Windows);

    let result = executor.close_window(Some(WindowHandle(0x1234))).await;

    assert!(result.success);
    assert_eq!(result.get("hwnd"), Some(&serde_json::json!(0x1234)));
    assert_eq!(backend.events(), vec!["close 0x1234"]);
}

#[tokio::test]
async fn test_window_state_defaults_to_foreground() {
    let (executor, backend) = executor(Platform::Windows);

    let result = executor.set_window_state(None, WindowState::Minimize).await;

    assert!(result.success);
    assert_eq!(result.action.as_deref(), Some("minimize_window"));
    assert_eq!(backend.events(), vec!["minimize 0x2a"]);
}

#[tokio::test]
async fn test_window_ops_fail_without_target() {
    let (executor, backend) = executor(Platform::Windows);
    backend.set_foreground(None);

    assert!(!executor.set_window_state(None, WindowState::Maximize).await.success);
    assert!(!executor.get_active_window().await.success);
    assert!(!executor.close_window(Some(WindowHandle(0))).await.success);
    assert!(backend.events().is_empty());
}

#[tokio::test]
async fn test_active_window_reports_info() {
    let (executor, _backend) = executor(Platform::Windows);

    let result = executor.get_active_window().await;

    assert!(result.success);
    let window = result.get("window").unwrap();
    assert_eq!(window["title"], "Recorded Window");
    assert_eq!(window["rect"]["width"], 800);
}

#[tokio::test]
async fn test_power_commands_follow_platform() {
    let (executor, backend) = executor(Platform::Hyprland);

    assert!(executor.lock_screen().await.success);
    assert!(executor.shutdown(true).await.success);
    assert!(executor.restart(false).await.success);
    assert!(executor.sleep_system().await.success);

    assert_eq!(
        backend.events(),
        vec![
            "run loginctl lock-session",
            "run systemctl poweroff -i",
            "run systemctl reboot",
            "run systemctl suspend",
        ]
    );
}

#[tokio::test]
async fn test_power_failure_is_reported() {
    let (executor, backend) = executor(Platform::Windows);
    backend.respond(
        "shutdown",
        CommandOutput {
            success: false,
            code: Some(5),
            stdout: String::new(),
            stderr: "Access is denied.".to_string(),
        },
    );

    let result = executor.shutdown(false).await;

    assert!(!result.success);
    assert!(result.message.contains("Access is denied."));
}
