//! Hyprland window control through `hyprctl`

use super::process::{CommandLine, CommandRunner};
use super::window::{WindowHandle, WindowInfo, WindowManager, WindowRect, WindowState};
use super::{OsError, OsResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

fn selector(handle: WindowHandle) -> String {
    format!("address:{:#x}", handle.0)
}

fn parse_address(raw: &str) -> OsResult<WindowHandle> {
    let hex = raw.trim().trim_start_matches("0x");
    i64::from_str_radix(hex, 16)
        .map(WindowHandle)
        .map_err(|_| OsError::OperationFailed(format!("Invalid window address: {raw}")))
}

fn coordinate_pair(value: &Value, field: &str) -> (i32, i32) {
    let x = value[field][0].as_i64().unwrap_or(0) as i32;
    let y = value[field][1].as_i64().unwrap_or(0) as i32;
    (x, y)
}

/// Map one `hyprctl clients -j` entry to window metadata.
pub fn client_to_window(client: &Value) -> OsResult<WindowInfo> {
    let address = client["address"]
        .as_str()
        .ok_or_else(|| OsError::OperationFailed("client entry has no address".to_string()))?;
    let (x, y) = coordinate_pair(client, "at");
    let (width, height) = coordinate_pair(client, "size");
    let mapped = client["mapped"].as_bool().unwrap_or(true);
    let hidden = client["hidden"].as_bool().unwrap_or(false);

    Ok(WindowInfo {
        hwnd: parse_address(address)?,
        title: client["title"].as_str().unwrap_or_default().to_string(),
        class_name: client["class"].as_str().unwrap_or_default().to_string(),
        rect: WindowRect::new(x, y, x + width, y + height),
        is_visible: mapped && !hidden,
    })
}

/// Window manager backed by the Hyprland IPC CLI.
pub struct HyprlandWindows {
    runner: Arc<dyn CommandRunner>,
}

impl HyprlandWindows {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    async fn query(&self, args: &[&str]) -> OsResult<Value> {
        let output = self
            .runner
            .run(&CommandLine::new("hyprctl").args(args.iter().copied()))
            .await?;
        if !output.success {
            return Err(OsError::OperationFailed(output.error_text()));
        }
        serde_json::from_str(&output.stdout).map_err(|e| OsError::OperationFailed(e.to_string()))
    }

    async fn dispatch(&self, args: &[String]) -> OsResult<()> {
        let command = CommandLine::new("hyprctl")
            .arg("dispatch")
            .args(args.iter().cloned());
        let output = self.runner.run(&command).await?;
        let reply = output.stdout.trim();
        if output.success && (reply.is_empty() || reply == "ok") {
            return Ok(());
        }
        Err(OsError::OperationFailed(output.error_text()))
    }

    async fn active_workspace(&self) -> OsResult<i64> {
        let json = self.query(&["activeworkspace", "-j"]).await?;
        json["id"]
            .as_i64()
            .ok_or_else(|| OsError::OperationFailed("Invalid workspace ID".to_string()))
    }
}

#[async_trait]
impl WindowManager for HyprlandWindows {
    async fn foreground(&self) -> OsResult<Option<WindowHandle>> {
        let json = self.query(&["activewindow", "-j"]).await?;
        match json["address"].as_str() {
            Some(address) if !address.is_empty() => parse_address(address).map(Some),
            _ => Ok(None),
        }
    }

    async fn describe(&self, handle: WindowHandle) -> OsResult<WindowInfo> {
        let json = self.query(&["clients", "-j"]).await?;
        let clients = json
            .as_array()
            .ok_or_else(|| OsError::OperationFailed("hyprctl clients returned no list".to_string()))?;

        for client in clients {
            let info = client_to_window(client)?;
            if info.hwnd == handle {
                return Ok(info);
            }
        }
        Err(OsError::NotFound(format!("window {handle}")))
    }

    async fn set_state(&self, handle: WindowHandle, state: WindowState) -> OsResult<()> {
        let target = selector(handle);
        match state {
            // Hyprland has no iconic state; park the client on a special workspace.
            WindowState::Minimize => {
                self.dispatch(&[
                    "movetoworkspacesilent".to_string(),
                    format!("special:minimized,{target}"),
                ])
                .await
            }
            WindowState::Maximize => {
                self.dispatch(&["focuswindow".to_string(), target]).await?;
                self.dispatch(&["fullscreen".to_string(), "1".to_string()]).await
            }
            WindowState::Restore => {
                let workspace = self.active_workspace().await?;
                self.dispatch(&[
                    "movetoworkspacesilent".to_string(),
                    format!("{workspace},{target}"),
                ])
                .await?;
                self.dispatch(&["focuswindow".to_string(), target]).await
            }
        }
    }

    async fn post_close(&self, handle: WindowHandle) -> OsResult<()> {
        self.dispatch(&["closewindow".to_string(), selector(handle)])
            .await
    }
}
