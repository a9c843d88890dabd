//! Win32 backends: `keybd_event` injection and user32 window messaging.

use super::keys::KeyCode;
use super::window::{WindowHandle, WindowInfo, WindowManager, WindowRect, WindowState};
use super::{input::KeyInjector, OsError, OsResult};
use async_trait::async_trait;
use std::ffi::c_void;
use windows::Win32::Foundation::{HWND, LPARAM, RECT, WPARAM};
use windows::Win32::UI::Input::KeyboardAndMouse::{keybd_event, KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP};
use windows::Win32::UI::WindowsAndMessaging::{
    GetClassNameW, GetForegroundWindow, GetWindowRect, GetWindowTextLengthW, GetWindowTextW,
    IsWindowVisible, PostMessageW, ShowWindow, SHOW_WINDOW_CMD, WM_CLOSE,
};

fn to_hwnd(handle: WindowHandle) -> HWND {
    HWND(handle.0 as isize as *mut c_void)
}

fn from_hwnd(hwnd: HWND) -> WindowHandle {
    WindowHandle(hwnd.0 as isize as i64)
}

/// `keybd_event` based injector.
#[derive(Debug, Default)]
pub struct Win32Input;

#[async_trait]
impl KeyInjector for Win32Input {
    async fn key_down(&self, code: KeyCode) -> OsResult<()> {
        unsafe { keybd_event(code.0, 0, KEYBD_EVENT_FLAGS(0), 0) };
        Ok(())
    }

    async fn key_up(&self, code: KeyCode) -> OsResult<()> {
        unsafe { keybd_event(code.0, 0, KEYEVENTF_KEYUP, 0) };
        Ok(())
    }
}

fn foreground_window() -> Option<WindowHandle> {
    let hwnd = unsafe { GetForegroundWindow() };
    if hwnd.0.is_null() {
        None
    } else {
        Some(from_hwnd(hwnd))
    }
}

fn describe_window(handle: WindowHandle) -> OsResult<WindowInfo> {
    let hwnd = to_hwnd(handle);

    let title_len = unsafe { GetWindowTextLengthW(hwnd) }.max(0) as usize;
    let mut title = vec![0u16; title_len + 1];
    let copied = unsafe { GetWindowTextW(hwnd, &mut title) }.max(0) as usize;

    let mut class = vec![0u16; 256];
    let class_len = unsafe { GetClassNameW(hwnd, &mut class) }.max(0) as usize;

    let mut rect = RECT::default();
    unsafe { GetWindowRect(hwnd, &mut rect) }
        .map_err(|e| OsError::OperationFailed(e.to_string()))?;

    let is_visible = unsafe { IsWindowVisible(hwnd) }.as_bool();

    Ok(WindowInfo {
        hwnd: handle,
        title: String::from_utf16_lossy(&title[..copied]),
        class_name: String::from_utf16_lossy(&class[..class_len]),
        rect: WindowRect::new(rect.left, rect.top, rect.right, rect.bottom),
        is_visible,
    })
}

/// user32 window manager.
#[derive(Debug, Default)]
pub struct Win32Windows;

#[async_trait]
impl WindowManager for Win32Windows {
    async fn foreground(&self) -> OsResult<Option<WindowHandle>> {
        Ok(foreground_window())
    }

    async fn describe(&self, handle: WindowHandle) -> OsResult<WindowInfo> {
        describe_window(handle)
    }

    async fn set_state(&self, handle: WindowHandle, state: WindowState) -> OsResult<()> {
        // The return value is the previous visibility, not an error flag.
        let _ = unsafe { ShowWindow(to_hwnd(handle), SHOW_WINDOW_CMD(state.show_command())) };
        Ok(())
    }

    async fn post_close(&self, handle: WindowHandle) -> OsResult<()> {
        unsafe { PostMessageW(to_hwnd(handle), WM_CLOSE, WPARAM(0), LPARAM(0)) }
            .map_err(|e| OsError::OperationFailed(e.to_string()))
    }
}
