use windows::Win32::Foundation::{BOOL, HWND, LPARAM};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    GetAsyncKeyState, VK_CONTROL, VK_LBUTTON, VK_RBUTTON,
};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetClassNameW, GetWindowTextW, GetWindowThreadProcessId, IsWindowVisible,
    SetForegroundWindow,
};

use super::{WindowInfo, WindowRef};
use crate::dispatch::{Modifiers, MouseButton};

pub fn enumerate_windows() -> Vec<WindowInfo> {
    unsafe extern "system" fn callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
        let windows = unsafe { &mut *(lparam.0 as *mut Vec<WindowInfo>) };
        windows.push(snapshot(hwnd));
        BOOL::from(true)
    }

    let mut windows: Vec<WindowInfo> = Vec::new();
    unsafe {
        let _ = EnumWindows(Some(callback), LPARAM(&mut windows as *mut _ as isize));
    }
    windows
}

fn snapshot(hwnd: HWND) -> WindowInfo {
    unsafe {
        let mut class_buf = [0u16; 256];
        let len = GetClassNameW(hwnd, &mut class_buf).max(0) as usize;
        let class_name = String::from_utf16_lossy(&class_buf[..len]);

        let mut title_buf = [0u16; 512];
        let len = GetWindowTextW(hwnd, &mut title_buf).max(0) as usize;
        let title = String::from_utf16_lossy(&title_buf[..len]);

        let mut pid = 0u32;
        GetWindowThreadProcessId(hwnd, Some(&mut pid));

        WindowInfo {
            handle: WindowRef(hwnd.0 as isize),
            visible: IsWindowVisible(hwnd).as_bool(),
            class_name,
            pid,
            title,
        }
    }
}

pub fn activate_window(window: WindowRef) -> Result<(), String> {
    let hwnd = HWND(window.0 as *mut core::ffi::c_void);
    if unsafe { SetForegroundWindow(hwnd) }.as_bool() {
        Ok(())
    } else {
        Err("SetForegroundWindow refused the request".to_string())
    }
}

fn key_down(vk: u16) -> bool {
    (unsafe { GetAsyncKeyState(vk as i32) } as u16) & 0x8000 != 0
}

/// Down now, or pressed since the previous poll. Menu activation happens
/// on mouse-up, so the since-last-poll bit is what catches the button
/// that drove it.
fn key_clicked(vk: u16) -> bool {
    let state = unsafe { GetAsyncKeyState(vk as i32) } as u16;
    state & 0x8000 != 0 || state & 0x0001 != 0
}

pub fn modifier_state() -> Modifiers {
    Modifiers {
        control: key_down(VK_CONTROL.0),
    }
}

pub fn pressed_button() -> MouseButton {
    if key_clicked(VK_RBUTTON.0) {
        MouseButton::Right
    } else if key_clicked(VK_LBUTTON.0) {
        MouseButton::Left
    } else {
        MouseButton::Other
    }
}
