//! Top-level window inspection and input-state sampling.
//!
//! Enumeration produces a materialized snapshot in the OS z-order; the
//! selection itself is a pure filter chain so it can be tested without a
//! window system.

#[cfg(windows)]
mod win32;

use crate::dispatch::{Modifiers, MouseButton};

/// Class name of the Windows shell/taskbar window, never a valid
/// keystroke target.
pub const SHELL_TRAY_CLASS: &str = "Shell_TrayWnd";

/// Opaque handle to a top-level window, valid for the duration of one
/// dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRef(pub isize);

/// Snapshot of one top-level window taken during enumeration.
#[derive(Debug, Clone)]
pub struct WindowInfo {
    pub handle: WindowRef,
    pub visible: bool,
    pub class_name: String,
    pub pid: u32,
    pub title: String,
}

/// Picks the window the user was most recently interacting with: the
/// first enumerated window that is visible, titled, not the shell and not
/// owned by this process.
pub fn find_topmost_valid_window(
    windows: impl IntoIterator<Item = WindowInfo>,
    current_pid: u32,
) -> Option<WindowRef> {
    windows
        .into_iter()
        .filter(|w| w.visible)
        .filter(|w| w.class_name != SHELL_TRAY_CLASS)
        .filter(|w| w.pid != current_pid)
        .filter(|w| !w.title.trim().is_empty())
        .map(|w| w.handle)
        .next()
}

/// Snapshot of all top-level windows in z-order, front to back. Empty
/// where enumeration is unsupported.
pub fn enumerate_windows() -> Vec<WindowInfo> {
    #[cfg(windows)]
    {
        win32::enumerate_windows()
    }
    #[cfg(not(windows))]
    {
        Vec::new()
    }
}

pub fn activate_window(window: WindowRef) -> Result<(), String> {
    #[cfg(windows)]
    {
        win32::activate_window(window)
    }
    #[cfg(not(windows))]
    {
        let _ = window;
        Err("window activation is not supported on this platform".to_string())
    }
}

/// Modifier keys held at the moment a menu item was activated.
pub fn modifier_state() -> Modifiers {
    #[cfg(windows)]
    {
        win32::modifier_state()
    }
    #[cfg(not(windows))]
    {
        Modifiers::default()
    }
}

/// Mouse button that drove the activation. Menu events carry no button,
/// so the async key state is sampled instead.
pub fn pressed_button() -> MouseButton {
    #[cfg(windows)]
    {
        win32::pressed_button()
    }
    #[cfg(not(windows))]
    {
        MouseButton::Left
    }
}
