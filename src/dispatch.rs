use std::time::Duration;

use enigo::{Enigo, Keyboard, Settings};
use thiserror::Error;
use tracing::debug;

use crate::clipboard;
use crate::menu::MenuEntry;
use crate::platform::{self, WindowRef};

/// Modifier keys held at the moment a menu item was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub control: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Other,
}

/// Per-action failure, surfaced to the user as a single dialog message.
/// Never crosses the shell boundary as a panic.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Failed to copy to clipboard: {0}")]
    Clipboard(String),
    #[error("Failed to open: {0}")]
    Open(String),
    #[error("Failed to sendkey: {0}")]
    SendKey(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Entry had no content; nothing was touched.
    Nothing,
    Copied,
    Opened,
    Typed,
    /// Copy succeeded but no window qualified as a keystroke target.
    NoTarget,
}

/// The fallible OS calls a dispatch runs through. The desktop
/// implementation talks to the real clipboard, shell handler and input
/// queue; tests substitute a recorder.
pub trait SystemActions {
    fn set_clipboard(&mut self, text: &str) -> Result<(), String>;
    fn open(&mut self, target: &str) -> Result<(), String>;
    fn find_target_window(&mut self) -> Option<WindowRef>;
    fn activate_window(&mut self, window: WindowRef) -> Result<(), String>;
    fn delay(&mut self, duration: Duration);
    fn send_text(&mut self, text: &str) -> Result<(), String>;
}

/// Single-shot action for one activated menu entry.
///
/// The content is always copied to the clipboard first. With control held,
/// a left click additionally opens the content via the OS default handler
/// and a right click types it into the previously active window after
/// `delay`. The first failure stops the dispatch; nothing is retried.
pub fn dispatch(
    entry: &MenuEntry,
    modifiers: Modifiers,
    button: MouseButton,
    delay: Duration,
    actions: &mut dyn SystemActions,
) -> Result<Outcome, DispatchError> {
    if entry.content.is_empty() {
        return Ok(Outcome::Nothing);
    }

    actions
        .set_clipboard(&entry.content)
        .map_err(DispatchError::Clipboard)?;

    if !modifiers.control {
        return Ok(Outcome::Copied);
    }

    match button {
        MouseButton::Left => {
            actions.open(&entry.content).map_err(DispatchError::Open)?;
            Ok(Outcome::Opened)
        }
        MouseButton::Right => {
            let Some(window) = actions.find_target_window() else {
                debug!("no keystroke target window found");
                return Ok(Outcome::NoTarget);
            };
            actions
                .activate_window(window)
                .map_err(DispatchError::SendKey)?;
            actions.delay(delay);
            actions
                .send_text(&entry.content)
                .map_err(DispatchError::SendKey)?;
            Ok(Outcome::Typed)
        }
        MouseButton::Other => Ok(Outcome::Copied),
    }
}

/// Production [`SystemActions`] backed by the real desktop.
pub struct DesktopActions;

impl SystemActions for DesktopActions {
    fn set_clipboard(&mut self, text: &str) -> Result<(), String> {
        clipboard::copy_to_clipboard(text).map_err(|e| format!("{e:#}"))
    }

    fn open(&mut self, target: &str) -> Result<(), String> {
        open::that(target).map_err(|e| e.to_string())
    }

    fn find_target_window(&mut self) -> Option<WindowRef> {
        platform::find_topmost_valid_window(platform::enumerate_windows(), std::process::id())
    }

    fn activate_window(&mut self, window: WindowRef) -> Result<(), String> {
        platform::activate_window(window)
    }

    fn delay(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn send_text(&mut self, text: &str) -> Result<(), String> {
        let mut enigo = Enigo::new(&Settings::default()).map_err(|e| e.to_string())?;
        enigo.text(text).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(content: &str) -> MenuEntry {
        MenuEntry {
            main_menu: "Main".to_string(),
            sub_menu: String::new(),
            label: "Item".to_string(),
            content: content.to_string(),
        }
    }

    const DELAY: Duration = Duration::from_millis(5);

    /// Records every call in order instead of touching the OS.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        target: Option<WindowRef>,
        fail_clipboard: bool,
        fail_open: bool,
        fail_activate: bool,
        fail_send: bool,
    }

    impl SystemActions for Recorder {
        fn set_clipboard(&mut self, text: &str) -> Result<(), String> {
            self.calls.push(format!("clipboard:{text}"));
            if self.fail_clipboard {
                return Err("clipboard is locked".to_string());
            }
            Ok(())
        }

        fn open(&mut self, target: &str) -> Result<(), String> {
            self.calls.push(format!("open:{target}"));
            if self.fail_open {
                return Err("no handler registered".to_string());
            }
            Ok(())
        }

        fn find_target_window(&mut self) -> Option<WindowRef> {
            self.calls.push("find".to_string());
            self.target
        }

        fn activate_window(&mut self, window: WindowRef) -> Result<(), String> {
            self.calls.push(format!("activate:{}", window.0));
            if self.fail_activate {
                return Err("activation refused".to_string());
            }
            Ok(())
        }

        fn delay(&mut self, duration: Duration) {
            self.calls.push(format!("delay:{}", duration.as_millis()));
        }

        fn send_text(&mut self, text: &str) -> Result<(), String> {
            self.calls.push(format!("send:{text}"));
            if self.fail_send {
                return Err("injection failed".to_string());
            }
            Ok(())
        }
    }

    #[test]
    fn test_empty_content_is_a_no_op() {
        let mut recorder = Recorder::default();
        let outcome = dispatch(
            &entry(""),
            Modifiers { control: true },
            MouseButton::Left,
            DELAY,
            &mut recorder,
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Nothing);
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn test_plain_click_only_copies() {
        let mut recorder = Recorder::default();
        let outcome = dispatch(
            &entry("hello"),
            Modifiers::default(),
            MouseButton::Left,
            DELAY,
            &mut recorder,
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Copied);
        assert_eq!(recorder.calls, vec!["clipboard:hello"]);
    }

    #[test]
    fn test_control_left_opens() {
        let mut recorder = Recorder::default();
        let outcome = dispatch(
            &entry("https://example.com"),
            Modifiers { control: true },
            MouseButton::Left,
            DELAY,
            &mut recorder,
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Opened);
        assert_eq!(
            recorder.calls,
            vec!["clipboard:https://example.com", "open:https://example.com"]
        );
    }

    #[test]
    fn test_control_other_button_only_copies() {
        let mut recorder = Recorder::default();
        let outcome = dispatch(
            &entry("hello"),
            Modifiers { control: true },
            MouseButton::Other,
            DELAY,
            &mut recorder,
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Copied);
        assert_eq!(recorder.calls, vec!["clipboard:hello"]);
    }

    #[test]
    fn test_control_right_activates_then_delays_then_types() {
        let mut recorder = Recorder {
            target: Some(WindowRef(42)),
            ..Recorder::default()
        };
        let outcome = dispatch(
            &entry("hello"),
            Modifiers { control: true },
            MouseButton::Right,
            DELAY,
            &mut recorder,
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Typed);
        assert_eq!(
            recorder.calls,
            vec!["clipboard:hello", "find", "activate:42", "delay:5", "send:hello"]
        );
    }

    #[test]
    fn test_control_right_without_target_stops_after_copy() {
        let mut recorder = Recorder::default();
        let outcome = dispatch(
            &entry("hello"),
            Modifiers { control: true },
            MouseButton::Right,
            DELAY,
            &mut recorder,
        )
        .unwrap();

        assert_eq!(outcome, Outcome::NoTarget);
        assert_eq!(recorder.calls, vec!["clipboard:hello", "find"]);
    }

    #[test]
    fn test_clipboard_failure_stops_everything() {
        let mut recorder = Recorder {
            fail_clipboard: true,
            ..Recorder::default()
        };
        let err = dispatch(
            &entry("hello"),
            Modifiers { control: true },
            MouseButton::Left,
            DELAY,
            &mut recorder,
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to copy to clipboard: clipboard is locked"
        );
        assert_eq!(recorder.calls, vec!["clipboard:hello"]);
    }

    #[test]
    fn test_open_failure_has_prefix() {
        let mut recorder = Recorder {
            fail_open: true,
            ..Recorder::default()
        };
        let err = dispatch(
            &entry("not a uri"),
            Modifiers { control: true },
            MouseButton::Left,
            DELAY,
            &mut recorder,
        )
        .unwrap_err();

        assert!(matches!(err, DispatchError::Open(_)));
        assert_eq!(err.to_string(), "Failed to open: no handler registered");
    }

    #[test]
    fn test_activation_failure_skips_typing() {
        let mut recorder = Recorder {
            target: Some(WindowRef(7)),
            fail_activate: true,
            ..Recorder::default()
        };
        let err = dispatch(
            &entry("hello"),
            Modifiers { control: true },
            MouseButton::Right,
            DELAY,
            &mut recorder,
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "Failed to sendkey: activation refused");
        assert_eq!(recorder.calls, vec!["clipboard:hello", "find", "activate:7"]);
    }

    #[test]
    fn test_injection_failure_is_a_sendkey_error() {
        let mut recorder = Recorder {
            target: Some(WindowRef(7)),
            fail_send: true,
            ..Recorder::default()
        };
        let err = dispatch(
            &entry("hello"),
            Modifiers { control: true },
            MouseButton::Right,
            DELAY,
            &mut recorder,
        )
        .unwrap_err();

        assert!(matches!(err, DispatchError::SendKey(_)));
        assert_eq!(err.to_string(), "Failed to sendkey: injection failed");
    }
}
