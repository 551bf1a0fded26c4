//! Output side of the SquareKeyboard engine: what the engine tells the
//! embedder, and how the embedder should style each key.

use crate::types::DeviceCode;

/// Visual state of a key, used for styling only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyState {
    #[default]
    Normal,
    /// Meta key armed by its first press
    DeadMeta,
    /// Supplied by the active dead overlay
    DeadKey,
    /// Supplied by a swipe overlay
    Swiped,
}

/// Receives everything the engine does in response to presses.
///
/// Calls arrive synchronously from inside [`SquareKeyboard::press`] and
/// friends.
///
/// [`SquareKeyboard::press`]: super::SquareKeyboard::press
pub trait ActionListener {
    /// Text to insert
    fn on_text(&mut self, text: &str);

    /// Device action to forward to the host
    fn on_device_action(&mut self, code: DeviceCode);

    /// Labels or key states may have changed
    fn on_redraw_needed(&mut self) {}

    /// The user asked to leave this keyboard
    fn on_external_mode_change(&mut self) {}
}

/// Recorded listener event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Text(String),
    Device(DeviceCode),
    Redraw,
    ExternalModeChange,
}

/// Records every event, in order
impl ActionListener for Vec<Action> {
    fn on_text(&mut self, text: &str) {
        self.push(Action::Text(text.to_string()));
    }

    fn on_device_action(&mut self, code: DeviceCode) {
        self.push(Action::Device(code));
    }

    fn on_redraw_needed(&mut self) {
        self.push(Action::Redraw);
    }

    fn on_external_mode_change(&mut self) {
        self.push(Action::ExternalModeChange);
    }
}

impl<L: ActionListener + ?Sized> ActionListener for &mut L {
    fn on_text(&mut self, text: &str) {
        (**self).on_text(text)
    }

    fn on_device_action(&mut self, code: DeviceCode) {
        (**self).on_device_action(code)
    }

    fn on_redraw_needed(&mut self) {
        (**self).on_redraw_needed()
    }

    fn on_external_mode_change(&mut self) {
        (**self).on_external_mode_change()
    }
}
