use std::borrow::Cow;

use crate::{
    Error, Result,
    types::{Key, Keyboard, MetaKey, State, StateId, StateKey, StateTarget},
};
use super::{ActionListener, EngineState, KeyPress, KeyState, MetaPress, SwipeDirection};

/// Which part of the resolution order supplied a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    DeadOverlay,
    Swipe,
    AltLabel,
    Base,
}

struct Resolved<'a> {
    key: Cow<'a, Key>,
    source: Source,
}

/// The SquareKeyboard engine: a compiled [`Keyboard`] plus the mutable mode
/// state, answering label queries and executing presses.
pub struct SquareKeyboard<L: ActionListener> {
    keyboard: Keyboard,
    state: EngineState,
    listener: L,
    /// Set by mutations, flushed once per public call
    needs_redraw: bool,
}

impl<L: ActionListener> SquareKeyboard<L> {
    /// Create an engine in the keyboard's `main` state
    pub fn new(keyboard: Keyboard, listener: L) -> Self {
        let state = EngineState::new(keyboard.main_state());
        Self {
            keyboard,
            state,
            listener,
            needs_redraw: false,
        }
    }

    /// Swap in another keyboard and start over in its `main` state
    pub fn load(&mut self, keyboard: Keyboard) {
        log::debug!(
            "loading {}x{} keyboard",
            keyboard.rows(),
            keyboard.cols()
        );
        self.state = EngineState::new(keyboard.main_state());
        self.keyboard = keyboard;
        self.needs_redraw = true;
        self.flush();
    }

    pub fn rows(&self) -> usize {
        self.keyboard.rows()
    }

    pub fn cols(&self) -> usize {
        self.keyboard.cols()
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    /// Name of the active state
    pub fn current_state(&self) -> &str {
        &self.current().name
    }

    pub fn dead_overlay_active(&self) -> bool {
        self.state.dead_overlay.is_some()
    }

    pub fn active_meta_slot(&self) -> Option<usize> {
        self.state.active_meta_slot
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn into_listener(self) -> L {
        self.listener
    }

    fn current(&self) -> &State {
        self.keyboard.state(self.state.current)
    }

    fn resolve(&self, row: usize, col: usize, swipe: SwipeDirection) -> Option<Resolved<'_>> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }

        // an active overlay hides everything else, gaps included
        if let Some(layers) = &self.state.dead_overlay {
            let key = self.keyboard.resolve(layers, row, col)?;
            return Some(Resolved { key, source: Source::DeadOverlay });
        }

        let state = self.current();
        let (layers, source) = match swipe {
            SwipeDirection::None => (&state.layers, Source::Base),
            SwipeDirection::LeftRight => (&state.swipe_lr, Source::Swipe),
            SwipeDirection::UpDown => (&state.swipe_ud, Source::Swipe),
            SwipeDirection::AltLabel => (&state.alt_label, Source::AltLabel),
        };
        // no fallback to the base layers on a swipe miss
        let key = self.keyboard.resolve(layers, row, col)?;
        Some(Resolved { key, source })
    }

    /// Effective key at a position, after overlays and modifiers
    pub fn key(&self, row: usize, col: usize, swipe: SwipeDirection) -> Option<Cow<'_, Key>> {
        self.resolve(row, col, swipe).map(|r| r.key)
    }

    /// Label to draw for a position; empty if nothing is there
    pub fn key_label(&self, row: usize, col: usize, swipe: SwipeDirection) -> String {
        let Some(resolved) = self.resolve(row, col, swipe) else {
            return String::new();
        };
        match resolved.key.as_ref() {
            Key::Placeholder(slot) => self
                .current()
                .meta_key(*slot)
                .map(|meta| meta.label().to_string())
                .unwrap_or_default(),
            key => key.label().unwrap_or_default().to_string(),
        }
    }

    /// Secondary label previewed on a key
    pub fn alt_label(&self, row: usize, col: usize) -> String {
        self.key_label(row, col, SwipeDirection::AltLabel)
    }

    /// Styling hint for a position
    pub fn key_state(&self, row: usize, col: usize, swipe: SwipeDirection) -> KeyState {
        let Some(resolved) = self.resolve(row, col, swipe) else {
            return KeyState::Normal;
        };
        if let Key::Placeholder(slot) = resolved.key.as_ref() {
            if self.state.active_meta_slot == Some(*slot) {
                return KeyState::DeadMeta;
            }
        }
        match resolved.source {
            Source::DeadOverlay => KeyState::DeadKey,
            Source::Swipe => KeyState::Swiped,
            Source::AltLabel | Source::Base => KeyState::Normal,
        }
    }

    /// Execute the key at a position
    pub fn press(&mut self, row: usize, col: usize, swipe: SwipeDirection) {
        if swipe == SwipeDirection::AltLabel {
            log::trace!("ignoring preview-only press at ({}, {})", row, col);
            return;
        }
        let Some(key) = self.key(row, col, swipe).map(Cow::into_owned) else {
            log::trace!("press at ({}, {}) {:?}: no key", row, col, swipe);
            return;
        };
        log::trace!("press at ({}, {}) {:?}: {:?}", row, col, swipe, key);

        match key {
            Key::Type(key) => {
                self.listener.on_text(&key.text);
                // any typed key consumes a pending dead state
                if self.state.clear_transient() {
                    self.needs_redraw = true;
                }
            }
            Key::Device(code) => self.listener.on_device_action(code),
            Key::Meta(meta) => self.first_press(&meta),
            Key::Placeholder(slot) => self.press_placeholder(slot),
        }
        self.flush();
    }

    pub fn press_key(&mut self, press: KeyPress) {
        self.press(press.row, press.col, press.swipe)
    }

    fn press_placeholder(&mut self, slot: usize) {
        let Some(meta) = self.current().meta_key(slot).cloned() else {
            log::warn!(
                "meta slot S{} is not defined in state '{}'",
                slot,
                self.current_state()
            );
            return;
        };
        self.needs_redraw = true;
        match self.state.toggle_meta_slot(slot) {
            MetaPress::First => self.first_press(&meta),
            MetaPress::Second => self.second_press(&meta),
        }
        // external switches never stay armed
        if let MetaKey::State(StateKey { target: StateTarget::External, .. }) = meta {
            self.state.active_meta_slot = None;
        }
    }

    fn first_press(&mut self, meta: &MetaKey) {
        match meta {
            MetaKey::Dead(dead) => {
                self.state.set_dead_overlay(dead.layers.clone());
                self.needs_redraw = true;
            }
            MetaKey::State(key) => match key.target {
                StateTarget::External => self.listener.on_external_mode_change(),
                StateTarget::State(target) if key.latched => {
                    let layers = self.keyboard.state(target).layers.clone();
                    self.state.set_dead_overlay(layers);
                    self.needs_redraw = true;
                }
                StateTarget::State(target) => self.switch_state(target),
            },
        }
    }

    fn second_press(&mut self, meta: &MetaKey) {
        match meta {
            MetaKey::Dead(_) => {
                self.state.clear_dead_overlay();
                self.needs_redraw = true;
            }
            MetaKey::State(key) => match key.target {
                StateTarget::External => self.listener.on_external_mode_change(),
                StateTarget::State(target) => self.switch_state(target),
            },
        }
    }

    fn switch_state(&mut self, target: StateId) {
        log::debug!(
            "state '{}' -> '{}'",
            self.current_state(),
            self.keyboard.state(target).name
        );
        self.state.switch_to(target);
        self.needs_redraw = true;
    }

    /// Switch to a named state on request of the embedder
    pub fn set_state(&mut self, name: &str) -> Result<()> {
        let target = self
            .keyboard
            .state_id(name)
            .ok_or_else(|| Error::UnknownState(name.to_string()))?;
        self.switch_state(target);
        self.flush();
        Ok(())
    }

    /// Return to the `main` state
    pub fn reset(&mut self) {
        self.switch_state(self.keyboard.main_state());
        self.flush();
    }

    fn flush(&mut self) {
        if std::mem::take(&mut self.needs_redraw) {
            self.listener.on_redraw_needed();
        }
    }
}
