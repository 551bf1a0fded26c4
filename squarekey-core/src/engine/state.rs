use crate::types::{Layer, StateId};

/// Mutable part of the engine: which state is active and what transient
/// overlays are pending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    /// Active named state
    pub current: StateId,
    /// Layers shadowing the current state until the next typed key
    pub dead_overlay: Option<Vec<Layer>>,
    /// Meta slot armed by a first press, relative to `current`
    pub active_meta_slot: Option<usize>,
}

/// Which behaviour a placeholder press triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaPress {
    First,
    Second,
}

impl EngineState {
    pub fn new(initial: StateId) -> Self {
        Self {
            current: initial,
            dead_overlay: None,
            active_meta_slot: None,
        }
    }

    /// Enter a state, dropping all transient state
    pub fn switch_to(&mut self, state: StateId) {
        self.current = state;
        self.dead_overlay = None;
        self.active_meta_slot = None;
    }

    /// Replace any pending dead overlay
    pub fn set_dead_overlay(&mut self, layers: Vec<Layer>) {
        self.dead_overlay = Some(layers);
    }

    /// Returns true if an overlay was removed
    pub fn clear_dead_overlay(&mut self) -> bool {
        self.dead_overlay.take().is_some()
    }

    /// Drop the overlay and disarm any meta slot. Returns true if anything
    /// changed.
    pub fn clear_transient(&mut self) -> bool {
        let had_overlay = self.clear_dead_overlay();
        let had_slot = self.active_meta_slot.take().is_some();
        had_overlay || had_slot
    }

    /// Arm `slot`, or disarm it if it is already armed
    pub fn toggle_meta_slot(&mut self, slot: usize) -> MetaPress {
        if self.active_meta_slot == Some(slot) {
            self.active_meta_slot = None;
            MetaPress::Second
        } else {
            self.active_meta_slot = Some(slot);
            MetaPress::First
        }
    }
}
