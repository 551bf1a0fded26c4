//! SquareKeyboard engine - key resolution and the mode state machine
//!
//! This module turns grid positions into keys according to the active state,
//! its swipe overlays and any pending dead overlay, and executes presses.

mod engine;
mod input;
mod output;
mod state;

pub use engine::SquareKeyboard;
pub use input::{KeyPress, SwipeDirection};
pub use output::{Action, ActionListener, KeyState};
use state::{EngineState, MetaPress};

// Re-export error types
pub use crate::error::{Error, Result};
