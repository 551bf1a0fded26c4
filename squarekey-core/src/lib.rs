pub mod types;
pub mod error;
pub mod engine;

pub use types::*;

// Re-export commonly used types
pub use types::errors::LayoutError;
pub use types::key::{Key, MetaKey, Modifier, TypeKey, META_SLOTS};
pub use types::keyboard::{Keyboard, Layer, Layout, State, MAIN_STATE};
pub use error::{Error, Result};
pub use engine::{SquareKeyboard, SwipeDirection, KeyPress, KeyState, Action, ActionListener};
