//! Key model
//!
//! Every cell of a layout holds at most one [`Key`]. Keys either act on their
//! own (typing text, sending a device action, switching modes) or, for
//! placeholders, forward to a meta key owned by the current state.

use std::borrow::Cow;

use super::device::DeviceCode;
use super::keyboard::{Layer, StateId};

/// Number of meta key slots every state has. This is a fixed protocol limit
/// of the layout format (`S0`..`S3`), not a tunable.
pub const META_SLOTS: usize = 4;

/// Modifier applied to a layout when it is used as a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Modifier {
    #[default]
    None,
    /// Caps: type keys produce their uppercase text
    Shift,
    /// Control: single-letter type keys produce control characters
    Ctrl,
}

impl Modifier {
    /// Parse a layer-list prefix (`shift:` / `ctrl:`)
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "shift" => Some(Modifier::Shift),
            "ctrl" => Some(Modifier::Ctrl),
            _ => None,
        }
    }
}

/// What pressing a key can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    TypeAction,
    DeviceAction,
    ModalAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Type(TypeKey),
    Device(DeviceCode),
    Meta(MetaKey),
    /// Forwards to slot `n` of the current state's meta key table
    Placeholder(usize),
}

impl Key {
    pub fn text(text: impl Into<String>) -> Self {
        Key::Type(TypeKey::new(text))
    }

    pub fn capability(&self) -> Capability {
        match self {
            Key::Type(_) => Capability::TypeAction,
            Key::Device(_) => Capability::DeviceAction,
            Key::Meta(_) | Key::Placeholder(_) => Capability::ModalAction,
        }
    }

    /// The key's own label. Placeholders have none; their label belongs to
    /// whichever meta key currently occupies the slot.
    pub fn label(&self) -> Option<&str> {
        match self {
            Key::Type(key) => Some(&key.label),
            Key::Device(code) => Some(code.glyph()),
            Key::Meta(meta) => Some(meta.label()),
            Key::Placeholder(_) => None,
        }
    }

    /// Apply a layer modifier.
    ///
    /// Returns `None` when the key does not exist under this modifier, so
    /// resolution continues with the next layer.
    pub fn shifted(&self, modifier: Modifier) -> Option<Cow<'_, Key>> {
        match self {
            Key::Type(key) => match key.shifted(modifier)? {
                Cow::Borrowed(_) => Some(Cow::Borrowed(self)),
                Cow::Owned(shifted) => Some(Cow::Owned(Key::Type(shifted))),
            },
            _ => Some(Cow::Borrowed(self)),
        }
    }
}

/// A key that types literal text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeKey {
    pub label: String,
    pub text: String,
}

impl TypeKey {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            label: text.clone(),
            text,
        }
    }

    pub fn with_label(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }

    /// Only keys labelled with a single ASCII letter have a control variant
    pub fn is_ctrlable(&self) -> bool {
        let mut chars = self.label.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_alphabetic())
    }

    pub fn shifted(&self, modifier: Modifier) -> Option<Cow<'_, TypeKey>> {
        match modifier {
            Modifier::None => Some(Cow::Borrowed(self)),
            Modifier::Shift => Some(Cow::Owned(TypeKey::new(self.text.to_uppercase()))),
            Modifier::Ctrl if self.is_ctrlable() => {
                let letter = self.label.to_ascii_uppercase();
                let code = letter.as_bytes()[0] - b'A' + 1;
                Some(Cow::Owned(TypeKey::with_label(
                    format!("^{}", letter),
                    char::from(code).to_string(),
                )))
            }
            Modifier::Ctrl => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaKey {
    Dead(DeadKey),
    State(StateKey),
}

impl MetaKey {
    pub fn label(&self) -> &str {
        match self {
            MetaKey::Dead(key) => &key.label,
            MetaKey::State(key) => &key.label,
        }
    }
}

/// Installs a transient overlay until the next typed key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadKey {
    pub label: String,
    pub layers: Vec<Layer>,
}

/// Switches the keyboard to another state, optionally previewing it first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateKey {
    pub label: String,
    pub target: StateTarget,
    /// Latched keys show the target's layout as a dead overlay on first
    /// press and only switch on the second press.
    pub latched: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateTarget {
    State(StateId),
    /// Hand the mode change to the embedder (e.g. switch input method)
    External,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_key(text: &str) -> Key {
        Key::text(text)
    }

    #[test]
    fn test_shift_uppercases() {
        let key = type_key("a");
        let shifted = key.shifted(Modifier::Shift).unwrap();
        assert_eq!(shifted.as_ref(), &Key::Type(TypeKey::new("A")));
    }

    #[test]
    fn test_ctrl_letter() {
        let key = type_key("a");
        let ctrl = key.shifted(Modifier::Ctrl).unwrap();
        match ctrl.as_ref() {
            Key::Type(t) => {
                assert_eq!(t.label, "^A");
                assert_eq!(t.text, "\u{1}");
            }
            other => panic!("Expected type key, got {:?}", other),
        }

        let z = type_key("Z");
        let ctrl_z = z.shifted(Modifier::Ctrl).unwrap();
        assert_eq!(ctrl_z.label(), Some("^Z"));
    }

    #[test]
    fn test_ctrl_non_letter_falls_through() {
        assert!(type_key("1").shifted(Modifier::Ctrl).is_none());
        assert!(type_key("ab").shifted(Modifier::Ctrl).is_none());
        assert!(type_key("é").shifted(Modifier::Ctrl).is_none());
    }

    #[test]
    fn test_unmodified_is_borrowed() {
        let key = type_key("x");
        assert!(matches!(key.shifted(Modifier::None), Some(Cow::Borrowed(_))));
    }

    #[test]
    fn test_non_type_keys_ignore_modifiers() {
        let key = Key::Device(DeviceCode::Enter);
        for modifier in [Modifier::None, Modifier::Shift, Modifier::Ctrl] {
            assert_eq!(key.shifted(modifier).as_deref(), Some(&key));
        }
        let placeholder = Key::Placeholder(2);
        assert_eq!(placeholder.shifted(Modifier::Ctrl).as_deref(), Some(&placeholder));
        assert_eq!(placeholder.label(), None);
    }

    #[test]
    fn test_capabilities() {
        assert_eq!(type_key("a").capability(), Capability::TypeAction);
        assert_eq!(Key::Device(DeviceCode::Tab).capability(), Capability::DeviceAction);
        assert_eq!(Key::Placeholder(0).capability(), Capability::ModalAction);
    }
}
