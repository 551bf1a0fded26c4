//! Compiled keyboard description: layouts, states and the layers tying them
//! together. A [`Keyboard`] is immutable once built.

use std::borrow::Cow;
use std::collections::HashMap;

use super::errors::LayoutError;
use super::key::{Key, MetaKey, Modifier, StateTarget, META_SLOTS};

/// Name of the state every keyboard starts in
pub const MAIN_STATE: &str = "main";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutId(usize);

impl LayoutId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(usize);

impl StateId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// A named grid of optional keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub name: String,
    rows: usize,
    cols: usize,
    cells: Vec<Option<Key>>,
}

impl Layout {
    /// Create a layout with every cell absent
    pub fn new(name: impl Into<String>, rows: usize, cols: usize) -> Self {
        Self {
            name: name.into(),
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Out-of-range positions read as absent
    pub fn get(&self, row: usize, col: usize) -> Option<&Key> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells[row * self.cols + col].as_ref()
    }

    /// Returns false if the position is outside the grid
    pub fn set(&mut self, row: usize, col: usize, key: Option<Key>) -> bool {
        if row >= self.rows || col >= self.cols {
            return false;
        }
        self.cells[row * self.cols + col] = key;
        true
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.cells.iter().flatten()
    }
}

/// A layout viewed through a modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layer {
    pub layout: LayoutId,
    pub modifier: Modifier,
}

impl Layer {
    pub fn new(layout: LayoutId, modifier: Modifier) -> Self {
        Self { layout, modifier }
    }
}

/// A named keyboard mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub name: String,
    /// Primary layers, earlier entries win
    pub layers: Vec<Layer>,
    pub swipe_lr: Vec<Layer>,
    pub swipe_ud: Vec<Layer>,
    /// Preview-only labels, never activated
    pub alt_label: Vec<Layer>,
    pub meta_keys: [Option<MetaKey>; META_SLOTS],
}

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layers: Vec::new(),
            swipe_lr: Vec::new(),
            swipe_ud: Vec::new(),
            alt_label: Vec::new(),
            meta_keys: Default::default(),
        }
    }

    pub fn meta_key(&self, slot: usize) -> Option<&MetaKey> {
        self.meta_keys.get(slot)?.as_ref()
    }

    fn layer_lists(&self) -> impl Iterator<Item = &[Layer]> {
        [
            self.layers.as_slice(),
            self.swipe_lr.as_slice(),
            self.swipe_ud.as_slice(),
            self.alt_label.as_slice(),
        ]
        .into_iter()
    }
}

/// A fully resolved keyboard: fixed grid shape, layouts and states
#[derive(Debug, Clone)]
pub struct Keyboard {
    rows: usize,
    cols: usize,
    layouts: Vec<Layout>,
    states: Vec<State>,
    layout_index: HashMap<String, LayoutId>,
    state_index: HashMap<String, StateId>,
    main: StateId,
}

impl Keyboard {
    /// Assemble a keyboard. Layout and state ids are positions in the given
    /// vectors; every id referenced by a layer or key must be in range.
    pub fn new(
        rows: usize,
        cols: usize,
        layouts: Vec<Layout>,
        states: Vec<State>,
    ) -> Result<Self, LayoutError> {
        let mut layout_index = HashMap::new();
        for (i, layout) in layouts.iter().enumerate() {
            if layout.rows != rows || layout.cols != cols {
                return Err(LayoutError::Invalid(format!(
                    "layout '{}' is {}x{}, keyboard is {}x{}",
                    layout.name, layout.rows, layout.cols, rows, cols
                )));
            }
            if layout_index.insert(layout.name.clone(), LayoutId(i)).is_some() {
                return Err(LayoutError::Invalid(format!("duplicate layout '{}'", layout.name)));
            }
        }

        let mut state_index = HashMap::new();
        for (i, state) in states.iter().enumerate() {
            if state_index.insert(state.name.clone(), StateId(i)).is_some() {
                return Err(LayoutError::Invalid(format!("duplicate state '{}'", state.name)));
            }
        }

        let main = *state_index.get(MAIN_STATE).ok_or(LayoutError::MissingMainState)?;

        let keyboard = Self {
            rows,
            cols,
            layouts,
            states,
            layout_index,
            state_index,
            main,
        };
        keyboard.check_references()?;
        Ok(keyboard)
    }

    fn check_references(&self) -> Result<(), LayoutError> {
        let layer_ok = |layer: &Layer| layer.layout.0 < self.layouts.len();
        let key_ok = |key: &Key| match key {
            Key::Meta(meta) => self.meta_ok(meta, &layer_ok),
            Key::Placeholder(slot) => *slot < META_SLOTS,
            _ => true,
        };

        for layout in &self.layouts {
            if !layout.keys().all(&key_ok) {
                return Err(LayoutError::Invalid(format!(
                    "layout '{}' references an unknown state or slot",
                    layout.name
                )));
            }
        }
        for state in &self.states {
            let layers_ok = state.layer_lists().all(|list| list.iter().all(&layer_ok));
            let meta_ok = state
                .meta_keys
                .iter()
                .flatten()
                .all(|meta| self.meta_ok(meta, &layer_ok));
            if !layers_ok || !meta_ok {
                return Err(LayoutError::Invalid(format!(
                    "state '{}' references an unknown layout or state",
                    state.name
                )));
            }
        }
        Ok(())
    }

    fn meta_ok(&self, meta: &MetaKey, layer_ok: &impl Fn(&Layer) -> bool) -> bool {
        match meta {
            MetaKey::Dead(dead) => dead.layers.iter().all(layer_ok),
            MetaKey::State(key) => match key.target {
                StateTarget::State(id) => id.0 < self.states.len(),
                StateTarget::External => !key.latched,
            },
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn main_state(&self) -> StateId {
        self.main
    }

    pub fn layout(&self, id: LayoutId) -> &Layout {
        &self.layouts[id.0]
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.0]
    }

    pub fn layout_id(&self, name: &str) -> Option<LayoutId> {
        self.layout_index.get(name).copied()
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.state_index.get(name).copied()
    }

    pub fn layout_by_name(&self, name: &str) -> Option<&Layout> {
        self.layout_id(name).map(|id| self.layout(id))
    }

    pub fn state_by_name(&self, name: &str) -> Option<&State> {
        self.state_id(name).map(|id| self.state(id))
    }

    /// Layout names in declaration order
    pub fn layout_names(&self) -> impl Iterator<Item = &str> {
        self.layouts.iter().map(|l| l.name.as_str())
    }

    /// State names in declaration order
    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(|s| s.name.as_str())
    }

    /// Resolve a cell through a single layer
    pub fn layer_key(&self, layer: Layer, row: usize, col: usize) -> Option<Cow<'_, Key>> {
        self.layout(layer.layout).get(row, col)?.shifted(layer.modifier)
    }

    /// Resolve a cell through a layer list; the first layer with a key wins
    pub fn resolve(&self, layers: &[Layer], row: usize, col: usize) -> Option<Cow<'_, Key>> {
        layers
            .iter()
            .find_map(|&layer| self.layer_key(layer, row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::key::{StateKey, TypeKey};

    fn grid(name: &str, cells: &[&[&str]]) -> Layout {
        let mut layout = Layout::new(name, 2, 2);
        for (r, row) in cells.iter().enumerate() {
            for (c, text) in row.iter().enumerate() {
                let key = (*text != "*").then(|| Key::text(*text));
                layout.set(r, c, key);
            }
        }
        layout
    }

    fn single_state(layers: Vec<Layer>) -> State {
        let mut main = State::new(MAIN_STATE);
        main.layers = layers;
        main
    }

    #[test]
    fn test_layer_fallthrough() {
        let ctrl = grid("ctrl", &[&["a", "1"], &["*", "*"]]);
        let base = grid("base", &[&["x", "y"], &["z", "w"]]);
        let layers = vec![
            Layer::new(LayoutId::new(0), Modifier::Ctrl),
            Layer::new(LayoutId::new(1), Modifier::None),
        ];
        let kb = Keyboard::new(2, 2, vec![ctrl, base], vec![single_state(layers.clone())]).unwrap();

        assert_eq!(kb.resolve(&layers, 0, 0).unwrap().label(), Some("^A"));
        // "1" has no control variant, so the base layer answers
        assert_eq!(kb.resolve(&layers, 0, 1).unwrap().label(), Some("y"));
        assert_eq!(kb.resolve(&layers, 1, 0).unwrap().label(), Some("z"));
        assert!(kb.resolve(&layers, 2, 0).is_none());
        assert!(kb.resolve(&[], 0, 0).is_none());
    }

    #[test]
    fn test_main_state_required() {
        let err = Keyboard::new(2, 2, vec![], vec![State::new("other")]).unwrap_err();
        assert!(matches!(err, LayoutError::MissingMainState));
    }

    #[test]
    fn test_rejects_mismatched_layout_size() {
        let layout = Layout::new("big", 3, 2);
        let err = Keyboard::new(2, 2, vec![layout], vec![State::new(MAIN_STATE)]).unwrap_err();
        assert!(matches!(err, LayoutError::Invalid(_)));
    }

    #[test]
    fn test_rejects_dangling_ids() {
        let state = single_state(vec![Layer::new(LayoutId::new(3), Modifier::None)]);
        assert!(Keyboard::new(2, 2, vec![], vec![state]).is_err());

        let mut layout = Layout::new("l", 2, 2);
        layout.set(
            0,
            0,
            Some(Key::Meta(MetaKey::State(StateKey {
                label: "x".into(),
                target: StateTarget::State(StateId::new(9)),
                latched: false,
            }))),
        );
        assert!(Keyboard::new(2, 2, vec![layout], vec![State::new(MAIN_STATE)]).is_err());
    }

    #[test]
    fn test_lookup_by_name() {
        let kb = Keyboard::new(
            2,
            2,
            vec![grid("base", &[&["a", "b"], &["c", "d"]])],
            vec![State::new(MAIN_STATE)],
        )
        .unwrap();
        assert_eq!(kb.layout_id("base"), Some(LayoutId::new(0)));
        assert_eq!(kb.state_by_name(MAIN_STATE).map(|s| s.name.as_str()), Some("main"));
        assert!(kb.layout_by_name("nope").is_none());
        assert_eq!(
            kb.layout_by_name("base").and_then(|l| l.get(1, 1)),
            Some(&Key::Type(TypeKey::new("d")))
        );
    }
}
