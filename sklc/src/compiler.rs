use crate::parser::{
    slot_digits, Cell, CellDecl, Item, LayerListKind, LayerRef, LayoutDecl, LayoutFile, MetaDecl,
    SizeDecl, StateDecl, StateEntry,
};
use squarekey_core::{
    DeadKey, DeviceCode, Key, Keyboard, Layer, LayoutError, Layout, LayoutId, MetaKey, State,
    StateId, StateKey, StateTarget, META_SLOTS,
};
use std::collections::HashMap;

/// Reserved key code and state target for the external mode switch
pub const CHANGE: &str = "CHANGE";

/// Label drawn on the external mode switch key
pub const CHANGE_GLYPH: &str = "\u{2328}";

/// Resolves the names in a parsed layout file into a [`Keyboard`]
pub struct Compiler {
    size: Option<SizeDecl>,
    layouts: Vec<Layout>,
    layout_map: HashMap<String, LayoutId>,
    state_map: HashMap<String, StateId>,
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            size: None,
            layouts: Vec::new(),
            layout_map: HashMap::new(),
            state_map: HashMap::new(),
        }
    }

    pub fn compile(mut self, ast: LayoutFile) -> Result<Keyboard, LayoutError> {
        // States may be targeted before they are declared
        for decl in ast.states() {
            self.register_state(decl)?;
        }

        let mut states = Vec::with_capacity(self.state_map.len());
        for item in &ast.items {
            match item {
                Item::Size(size) => self.size = Some(*size),
                Item::Layout(decl) => {
                    let layout = self.compile_layout(decl)?;
                    self.layout_map
                        .insert(layout.name.clone(), LayoutId::new(self.layouts.len()));
                    self.layouts.push(layout);
                }
                // Layer references only see layouts declared above the state
                Item::State(decl) => states.push(self.compile_state(decl)?),
            }
        }

        let size = self.size.ok_or(LayoutError::MissingSize { line: 1 })?;
        log::debug!(
            "compiled {}x{} keyboard: {} layouts, {} states",
            size.rows,
            size.cols,
            self.layouts.len(),
            states.len()
        );
        Keyboard::new(size.rows, size.cols, self.layouts, states)
    }

    fn register_state(&mut self, decl: &StateDecl) -> Result<(), LayoutError> {
        if decl.name == CHANGE {
            return Err(LayoutError::Parse {
                line: decl.line,
                message: format!("'{}' is reserved and cannot name a state", CHANGE),
            });
        }
        let id = StateId::new(self.state_map.len());
        if self.state_map.insert(decl.name.clone(), id).is_some() {
            return Err(LayoutError::DuplicateState {
                line: decl.line,
                name: decl.name.clone(),
            });
        }
        Ok(())
    }

    fn compile_layout(&self, decl: &LayoutDecl) -> Result<Layout, LayoutError> {
        if self.layout_map.contains_key(&decl.name) {
            return Err(LayoutError::DuplicateLayout {
                line: decl.line,
                name: decl.name.clone(),
            });
        }
        let size = self.size.ok_or(LayoutError::MissingSize { line: decl.line })?;

        let mut layout = Layout::new(decl.name.clone(), size.rows, size.cols);
        for (row, cells) in decl.rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let key = self.compile_cell(cell)?;
                if !layout.set(row, col, key) {
                    return Err(LayoutError::Parse {
                        line: cell.line,
                        message: format!(
                            "key ({}, {}) is outside the {}x{} grid",
                            row, col, size.rows, size.cols
                        ),
                    });
                }
            }
        }
        Ok(layout)
    }

    fn compile_cell(&self, decl: &CellDecl) -> Result<Option<Key>, LayoutError> {
        let code = match &decl.cell {
            Cell::Absent => return Ok(None),
            Cell::Text(text) => return Ok(Some(Key::text(text.as_str()))),
            Cell::Code(code) => code,
        };

        if let Some(device) = DeviceCode::from_name(code) {
            return Ok(Some(Key::Device(device)));
        }
        if code == CHANGE {
            return Ok(Some(Key::Meta(MetaKey::State(StateKey {
                label: CHANGE_GLYPH.to_string(),
                target: StateTarget::External,
                latched: false,
            }))));
        }
        if let Some(digits) = slot_digits(code) {
            return self.slot(digits, decl.line).map(|slot| Some(Key::Placeholder(slot)));
        }

        Err(LayoutError::UnknownKeyCode {
            line: decl.line,
            code: code.clone(),
        })
    }

    fn slot(&self, digits: &str, line: usize) -> Result<usize, LayoutError> {
        match digits.parse::<usize>() {
            Ok(slot) if slot < META_SLOTS => Ok(slot),
            _ => Err(LayoutError::InvalidSlot {
                line,
                slot: digits.to_string(),
            }),
        }
    }

    fn compile_state(&self, decl: &StateDecl) -> Result<State, LayoutError> {
        let mut state = State::new(decl.name.clone());

        for entry in &decl.entries {
            match entry {
                StateEntry::Layers { kind, layers, .. } => {
                    let layers = self.resolve_layers(layers)?;
                    let list = match kind {
                        LayerListKind::Layout => &mut state.layers,
                        LayerListKind::SwipeLeftRight => &mut state.swipe_lr,
                        LayerListKind::SwipeUpDown => &mut state.swipe_ud,
                        LayerListKind::AltLabel => &mut state.alt_label,
                    };
                    // A repeated keyword replaces the earlier list
                    *list = layers;
                }
                StateEntry::Meta { slot, label, kind, line } => {
                    let slot = self.slot(slot, *line)?;
                    let meta = self.compile_meta(label, kind, *line)?;
                    if state.meta_keys[slot].is_some() {
                        log::warn!(
                            "line {}: S{} redefined in state '{}'",
                            line,
                            slot,
                            decl.name
                        );
                    }
                    state.meta_keys[slot] = Some(meta);
                }
            }
        }

        Ok(state)
    }

    fn compile_meta(&self, label: &str, kind: &MetaDecl, line: usize) -> Result<MetaKey, LayoutError> {
        let label = label.to_string();
        let meta = match kind {
            MetaDecl::Dead(layers) => MetaKey::Dead(DeadKey {
                label,
                layers: self.resolve_layers(layers)?,
            }),
            MetaDecl::State(target) => MetaKey::State(StateKey {
                label,
                target: self.resolve_target(target, line)?,
                latched: false,
            }),
            MetaDecl::DeadLatch(target) if target == CHANGE => {
                return Err(LayoutError::Parse {
                    line,
                    message: format!("deadlatch cannot target {}", CHANGE),
                });
            }
            MetaDecl::DeadLatch(target) => MetaKey::State(StateKey {
                label,
                target: self.resolve_target(target, line)?,
                latched: true,
            }),
        };
        Ok(meta)
    }

    fn resolve_target(&self, name: &str, line: usize) -> Result<StateTarget, LayoutError> {
        if name == CHANGE {
            return Ok(StateTarget::External);
        }
        self.state_map
            .get(name)
            .map(|&id| StateTarget::State(id))
            .ok_or_else(|| LayoutError::UndefinedState {
                line,
                name: name.to_string(),
            })
    }

    fn resolve_layers(&self, layers: &[LayerRef]) -> Result<Vec<Layer>, LayoutError> {
        layers
            .iter()
            .map(|layer| {
                self.layout_map
                    .get(&layer.name)
                    .map(|&id| Layer::new(id, layer.modifier))
                    .ok_or_else(|| LayoutError::UndefinedLayout {
                        line: layer.line,
                        name: layer.name.clone(),
                    })
            })
            .collect()
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}
