use squarekey_core::Modifier;

// AST nodes for layout file parsing. Names are kept as written; the compiler
// resolves them.
#[derive(Debug, Default)]
pub struct LayoutFile {
    /// Declarations in source order
    pub items: Vec<Item>,
}

#[derive(Debug, Clone)]
pub enum Item {
    Size(SizeDecl),
    Layout(LayoutDecl),
    State(StateDecl),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeDecl {
    pub rows: usize,
    pub cols: usize,
    pub line: usize,
}

#[derive(Debug, Clone)]
pub struct LayoutDecl {
    pub name: String,
    pub line: usize,
    /// Cells as written; missing trailing cells and rows are absent
    pub rows: Vec<Vec<CellDecl>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellDecl {
    pub cell: Cell,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// `*`
    Absent,
    /// Literal text (single character, quoted string or punctuation)
    Text(String),
    /// Named code such as `BKSP`, `S0` or `CHANGE`
    Code(String),
}

#[derive(Debug, Clone)]
pub struct StateDecl {
    pub name: String,
    pub line: usize,
    pub entries: Vec<StateEntry>,
}

#[derive(Debug, Clone)]
pub enum StateEntry {
    Layers {
        kind: LayerListKind,
        layers: Vec<LayerRef>,
        line: usize,
    },
    Meta {
        /// Digits following `S`
        slot: String,
        label: String,
        kind: MetaDecl,
        line: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerListKind {
    Layout,
    SwipeLeftRight,
    SwipeUpDown,
    AltLabel,
}

impl LayerListKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "layout" => Some(LayerListKind::Layout),
            "swipe_lr" => Some(LayerListKind::SwipeLeftRight),
            "swipe_ud" => Some(LayerListKind::SwipeUpDown),
            "alt_label" => Some(LayerListKind::AltLabel),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerRef {
    pub modifier: Modifier,
    pub name: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaDecl {
    Dead(Vec<LayerRef>),
    State(String),
    DeadLatch(String),
}

impl LayoutFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layouts(&self) -> impl Iterator<Item = &LayoutDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::Layout(layout) => Some(layout),
            _ => None,
        })
    }

    pub fn states(&self) -> impl Iterator<Item = &StateDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::State(state) => Some(state),
            _ => None,
        })
    }
}
