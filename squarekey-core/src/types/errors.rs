use thiserror::Error;

/// Errors raised while loading a keyboard description.
///
/// Everything except I/O and whole-file checks carries the 1-based line the
/// problem was found on.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Unknown key code at line {line}: {code}")]
    UnknownKeyCode { line: usize, code: String },

    #[error("Undefined layout at line {line}: {name}")]
    UndefinedLayout { line: usize, name: String },

    #[error("Undefined state at line {line}: {name}")]
    UndefinedState { line: usize, name: String },

    #[error("Invalid meta key slot at line {line}: S{slot} (slots are S0-S3)")]
    InvalidSlot { line: usize, slot: String },

    #[error("Duplicate layout at line {line}: {name}")]
    DuplicateLayout { line: usize, name: String },

    #[error("Duplicate state at line {line}: {name}")]
    DuplicateState { line: usize, name: String },

    #[error("Layout declared before size at line {line}")]
    MissingSize { line: usize },

    #[error("Invalid size at line {line}: {message}")]
    InvalidSize { line: usize, message: String },

    #[error("No state named 'main'")]
    MissingMainState,

    #[error("Invalid keyboard: {0}")]
    Invalid(String),
}

impl LayoutError {
    /// Source line of the error, if it has one
    pub fn line(&self) -> Option<usize> {
        match self {
            LayoutError::Parse { line, .. }
            | LayoutError::UnknownKeyCode { line, .. }
            | LayoutError::UndefinedLayout { line, .. }
            | LayoutError::UndefinedState { line, .. }
            | LayoutError::InvalidSlot { line, .. }
            | LayoutError::DuplicateLayout { line, .. }
            | LayoutError::DuplicateState { line, .. }
            | LayoutError::MissingSize { line }
            | LayoutError::InvalidSize { line, .. } => Some(*line),
            LayoutError::Io(_) | LayoutError::MissingMainState | LayoutError::Invalid(_) => None,
        }
    }
}
