//! Error types for the SquareKeyboard engine

use thiserror::Error;

use crate::types::errors::LayoutError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown state: {0}")]
    UnknownState(String),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
}

pub type Result<T> = std::result::Result<T, Error>;
