mod lexer;
mod token;

pub use lexer::{LexMode, Lexer};
pub use token::{RawToken, Token};
