mod ast;
mod parser;

pub use ast::*;
pub use parser::{slot_digits, Parser};
