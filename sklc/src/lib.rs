pub mod lexer;
pub mod parser;
pub mod compiler;

pub use compiler::{Compiler, CHANGE, CHANGE_GLYPH};
pub use squarekey_core::{ActionListener, Keyboard, LayoutError, SquareKeyboard};

use std::fs::read_to_string;
use std::path::Path;

const UTF8_BOM: char = '\u{feff}';

/// Compile layout file source text into a [`Keyboard`]
pub fn compile_str(input: &str) -> Result<Keyboard, LayoutError> {
    let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);

    let mut parser = parser::Parser::new(input);
    let ast = parser.parse()?;

    Compiler::new().compile(ast)
}

/// Read and compile a layout file
pub fn compile_file(path: &Path) -> Result<Keyboard, LayoutError> {
    log::info!("loading layout file {}", path.display());
    let input = read_to_string(path)?;
    compile_str(&input)
}

/// Read a layout file and start an engine on it in the `main` state
pub fn load_file<L: ActionListener>(
    path: &Path,
    listener: L,
) -> Result<SquareKeyboard<L>, LayoutError> {
    let keyboard = compile_file(path)?;
    Ok(SquareKeyboard::new(keyboard, listener))
}
