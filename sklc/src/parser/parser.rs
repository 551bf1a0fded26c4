use crate::lexer::{LexMode, Lexer, Token};
use squarekey_core::{LayoutError, Modifier};
use super::ast::*;

/// Upper bound for either grid dimension
const MAX_GRID_SIZE: usize = 64;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    /// Grid shape from the last `size` directive
    size: Option<SizeDecl>,
    seen_layout: bool,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            size: None,
            seen_layout: false,
        }
    }

    pub fn parse(&mut self) -> Result<LayoutFile, LayoutError> {
        let mut ast = LayoutFile::new();

        loop {
            match &self.current {
                Token::EndOfLine => self.advance(),
                Token::EndOfFile => break,
                Token::Word(word) => {
                    let word = word.clone();
                    let item = match word.as_str() {
                        "size" => Item::Size(self.parse_size()?),
                        "layout" => Item::Layout(self.parse_layout()?),
                        "state" => Item::State(self.parse_state()?),
                        other => return Err(self.error(format!("Unknown directive '{}'", other))),
                    };
                    self.expect_line_end()?;
                    ast.items.push(item);
                }
                other => {
                    return Err(self.error(format!("Unexpected {}", other.describe())));
                }
            }
        }

        Ok(ast)
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn line(&self) -> usize {
        self.lexer.current_line()
    }

    fn error(&self, message: impl Into<String>) -> LayoutError {
        LayoutError::Parse {
            line: self.line(),
            message: message.into(),
        }
    }

    fn expect_punct(&mut self, ch: char) -> Result<(), LayoutError> {
        if !self.current.is_punct(ch) {
            return Err(self.error(format!(
                "Expected '{}', found {}",
                ch,
                self.current.describe()
            )));
        }
        self.advance();
        Ok(())
    }

    fn expect_word(&mut self, what: &str) -> Result<String, LayoutError> {
        match &self.current {
            Token::Word(word) => {
                let word = word.clone();
                self.advance();
                Ok(word)
            }
            other => Err(self.error(format!("Expected {}, found {}", what, other.describe()))),
        }
    }

    fn expect_line_end(&self) -> Result<(), LayoutError> {
        if self.current.is_line_end() {
            Ok(())
        } else {
            Err(self.error(format!(
                "Expected end of line, found {}",
                self.current.describe()
            )))
        }
    }

    fn parse_size(&mut self) -> Result<SizeDecl, LayoutError> {
        let line = self.line();
        self.advance();

        if self.seen_layout {
            return Err(LayoutError::InvalidSize {
                line,
                message: "size cannot change after a layout is declared".to_string(),
            });
        }

        let rows = self.parse_dimension("rows")?;
        let cols = self.parse_dimension("columns")?;
        let size = SizeDecl { rows, cols, line };
        self.size = Some(size);
        Ok(size)
    }

    fn parse_dimension(&mut self, what: &str) -> Result<usize, LayoutError> {
        let line = self.line();
        let value = match self.current {
            Token::Number(n) => n,
            ref other => {
                return Err(LayoutError::InvalidSize {
                    line,
                    message: format!("expected number of {}, found {}", what, other.describe()),
                })
            }
        };
        if value < 1.0 || value > MAX_GRID_SIZE as f64 || value.fract() != 0.0 {
            return Err(LayoutError::InvalidSize {
                line,
                message: format!("{} must be between 1 and {}, got {}", what, MAX_GRID_SIZE, value),
            });
        }
        self.advance();
        Ok(value as usize)
    }

    fn parse_layout(&mut self) -> Result<LayoutDecl, LayoutError> {
        let line = self.line();
        let size = self.size.ok_or(LayoutError::MissingSize { line })?;
        self.seen_layout = true;
        self.advance();

        let name = self.expect_word("layout name")?;
        self.expect_punct('{')?;
        self.expect_line_end()?;

        // Digits are key labels from here to the closing brace
        self.lexer.set_mode(LexMode::LayoutRow);
        self.advance();

        let mut rows = Vec::with_capacity(size.rows);
        let mut closed = false;
        while rows.len() < size.rows && !closed {
            let mut cells = Vec::with_capacity(size.cols);
            loop {
                match &self.current {
                    Token::EndOfLine => {
                        self.advance();
                        break;
                    }
                    Token::EndOfFile => {
                        return Err(self.error(format!("Unexpected end of file in layout '{}'", name)));
                    }
                    Token::Punct('}') => {
                        closed = true;
                        break;
                    }
                    _ => {
                        if cells.len() == size.cols {
                            return Err(self.error(format!(
                                "Too many keys in row {} of layout '{}' (at most {})",
                                rows.len() + 1,
                                name,
                                size.cols
                            )));
                        }
                        cells.push(self.parse_cell()?);
                        self.advance();
                    }
                }
            }
            rows.push(cells);
        }

        if !closed {
            while self.current == Token::EndOfLine {
                self.advance();
            }
            if !self.current.is_punct('}') {
                return Err(self.error(format!(
                    "Expected '}}' after {} rows of layout '{}', found {}",
                    size.rows,
                    name,
                    self.current.describe()
                )));
            }
        }

        self.lexer.set_mode(LexMode::Directive);
        self.advance();

        Ok(LayoutDecl { name, line, rows })
    }

    fn parse_cell(&self) -> Result<CellDecl, LayoutError> {
        let cell = match &self.current {
            Token::Punct('*') => Cell::Absent,
            Token::Punct(ch) => Cell::Text(ch.to_string()),
            Token::Quoted(text) if text.is_empty() => {
                return Err(self.error("Empty key text"));
            }
            Token::Quoted(text) => Cell::Text(text.clone()),
            Token::Word(word) if word.chars().count() == 1 => Cell::Text(word.clone()),
            Token::Word(word) => Cell::Code(word.clone()),
            other => return Err(self.error(format!("Unexpected {} in layout", other.describe()))),
        };
        Ok(CellDecl {
            cell,
            line: self.line(),
        })
    }

    fn parse_state(&mut self) -> Result<StateDecl, LayoutError> {
        let line = self.line();
        self.advance();

        let name = self.expect_word("state name")?;
        log::debug!("state {}", name);
        self.expect_punct('{')?;
        self.expect_line_end()?;
        self.advance();

        let mut entries = Vec::new();
        loop {
            match &self.current {
                Token::EndOfLine => self.advance(),
                Token::Punct('}') => {
                    self.advance();
                    break;
                }
                Token::Word(_) => {
                    entries.push(self.parse_state_entry()?);
                    if !self.current.is_punct('}') {
                        self.expect_line_end()?;
                    }
                }
                Token::EndOfFile => {
                    return Err(self.error(format!("Unexpected end of file in state '{}'", name)));
                }
                other => {
                    return Err(self.error(format!("Unexpected {} in state '{}'", other.describe(), name)));
                }
            }
        }

        Ok(StateDecl { name, line, entries })
    }

    fn parse_state_entry(&mut self) -> Result<StateEntry, LayoutError> {
        let line = self.line();
        let keyword = self.expect_word("state entry")?;

        if let Some(kind) = LayerListKind::from_keyword(&keyword) {
            let layers = self.parse_layer_list()?;
            return Ok(StateEntry::Layers { kind, layers, line });
        }

        let Some(slot) = slot_digits(&keyword) else {
            return Err(LayoutError::Parse {
                line,
                message: format!("Unknown state entry '{}'", keyword),
            });
        };
        let slot = slot.to_string();

        let label = match &self.current {
            Token::Word(text) | Token::Quoted(text) => text.clone(),
            Token::Number(n) => n.to_string(),
            Token::Punct(ch) if *ch != '}' => ch.to_string(),
            other => return Err(self.error(format!("Expected meta key label, found {}", other.describe()))),
        };
        self.advance();

        let kind = match self.expect_word("meta key kind")?.as_str() {
            "dead" => MetaDecl::Dead(self.parse_layer_list()?),
            "state" => MetaDecl::State(self.expect_word("target state")?),
            "deadlatch" => MetaDecl::DeadLatch(self.expect_word("target state")?),
            other => {
                return Err(LayoutError::Parse {
                    line,
                    message: format!("Unknown meta key kind '{}'", other),
                })
            }
        };

        Ok(StateEntry::Meta { slot, label, kind, line })
    }

    /// `[shift:|ctrl:]name ...` up to the end of the line
    fn parse_layer_list(&mut self) -> Result<Vec<LayerRef>, LayoutError> {
        let mut layers = Vec::new();
        while let Token::Word(word) = &self.current {
            let line = self.line();
            let word = word.clone();
            self.advance();

            let (modifier, name) = match Modifier::from_prefix(&word) {
                Some(modifier) => {
                    self.expect_punct(':')?;
                    (modifier, self.expect_word("layout name")?)
                }
                None => (Modifier::None, word),
            };
            layers.push(LayerRef { modifier, name, line });
        }
        Ok(layers)
    }
}

/// Digits of an `S<digits>` slot reference
pub fn slot_digits(word: &str) -> Option<&str> {
    let digits = word.strip_prefix('S')?;
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some(digits)
    } else {
        None
    }
}
