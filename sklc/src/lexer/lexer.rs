use logos::{Lexer as LogosLexer, Logos};

use super::{RawToken, Token};

/// How digits are classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexMode {
    /// Digit runs are numbers (`size 4 10`)
    #[default]
    Directive,
    /// Digits are word characters, so numeric key labels stay whole words
    LayoutRow,
}

/// Tokenizer for layout files. Lexing cannot fail: anything the token table
/// does not cover becomes a one-character [`Token::Punct`].
pub struct Lexer<'a> {
    inner: LogosLexer<'a, RawToken>,
    mode: LexMode,
    /// Line the next token starts on
    line: usize,
    /// Line of the token returned last
    token_line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: RawToken::lexer(input),
            mode: LexMode::Directive,
            line: 1,
            token_line: 1,
        }
    }

    /// Takes effect from the next token on
    pub fn set_mode(&mut self, mode: LexMode) {
        self.mode = mode;
    }

    /// 1-based line of the token returned last
    pub fn current_line(&self) -> usize {
        self.token_line
    }

    pub fn next_token(&mut self) -> Token {
        self.token_line = self.line;

        match self.inner.next() {
            Some(Ok(RawToken::Newline)) => {
                self.line += 1;
                Token::EndOfLine
            }
            Some(Ok(RawToken::Word(word))) => Token::Word(word),
            Some(Ok(RawToken::DigitWord(word))) => self.classify_digits(word),
            Some(Ok(RawToken::Quoted(text))) => Token::Quoted(text),
            Some(Ok(RawToken::Other(ch))) => Token::Punct(ch),
            // skipped by the automaton, never produced
            Some(Ok(RawToken::Comment)) => self.next_token(),
            Some(Err(())) => match self.inner.slice().chars().next() {
                Some(ch) => Token::Punct(ch),
                None => self.next_token(),
            },
            None => Token::EndOfFile,
        }
    }

    fn classify_digits(&self, word: String) -> Token {
        match self.mode {
            LexMode::LayoutRow => Token::Word(word),
            LexMode::Directive if word.bytes().all(|b| b.is_ascii_digit()) => {
                match word.parse::<f64>() {
                    Ok(n) => Token::Number(n),
                    Err(_) => Token::Word(word),
                }
            }
            LexMode::Directive => Token::Word(word),
        }
    }

    pub fn collect_all(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            if token == Token::EndOfFile {
                break;
            }
            tokens.push(token);
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    #[test]
    fn test_lexer_line_tracking() {
        let input = "size 2 2\n\n# comment only\nlayout";
        let mut lexer = Lexer::new(input);

        assert_eq!(lexer.next_token(), word("size"));
        assert_eq!(lexer.current_line(), 1);
        assert_eq!(lexer.next_token(), Token::Number(2.0));
        assert_eq!(lexer.next_token(), Token::Number(2.0));
        assert_eq!(lexer.next_token(), Token::EndOfLine);
        assert_eq!(lexer.current_line(), 1);
        assert_eq!(lexer.next_token(), Token::EndOfLine);
        assert_eq!(lexer.current_line(), 2);
        assert_eq!(lexer.next_token(), Token::EndOfLine);
        assert_eq!(lexer.current_line(), 3);
        assert_eq!(lexer.next_token(), word("layout"));
        assert_eq!(lexer.current_line(), 4);
        assert_eq!(lexer.next_token(), Token::EndOfFile);
        assert_eq!(lexer.next_token(), Token::EndOfFile);
    }

    #[test]
    fn test_digit_classification_follows_mode() {
        let mut lexer = Lexer::new("12 1 S12 3x 12");
        assert_eq!(lexer.next_token(), Token::Number(12.0));
        lexer.set_mode(LexMode::LayoutRow);
        assert_eq!(lexer.next_token(), word("1"));
        assert_eq!(lexer.next_token(), word("S12"));
        assert_eq!(lexer.next_token(), word("3x"));
        lexer.set_mode(LexMode::Directive);
        assert_eq!(lexer.next_token(), Token::Number(12.0));
    }

    #[test]
    fn test_symbols_become_punctuation() {
        let tokens = Lexer::new(r#". - / \ * { } : é"#).collect_all();
        let expected: Vec<Token> = ['.', '-', '/', '\\', '*', '{', '}', ':', 'é']
            .into_iter()
            .map(Token::Punct)
            .collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn test_quoted_strings() {
        let tokens = Lexer::new("\"a b\" \"#\" \"open\nnext").collect_all();
        assert_eq!(
            tokens,
            vec![
                Token::Quoted("a b".to_string()),
                Token::Quoted("#".to_string()),
                Token::Quoted("open".to_string()),
                Token::EndOfLine,
                word("next"),
            ]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let tokens = Lexer::new("a\r\nb\r\n").collect_all();
        assert_eq!(
            tokens,
            vec![word("a"), Token::EndOfLine, word("b"), Token::EndOfLine]
        );
    }
}
