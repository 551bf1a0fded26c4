use logos::Logos;

/// Raw lexemes recognised by the logos automaton
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum RawToken {
    // Comments and insignificant whitespace (skipped)
    #[regex(r"#[^\n]*", logos::skip)]
    #[regex(r"[ \t\r\x0C]+", logos::skip, priority = 3)]
    Comment,

    #[token("\n")]
    Newline,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string(), priority = 3)]
    Word(String),

    // Digits start a word only inside layout rows; the lexer decides
    #[regex(r"[0-9][A-Za-z0-9_]*", |lex| lex.slice().to_string(), priority = 3)]
    DigitWord(String),

    // An unterminated string runs to the end of the line
    #[regex(r#""[^"\n]*""#, |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    #[regex(r#""[^"\n]*"#, |lex| lex.slice()[1..].to_string())]
    Quoted(String),

    // Any other single character
    #[regex(r".", |lex| lex.slice().chars().next(), priority = 1)]
    Other(char),
}

/// Token handed to the parser
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Word(String),
    Quoted(String),
    Number(f64),
    Punct(char),
    EndOfLine,
    EndOfFile,
}

impl Token {
    pub fn is_punct(&self, ch: char) -> bool {
        matches!(self, Token::Punct(c) if *c == ch)
    }

    /// True for tokens that end a directive line
    pub fn is_line_end(&self) -> bool {
        matches!(self, Token::EndOfLine | Token::EndOfFile)
    }

    /// Human readable form for error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Word(w) => format!("'{}'", w),
            Token::Quoted(s) => format!("\"{}\"", s),
            Token::Number(n) => format!("number {}", n),
            Token::Punct(c) => format!("'{}'", c),
            Token::EndOfLine => "end of line".to_string(),
            Token::EndOfFile => "end of file".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logos::Logos;

    #[test]
    fn test_basic_tokens() {
        let input = "layout main { # trailing\n\"q w\" 12 S0";
        let mut lex = RawToken::lexer(input);

        assert_eq!(lex.next(), Some(Ok(RawToken::Word("layout".to_string()))));
        assert_eq!(lex.next(), Some(Ok(RawToken::Word("main".to_string()))));
        assert_eq!(lex.next(), Some(Ok(RawToken::Other('{'))));
        assert_eq!(lex.next(), Some(Ok(RawToken::Newline)));
        assert_eq!(lex.next(), Some(Ok(RawToken::Quoted("q w".to_string()))));
        assert_eq!(lex.next(), Some(Ok(RawToken::DigitWord("12".to_string()))));
        assert_eq!(lex.next(), Some(Ok(RawToken::Word("S0".to_string()))));
        assert_eq!(lex.next(), None);
    }

    #[test]
    fn test_unterminated_quote_stops_at_newline() {
        let mut lex = RawToken::lexer("\"abc\nx");
        assert_eq!(lex.next(), Some(Ok(RawToken::Quoted("abc".to_string()))));
        assert_eq!(lex.next(), Some(Ok(RawToken::Newline)));
        assert_eq!(lex.next(), Some(Ok(RawToken::Word("x".to_string()))));
    }

    #[test]
    fn test_comment_hides_quotes() {
        let mut lex = RawToken::lexer("# \"not a string\"\nRET");
        assert_eq!(lex.next(), Some(Ok(RawToken::Newline)));
        assert_eq!(lex.next(), Some(Ok(RawToken::Word("RET".to_string()))));
        assert_eq!(lex.next(), None);
    }

    #[test]
    fn test_lone_quote_and_hash() {
        let mut lex = RawToken::lexer("\"\n#\nx");
        assert_eq!(lex.next(), Some(Ok(RawToken::Quoted(String::new()))));
        assert_eq!(lex.next(), Some(Ok(RawToken::Newline)));
        assert_eq!(lex.next(), Some(Ok(RawToken::Newline)));
        assert_eq!(lex.next(), Some(Ok(RawToken::Word("x".to_string()))));
        assert_eq!(lex.next(), None);
    }

    #[test]
    fn test_multibyte_symbol() {
        let mut lex = RawToken::lexer("é→");
        assert_eq!(lex.next(), Some(Ok(RawToken::Other('é'))));
        assert_eq!(lex.next(), Some(Ok(RawToken::Other('→'))));
        assert_eq!(lex.next(), None);
    }

    #[test]
    fn test_describe() {
        assert_eq!(Token::Punct('{').describe(), "'{'");
        assert_eq!(Token::EndOfLine.describe(), "end of line");
        assert!(Token::Punct('*').is_punct('*'));
    }
}
