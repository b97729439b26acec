//! Logos-based lexer for Kconfig lines.
//!
//! Kconfig is line oriented: the parser hands one logical line at a time
//! (after preprocessing) to [`tokenize`].

use logos::Logos;

/// A single Kconfig token.
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    #[token("&&")]
    AndAnd,

    #[token("||")]
    OrOr,

    #[token("!=")]
    BangEq,

    #[token("!")]
    Bang,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("=")]
    Eq,

    #[token("<=")]
    LtEq,

    #[token("<")]
    Lt,

    #[token(">=")]
    GtEq,

    #[token(">")]
    Gt,

    /// Legacy spelling of `help`.
    #[token("---help---")]
    HelpCompat,

    #[regex(r#""([^"\\]|\\.)*""#, unquote)]
    #[regex(r"'([^'\\]|\\.)*'", unquote)]
    Str(String),

    /// Keywords, symbol names and unquoted literals such as `0x10` or `-1`.
    #[regex(r"[A-Za-z0-9_./\-]+", |lex| lex.slice().to_owned())]
    Word(String),
}

impl Token {
    pub fn is_word(&self, word: &str) -> bool {
        matches!(self, Token::Word(w) if w == word)
    }
}

fn unquote(lex: &mut logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Tokenize one logical line. On failure returns the offending text.
pub fn tokenize(line: &str) -> Result<Vec<Token>, String> {
    let mut lexer = Token::lexer(line);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next() {
        match token {
            Ok(token) => tokens.push(token),
            Err(()) => return Err(lexer.slice().to_string()),
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    #[test]
    fn test_tokenize_config_line() {
        assert_eq!(
            tokenize("config FOO_BAR").unwrap(),
            vec![word("config"), word("FOO_BAR")]
        );
    }

    #[test]
    fn test_tokenize_expression() {
        assert_eq!(
            tokenize("depends on !A && (B || C != \"x\")").unwrap(),
            vec![
                word("depends"),
                word("on"),
                Token::Bang,
                word("A"),
                Token::AndAnd,
                Token::LParen,
                word("B"),
                Token::OrOr,
                word("C"),
                Token::BangEq,
                Token::Str("x".to_string()),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_strings_and_comments() {
        assert_eq!(
            tokenize(r#"prompt "say \"hi\"" # trailing"#).unwrap(),
            vec![word("prompt"), Token::Str("say \"hi\"".to_string())]
        );
        assert_eq!(
            tokenize("default 'single'").unwrap(),
            vec![word("default"), Token::Str("single".to_string())]
        );
    }

    #[test]
    fn test_tokenize_numbers_and_help() {
        assert_eq!(
            tokenize("range -1 0x10").unwrap(),
            vec![word("range"), word("-1"), word("0x10")]
        );
        assert_eq!(tokenize("---help---").unwrap(), vec![Token::HelpCompat]);
    }

    #[test]
    fn test_tokenize_rejects_garbage() {
        assert_eq!(tokenize("config @FOO"), Err("@".to_string()));
    }
}
