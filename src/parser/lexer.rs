//! Lexer (scanner) for calculator source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the
//! table-driven parser. The scanner never fails: a run of characters that
//! cannot start any token becomes a single [`TokenKind::LexError`] token, so
//! the parser reports it like any other unexpected terminal.

use super::ast::SourceLocation;
use serde::Serialize;
use std::fmt;

/// Terminal name of identifier tokens.
pub const ID: &str = "id";
/// Terminal name of number tokens.
pub const NUM: &str = "num";
/// Terminal name of the end marker appended after the last token.
pub const END_MARKER: &str = "$$";
/// Terminal name of lexical-error tokens. Never appears in a grammar.
pub const LEX_ERROR: &str = "<lexical error>";

/// Token categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// Keyword or punctuation; the lexeme is its own terminal name.
    Literal,
    Identifier,
    Number,
    LexError,
    End,
}

/// A token with its source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub location: SourceLocation,
}

impl Token {
    /// Grammar terminal this token matches.
    pub fn terminal(&self) -> &str {
        match self.kind {
            TokenKind::Literal => &self.lexeme,
            TokenKind::Identifier => ID,
            TokenKind::Number => NUM,
            TokenKind::LexError => LEX_ERROR,
            TokenKind::End => END_MARKER,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::End => write!(f, "end of input"),
            _ => write!(f, "{}", self.lexeme),
        }
    }
}

/// Keywords and punctuation recognized by the scanner.
#[derive(Debug, Clone)]
pub struct LexTable {
    keywords: Vec<String>,
    /// Longest first, so multi-character operators win over their prefixes
    punctuation: Vec<String>,
}

impl LexTable {
    pub fn new<K, P>(keywords: K, punctuation: P) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        let mut punctuation: Vec<String> = punctuation.into_iter().map(Into::into).collect();
        punctuation.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        LexTable {
            keywords: keywords.into_iter().map(Into::into).collect(),
            punctuation,
        }
    }

    fn is_keyword(&self, word: &str) -> bool {
        self.keywords.iter().any(|k| k == word)
    }
}

impl Default for LexTable {
    /// The extended calculator language.
    fn default() -> Self {
        LexTable::new(
            ["read", "write", "if", "fi", "do", "od", "check"],
            [
                ":=", "==", "<>", "<=", ">=", "<", ">", "+", "-", "*", "/", "(", ")",
            ],
        )
    }
}

/// Lexer for calculator source code
pub struct Lexer<'a> {
    input: Vec<char>,
    table: &'a LexTable,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &str, table: &'a LexTable) -> Self {
        Self {
            input: input.chars().collect(),
            table,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input, ending with one end-marker token.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                tokens.push(Token {
                    kind: TokenKind::End,
                    lexeme: END_MARKER.to_string(),
                    location: self.current_location(),
                });
                break;
            }

            tokens.push(self.next_token());
        }

        tokens
    }

    fn next_token(&mut self) -> Token {
        let loc = self.current_location();
        let ch = self.input[self.position];

        if ch.is_ascii_alphabetic() || ch == '_' {
            return self.identifier_or_keyword(loc);
        }

        if ch.is_ascii_digit() {
            return self.number(loc);
        }

        if let Some(punct) = self.match_punctuation() {
            for _ in 0..punct.chars().count() {
                self.advance();
            }
            return Token {
                kind: TokenKind::Literal,
                lexeme: punct,
                location: loc,
            };
        }

        self.error_run(loc)
    }

    fn identifier_or_keyword(&mut self, loc: SourceLocation) -> Token {
        let word = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let kind = if self.table.is_keyword(&word) {
            TokenKind::Literal
        } else {
            TokenKind::Identifier
        };
        Token {
            kind,
            lexeme: word,
            location: loc,
        }
    }

    /// Digits, optionally followed by one `.` and more digits.
    fn number(&mut self, loc: SourceLocation) -> Token {
        let mut text = self.take_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') && self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            text.push('.');
            text.push_str(&self.take_while(|c| c.is_ascii_digit()));
        }
        Token {
            kind: TokenKind::Number,
            lexeme: text,
            location: loc,
        }
    }

    /// Maximal run of characters that cannot start any other token.
    fn error_run(&mut self, loc: SourceLocation) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if !text.is_empty() && self.starts_token(c) {
                break;
            }
            text.push(c);
            self.advance();
        }
        Token {
            kind: TokenKind::LexError,
            lexeme: text,
            location: loc,
        }
    }

    fn starts_token(&self, c: char) -> bool {
        c.is_whitespace()
            || c.is_ascii_alphanumeric()
            || c == '_'
            || self.match_punctuation().is_some()
    }

    fn match_punctuation(&self) -> Option<String> {
        self.table
            .punctuation
            .iter()
            .find(|p| {
                p.chars()
                    .enumerate()
                    .all(|(i, c)| self.peek_ahead(i) == Some(c))
            })
            .cloned()
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            text.push(c);
            self.advance();
        }
        text
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

/// Scans `source` with the default keyword table.
pub fn tokenize(source: &str) -> Vec<Token> {
    let table = LexTable::default();
    Lexer::new(source, &table).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminals(source: &str) -> Vec<String> {
        tokenize(source)
            .iter()
            .map(|t| t.terminal().to_string())
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = tokenize("read a\nsum := a + 12");
        assert_eq!(
            terminals("read a\nsum := a + 12"),
            vec!["read", "id", "id", ":=", "id", "+", "num", "$$"]
        );
        assert_eq!(tokens[1].lexeme, "a");
        assert_eq!(tokens[2].location, SourceLocation::new(2, 1));
        assert_eq!(tokens[6].lexeme, "12");
        assert_eq!(tokens[7].kind, TokenKind::End);
    }

    #[test]
    fn test_longest_operator_wins() {
        assert_eq!(
            terminals("a<=b<>c<d>=e==f"),
            vec!["id", "<=", "id", "<>", "id", "<", "id", ">=", "id", "==", "id", "$$"]
        );
    }

    #[test]
    fn test_keywords_need_whole_words() {
        assert_eq!(terminals("do done od_x"), vec!["do", "id", "id", "$$"]);
    }

    #[test]
    fn test_decimal_numbers() {
        let tokens = tokenize("3.25 7.");
        assert_eq!(tokens[0].lexeme, "3.25");
        assert_eq!(tokens[1].lexeme, "7");
        assert_eq!(tokens[2].kind, TokenKind::LexError);
        assert_eq!(tokens[2].lexeme, ".");
    }

    #[test]
    fn test_error_runs_are_maximal() {
        let tokens = tokenize("x @#! := 1 $ =");
        assert_eq!(tokens[1].kind, TokenKind::LexError);
        assert_eq!(tokens[1].lexeme, "@#!");
        assert_eq!(tokens[2].terminal(), ":=");
        assert_eq!(tokens[4].lexeme, "$");
        assert_eq!(tokens[5].lexeme, "=");
        assert_eq!(tokens[5].terminal(), LEX_ERROR);
    }

    #[test]
    fn test_empty_source() {
        let tokens = tokenize("  \n\t ");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].to_string(), "end of input");
    }
}
