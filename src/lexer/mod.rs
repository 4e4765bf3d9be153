//! # Lexer
//!
//! Tokenises Osprey source code into a stream of tokens.
//!
//! Whitespace (space, tab, `\r`, `\n`) is skipped; newlines advance the line
//! counter and reset the column, tabs advance the column by four. The
//! scanner is a character-classifier state machine with single-character
//! lookahead to disambiguate the multi-character operators `==`, `!=`,
//! `<=`, `>=`, `&&`, `||`, `->`.

pub mod cursor;

#[cfg(test)]
mod tests;

use crate::error::{LexError, Span};
use crate::token::{Token, TokenKind};
use cursor::Cursor;

pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

#[must_use]
pub fn tokenize(source: &str) -> LexResult {
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    while !cursor.is_at_end() {
        match lex_token(&mut cursor) {
            Ok(Some(token)) => tokens.push(token),
            Ok(None) => {}
            Err(err) => errors.push(err),
        }
    }

    let (l, c) = cursor.current_pos();
    tokens.push(Token {
        kind: TokenKind::Eof,
        lexeme: String::new(),
        span: Span { line: l, column: c },
    });

    LexResult { tokens, errors }
}

fn lex_token(cursor: &mut Cursor) -> Result<Option<Token>, LexError> {
    while matches!(cursor.peek(), Some(' ' | '\t' | '\r' | '\n')) {
        cursor.advance();
    }

    if cursor.is_at_end() {
        return Ok(None);
    }

    let (sl, sc) = cursor.current_pos();
    let ch = cursor.peek().unwrap();

    let (kind, lexeme) = match ch {
        ':' => single(cursor, TokenKind::Colon, ":"),
        ';' => single(cursor, TokenKind::Semicolon, ";"),
        ',' => single(cursor, TokenKind::Comma, ","),
        '(' => single(cursor, TokenKind::LeftParen, "("),
        ')' => single(cursor, TokenKind::RightParen, ")"),
        '{' => single(cursor, TokenKind::LeftCurly, "{"),
        '}' => single(cursor, TokenKind::RightCurly, "}"),
        '*' => single(cursor, TokenKind::Asterisk, "*"),
        '/' => single(cursor, TokenKind::Divide, "/"),
        '%' => single(cursor, TokenKind::Percent, "%"),
        '+' => single(cursor, TokenKind::Plus, "+"),
        '=' => two_char(cursor, '=', TokenKind::Equality, "==", TokenKind::Assign, "="),
        '!' => two_char(
            cursor,
            '=',
            TokenKind::NotEquality,
            "!=",
            TokenKind::Exclamation,
            "!",
        ),
        '<' => two_char(cursor, '=', TokenKind::LtEq, "<=", TokenKind::Lt, "<"),
        '>' => two_char(cursor, '=', TokenKind::GtEq, ">=", TokenKind::Gt, ">"),
        '&' => two_char_or_error(cursor, '&', TokenKind::And, "&&", sl, sc)?,
        '|' => two_char_or_error(cursor, '|', TokenKind::Or, "||", sl, sc)?,
        '-' => {
            cursor.advance();
            if cursor.peek() == Some('>') {
                cursor.advance();
                (TokenKind::RightArrow, "->".to_string())
            } else {
                (TokenKind::Minus, "-".to_string())
            }
        }
        c if c.is_ascii_digit() => return Ok(Some(lex_number(cursor, sl, sc))),
        c if c.is_ascii_alphabetic() => return Ok(Some(lex_word(cursor, sl, sc))),
        _ => {
            cursor.advance();
            return Err(LexError {
                message: format!("unexpected character '{}'", ch.escape_default()),
                span: cursor.make_span(sl, sc),
            });
        }
    };

    Ok(Some(Token {
        kind,
        lexeme,
        span: cursor.make_span(sl, sc),
    }))
}

fn single(cursor: &mut Cursor, kind: TokenKind, lexeme: &str) -> (TokenKind, String) {
    cursor.advance();
    (kind, lexeme.to_string())
}

/// Consume one char; if the next char matches `second`, consume it too and
/// produce `wide_kind`/`wide_lexeme`, otherwise produce `narrow_kind`/`narrow_lexeme`.
fn two_char(
    cursor: &mut Cursor,
    second: char,
    wide_kind: TokenKind,
    wide_lexeme: &str,
    narrow_kind: TokenKind,
    narrow_lexeme: &str,
) -> (TokenKind, String) {
    cursor.advance();
    if cursor.peek() == Some(second) {
        cursor.advance();
        (wide_kind, wide_lexeme.to_string())
    } else {
        (narrow_kind, narrow_lexeme.to_string())
    }
}

/// Like `two_char`, but there is no valid single-character token — failing to
/// see `second` is a lex error (used for `&&` and `||`).
fn two_char_or_error(
    cursor: &mut Cursor,
    second: char,
    wide_kind: TokenKind,
    wide_lexeme: &str,
    sl: usize,
    sc: usize,
) -> Result<(TokenKind, String), LexError> {
    let first = cursor.advance().unwrap();
    if cursor.peek() == Some(second) {
        cursor.advance();
        Ok((wide_kind, wide_lexeme.to_string()))
    } else {
        Err(LexError {
            message: format!("unexpected character '{}'", first.escape_default()),
            span: Span {
                line: sl,
                column: sc,
            },
        })
    }
}

fn lex_number(cursor: &mut Cursor, sl: usize, sc: usize) -> Token {
    let mut lexeme = String::new();
    while matches!(cursor.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
        lexeme.push(cursor.advance().unwrap());
    }

    Token {
        kind: TokenKind::I32,
        lexeme,
        span: cursor.make_span(sl, sc),
    }
}

fn lex_word(cursor: &mut Cursor, sl: usize, sc: usize) -> Token {
    let mut word = String::new();
    word.push(cursor.advance().unwrap());
    while matches!(cursor.peek(), Some(c) if c.is_ascii_alphanumeric()) {
        word.push(cursor.advance().unwrap());
    }

    let kind = TokenKind::keyword(&word).unwrap_or(TokenKind::Identifier);

    Token {
        kind,
        lexeme: word,
        span: cursor.make_span(sl, sc),
    }
}
