#[cfg(test)]
mod lexer_tests {
    use crate::lexer::tokenize;
    use crate::token::TokenKind;

    fn lex_ok(input: &str) -> Vec<TokenKind> {
        let result = tokenize(input);
        assert!(
            result.errors.is_empty(),
            "unexpected errors: {:?}",
            result.errors
        );
        result.tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input() {
        assert_eq!(lex_ok(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn whitespace_only() {
        assert_eq!(lex_ok("   \t\n\r\n  "), vec![TokenKind::Eof]);
    }

    #[test]
    fn integer_literal() {
        assert_eq!(lex_ok("42"), vec![TokenKind::I32, TokenKind::Eof]);
    }

    #[test]
    fn i32_keyword_and_literal_share_kind() {
        let result = tokenize("i32 7");
        assert_eq!(result.tokens[0].kind, TokenKind::I32);
        assert_eq!(result.tokens[0].lexeme, "i32");
        assert_eq!(result.tokens[1].kind, TokenKind::I32);
        assert_eq!(result.tokens[1].lexeme, "7");
    }

    #[test]
    fn identifiers_and_keywords() {
        assert_eq!(
            lex_ok("return if mut foobar"),
            vec![
                TokenKind::Return,
                TokenKind::If,
                TokenKind::Mutable,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn identifier_with_digits() {
        let result = tokenize("x1 y2z");
        assert_eq!(result.tokens[0].kind, TokenKind::Identifier);
        assert_eq!(result.tokens[0].lexeme, "x1");
        assert_eq!(result.tokens[1].lexeme, "y2z");
    }

    #[test]
    fn minus_vs_arrow() {
        assert_eq!(
            lex_ok("- ->"),
            vec![TokenKind::Minus, TokenKind::RightArrow, TokenKind::Eof]
        );
    }

    #[test]
    fn arrow_not_split_by_whitespace() {
        let result = tokenize("a->b");
        assert_eq!(result.tokens[1].kind, TokenKind::RightArrow);
        assert_eq!(result.tokens[1].lexeme, "->");
    }

    #[test]
    fn two_char_operators() {
        assert_eq!(
            lex_ok("== != <= >= && ||"),
            vec![
                TokenKind::Equality,
                TokenKind::NotEquality,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn one_char_fallbacks() {
        assert_eq!(
            lex_ok("= ! < >"),
            vec![
                TokenKind::Assign,
                TokenKind::Exclamation,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn single_ampersand_is_an_error() {
        let result = tokenize("&");
        assert!(result.tokens.iter().all(|t| t.kind != TokenKind::And));
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn single_pipe_is_an_error() {
        let result = tokenize("|");
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn punctuation() {
        assert_eq!(
            lex_ok(": ; , ( ) { }"),
            vec![
                TokenKind::Colon,
                TokenKind::Semicolon,
                TokenKind::Comma,
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftCurly,
                TokenKind::RightCurly,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn arithmetic_operators() {
        assert_eq!(
            lex_ok("+ * / %"),
            vec![
                TokenKind::Plus,
                TokenKind::Asterisk,
                TokenKind::Divide,
                TokenKind::Percent,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn function_signature_tokens() {
        assert_eq!(
            lex_ok("add: (a: i32, b: i32) -> i32"),
            vec![
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::LeftParen,
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::I32,
                TokenKind::Comma,
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::I32,
                TokenKind::RightParen,
                TokenKind::RightArrow,
                TokenKind::I32,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unexpected_character_reports_span() {
        let result = tokenize("x @ y");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].span.line, 1);
        assert_eq!(result.errors[0].span.column, 3);
    }

    #[test]
    fn line_and_column_tracking() {
        let result = tokenize("a\nbb c");
        // a
        assert_eq!(result.tokens[0].span, crate::error::Span { line: 1, column: 1 });
        // bb
        assert_eq!(result.tokens[1].span, crate::error::Span { line: 2, column: 1 });
        // c
        assert_eq!(result.tokens[2].span, crate::error::Span { line: 2, column: 4 });
    }

    #[test]
    fn never_emits_f32() {
        let result = tokenize("f32 3.14");
        assert_eq!(result.tokens[0].kind, TokenKind::F32);
        assert_eq!(result.tokens[1].kind, TokenKind::I32);
        assert_eq!(result.tokens[1].lexeme, "3.14");
    }
}
