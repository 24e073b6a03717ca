#[cfg(test)]
mod scanner_tests {
    use rox_parser as rox;

    use rox::error::LoxError;
    use rox::scanner::*;
    use rox::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source);
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*-+;/})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::MINUS, "-"),
                (TokenType::PLUS, "+"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::SLASH, "/"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_operators() {
        assert_token_sequence(
            "! != = == < <= > >=",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_keywords_and_identifiers() {
        assert_token_sequence(
            "var const print if else for while or and return true false nil counter",
            &[
                (TokenType::VAR, "var"),
                (TokenType::CONST, "const"),
                (TokenType::PRINT, "print"),
                (TokenType::IF, "if"),
                (TokenType::ELSE, "else"),
                (TokenType::FOR, "for"),
                (TokenType::WHILE, "while"),
                (TokenType::OR, "or"),
                (TokenType::AND, "and"),
                (TokenType::RETURN, "return"),
                (TokenType::TRUE, "true"),
                (TokenType::FALSE, "false"),
                (TokenType::NIL, "nil"),
                (TokenType::IDENTIFIER, "counter"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_04_literals_and_lines() {
        let tokens = scan_tokens("12.5 // trailing comment\n\"two\nlines\"").unwrap();

        assert_eq!(tokens.len(), 3);
        assert!(matches!(tokens[0].token_type, TokenType::NUMBER(n) if n == 12.5));
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[0].literal(), Some(Literal::Number(12.5)));

        assert_eq!(tokens[1].literal(), Some(Literal::Str("two\nlines")));
        assert_eq!(tokens[1].line, 3);

        assert_eq!(tokens[2].token_type, TokenType::EOF);
        assert_eq!(tokens[2].line, 3);
    }

    #[test]
    fn test_scanner_05_display() {
        let tokens = scan_tokens("42 \"hi\" nil").unwrap();
        let rendered: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();

        assert_eq!(
            rendered,
            vec!["NUMBER 42 42.0", "STRING \"hi\" hi", "NIL nil null", "EOF  null"]
        );
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let source = "+-$(#";
        let scanner = Scanner::new(source);

        // Collect all results (both tokens and errors)
        let results: Vec<_> = scanner.collect();

        // 0: PLUS, 1: MINUS, 2: error for '$', 3: LEFT_PAREN, 4: error for '#', 5: EOF
        assert_eq!(results.len(), 6, "Expected 6 items in result");

        assert_token_matches(&results[0], TokenType::PLUS, "+");
        assert_token_matches(&results[1], TokenType::MINUS, "-");
        assert_token_matches(&results[3], TokenType::LEFT_PAREN, "(");
        assert_token_matches(&results[5], TokenType::EOF, "");

        let error_count = results.iter().filter(|r| r.is_err()).count();
        assert_eq!(error_count, 2, "Expected 2 error messages");

        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(
                err.to_string().contains("Unexpected character"),
                "Error message should contain 'Unexpected character', got: {}",
                err
            );
        }

        fn assert_token_matches(
            result: &Result<Token, LoxError>,
            expected_type: TokenType,
            expected_lexeme: &str,
        ) {
            match result {
                Ok(token) => {
                    assert_eq!(
                        token.token_type, expected_type,
                        "Expected token type {:?}, got {:?}",
                        expected_type, token.token_type
                    );
                    assert_eq!(
                        token.lexeme, expected_lexeme,
                        "Expected lexeme '{}', got '{}'",
                        expected_lexeme, token.lexeme
                    );
                }
                Err(e) => panic!("Expected token but got error: {}", e),
            }
        }
    }

    #[test]
    fn test_scan_tokens_collects_every_error() {
        let errors = scan_tokens("print é;\n\"open").unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].to_string(), "[line 1] Error: Unexpected character: é");
        assert_eq!(errors[1].to_string(), "[line 2] Error: Unterminated string.");
    }
}
