use super::lexer::{TokenKind, lex, parse_int, token_text};

fn kinds(source: &str) -> Vec<(TokenKind, &str)> {
    lex(source)
        .iter()
        .map(|t| (t.kind, token_text(source, t)))
        .collect()
}

#[test]
fn keywords_and_identifiers() {
    assert_eq!(
        kinds("define defined returns argument_x"),
        [
            (TokenKind::KwDefine, "define"),
            (TokenKind::Ident, "defined"),
            (TokenKind::KwReturns, "returns"),
            (TokenKind::Ident, "argument_x"),
        ]
    );
}

#[test]
fn operands_and_terminators() {
    assert_eq!(
        kinds("loop: add -5, 0x1F; pick 2\n"),
        [
            (TokenKind::Ident, "loop"),
            (TokenKind::Colon, ":"),
            (TokenKind::Ident, "add"),
            (TokenKind::Int, "-5"),
            (TokenKind::Comma, ","),
            (TokenKind::Int, "0x1F"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::Ident, "pick"),
            (TokenKind::Int, "2"),
            (TokenKind::Newline, "\n"),
        ]
    );
}

#[test]
fn comments_are_dropped() {
    assert_eq!(
        kinds("dup // trailing\n/* block\n comment */ drop"),
        [
            (TokenKind::Ident, "dup"),
            (TokenKind::Newline, "\n"),
            (TokenKind::Ident, "drop"),
        ]
    );
}

#[test]
fn block_comments_closed_by_a_run_of_stars() {
    assert_eq!(
        kinds("dup /* x **/ drop /***/ swap /** doc **/"),
        [
            (TokenKind::Ident, "dup"),
            (TokenKind::Ident, "drop"),
            (TokenKind::Ident, "swap"),
        ]
    );
}

#[test]
fn garbage_coalesces() {
    assert_eq!(
        kinds("dup @@# drop"),
        [
            (TokenKind::Ident, "dup"),
            (TokenKind::Garbage, "@@#"),
            (TokenKind::Ident, "drop"),
        ]
    );
}

#[test]
fn integer_values() {
    assert_eq!(parse_int("42"), Some(42));
    assert_eq!(parse_int("-42"), Some(-42));
    assert_eq!(parse_int("0xff"), Some(255));
    assert_eq!(parse_int("-0X10"), Some(-16));
    assert_eq!(parse_int("9223372036854775807"), Some(i64::MAX));
    assert_eq!(parse_int("-9223372036854775808"), Some(i64::MIN));
    assert_eq!(parse_int("9223372036854775808"), None);
}
