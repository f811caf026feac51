mod common;

use common::{arithmetic_lexer, locations, show};
use pretty_assertions::assert_eq;
use statelex::{LexError, UnmatchedInput, DEFAULT_SOURCE_LABEL};
use std::num::ParseIntError;

#[test]
fn test_arithmetic() {
    let lexer = arithmetic_lexer();
    let tokens = lexer.lex("12 + (3*4)").unwrap();
    assert_eq!(
        show(&tokens),
        vec!["NUM 12", "PLS", "LPAREN", "NUM 3", "MUL", "NUM 4", "RPAREN", "EOS"]
    );
}

#[test]
fn test_exactly_one_eos_at_end() {
    let lexer = arithmetic_lexer();
    for src in ["", " ", "1", "1 - 2 / 3", "((((", "  7  "] {
        let tokens = lexer.lex(src).unwrap();
        let eos_count = tokens.iter().filter(|tok| tok.is_eos()).count();
        assert_eq!(eos_count, 1, "in {:?}", src);
        assert!(tokens.last().unwrap().is_eos());
        assert!(tokens.last().unwrap().location.is_none());
    }
    assert_eq!(show(&lexer.lex("").unwrap()), vec!["EOS"]);
}

#[test]
fn test_unmatched_input() {
    let lexer = arithmetic_lexer();
    let error = lexer.lex("1@2").unwrap_err();
    assert_eq!(
        error.as_unmatched(),
        Some(&UnmatchedInput {
            offset: 1,
            line: 1,
            column: 1,
            remainder: "@2".to_owned(),
            source_label: DEFAULT_SOURCE_LABEL.into(),
        })
    );
    assert_eq!(error.to_string(), "Unmatched input at <input>:1:1: \"@2\"");
}

#[test]
fn test_unmatched_input_on_later_line() {
    let lexer = arithmetic_lexer();
    let src = "1\n+ @";
    let error = lexer.lex_labeled(src, "calc").unwrap_err();
    let unmatched = error.as_unmatched().unwrap();
    assert_eq!(unmatched.offset, 4);
    assert_eq!(unmatched.line, 2);
    assert_eq!(unmatched.column, 2);
    assert_eq!(unmatched.remainder, "@");

    colored::control::set_override(false);
    assert_eq!(
        unmatched.report(src),
        "error: unmatched input at 'calc' line 2.\n  |\n2 | + @\n  |   ^"
    );
}

#[test]
fn test_positions() {
    let lexer = arithmetic_lexer();
    let tokens = lexer.lex_labeled("1 +\n  2 - 30", "calc").unwrap();
    assert_eq!(
        show(&tokens),
        vec!["NUM 1", "PLS", "NUM 2", "SUB", "NUM 30", "EOS"]
    );
    // The whitespace chunk "\n  " resets the column to zero, not to two.
    assert_eq!(
        locations(&tokens),
        vec!["1:0+1", "1:2+1", "2:0+1", "2:2+1", "2:4+2"]
    );
    let last = tokens[4].location.as_ref().unwrap();
    assert_eq!(last.offset, 10);
    assert_eq!(last.to_string(), "calc:2:4");
}

#[test]
fn test_line_numbers_count_every_newline() {
    let lexer = arithmetic_lexer();
    let tokens = lexer.lex("\n\n1\n\n\n2").unwrap();
    assert_eq!(locations(&tokens), vec!["3:0+1", "6:0+1"]);
    assert_eq!(tokens[1].location.as_ref().unwrap().offset, 6);
}

#[test]
fn test_positions_count_characters() {
    let lexer = arithmetic_lexer();
    let error = lexer.lex("1 + é").unwrap_err();
    let unmatched = error.as_unmatched().unwrap();
    assert_eq!(unmatched.offset, 4);
    assert_eq!(unmatched.remainder, "é");
}

#[test]
fn test_action_fault_is_passed_through() {
    let lexer = arithmetic_lexer();
    let error = lexer.lex("1 + 99999999999999999999").unwrap_err();
    match error {
        LexError::Action {
            state,
            pattern,
            source,
        } => {
            assert_eq!(state, "default");
            assert_eq!(pattern, "/[0-9]+/");
            assert!(source.downcast_ref::<ParseIntError>().is_some());
        }
        other => panic!("Expected an action error, found {:?}", other),
    }
}

#[test]
fn test_lex_reader() {
    let lexer = arithmetic_lexer();
    let mut env = lexer.new_environment();
    let tokens = lexer.lex_reader("6 / 2".as_bytes(), "mem", &mut env).unwrap();
    assert_eq!(show(&tokens), vec!["NUM 6", "DIV", "NUM 2", "EOS"]);
    assert_eq!(&*tokens[0].location.as_ref().unwrap().source_label, "mem");

    let invalid_utf8: &[u8] = &[b'1', 0xff, 0xfe];
    match lexer.lex_reader(invalid_utf8, "bin", &mut env) {
        Err(LexError::Io { label, .. }) => assert_eq!(label, "bin"),
        other => panic!("Expected an io error, found {:?}", other),
    }
}
