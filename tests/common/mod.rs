#![allow(dead_code)]

use statelex::{token, token_with, InState, Lexer, LexerBuilder, Token, TokenType};
use std::fmt;

/// Render each token as its tag, followed by its value if it has one.
pub fn show<T: fmt::Display, V: fmt::Debug>(tokens: &[Token<T, V>]) -> Vec<String> {
    tokens
        .iter()
        .map(|tok| match (&tok.token_type, &tok.value) {
            (TokenType::Eos, _) => "EOS".to_owned(),
            (TokenType::Tag(tag), None) => tag.to_string(),
            (TokenType::Tag(tag), Some(value)) => format!("{} {:?}", tag, value),
        })
        .collect()
}

/// Render each token's location as `line:column+length`.
pub fn locations<T, V>(tokens: &[Token<T, V>]) -> Vec<String> {
    tokens
        .iter()
        .filter_map(|tok| tok.location.as_ref())
        .map(|loc| format!("{}:{}+{}", loc.line, loc.column, loc.length))
        .collect()
}

pub fn arithmetic_lexer() -> Lexer<&'static str, i64> {
    let mut builder = LexerBuilder::<&'static str, i64>::new();
    builder
        .string("+", token("PLS"))
        .unwrap()
        .string("-", token("SUB"))
        .unwrap()
        .string("*", token("MUL"))
        .unwrap()
        .string("/", token("DIV"))
        .unwrap()
        .string("(", token("LPAREN"))
        .unwrap()
        .string(")", token("RPAREN"))
        .unwrap()
        .rule("[0-9]+", token_with("NUM", |text: &str| text.parse::<i64>()))
        .unwrap()
        .skip(InState::Default, r"\s+")
        .unwrap();
    builder.finish()
}
