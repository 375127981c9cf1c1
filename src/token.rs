use std::fmt;

use logos::Logos;

/// Tokens of an MCCS capabilities string.
///
/// Monitors pad the reply with NUL bytes, so those are skipped along with
/// tabs and line breaks. Spaces are kept as tokens because they separate hex
/// values.
#[derive(Clone, Debug, Logos, PartialEq)]
#[logos(skip "[\x00\t\r\n]")]
pub enum Token {
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[regex(" +")]
    Space,

    #[token("vcp")]
    Vcp,

    // Two hex digits are either a VCP code or one of its values,
    // depending on where they appear.
    #[regex("[0-9A-Fa-f][0-9A-Fa-f]", |lex| u8::from_str_radix(lex.slice(), 16).ok())]
    Hex(u8),
    #[regex("[a-zA-Z0-9_\\-]+", |lex| lex.slice().to_owned())]
    Word(String),
    #[regex("[0-9]+\\.[0-9]+")]
    Version,
    // Any other character. Groups outside `vcp` can hold free text.
    #[regex("[^ ()\x00\t\r\na-zA-Z0-9_\\-]", |lex| lex.slice().chars().next())]
    Punct(char),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LeftParen => write!(f, "'('"),
            Token::RightParen => write!(f, "')'"),
            Token::Space => write!(f, "' '"),
            Token::Vcp => write!(f, "vcp"),
            Token::Hex(value) => write!(f, "hex value {value:02X}"),
            Token::Word(word) => write!(f, "'{word}'"),
            Token::Version => write!(f, "version"),
            Token::Punct(c) => write!(f, "'{c}'"),
        }
    }
}
