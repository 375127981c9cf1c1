use logos::Logos;

use crate::{cap::VcpFeature, token::Token};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected character(s) '{0}'")]
    InvalidToken(String),
    #[error("expected {expected}, got {actual}")]
    Expected { expected: Token, actual: Token },
    #[error("expected VCP code or value, got {0}")]
    ExpectedHex(Token),
    #[error("no vcp group")]
    MissingVcp,
    #[error("unexpected end of capabilities string")]
    EndOfInput,
}

struct Parser<'a> {
    tokens: &'a [Token],
    index: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Parser<'a> {
        Parser { tokens, index: 0 }
    }

    /// Parses the `vcp(...)` group and ignores everything around it.
    fn parse_vcp(&mut self) -> Result<Vec<VcpFeature>, ParseError> {
        self.eat_until(&Token::Vcp);
        if !self.eat(&Token::Vcp) {
            return Err(ParseError::MissingVcp);
        }
        self.eat(&Token::Space);
        self.expect(Token::LeftParen)?;

        let mut features = Vec::new();
        self.eat(&Token::Space);
        while !self.check(&Token::RightParen) {
            features.push(self.parse_feature()?);
        }
        self.expect(Token::RightParen)?;

        Ok(features)
    }

    fn parse_feature(&mut self) -> Result<VcpFeature, ParseError> {
        let code = self.parse_hex()?;

        let mut values = Vec::new();
        if self.eat(&Token::LeftParen) {
            self.eat(&Token::Space);
            while !self.check(&Token::RightParen) {
                values.push(self.parse_hex()?);
            }
            self.expect(Token::RightParen)?;
            self.eat(&Token::Space);
        }

        Ok(VcpFeature { code, values })
    }

    /// Parses a code or value along with the spaces around it.
    fn parse_hex(&mut self) -> Result<u8, ParseError> {
        self.eat(&Token::Space);
        let value = match self.next()? {
            Token::Hex(value) => value,
            token => return Err(ParseError::ExpectedHex(token)),
        };
        self.eat(&Token::Space);
        Ok(value)
    }

    /// Returns true if the next token is `token`.
    fn check(&self, token: &Token) -> bool {
        self.tokens.get(self.index).is_some_and(|t| t == token)
    }

    fn next(&mut self) -> Result<Token, ParseError> {
        let token =
            self.tokens.get(self.index).ok_or(ParseError::EndOfInput)?;
        self.index += 1;
        Ok(token.clone())
    }

    /// Consumes the next token if it's `token`, and returns whether the token
    /// was consumed.
    fn eat(&mut self, token: &Token) -> bool {
        let matches = self.check(token);
        if matches {
            self.index += 1;
        }
        matches
    }

    fn eat_until(&mut self, token: &Token) {
        while self.index < self.tokens.len() && !self.check(token) {
            self.index += 1;
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        let actual = self.next()?;
        if actual == expected {
            Ok(())
        } else {
            Err(ParseError::Expected { expected, actual })
        }
    }
}

/// Parses the VCP features out of a capabilities string.
pub fn parse(s: &str) -> Result<Vec<VcpFeature>, ParseError> {
    let mut tokens = Vec::new();
    for (token, span) in Token::lexer(s).spanned() {
        match token {
            Ok(token) => tokens.push(token),
            Err(()) => {
                return Err(ParseError::InvalidToken(s[span].to_owned()))
            }
        }
    }

    Parser::new(&tokens).parse_vcp()
}
