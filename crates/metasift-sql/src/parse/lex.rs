use crate::parse::ParseError;
use std::{iter::Peekable, str::CharIndices};

///
/// Token
///
/// One lexed unit with the byte offset it starts at. Offsets feed error
/// messages and the WHERE-clause slicing done by `extract_where_clause`.
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) at: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Text(String),
    Int(i64),
    Float(f64),
    Keyword(Keyword),
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    LParen,
    RParen,
    Comma,
    Semicolon,
    Star,
    Dot,
    Eof,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Keyword {
    And,
    Or,
    Not,
    In,
    Between,
    True,
    False,
    Select,
    From,
    Where,
    Order,
    Group,
    By,
    Limit,
}

fn keyword(text: &str) -> Option<Keyword> {
    let kw = match text.to_ascii_lowercase().as_str() {
        "and" => Keyword::And,
        "or" => Keyword::Or,
        "not" => Keyword::Not,
        "in" => Keyword::In,
        "between" => Keyword::Between,
        "true" => Keyword::True,
        "false" => Keyword::False,
        "select" => Keyword::Select,
        "from" => Keyword::From,
        "where" => Keyword::Where,
        "order" => Keyword::Order,
        "group" => Keyword::Group,
        "by" => Keyword::By,
        "limit" => Keyword::Limit,
        _ => return None,
    };

    Some(kw)
}

/// Tokenize a whole statement. Keywords are recognized case-insensitively;
/// a trailing `Eof` token carries the input length.
pub(crate) fn lex(input: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(input).run()
}

struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    position: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            position: 0,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace();

        let Some(&(at, ch)) = self.chars.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                at: self.source.len(),
            });
        };

        match ch {
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.scan_word(at)),
            '0'..='9' => self.scan_number(at, false),
            '-' => {
                self.advance();
                if self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    self.scan_number(at, true)
                } else {
                    Err(ParseError::UnexpectedChar { found: '-', at })
                }
            }
            '\'' => self.scan_text(at),
            '"' => self.scan_quoted_ident(at),
            '=' => Ok(self.symbol(TokenKind::Eq, at)),
            '!' => {
                self.advance();
                if self.eat('=') {
                    Ok(Token {
                        kind: TokenKind::Ne,
                        at,
                    })
                } else {
                    Err(ParseError::UnexpectedChar { found: '!', at })
                }
            }
            '<' => {
                self.advance();
                let kind = if self.eat('=') {
                    TokenKind::Lte
                } else if self.eat('>') {
                    TokenKind::Ne
                } else {
                    TokenKind::Lt
                };
                Ok(Token { kind, at })
            }
            '>' => {
                self.advance();
                let kind = if self.eat('=') {
                    TokenKind::Gte
                } else {
                    TokenKind::Gt
                };
                Ok(Token { kind, at })
            }
            '(' => Ok(self.symbol(TokenKind::LParen, at)),
            ')' => Ok(self.symbol(TokenKind::RParen, at)),
            ',' => Ok(self.symbol(TokenKind::Comma, at)),
            ';' => Ok(self.symbol(TokenKind::Semicolon, at)),
            '*' => Ok(self.symbol(TokenKind::Star, at)),
            '.' => Ok(self.symbol(TokenKind::Dot, at)),
            _ => Err(ParseError::UnexpectedChar { found: ch, at }),
        }
    }

    // ------------------------------------------------------------------
    // Scanners
    // ------------------------------------------------------------------

    fn scan_word(&mut self, start: usize) -> Token {
        while self
            .peek_char()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }

        let text = &self.source[start..self.position];
        let kind = keyword(text)
            .map_or_else(|| TokenKind::Ident(text.to_string()), TokenKind::Keyword);

        Token { kind, at: start }
    }

    fn scan_number(&mut self, start: usize, negative: bool) -> Result<Token, ParseError> {
        let digits_start = self.position;
        self.consume_digits();

        // A dot makes it a float only when digits follow; `1.` stays an
        // integer and leaves the dot for the next token.
        let mut is_float = false;
        if self.peek_char() == Some('.') {
            let after_dot = self.source[self.position + 1..].chars().next();
            if after_dot.is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
                self.consume_digits();
                is_float = true;
            }
        }

        let unsigned = &self.source[digits_start..self.position];
        let text = if negative {
            format!("-{unsigned}")
        } else {
            unsigned.to_string()
        };

        let kind = if is_float {
            let value: f64 = text.parse().map_err(|_| ParseError::InvalidNumber {
                text: text.clone(),
                at: start,
            })?;
            TokenKind::Float(value)
        } else {
            let value: i64 = text.parse().map_err(|_| ParseError::InvalidNumber {
                text: text.clone(),
                at: start,
            })?;
            TokenKind::Int(value)
        };

        Ok(Token { kind, at: start })
    }

    // Single-quoted SQL string; a doubled quote is a literal quote.
    fn scan_text(&mut self, start: usize) -> Result<Token, ParseError> {
        self.advance();
        let mut value = String::new();

        loop {
            match self.peek_char() {
                None => return Err(ParseError::UnterminatedString { at: start }),
                Some('\'') => {
                    self.advance();
                    if self.eat('\'') {
                        value.push('\'');
                    } else {
                        break;
                    }
                }
                Some(ch) => {
                    value.push(ch);
                    self.advance();
                }
            }
        }

        Ok(Token {
            kind: TokenKind::Text(value),
            at: start,
        })
    }

    // Double-quoted identifier; a doubled quote is a literal quote.
    fn scan_quoted_ident(&mut self, start: usize) -> Result<Token, ParseError> {
        self.advance();
        let mut name = String::new();

        loop {
            match self.peek_char() {
                None => return Err(ParseError::UnterminatedIdent { at: start }),
                Some('"') => {
                    self.advance();
                    if self.eat('"') {
                        name.push('"');
                    } else {
                        break;
                    }
                }
                Some(ch) => {
                    name.push(ch);
                    self.advance();
                }
            }
        }

        Ok(Token {
            kind: TokenKind::Ident(name),
            at: start,
        })
    }

    // ------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn consume_digits(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, ch)| ch)
    }

    fn advance(&mut self) {
        if let Some((at, ch)) = self.chars.next() {
            self.position = at + ch.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.advance();
            return true;
        }

        false
    }

    fn symbol(&mut self, kind: TokenKind, at: usize) -> Token {
        self.advance();

        Token { kind, at }
    }
}
