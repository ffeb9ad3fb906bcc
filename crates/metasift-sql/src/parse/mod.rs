mod lex;


use lex::{Keyword, Token, TokenKind, lex};
use metasift_core::{
    error::InvalidExpression,
    filter::{Filter, SetOp, key},
    value::Scalar,
};
use thiserror::Error as ThisError;

///
/// ParseError
///
/// Anything that stops a WHERE clause from becoming a filter tree: lexical
/// garbage, grammar violations, and filters the builder itself rejects.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ParseError {
    #[error("unexpected character '{found}' at byte {at}")]
    UnexpectedChar { found: char, at: usize },

    #[error("unterminated string literal starting at byte {at}")]
    UnterminatedString { at: usize },

    #[error("unterminated quoted identifier starting at byte {at}")]
    UnterminatedIdent { at: usize },

    #[error("number \"{text}\" at byte {at} does not fit a filter literal")]
    InvalidNumber { text: String, at: usize },

    #[error("expected {expected} at byte {at}")]
    Expected { expected: &'static str, at: usize },

    #[error("unexpected trailing input at byte {at}")]
    TrailingInput { at: usize },

    #[error("statement has no WHERE clause")]
    MissingWhere,

    #[error(transparent)]
    Invalid(#[from] InvalidExpression),
}

/// Parse a bare boolean expression, e.g. `year = 2024 AND genre = 'war'`.
/// `AND` binds tighter than `OR`; repeated connectives fold to the left.
pub fn parse_where(input: &str) -> Result<Filter, ParseError> {
    let tokens = lex(input)?;
    let mut parser = Parser::new(&tokens, 0);
    let filter = parser.expression()?;
    parser.finish()?;

    Ok(filter)
}

/// Parse a filter out of a whole statement, tolerating the shapes language
/// models produce: a full `SELECT ... WHERE ...`, a clause starting at
/// `WHERE`, or a bare expression. Anything from `ORDER BY`, `GROUP BY`,
/// `LIMIT` or `;` onward is ignored.
pub fn parse_filter(input: &str) -> Result<Filter, ParseError> {
    let tokens = lex(input)?;

    let start = match where_position(&tokens) {
        Some(index) => index + 1,
        None if starts_with(&tokens, Keyword::Select) => return Err(ParseError::MissingWhere),
        None => 0,
    };

    let mut parser = Parser::new(&tokens, start);
    let filter = parser.expression()?;
    parser.finish_statement()?;

    Ok(filter)
}

/// Slice the WHERE clause out of a statement, without the keyword and
/// without any `ORDER BY`/`GROUP BY`/`LIMIT`/`;` tail. `None` when the
/// statement does not lex or has no non-empty WHERE clause.
#[must_use]
pub fn extract_where_clause(input: &str) -> Option<&str> {
    let tokens = lex(input).ok()?;
    let where_index = where_position(&tokens)?;

    let rest = &tokens[where_index + 1..];
    let start = rest.first()?.at;
    let end = rest
        .iter()
        .find(|token| is_clause_end(&token.kind))
        .map_or(input.len(), |token| token.at);

    let clause = input[start..end].trim();
    (!clause.is_empty()).then_some(clause)
}

fn where_position(tokens: &[Token]) -> Option<usize> {
    tokens
        .iter()
        .position(|token| token.kind == TokenKind::Keyword(Keyword::Where))
}

fn starts_with(tokens: &[Token], kw: Keyword) -> bool {
    tokens
        .first()
        .is_some_and(|token| token.kind == TokenKind::Keyword(kw))
}

fn is_clause_end(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Semicolon
            | TokenKind::Eof
            | TokenKind::Keyword(Keyword::Order | Keyword::Group | Keyword::Limit)
    )
}

///
/// Parser
///
/// Recursive descent over the token stream. Grammar, loosest binding
/// first: `or := and (OR and)*`, `and := unary (AND unary)*`,
/// `unary := NOT unary | primary`, `primary := '(' or ')' | comparison`.
///

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token], pos: usize) -> Self {
        Self { tokens, pos }
    }

    fn expression(&mut self) -> Result<Filter, ParseError> {
        let mut left = self.and_expression()?;
        while self.eat_keyword(Keyword::Or) {
            let right = self.and_expression()?;
            left = left.or(right);
        }

        Ok(left)
    }

    fn and_expression(&mut self) -> Result<Filter, ParseError> {
        let mut left = self.unary()?;
        while self.eat_keyword(Keyword::And) {
            let right = self.unary()?;
            left = left.and(right);
        }

        Ok(left)
    }

    fn unary(&mut self) -> Result<Filter, ParseError> {
        if self.eat_keyword(Keyword::Not) {
            return Ok(!self.unary()?);
        }

        self.primary()
    }

    fn primary(&mut self) -> Result<Filter, ParseError> {
        if self.eat_kind(&TokenKind::LParen) {
            let inner = self.expression()?;
            self.expect_kind(&TokenKind::RParen, "closing parenthesis")?;
            return Ok(inner);
        }

        self.comparison()
    }

    fn comparison(&mut self) -> Result<Filter, ParseError> {
        let name = self.identifier()?;

        let token = self.advance();
        let filter = match &token.kind {
            TokenKind::Eq => key(name).eq(self.literal()?)?,
            TokenKind::Ne => key(name).ne(self.literal()?)?,
            TokenKind::Gt => key(name).gt(self.literal()?)?,
            TokenKind::Gte => key(name).gte(self.literal()?)?,
            TokenKind::Lt => key(name).lt(self.literal()?)?,
            TokenKind::Lte => key(name).lte(self.literal()?)?,
            TokenKind::Keyword(Keyword::In) => self.member_list(name, SetOp::In)?,
            TokenKind::Keyword(Keyword::Not) => {
                let at = self.peek().at;
                if self.eat_keyword(Keyword::In) {
                    self.member_list(name, SetOp::NotIn)?
                } else {
                    return Err(ParseError::Expected {
                        expected: "IN after NOT",
                        at,
                    });
                }
            }
            TokenKind::Keyword(Keyword::Between) => self.between(name)?,
            _ => {
                return Err(ParseError::Expected {
                    expected: "comparison operator",
                    at: token.at,
                });
            }
        };

        Ok(filter)
    }

    // `k BETWEEN lo AND hi` desugars to `k >= lo AND k <= hi`; the inner
    // AND belongs to BETWEEN, not to the boolean connective.
    fn between(&mut self, name: String) -> Result<Filter, ParseError> {
        let low = self.literal()?;
        let at = self.peek().at;
        if !self.eat_keyword(Keyword::And) {
            return Err(ParseError::Expected {
                expected: "AND between the BETWEEN bounds",
                at,
            });
        }
        let high = self.literal()?;

        let lower = key(name.clone()).gte(low)?;
        let upper = key(name).lte(high)?;

        Ok(lower.and(upper))
    }

    fn member_list(&mut self, name: String, op: SetOp) -> Result<Filter, ParseError> {
        self.expect_kind(&TokenKind::LParen, "opening parenthesis")?;
        let mut members = vec![self.literal()?];
        while self.eat_kind(&TokenKind::Comma) {
            members.push(self.literal()?);
        }
        self.expect_kind(&TokenKind::RParen, "closing parenthesis")?;

        let built = match op {
            SetOp::In => key(name).is_in(members),
            SetOp::NotIn => key(name).not_in(members),
        };

        Ok(built?)
    }

    fn identifier(&mut self) -> Result<String, ParseError> {
        let token = self.advance();
        match &token.kind {
            TokenKind::Ident(name) => Ok(name.clone()),
            _ => Err(ParseError::Expected {
                expected: "identifier",
                at: token.at,
            }),
        }
    }

    // Integers parse as Int64 and decimals as Float64, matching how the
    // evaluator widens numerics anyway.
    fn literal(&mut self) -> Result<Scalar, ParseError> {
        let token = self.advance();
        match &token.kind {
            TokenKind::Int(v) => Ok(Scalar::Int64(*v)),
            TokenKind::Float(v) => Ok(Scalar::Float64(*v)),
            TokenKind::Text(s) => Ok(Scalar::Text(s.clone())),
            TokenKind::Keyword(Keyword::True) => Ok(Scalar::Bool(true)),
            TokenKind::Keyword(Keyword::False) => Ok(Scalar::Bool(false)),
            _ => Err(ParseError::Expected {
                expected: "literal value",
                at: token.at,
            }),
        }
    }

    // ------------------------------------------------------------------
    // Terminators
    // ------------------------------------------------------------------

    fn finish(&mut self) -> Result<(), ParseError> {
        self.eat_kind(&TokenKind::Semicolon);

        let token = self.peek();
        if token.kind == TokenKind::Eof {
            Ok(())
        } else {
            Err(ParseError::TrailingInput { at: token.at })
        }
    }

    fn finish_statement(&mut self) -> Result<(), ParseError> {
        let token = self.peek();
        if is_clause_end(&token.kind) {
            Ok(())
        } else {
            Err(ParseError::TrailingInput { at: token.at })
        }
    }

    // ------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------

    fn peek(&self) -> &'t Token {
        // The token stream always ends with Eof, which is never consumed.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> &'t Token {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }

        token
    }

    fn eat_kind(&mut self, kind: &TokenKind) -> bool {
        if self.peek().kind == *kind {
            self.advance();
            return true;
        }

        false
    }

    fn eat_keyword(&mut self, kw: Keyword) -> bool {
        self.eat_kind(&TokenKind::Keyword(kw))
    }

    fn expect_kind(&mut self, kind: &TokenKind, expected: &'static str) -> Result<(), ParseError> {
        if self.eat_kind(kind) {
            Ok(())
        } else {
            Err(ParseError::Expected {
                expected,
                at: self.peek().at,
            })
        }
    }
}
