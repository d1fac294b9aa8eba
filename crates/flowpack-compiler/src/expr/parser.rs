//! Precedence-climbing parser for property expressions.

use std::ops::Range;

use logos::Logos;

use flowpack_format::Operation;

use super::lexer::Token;
use crate::constant_pool::FlowValue;

#[derive(Debug, Clone, PartialEq)]
pub struct Expr<'src> {
    pub kind: ExprKind<'src>,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind<'src> {
    Literal(FlowValue),
    Ident(&'src str),
    Unary(Operation, Box<Expr<'src>>),
    Binary(Operation, Box<Expr<'src>>, Box<Expr<'src>>),
    Conditional(Box<Expr<'src>>, Box<Expr<'src>>, Box<Expr<'src>>),
}

impl Expr<'_> {
    /// Value of a literal, folding a leading sign on numbers.
    pub fn literal(&self) -> Option<FlowValue> {
        match &self.kind {
            ExprKind::Literal(value) => Some(value.clone()),
            ExprKind::Unary(Operation::UnaryMinus, inner) => match inner.literal()? {
                FlowValue::Integer(v) => Some(FlowValue::Integer(v.checked_neg()?)),
                FlowValue::Double(v) => Some(FlowValue::Double(-v)),
                _ => None,
            },
            ExprKind::Unary(Operation::UnaryPlus, inner) => match inner.literal()? {
                value @ (FlowValue::Integer(_) | FlowValue::Double(_)) => Some(value),
                _ => None,
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: Range<usize>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {:?}", self.message, self.span)
    }
}

impl std::error::Error for ParseError {}

/// Parse a complete expression; trailing tokens are an error.
pub fn parse(input: &str) -> Result<Expr<'_>, ParseError> {
    let mut parser = Parser::new(input)?;
    let expr = parser.parse_expression()?;
    if let Some(token) = parser.peek() {
        return Err(ParseError {
            message: format!("unexpected {token:?}"),
            span: parser.current_span(),
        });
    }
    Ok(expr)
}

struct Parser<'src> {
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    input: &'src str,
}

impl<'src> Parser<'src> {
    fn new(input: &'src str) -> Result<Self, ParseError> {
        let lexer = Token::lexer(input);
        let mut tokens = Vec::new();

        for (result, span) in lexer.spanned() {
            match result {
                Ok(token) => tokens.push((token, span)),
                Err(_) => {
                    return Err(ParseError {
                        message: format!("unexpected character: {:?}", &input[span.clone()]),
                        span,
                    });
                }
            }
        }

        Ok(Self {
            tokens,
            pos: 0,
            input,
        })
    }

    fn peek(&self) -> Option<&Token<'src>> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn advance(&mut self) -> Option<Token<'src>> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn current_span(&self) -> Range<usize> {
        self.tokens
            .get(self.pos)
            .map(|(_, s)| s.clone())
            .unwrap_or(self.input.len()..self.input.len())
    }

    fn previous_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(0, |(_, s)| s.end)
    }

    fn expect(&mut self, expected: Token<'src>) -> Result<(), ParseError> {
        let span = self.current_span();
        match self.advance() {
            Some(t) if std::mem::discriminant(&t) == std::mem::discriminant(&expected) => Ok(()),
            Some(t) => Err(ParseError {
                message: format!("expected {:?}, got {:?}", expected, t),
                span,
            }),
            None => Err(ParseError {
                message: format!("expected {:?}, got end of input", expected),
                span,
            }),
        }
    }

    fn parse_expression(&mut self) -> Result<Expr<'src>, ParseError> {
        let condition = self.parse_binary(1)?;
        if self.peek() != Some(&Token::Question) {
            return Ok(condition);
        }
        self.advance();
        let then = self.parse_expression()?;
        self.expect(Token::Colon)?;
        let otherwise = self.parse_expression()?;
        let span = condition.span.start..otherwise.span.end;
        Ok(Expr {
            kind: ExprKind::Conditional(Box::new(condition), Box::new(then), Box::new(otherwise)),
            span,
        })
    }

    fn parse_binary(&mut self, min_precedence: u8) -> Result<Expr<'src>, ParseError> {
        let mut lhs = self.parse_unary()?;
        while let Some(token) = self.peek() {
            let Some(precedence) = token.binary_precedence() else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            let operation = token
                .operator()
                .and_then(Operation::binary)
                .ok_or_else(|| ParseError {
                    message: format!("unsupported operator {token:?}"),
                    span: self.current_span(),
                })?;
            self.advance();
            let rhs = self.parse_binary(precedence + 1)?;
            let span = lhs.span.start..rhs.span.end;
            lhs = Expr {
                kind: ExprKind::Binary(operation, Box::new(lhs), Box::new(rhs)),
                span,
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr<'src>, ParseError> {
        let start = self.current_span().start;
        let operation = match self.peek() {
            Some(token @ (Token::Plus | Token::Minus | Token::Bang | Token::Tilde)) => {
                token.operator().and_then(Operation::unary)
            }
            _ => None,
        };
        let Some(operation) = operation else {
            return self.parse_primary();
        };
        self.advance();
        let operand = self.parse_unary()?;
        let span = start..operand.span.end;
        Ok(Expr {
            kind: ExprKind::Unary(operation, Box::new(operand)),
            span,
        })
    }

    fn parse_primary(&mut self) -> Result<Expr<'src>, ParseError> {
        let span = self.current_span();

        match self.advance() {
            Some(Token::True) => literal(FlowValue::Boolean(true), span),
            Some(Token::False) => literal(FlowValue::Boolean(false), span),
            Some(Token::Null) => literal(FlowValue::Null, span),
            Some(Token::Undefined) => literal(FlowValue::Undefined, span),
            Some(Token::Integer(text)) => match text.parse::<i64>() {
                Ok(v) => literal(FlowValue::Integer(v), span),
                Err(_) => Err(ParseError {
                    message: "integer literal out of range".to_string(),
                    span,
                }),
            },
            Some(Token::HexInteger(text)) => match i64::from_str_radix(&text[2..], 16) {
                Ok(v) => literal(FlowValue::Integer(v), span),
                Err(_) => Err(ParseError {
                    message: "integer literal out of range".to_string(),
                    span,
                }),
            },
            Some(Token::Float(text)) => match text.parse::<f64>() {
                Ok(v) => literal(FlowValue::Double(v), span),
                Err(_) => Err(ParseError {
                    message: "invalid number".to_string(),
                    span,
                }),
            },
            Some(Token::Str(text)) => literal(FlowValue::String(unescape(text)), span),
            Some(Token::Ident(name)) => Ok(Expr {
                kind: ExprKind::Ident(name),
                span,
            }),
            Some(Token::LParen) => {
                let mut inner = self.parse_expression()?;
                self.expect(Token::RParen)?;
                inner.span = span.start..self.previous_end();
                Ok(inner)
            }
            Some(token) => Err(ParseError {
                message: format!("expected expression, got {token:?}"),
                span,
            }),
            None => Err(ParseError {
                message: "expected expression, got end of input".to_string(),
                span,
            }),
        }
    }
}

fn literal(value: FlowValue, span: Range<usize>) -> Result<Expr<'static>, ParseError> {
    Ok(Expr {
        kind: ExprKind::Literal(value),
        span,
    })
}

/// Strip quotes and resolve backslash escapes.
fn unescape(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
