//! Reading operators back from their textual form
//!
//! The grammar accepted is the one produced by `Display`:
//!
//! ```text
//! expr   := number | var | call | infix
//! var    := "x" digits
//! call   := name "(" expr ("," expr)* ")"
//! infix  := "(" expr symbol expr ")"
//! symbol := "+" | "-" | "*" | "/" | "^"
//! ```
//!
//! Names and symbols are resolved through the function registry, so any
//! registered name may be used as a call, e.g. `sum(x0, 1)`.

use std::str::FromStr;

use super::{Function, Operator};
use crate::error::ParseError;

impl FromStr for Operator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(s);
        let op = parser.expr()?;
        parser.skip_whitespace();
        if parser.pos < parser.src.len() {
            return Err(ParseError::TrailingInput(parser.pos));
        }
        Ok(op)
    }
}

/// Parse a comma separated list of registry names such as `"sum,sub,mul,div"`.
/// Blank entries are skipped.
pub fn parse_functions(list: &str) -> Result<Vec<Function>, ParseError> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            Function::from_name(name).ok_or_else(|| ParseError::UnknownOperator(name.to_string()))
        })
        .collect()
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            src: s.as_bytes(),
            pos: 0,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_whitespace();
        self.src.get(self.pos).copied()
    }

    fn unexpected(&self) -> ParseError {
        match self.src.get(self.pos) {
            Some(&b) => ParseError::UnexpectedChar {
                position: self.pos,
                found: b as char,
            },
            None => ParseError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), ParseError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expr(&mut self) -> Result<Operator, ParseError> {
        match self.peek() {
            None => Err(ParseError::UnexpectedEnd),
            Some(b'(') => self.infix(),
            Some(b) if b == b'-' || b == b'.' || b.is_ascii_digit() => self.number(),
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => self.named(),
            Some(_) => Err(self.unexpected()),
        }
    }

    fn infix(&mut self) -> Result<Operator, ParseError> {
        self.expect(b'(')?;
        let left = self.expr()?;
        // a bare parenthesised expression is accepted as grouping
        if self.peek() == Some(b')') {
            self.pos += 1;
            return Ok(left);
        }
        let start = self.pos;
        let symbol = match self.peek() {
            Some(b @ (b'+' | b'-' | b'*' | b'/' | b'^')) => b as char,
            _ => return Err(self.unexpected()),
        };
        self.pos += 1;
        let function = Function::from_name(&symbol.to_string())
            .ok_or_else(|| ParseError::UnexpectedChar {
                position: start,
                found: symbol,
            })?;
        let right = self.expr()?;
        self.expect(b')')?;
        build(function, vec![left, right])
    }

    fn named(&mut self) -> Result<Operator, ParseError> {
        let start = self.pos;
        while self.pos < self.src.len()
            && (self.src[self.pos].is_ascii_alphanumeric() || self.src[self.pos] == b'_')
        {
            self.pos += 1;
        }
        let name = self.text(start);

        match name {
            "NaN" => return Ok(Operator::Constant(f64::NAN)),
            "inf" => return Ok(Operator::Constant(f64::INFINITY)),
            _ => {}
        }

        if self.peek() == Some(b'(') {
            self.pos += 1;
            let function = Function::from_name(name)
                .ok_or_else(|| ParseError::UnknownOperator(name.to_string()))?;
            let mut operands = vec![self.expr()?];
            while self.peek() == Some(b',') {
                self.pos += 1;
                operands.push(self.expr()?);
            }
            self.expect(b')')?;
            return build(function, operands);
        }

        match name.strip_prefix('x').map(str::parse::<usize>) {
            Some(Ok(index)) => Ok(Operator::Variable(index)),
            _ => Err(ParseError::UnknownOperator(name.to_string())),
        }
    }

    fn number(&mut self) -> Result<Operator, ParseError> {
        let start = self.pos;
        if self.src[self.pos] == b'-' {
            self.pos += 1;
            if self.src[self.pos..].starts_with(b"inf") {
                self.pos += 3;
                return Ok(Operator::Constant(f64::NEG_INFINITY));
            }
        }
        while let Some(&b) = self.src.get(self.pos) {
            let exponent_sign = (b == b'-' || b == b'+')
                && matches!(self.src.get(self.pos - 1), Some(b'e' | b'E'));
            if b.is_ascii_digit() || b == b'.' || b == b'e' || b == b'E' || exponent_sign {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = self.text(start);
        text.parse::<f64>()
            .map(Operator::Constant)
            .map_err(|_| ParseError::InvalidNumber(text.to_string()))
    }

    fn text(&self, start: usize) -> &'a str {
        // only ASCII bytes are consumed, so the slice is on char boundaries
        std::str::from_utf8(&self.src[start..self.pos]).unwrap_or_default()
    }
}

fn build(function: Function, operands: Vec<Operator>) -> Result<Operator, ParseError> {
    let actual = operands.len();
    Operator::from_function(function, operands).ok_or_else(|| ParseError::ArityMismatch {
        name: function.name().to_string(),
        expected: function.arity(),
        actual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::{BinaryFunction, UnaryFunction};

    fn x(i: usize) -> Operator {
        Operator::Variable(i)
    }

    fn c(v: f64) -> Operator {
        Operator::Constant(v)
    }

    #[test]
    fn test_parse_leaves() {
        assert_eq!("x3".parse::<Operator>(), Ok(x(3)));
        assert_eq!("-1.5".parse::<Operator>(), Ok(c(-1.5)));
        assert_eq!("2e-3".parse::<Operator>(), Ok(c(0.002)));
        assert_eq!("-inf".parse::<Operator>(), Ok(c(f64::NEG_INFINITY)));
    }

    #[test]
    fn test_parse_display_form() {
        let op = Operator::binary(
            BinaryFunction::Max,
            Operator::binary(BinaryFunction::Difference, x(0), c(-1.5)),
            Operator::unary(UnaryFunction::Inverse, x(1)),
        );
        let text = op.to_string();
        assert_eq!(text, "max((x0 - -1.5), inv(x1))");
        assert_eq!(text.parse::<Operator>(), Ok(op));
    }

    #[test]
    fn test_parse_call_with_symbol_name() {
        let parsed: Operator = "sum(x0, pow(x1, 2))".parse().unwrap();
        assert_eq!(
            parsed,
            Operator::binary(
                BinaryFunction::Sum,
                x(0),
                Operator::binary(BinaryFunction::Power, x(1), c(2.0))
            )
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Operator>(), Err(ParseError::UnexpectedEnd));
        assert_eq!(
            "tan(x0)".parse::<Operator>(),
            Err(ParseError::UnknownOperator("tan".to_string()))
        );
        assert_eq!(
            "cos(x0, x1)".parse::<Operator>(),
            Err(ParseError::ArityMismatch {
                name: "cos".to_string(),
                expected: 1,
                actual: 2
            })
        );
        assert_eq!("x0 x1".parse::<Operator>(), Err(ParseError::TrailingInput(3)));
        assert!(matches!(
            "(x0 % x1)".parse::<Operator>(),
            Err(ParseError::UnexpectedChar { found: '%', .. })
        ));
        assert!(matches!("(x0 + x1".parse::<Operator>(), Err(ParseError::UnexpectedEnd)));
    }

    #[test]
    fn test_parse_functions() {
        let functions = parse_functions("sum, sub,mul,div").unwrap();
        assert_eq!(functions.len(), 4);
        assert_eq!(functions[1], Function::Binary(BinaryFunction::Difference));

        assert_eq!(
            parse_functions("sum,tan"),
            Err(ParseError::UnknownOperator("tan".to_string()))
        );
        assert!(parse_functions(" ").unwrap().is_empty());
    }
}
