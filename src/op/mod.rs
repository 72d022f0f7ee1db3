//! Expression operators
//!
//! An [`Operator`] is a node of an expression tree: a constant, a reference to
//! a feature column, or a function applied to one or two operands. Operators
//! own their operands, so an operator is also the tree rooted at it.

pub mod diff;
pub mod function;
pub mod parse;
pub mod simplify;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use function::{protected_div, BinaryFunction, Function, UnaryFunction, PROTECTION_THRESHOLD};
pub use parse::parse_functions;

/// A node in an expression tree
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Operator {
    /// Constant leaf
    Constant(f64),
    /// Feature column leaf
    Variable(usize),
    /// Function of one operand
    Unary(UnaryFunction, Box<Operator>),
    /// Function of two operands
    Binary(BinaryFunction, Box<Operator>, Box<Operator>),
}

impl Operator {
    /// Create a unary function node
    pub fn unary(function: UnaryFunction, operand: Operator) -> Self {
        Self::Unary(function, Box::new(operand))
    }

    /// Create a binary function node
    pub fn binary(function: BinaryFunction, left: Operator, right: Operator) -> Self {
        Self::Binary(function, Box::new(left), Box::new(right))
    }

    /// Instantiate a function template with the given operands.
    ///
    /// Returns `None` when the number of operands does not match the arity.
    pub fn from_function(function: Function, operands: Vec<Operator>) -> Option<Self> {
        let mut operands = operands.into_iter();
        let op = match function {
            Function::Unary(f) => Self::unary(f, operands.next()?),
            Function::Binary(f) => {
                let left = operands.next()?;
                Self::binary(f, left, operands.next()?)
            }
        };
        if operands.next().is_some() {
            return None;
        }
        Some(op)
    }

    /// Check if this is a leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Constant(_) | Self::Variable(_))
    }

    /// Check if this is a constant leaf
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }

    /// The function template of a function node
    pub fn function(&self) -> Option<Function> {
        match self {
            Self::Unary(f, _) => Some(Function::Unary(*f)),
            Self::Binary(f, _, _) => Some(Function::Binary(*f)),
            _ => None,
        }
    }

    /// Number of operand slots
    pub fn arity(&self) -> usize {
        match self {
            Self::Constant(_) | Self::Variable(_) => 0,
            Self::Unary(_, _) => 1,
            Self::Binary(_, _, _) => 2,
        }
    }

    /// Operand `i`, or `None` when `i >= arity()`
    pub fn operand(&self, i: usize) -> Option<&Operator> {
        match (self, i) {
            (Self::Unary(_, a), 0) | (Self::Binary(_, a, _), 0) => Some(&**a),
            (Self::Binary(_, _, b), 1) => Some(&**b),
            _ => None,
        }
    }

    /// Mutable operand `i`, or `None` when `i >= arity()`
    pub fn operand_mut(&mut self, i: usize) -> Option<&mut Operator> {
        match (self, i) {
            (Self::Unary(_, a), 0) | (Self::Binary(_, a, _), 0) => Some(&mut **a),
            (Self::Binary(_, _, b), 1) => Some(&mut **b),
            _ => None,
        }
    }

    /// Replace operand `i`; out of range indices leave the receiver unchanged
    pub fn set_operand(mut self, i: usize, operand: Operator) -> Self {
        if let Some(slot) = self.operand_mut(i) {
            *slot = operand;
        }
        self
    }

    /// Evaluate over feature columns, one output per row.
    ///
    /// `columns[j][r]` is the value of feature `j` on row `r`. A variable that
    /// refers to a missing column evaluates to zeros.
    pub fn eval(&self, columns: &[Vec<f64>]) -> Vec<f64> {
        let n_rows = columns.first().map_or(0, Vec::len);
        self.eval_rows(columns, n_rows)
    }

    /// Evaluate over feature columns with an explicit row count, for inputs
    /// that have no feature columns at all
    pub fn eval_rows(&self, columns: &[Vec<f64>], n_rows: usize) -> Vec<f64> {
        match self {
            Self::Constant(c) => vec![*c; n_rows],
            Self::Variable(i) => columns
                .get(*i)
                .cloned()
                .unwrap_or_else(|| vec![0.0; n_rows]),
            Self::Unary(f, a) => {
                let mut x = a.eval_rows(columns, n_rows);
                for xi in x.iter_mut() {
                    *xi = f.apply(*xi);
                }
                x
            }
            Self::Binary(f, a, b) => {
                let mut x = a.eval_rows(columns, n_rows);
                let y = b.eval_rows(columns, n_rows);
                for (xi, yi) in x.iter_mut().zip(y) {
                    *xi = f.apply(*xi, yi);
                }
                x
            }
        }
    }

    /// Evaluate on a single row of feature values
    pub fn eval_row(&self, row: &[f64]) -> f64 {
        match self {
            Self::Constant(c) => *c,
            Self::Variable(i) => row.get(*i).copied().unwrap_or(0.0),
            Self::Unary(f, a) => f.apply(a.eval_row(row)),
            Self::Binary(f, a, b) => f.apply(a.eval_row(row), b.eval_row(row)),
        }
    }

    /// Render with feature names in place of `x<i>`
    pub fn display_with_names<'a>(&'a self, names: &'a [String]) -> NamedOperator<'a> {
        NamedOperator { op: self, names }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, names: &[String]) -> fmt::Result {
        match self {
            Self::Constant(c) => write!(f, "{}", c),
            Self::Variable(i) => match names.get(*i) {
                Some(name) => f.write_str(name),
                None => write!(f, "x{}", i),
            },
            Self::Unary(func, a) => {
                write!(f, "{}(", func.name())?;
                a.render(f, names)?;
                f.write_str(")")
            }
            Self::Binary(func, a, b) => match func.symbol() {
                Some(symbol) => {
                    f.write_str("(")?;
                    a.render(f, names)?;
                    write!(f, " {} ", symbol)?;
                    b.render(f, names)?;
                    f.write_str(")")
                }
                None => {
                    write!(f, "{}(", func.name())?;
                    a.render(f, names)?;
                    f.write_str(", ")?;
                    b.render(f, names)?;
                    f.write_str(")")
                }
            },
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, &[])
    }
}

/// Display adapter returned by [`Operator::display_with_names`]
#[derive(Debug, Clone, Copy)]
pub struct NamedOperator<'a> {
    op: &'a Operator,
    names: &'a [String],
}

impl fmt::Display for NamedOperator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.op.render(f, self.names)
    }
}

pub mod prelude {
    pub use super::function::{BinaryFunction, Function, UnaryFunction};
    pub use super::parse::parse_functions;
    pub use super::Operator;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x(i: usize) -> Operator {
        Operator::Variable(i)
    }

    fn c(v: f64) -> Operator {
        Operator::Constant(v)
    }

    #[test]
    fn test_arity_and_operands() {
        let leaf = c(1.0);
        assert_eq!(leaf.arity(), 0);
        assert!(leaf.operand(0).is_none());

        let cos = Operator::unary(UnaryFunction::Cos, x(0));
        assert_eq!(cos.arity(), 1);
        assert_eq!(cos.operand(0), Some(&x(0)));
        assert!(cos.operand(1).is_none());

        let sum = Operator::binary(BinaryFunction::Sum, x(0), c(2.0));
        assert_eq!(sum.arity(), 2);
        assert_eq!(sum.operand(1), Some(&c(2.0)));
        assert!(sum.operand(2).is_none());
    }

    #[test]
    fn test_set_operand_out_of_range_is_noop() {
        let cos = Operator::unary(UnaryFunction::Cos, x(0));
        let same = cos.clone().set_operand(1, c(5.0));
        assert_eq!(same, cos);

        let leaf = c(3.0).set_operand(0, x(1));
        assert_eq!(leaf, c(3.0));

        let replaced = cos.set_operand(0, x(2));
        assert_eq!(replaced, Operator::unary(UnaryFunction::Cos, x(2)));
    }

    #[test]
    fn test_from_function_checks_arity() {
        let sum = Function::Binary(BinaryFunction::Sum);
        assert!(Operator::from_function(sum, vec![x(0)]).is_none());
        assert!(Operator::from_function(sum, vec![x(0), x(1), x(2)]).is_none());
        assert_eq!(
            Operator::from_function(sum, vec![x(0), x(1)]),
            Some(Operator::binary(BinaryFunction::Sum, x(0), x(1)))
        );
    }

    #[test]
    fn test_eval_columns() {
        // (x0 * 2) + x1
        let op = Operator::binary(
            BinaryFunction::Sum,
            Operator::binary(BinaryFunction::Product, x(0), c(2.0)),
            x(1),
        );
        let columns = vec![vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 30.0]];
        assert_eq!(op.eval(&columns), vec![12.0, 24.0, 36.0]);
    }

    #[test]
    fn test_eval_constant_broadcasts() {
        let columns = vec![vec![1.0, 2.0]];
        assert_eq!(c(7.0).eval(&columns), vec![7.0, 7.0]);
    }

    #[test]
    fn test_eval_row_matches_eval() {
        let op = Operator::binary(
            BinaryFunction::Division,
            Operator::unary(UnaryFunction::Sin, x(0)),
            x(1),
        );
        let columns = vec![vec![0.5, 1.5], vec![2.0, 0.0]];
        let batch = op.eval(&columns);
        assert_eq!(op.eval_row(&[0.5, 2.0]), batch[0]);
        assert_eq!(op.eval_row(&[1.5, 0.0]), batch[1]);
        assert_eq!(batch[1], 1.0);
    }

    #[test]
    fn test_display() {
        let op = Operator::binary(
            BinaryFunction::Max,
            Operator::binary(BinaryFunction::Sum, x(0), c(-1.5)),
            Operator::unary(UnaryFunction::Inverse, x(1)),
        );
        assert_eq!(op.to_string(), "max((x0 + -1.5), inv(x1))");
    }

    #[test]
    fn test_display_with_names() {
        let op = Operator::binary(BinaryFunction::Product, x(0), x(1));
        let names = vec!["age".to_string()];
        assert_eq!(op.display_with_names(&names).to_string(), "(age * x1)");
    }
}
