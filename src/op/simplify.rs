//! Local algebraic rewriting
//!
//! [`Operator::simplify`] rewrites a tree bottom-up in a single pass. Operands
//! are simplified first, then one local rule is tried at the node:
//!
//! - a function whose operands are all constants folds into a constant
//! - `inv(inv(x))` becomes `x`
//! - identity elements disappear: `x + 0`, `0 + x`, `x - 0`, `x * 1`,
//!   `1 * x`, `x / 1`, `x ^ 1`
//! - `x - x` becomes `0`, `max(x, x)` and `min(x, x)` become `x`
//!
//! Every rule returns either a constant, an already simplified operand, or
//! the node rebuilt from simplified operands that no rule matched, so a
//! second pass leaves the result unchanged.

use super::{BinaryFunction, Operator, UnaryFunction};

impl Operator {
    /// One bottom-up pass of local rewriting
    pub fn simplify(self) -> Operator {
        match self {
            Self::Constant(_) | Self::Variable(_) => self,
            Self::Unary(f, a) => simplify_unary(f, a.simplify()),
            Self::Binary(f, a, b) => simplify_binary(f, a.simplify(), b.simplify()),
        }
    }
}

fn simplify_unary(f: UnaryFunction, a: Operator) -> Operator {
    match (f, a) {
        (f, Operator::Constant(x)) => Operator::Constant(f.apply(x)),
        (UnaryFunction::Inverse, Operator::Unary(UnaryFunction::Inverse, inner)) => *inner,
        (f, a) => Operator::unary(f, a),
    }
}

fn simplify_binary(f: BinaryFunction, a: Operator, b: Operator) -> Operator {
    use BinaryFunction::*;

    match (f, a, b) {
        (f, Operator::Constant(x), Operator::Constant(y)) => Operator::Constant(f.apply(x, y)),
        (Sum, a, Operator::Constant(z)) | (Sum, Operator::Constant(z), a) if z == 0.0 => a,
        (Difference, a, Operator::Constant(z)) if z == 0.0 => a,
        (Product, a, Operator::Constant(u)) | (Product, Operator::Constant(u), a) if u == 1.0 => a,
        (Division, a, Operator::Constant(u)) if u == 1.0 => a,
        (Power, a, Operator::Constant(u)) if u == 1.0 => a,
        (Difference, a, b) if a == b => Operator::Constant(0.0),
        (Max | Min, a, b) if a == b => a,
        (f, a, b) => Operator::binary(f, a, b),
    }
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
    fn test_constant_folding() {
        let sum = Operator::binary(BinaryFunction::Sum, c(2.0), c(3.0));
        assert_eq!(sum.simplify(), c(5.0));

        let nested = Operator::unary(
            UnaryFunction::Cos,
            Operator::binary(BinaryFunction::Product, c(0.0), c(4.0)),
        );
        assert_eq!(nested.simplify(), c(1.0));
    }

    #[test]
    fn test_folding_uses_protected_division() {
        let div = Operator::binary(BinaryFunction::Division, c(5.0), c(0.0));
        assert_eq!(div.simplify(), c(1.0));

        let inv = Operator::unary(UnaryFunction::Inverse, c(0.0));
        assert_eq!(inv.simplify(), c(1.0));
    }

    #[test]
    fn test_double_inverse() {
        let expr = Operator::binary(BinaryFunction::Sum, x(0), x(1));
        let wrapped = Operator::unary(
            UnaryFunction::Inverse,
            Operator::unary(UnaryFunction::Inverse, expr.clone()),
        );
        assert_eq!(wrapped.simplify().to_string(), expr.simplify().to_string());
    }

    #[test]
    fn test_identity_elements() {
        let cases = vec![
            Operator::binary(BinaryFunction::Sum, x(0), c(0.0)),
            Operator::binary(BinaryFunction::Sum, c(0.0), x(0)),
            Operator::binary(BinaryFunction::Difference, x(0), c(0.0)),
            Operator::binary(BinaryFunction::Product, c(1.0), x(0)),
            Operator::binary(BinaryFunction::Division, x(0), c(1.0)),
            Operator::binary(BinaryFunction::Power, x(0), c(1.0)),
            Operator::binary(BinaryFunction::Max, x(0), x(0)),
        ];
        for case in cases {
            assert_eq!(case.simplify(), x(0));
        }
    }

    #[test]
    fn test_self_difference() {
        let expr = Operator::unary(UnaryFunction::Sin, x(2));
        let diff = Operator::binary(BinaryFunction::Difference, expr.clone(), expr);
        assert_eq!(diff.simplify(), c(0.0));
    }

    #[test]
    fn test_identity_folds_into_parent() {
        // (x0 * (2 - 1)) simplifies to x0
        let expr = Operator::binary(
            BinaryFunction::Product,
            x(0),
            Operator::binary(BinaryFunction::Difference, c(2.0), c(1.0)),
        );
        assert_eq!(expr.simplify(), x(0));
    }

    #[test]
    fn test_idempotent() {
        let expr = Operator::binary(
            BinaryFunction::Sum,
            Operator::unary(
                UnaryFunction::Inverse,
                Operator::unary(
                    UnaryFunction::Inverse,
                    Operator::binary(BinaryFunction::Product, x(0), c(1.0)),
                ),
            ),
            Operator::binary(BinaryFunction::Min, x(1), Operator::unary(UnaryFunction::Exp, c(0.0))),
        );
        let once = expr.simplify();
        let twice = once.clone().simplify();
        assert_eq!(once.to_string(), twice.to_string());
        assert_eq!(once.to_string(), "(x0 + min(x1, 1))");
    }
}
