//! Symbolic differentiation
//!
//! [`Operator::diff`] builds the derivative tree with respect to one feature
//! column by the chain rule. The result is not simplified; call
//! [`Operator::simplify`] on it for a compact form.

use super::{BinaryFunction, Operator, UnaryFunction};

use BinaryFunction::{Difference, Division, Power, Product, Sum};

fn c(v: f64) -> Operator {
    Operator::Constant(v)
}

fn bin(f: BinaryFunction, a: Operator, b: Operator) -> Operator {
    Operator::binary(f, a, b)
}

impl Operator {
    /// Derivative with respect to feature column `i`
    pub fn diff(&self, i: usize) -> Operator {
        match self {
            Self::Constant(_) => c(0.0),
            Self::Variable(j) => c(if *j == i { 1.0 } else { 0.0 }),
            Self::Unary(f, u) => diff_unary(*f, u, i),
            Self::Binary(f, u, v) => diff_binary(*f, u, v, i),
        }
    }
}

fn diff_unary(f: UnaryFunction, u: &Operator, i: usize) -> Operator {
    let du = u.diff(i);
    let u = u.clone();
    match f {
        UnaryFunction::Cos => bin(
            Product,
            bin(Product, c(-1.0), Operator::unary(UnaryFunction::Sin, u)),
            du,
        ),
        UnaryFunction::Sin => bin(Product, Operator::unary(UnaryFunction::Cos, u), du),
        UnaryFunction::Log => bin(Division, du, u),
        UnaryFunction::Exp => bin(Product, Operator::unary(UnaryFunction::Exp, u), du),
        UnaryFunction::Inverse => bin(
            Division,
            bin(Product, c(-1.0), du),
            bin(Product, u.clone(), u),
        ),
    }
}

fn diff_binary(f: BinaryFunction, u: &Operator, v: &Operator, i: usize) -> Operator {
    let du = u.diff(i);
    let dv = v.diff(i);
    match f {
        Sum => bin(Sum, du, dv),
        Difference => bin(Difference, du, dv),
        Product => bin(
            Sum,
            bin(Product, du, v.clone()),
            bin(Product, u.clone(), dv),
        ),
        Division => bin(
            Division,
            bin(
                Difference,
                bin(Product, du, v.clone()),
                bin(Product, u.clone(), dv),
            ),
            bin(Product, v.clone(), v.clone()),
        ),
        Power => match v {
            // c * u^(c - 1) * u'
            Operator::Constant(k) => bin(
                Product,
                bin(Product, c(*k), bin(Power, u.clone(), c(k - 1.0))),
                du,
            ),
            // u^v * (v' * log(u) + v * u' / u)
            _ => bin(
                Product,
                bin(Power, u.clone(), v.clone()),
                bin(
                    Sum,
                    bin(Product, dv, Operator::unary(UnaryFunction::Log, u.clone())),
                    bin(Division, bin(Product, v.clone(), du), u.clone()),
                ),
            ),
        },
        BinaryFunction::Max | BinaryFunction::Min => {
            // (u' + v' ± s * (u' - v')) / 2 with s = sign(u - v)
            let gap = bin(Difference, u.clone(), v.clone());
            let sign = bin(
                Division,
                gap.clone(),
                bin(Power, bin(Product, gap.clone(), gap), c(0.5)),
            );
            let spread = bin(Product, sign, bin(Difference, du.clone(), dv.clone()));
            let combine = if f == BinaryFunction::Max { Sum } else { Difference };
            bin(Division, bin(combine, bin(Sum, du, dv), spread), c(2.0))
        }
    }
}
