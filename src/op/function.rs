//! Function kinds and the operator name registry
//!
//! Functions are closed enums grouped by arity. Every function has a registry
//! name (`"cos"`, `"sum"`, ...) and binary arithmetic functions also have an
//! infix symbol (`"+"`, `"-"`, ...). The registry resolves both forms.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Denominators with an absolute value below this threshold make division
/// and inversion return `1`.
pub const PROTECTION_THRESHOLD: f64 = 0.001;

/// Protected division: `1` when `|b| < 0.001`, `a / b` otherwise
#[inline]
pub fn protected_div(a: f64, b: f64) -> f64 {
    if b.abs() < PROTECTION_THRESHOLD {
        1.0
    } else {
        a / b
    }
}

/// Functions of one operand
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryFunction {
    /// Cosine
    Cos,
    /// Sine
    Sin,
    /// Natural logarithm (unprotected)
    Log,
    /// Exponential (unprotected)
    Exp,
    /// Protected inverse `1 / x`
    Inverse,
}

impl UnaryFunction {
    /// All unary functions
    pub const ALL: [UnaryFunction; 5] = [
        Self::Cos,
        Self::Sin,
        Self::Log,
        Self::Exp,
        Self::Inverse,
    ];

    /// Apply the scalar rule
    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Cos => x.cos(),
            Self::Sin => x.sin(),
            Self::Log => x.ln(),
            Self::Exp => x.exp(),
            Self::Inverse => protected_div(1.0, x),
        }
    }

    /// Registry name
    pub fn name(self) -> &'static str {
        match self {
            Self::Cos => "cos",
            Self::Sin => "sin",
            Self::Log => "log",
            Self::Exp => "exp",
            Self::Inverse => "inv",
        }
    }
}

/// Functions of two operands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryFunction {
    /// Addition
    Sum,
    /// Subtraction
    Difference,
    /// Multiplication
    Product,
    /// Protected division
    Division,
    /// Exponentiation (unprotected)
    Power,
    /// Maximum
    Max,
    /// Minimum
    Min,
}

impl BinaryFunction {
    /// All binary functions
    pub const ALL: [BinaryFunction; 7] = [
        Self::Sum,
        Self::Difference,
        Self::Product,
        Self::Division,
        Self::Power,
        Self::Max,
        Self::Min,
    ];

    /// Apply the scalar rule
    #[inline]
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Sum => a + b,
            Self::Difference => a - b,
            Self::Product => a * b,
            Self::Division => protected_div(a, b),
            Self::Power => a.powf(b),
            Self::Max => {
                if a > b {
                    a
                } else {
                    b
                }
            }
            Self::Min => {
                if a < b {
                    a
                } else {
                    b
                }
            }
        }
    }

    /// Registry name
    pub fn name(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Difference => "sub",
            Self::Product => "mul",
            Self::Division => "div",
            Self::Power => "pow",
            Self::Max => "max",
            Self::Min => "min",
        }
    }

    /// Infix symbol, for the functions rendered in infix form
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            Self::Sum => Some("+"),
            Self::Difference => Some("-"),
            Self::Product => Some("*"),
            Self::Division => Some("/"),
            Self::Power => Some("^"),
            Self::Max | Self::Min => None,
        }
    }
}

/// A function of any arity; the zero-operand template stored in the registry
/// and in function palettes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Function {
    /// One operand
    Unary(UnaryFunction),
    /// Two operands
    Binary(BinaryFunction),
}

impl Function {
    /// Every function known to the registry
    pub fn all() -> impl Iterator<Item = Function> {
        UnaryFunction::ALL
            .into_iter()
            .map(Function::Unary)
            .chain(BinaryFunction::ALL.into_iter().map(Function::Binary))
    }

    /// Number of operands
    pub fn arity(self) -> usize {
        match self {
            Self::Unary(_) => 1,
            Self::Binary(_) => 2,
        }
    }

    /// Registry name
    pub fn name(self) -> &'static str {
        match self {
            Self::Unary(f) => f.name(),
            Self::Binary(f) => f.name(),
        }
    }

    /// Look up a function by registry name or infix symbol
    pub fn from_name(name: &str) -> Option<Function> {
        REGISTRY.get(name).copied()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<UnaryFunction> for Function {
    fn from(f: UnaryFunction) -> Self {
        Self::Unary(f)
    }
}

impl From<BinaryFunction> for Function {
    fn from(f: BinaryFunction) -> Self {
        Self::Binary(f)
    }
}

/// Process-wide name → template mapping, built once on first use
static REGISTRY: LazyLock<HashMap<&'static str, Function>> = LazyLock::new(|| {
    let mut registry = HashMap::new();
    for function in Function::all() {
        registry.insert(function.name(), function);
        if let Function::Binary(binary) = function {
            if let Some(symbol) = binary.symbol() {
                registry.insert(symbol, function);
            }
        }
    }
    registry
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_division() {
        assert_eq!(BinaryFunction::Division.apply(3.0, 0.0), 1.0);
        assert_eq!(BinaryFunction::Division.apply(3.0, 0.0009), 1.0);
        assert_eq!(BinaryFunction::Division.apply(3.0, -0.0009), 1.0);
        assert_eq!(BinaryFunction::Division.apply(3.0, 0.001), 3.0 / 0.001);
        assert_eq!(BinaryFunction::Division.apply(6.0, 2.0), 3.0);
    }

    #[test]
    fn test_protected_inverse() {
        assert_eq!(UnaryFunction::Inverse.apply(0.0), 1.0);
        assert_eq!(UnaryFunction::Inverse.apply(0.0005), 1.0);
        assert_eq!(UnaryFunction::Inverse.apply(4.0), 0.25);
    }

    #[test]
    fn test_log_is_unprotected() {
        assert!(UnaryFunction::Log.apply(-1.0).is_nan());
    }

    #[test]
    fn test_max_min() {
        assert_eq!(BinaryFunction::Max.apply(1.0, 2.0), 2.0);
        assert_eq!(BinaryFunction::Min.apply(1.0, 2.0), 1.0);
    }

    #[test]
    fn test_registry_round_trip() {
        for function in Function::all() {
            assert_eq!(Function::from_name(function.name()), Some(function));
        }
        assert_eq!(
            Function::from_name("+"),
            Some(Function::Binary(BinaryFunction::Sum))
        );
        assert_eq!(Function::from_name("tan"), None);
    }

    #[test]
    fn test_arity() {
        assert_eq!(Function::Unary(UnaryFunction::Cos).arity(), 1);
        assert_eq!(Function::Binary(BinaryFunction::Power).arity(), 2);
    }
}
