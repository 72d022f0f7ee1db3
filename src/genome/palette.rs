//! Random tree generation
//!
//! A [`Palette`] holds everything needed to draw random operators: the
//! enabled functions, the number of feature columns, the constant range, the
//! leaf policy and the height bounds of generated trees.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::op::{BinaryFunction, Function, Operator, UnaryFunction};

/// Tree generation policy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Initializer {
    /// Every branch reaches the drawn height
    Full,
    /// Branches may stop early with probability `p_terminal`
    Grow,
    /// Height drawn in `[min_height, max_height]`, then full or grow with
    /// equal probability
    #[default]
    RampedHalfAndHalf,
}

/// Random operator source
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    unary: Vec<UnaryFunction>,
    binary: Vec<BinaryFunction>,
    /// Number of feature columns variables may refer to
    pub n_features: usize,
    /// Lower bound of random constants
    pub const_min: f64,
    /// Upper bound of random constants
    pub const_max: f64,
    /// Probability that a leaf is a constant rather than a variable
    pub p_constant: f64,
    /// Probability of stopping a branch early under [`Initializer::Grow`]
    pub p_terminal: f64,
    /// Minimum height of generated trees
    pub min_height: usize,
    /// Maximum height of generated trees
    pub max_height: usize,
    /// Generation policy
    pub initializer: Initializer,
}

impl Palette {
    /// Create a palette over `functions` for `n_features` columns with the
    /// default generation settings.
    pub fn new(functions: &[Function], n_features: usize) -> Self {
        let mut unary = Vec::new();
        let mut binary = Vec::new();
        for function in functions {
            match *function {
                Function::Unary(f) if !unary.contains(&f) => unary.push(f),
                Function::Binary(f) if !binary.contains(&f) => binary.push(f),
                _ => {}
            }
        }
        Self {
            unary,
            binary,
            n_features,
            const_min: -5.0,
            const_max: 5.0,
            p_constant: 0.5,
            p_terminal: 0.3,
            min_height: 3,
            max_height: 5,
            initializer: Initializer::default(),
        }
    }

    /// Set the constant range
    pub fn with_const_range(mut self, min: f64, max: f64) -> Self {
        self.const_min = min;
        self.const_max = max;
        self
    }

    /// Set the height bounds
    pub fn with_heights(mut self, min: usize, max: usize) -> Self {
        self.min_height = min;
        self.max_height = max;
        self
    }

    /// Set the leaf probabilities
    pub fn with_leaf_probabilities(mut self, p_constant: f64, p_terminal: f64) -> Self {
        self.p_constant = p_constant;
        self.p_terminal = p_terminal;
        self
    }

    /// Set the generation policy
    pub fn with_initializer(mut self, initializer: Initializer) -> Self {
        self.initializer = initializer;
        self
    }

    /// Enabled functions, unary first
    pub fn functions(&self) -> Vec<Function> {
        self.unary
            .iter()
            .map(|&f| Function::Unary(f))
            .chain(self.binary.iter().map(|&f| Function::Binary(f)))
            .collect()
    }

    /// Uniform constant in `[const_min, const_max)`
    pub fn new_constant<R: Rng>(&self, rng: &mut R) -> Operator {
        Operator::Constant(self.const_min + rng.gen::<f64>() * (self.const_max - self.const_min))
    }

    /// Uniform feature index; a constant when there are no features
    pub fn new_variable<R: Rng>(&self, rng: &mut R) -> Operator {
        if self.n_features == 0 {
            return self.new_constant(rng);
        }
        Operator::Variable(rng.gen_range(0..self.n_features))
    }

    /// Constant with probability `p_constant`, variable otherwise
    pub fn new_leaf<R: Rng>(&self, rng: &mut R) -> Operator {
        if rng.gen::<f64>() < self.p_constant {
            self.new_constant(rng)
        } else {
            self.new_variable(rng)
        }
    }

    /// Uniformly drawn enabled function
    pub fn new_function<R: Rng>(&self, rng: &mut R) -> Option<Function> {
        let n = self.unary.len() + self.binary.len();
        if n == 0 {
            return None;
        }
        let i = rng.gen_range(0..n);
        Some(match self.unary.get(i) {
            Some(&f) => Function::Unary(f),
            None => Function::Binary(self.binary[i - self.unary.len()]),
        })
    }

    /// Random tree following the configured initializer
    pub fn new_tree<R: Rng>(&self, rng: &mut R) -> Operator {
        let lo = self.min_height.min(self.max_height);
        let height = rng.gen_range(lo..=self.max_height);
        match self.initializer {
            Initializer::Full => self.full(height, rng),
            Initializer::Grow => self.grow(height, rng),
            Initializer::RampedHalfAndHalf => {
                if rng.gen() {
                    self.full(height, rng)
                } else {
                    self.grow(height, rng)
                }
            }
        }
    }

    /// Tree whose every leaf sits at depth `height`
    pub fn full<R: Rng>(&self, height: usize, rng: &mut R) -> Operator {
        if height == 0 {
            return self.new_leaf(rng);
        }
        match self.new_function(rng) {
            Some(function) => self.with_operands(function, |rng| self.full(height - 1, rng), rng),
            None => self.new_leaf(rng),
        }
    }

    /// Tree of height at most `height` whose branches may stop early
    pub fn grow<R: Rng>(&self, height: usize, rng: &mut R) -> Operator {
        if height == 0 || rng.gen::<f64>() < self.p_terminal {
            return self.new_leaf(rng);
        }
        match self.new_function(rng) {
            Some(function) => self.with_operands(function, |rng| self.grow(height - 1, rng), rng),
            None => self.new_leaf(rng),
        }
    }

    fn with_operands<R, F>(&self, function: Function, mut child: F, rng: &mut R) -> Operator
    where
        R: Rng,
        F: FnMut(&mut R) -> Operator,
    {
        match function {
            Function::Unary(f) => Operator::unary(f, child(rng)),
            Function::Binary(f) => {
                let left = child(rng);
                Operator::binary(f, left, child(rng))
            }
        }
    }

    /// Rewrite a single node in place, preserving its arity.
    ///
    /// A constant is multiplied by a standard normal draw, a variable gets a
    /// new random index and a function is swapped for another enabled
    /// function of the same arity, keeping its operands. A function with no
    /// alternative of its arity is left unchanged.
    pub fn mutate_operator<R: Rng>(&self, op: &mut Operator, rng: &mut R) {
        match op {
            Operator::Constant(value) => {
                let z: f64 = rng.sample(StandardNormal);
                *value *= z;
            }
            Operator::Variable(index) => {
                if self.n_features > 0 {
                    *index = rng.gen_range(0..self.n_features);
                }
            }
            Operator::Unary(f, _) => {
                if let Some(&g) = alternatives(&self.unary, *f).choose(rng) {
                    *f = g;
                }
            }
            Operator::Binary(f, _, _) => {
                if let Some(&g) = alternatives(&self.binary, *f).choose(rng) {
                    *f = g;
                }
            }
        }
    }
}

fn alternatives<T: Copy + PartialEq>(set: &[T], current: T) -> Vec<T> {
    set.iter().copied().filter(|&g| g != current).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn arithmetic() -> Vec<Function> {
        vec![
            BinaryFunction::Sum.into(),
            BinaryFunction::Difference.into(),
            BinaryFunction::Product.into(),
            BinaryFunction::Division.into(),
        ]
    }

    #[test]
    fn test_new_constant_in_range() {
        let palette = Palette::new(&arithmetic(), 2).with_const_range(-1.0, 3.0);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            match palette.new_constant(&mut rng) {
                Operator::Constant(v) => assert!((-1.0..3.0).contains(&v)),
                other => panic!("expected constant, got {}", other),
            }
        }
    }

    #[test]
    fn test_new_variable_in_range() {
        let palette = Palette::new(&arithmetic(), 3);
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..200 {
            match palette.new_variable(&mut rng) {
                Operator::Variable(i) => assert!(i < 3),
                other => panic!("expected variable, got {}", other),
            }
        }
    }

    #[test]
    fn test_full_reaches_height() {
        let palette = Palette::new(&arithmetic(), 2);
        let mut rng = StdRng::seed_from_u64(3);
        for height in 0..5 {
            let tree = palette.full(height, &mut rng);
            assert_eq!(tree.height(), height);
            assert_eq!(tree.size(), (1 << (height + 1)) - 1);
        }
    }

    #[test]
    fn test_new_tree_within_bounds() {
        let mut rng = StdRng::seed_from_u64(4);
        for initializer in [Initializer::Full, Initializer::Grow, Initializer::RampedHalfAndHalf] {
            let palette = Palette::new(&arithmetic(), 2)
                .with_heights(2, 4)
                .with_initializer(initializer);
            for _ in 0..50 {
                let tree = palette.new_tree(&mut rng);
                assert!(tree.height() <= 4);
                if initializer == Initializer::Full {
                    assert!(tree.height() >= 2);
                }
            }
        }
    }

    #[test]
    fn test_without_functions_yields_leaves() {
        let palette = Palette::new(&[], 1);
        let mut rng = StdRng::seed_from_u64(5);
        assert!(palette.full(3, &mut rng).is_leaf());
    }

    #[test]
    fn test_mutate_function_keeps_arity_and_operands() {
        let palette = Palette::new(&arithmetic(), 2);
        let mut rng = StdRng::seed_from_u64(6);
        let mut op = Operator::binary(BinaryFunction::Sum, Operator::Variable(0), Operator::Constant(2.0));
        for _ in 0..20 {
            let before = op.function();
            palette.mutate_operator(&mut op, &mut rng);
            assert_eq!(op.arity(), 2);
            assert_ne!(op.function(), before);
            assert_eq!(op.operand(0), Some(&Operator::Variable(0)));
            assert_eq!(op.operand(1), Some(&Operator::Constant(2.0)));
        }
    }

    #[test]
    fn test_mutate_function_without_alternative() {
        let palette = Palette::new(&[BinaryFunction::Product.into()], 1);
        let mut rng = StdRng::seed_from_u64(7);
        let original = Operator::binary(BinaryFunction::Product, Operator::Variable(0), Operator::Variable(0));
        let mut op = original.clone();
        palette.mutate_operator(&mut op, &mut rng);
        assert_eq!(op, original);

        // unary nodes have no unary alternative in this palette either
        let mut cos = Operator::unary(UnaryFunction::Cos, Operator::Variable(0));
        palette.mutate_operator(&mut cos, &mut rng);
        assert_eq!(cos.function(), Some(Function::Unary(UnaryFunction::Cos)));
    }

    #[test]
    fn test_mutate_leaves() {
        let palette = Palette::new(&arithmetic(), 4);
        let mut rng = StdRng::seed_from_u64(8);
        let mut constant = Operator::Constant(0.0);
        palette.mutate_operator(&mut constant, &mut rng);
        assert_eq!(constant, Operator::Constant(0.0));

        let mut variable = Operator::Variable(0);
        palette.mutate_operator(&mut variable, &mut rng);
        assert!(matches!(variable, Operator::Variable(i) if i < 4));
    }
}
