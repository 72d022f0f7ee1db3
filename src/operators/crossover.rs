//! Crossover operators
//!
//! Subtree exchange for tree programs and uniform blending for the flat
//! constant vectors used while tuning.

use rand::Rng;

use crate::op::Operator;
use crate::operators::traits::TreeCrossover;

/// Subtree crossover
///
/// Picks one node uniformly in each tree and swaps the subtrees rooted there.
/// Ownership of the swapped subtrees moves between the trees; nothing is
/// shared afterwards.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubtreeCrossover;

impl SubtreeCrossover {
    /// Create a new subtree crossover
    pub fn new() -> Self {
        Self
    }
}

impl TreeCrossover for SubtreeCrossover {
    fn apply<R: Rng>(&self, left: &mut Operator, right: &mut Operator, rng: &mut R) {
        let left_path = left.random_position(rng);
        let right_path = right.random_position(rng);
        if let (Some(a), Some(b)) = (
            left.get_subtree_mut(&left_path),
            right.get_subtree_mut(&right_path),
        ) {
            std::mem::swap(a, b);
        }
    }
}

/// Uniform blend crossover
///
/// For each coordinate draws `p ~ U(0, 1)` and produces
/// `p * a + (1 - p) * b` and `(1 - p) * a + p * b`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlendCrossover;

impl BlendCrossover {
    /// Create a new blend crossover
    pub fn new() -> Self {
        Self
    }

    /// Blend two equal-length vectors. Extra coordinates of the longer
    /// parent are ignored.
    pub fn apply<R: Rng>(&self, parent1: &[f64], parent2: &[f64], rng: &mut R) -> (Vec<f64>, Vec<f64>) {
        debug_assert_eq!(parent1.len(), parent2.len());
        parent1
            .iter()
            .zip(parent2)
            .map(|(&a, &b)| {
                let p: f64 = rng.gen();
                (p * a + (1.0 - p) * b, (1.0 - p) * a + p * b)
            })
            .unzip()
    }
}
