//! Mutation operators
//!
//! Point, hoist and subtree mutation rewrite a tree in place. Every rewrite
//! preserves the arity of the nodes it touches, so a mutated tree is always
//! structurally valid. [`GaussianJitter`] perturbs flat constant vectors.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::genome::palette::Palette;
use crate::op::Operator;
use crate::operators::crossover::SubtreeCrossover;
use crate::operators::traits::{TreeCrossover, TreeMutation};

/// Per-node rewrite probability, keyed by the kind of node
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weighting {
    /// Probability for constant leaves
    pub constant: f64,
    /// Probability for variable leaves
    pub variable: f64,
    /// Probability for function nodes
    pub function: f64,
}

impl Weighting {
    /// The same probability for every kind of node
    pub fn uniform(p: f64) -> Self {
        Self {
            constant: p,
            variable: p,
            function: p,
        }
    }

    /// Probability for `op`
    pub fn apply(&self, op: &Operator) -> f64 {
        match op {
            Operator::Constant(_) => self.constant,
            Operator::Variable(_) => self.variable,
            Operator::Unary(..) | Operator::Binary(..) => self.function,
        }
    }
}

impl Default for Weighting {
    fn default() -> Self {
        Self::uniform(0.3)
    }
}

/// Point mutation
///
/// Walks every node and, with the node's [`Weighting`] probability, rewrites
/// it with [`Palette::mutate_operator`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointMutation {
    pub weighting: Weighting,
}

impl PointMutation {
    /// Create a point mutation with the given weighting
    pub fn new(weighting: Weighting) -> Self {
        Self { weighting }
    }
}

impl TreeMutation for PointMutation {
    fn apply<R: Rng>(&self, tree: &mut Operator, palette: &Palette, rng: &mut R) {
        tree.walk_mut(&mut |node, _| {
            if rng.gen::<f64>() < self.weighting.apply(node) {
                palette.mutate_operator(node, rng);
            }
            false
        });
    }
}

/// Hoist mutation
///
/// Replaces a subtree of height at least one with one of its own strict
/// descendants. Leaves are left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HoistMutation;

impl TreeMutation for HoistMutation {
    fn apply<R: Rng>(&self, tree: &mut Operator, _palette: &Palette, rng: &mut R) {
        let height = tree.height();
        if height < 1 {
            return;
        }
        let Some(path) = tree.pick_subtree(1, height, rng) else {
            return;
        };
        let Some(sub) = tree.get_subtree_mut(&path) else {
            return;
        };
        let Some(inner) = sub.pick_subtree(0, sub.height() - 1, rng) else {
            return;
        };
        if let Some(hoisted) = sub.get_subtree(&inner).cloned() {
            *sub = hoisted;
        }
    }
}

/// Subtree mutation
///
/// Generates a fresh random tree from the palette and crosses it over with
/// the target, splicing a random branch into a random location.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubtreeMutation {
    pub crossover: SubtreeCrossover,
}

impl TreeMutation for SubtreeMutation {
    fn apply<R: Rng>(&self, tree: &mut Operator, palette: &Palette, rng: &mut R) {
        let mut mutant = palette.new_tree(rng);
        self.crossover.apply(tree, &mut mutant, rng);
    }
}

/// Relative Gaussian jitter over a flat vector
///
/// Each value is replaced, with probability `rate`, by `v + v * z` where
/// `z ~ N(0, 1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussianJitter {
    pub rate: f64,
}

impl GaussianJitter {
    /// Create a jitter with the given per-value probability
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    /// Jitter `values` in place
    pub fn apply<R: Rng>(&self, values: &mut [f64], rng: &mut R) {
        for v in values.iter_mut() {
            if rng.gen::<f64>() < self.rate {
                let z: f64 = rng.sample(StandardNormal);
                *v += *v * z;
            }
        }
    }
}

impl Default for GaussianJitter {
    fn default() -> Self {
        Self::new(0.8)
    }
}
