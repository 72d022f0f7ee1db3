//! Operator traits
//!
//! This module defines the core operator traits for tree programs and for the
//! search engine.

use rand::Rng;

use crate::genome::palette::Palette;
use crate::op::Operator;

/// Selection operator trait
///
/// Selects individuals from a population for reproduction. Fitness is
/// minimized.
pub trait SelectionOperator: Send + Sync {
    /// Select a single individual, returning its index in `fitness`
    fn select<R: Rng>(&self, fitness: &[f64], rng: &mut R) -> usize;

    /// Select multiple individuals
    fn select_many<R: Rng>(&self, fitness: &[f64], count: usize, rng: &mut R) -> Vec<usize> {
        (0..count).map(|_| self.select(fitness, rng)).collect()
    }
}

/// Tree mutation trait
///
/// Rewrites a tree in place. The palette supplies fresh random operators.
pub trait TreeMutation: Send + Sync {
    /// Apply the mutation
    fn apply<R: Rng>(&self, tree: &mut Operator, palette: &Palette, rng: &mut R);
}

/// Tree crossover trait
///
/// Exchanges material between two trees in place.
pub trait TreeCrossover: Send + Sync {
    /// Apply the crossover
    fn apply<R: Rng>(&self, left: &mut Operator, right: &mut Operator, rng: &mut R);
}
