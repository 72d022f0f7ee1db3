//! Core genome trait
//!
//! This module defines the `Evolvable` trait, the capability contract between
//! the search engine and the units it evolves.

use rand::Rng;

use crate::error::GpResult;

/// A unit the search engine can evolve.
///
/// Fitness is minimized. `Clone` must deep copy: a clone never shares mutable
/// state with its source.
pub trait Evolvable: Clone + Send + Sync {
    /// Compute the fitness of this unit
    fn evaluate(&self) -> GpResult<f64>;

    /// Apply a random change in place
    fn mutate<R: Rng>(&mut self, rng: &mut R);

    /// Produce two offspring from `self` and `other`
    fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> (Self, Self);
}
