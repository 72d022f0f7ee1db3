//! Individual wrapper type
//!
//! This module provides the Individual type that wraps a genome with its fitness.

use crate::genome::traits::Evolvable;

/// An individual in the population
///
/// Wraps a genome with its computed fitness value and additional metadata.
/// Fitness is minimized.
#[derive(Clone, Debug)]
pub struct Individual<G: Evolvable> {
    /// The genome of this individual
    pub genome: G,
    /// The fitness value (None if not yet evaluated)
    pub fitness: Option<f64>,
    /// Generation when this individual was created
    pub birth_generation: usize,
}

impl<G: Evolvable> Individual<G> {
    /// Create a new individual with an unevaluated genome
    pub fn new(genome: G) -> Self {
        Self::with_generation(genome, 0)
    }

    /// Create a new individual with birth generation
    pub fn with_generation(genome: G, generation: usize) -> Self {
        Self {
            genome,
            fitness: None,
            birth_generation: generation,
        }
    }

    /// Check if this individual has been evaluated
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Fitness, or `+inf` if not evaluated
    pub fn fitness_value(&self) -> f64 {
        self.fitness.unwrap_or(f64::INFINITY)
    }

    /// Evaluate the genome and store its fitness.
    ///
    /// Evaluation errors and non-finite scores are recorded as `+inf` so the
    /// individual can never become the best.
    pub fn evaluate(&mut self) {
        let fitness = match self.genome.evaluate() {
            Ok(f) if f.is_finite() => f,
            Ok(f) => {
                log::trace!("non-finite fitness {} scored as +inf", f);
                f64::INFINITY
            }
            Err(e) => {
                log::trace!("evaluation failed, scored as +inf: {}", e);
                f64::INFINITY
            }
        };
        self.fitness = Some(fitness);
    }

    /// Take the genome out of this individual
    pub fn into_genome(self) -> G {
        self.genome
    }

    /// Check if this individual is better than another
    pub fn is_better_than(&self, other: &Self) -> bool {
        match (self.fitness, other.fitness) {
            (Some(f1), Some(f2)) => f1 < f2,
            (Some(_), None) => true,
            _ => false,
        }
    }

    /// Age of this individual (generations since birth)
    pub fn age(&self, current_generation: usize) -> usize {
        current_generation.saturating_sub(self.birth_generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GpError, GpResult};
    use rand::Rng;

    #[derive(Clone, Debug)]
    struct Fixed(Option<f64>);

    impl Evolvable for Fixed {
        fn evaluate(&self) -> GpResult<f64> {
            self.0.ok_or(GpError::EmptyPopulation)
        }

        fn mutate<R: Rng>(&mut self, _rng: &mut R) {}

        fn crossover<R: Rng>(&self, other: &Self, _rng: &mut R) -> (Self, Self) {
            (self.clone(), other.clone())
        }
    }

    #[test]
    fn test_new_individual_is_unevaluated() {
        let ind = Individual::new(Fixed(Some(1.0)));
        assert!(!ind.is_evaluated());
        assert_eq!(ind.fitness_value(), f64::INFINITY);
    }

    #[test]
    fn test_evaluate() {
        let mut ind = Individual::new(Fixed(Some(2.5)));
        ind.evaluate();
        assert_eq!(ind.fitness, Some(2.5));
    }

    #[test]
    fn test_failures_score_infinite() {
        let mut failed = Individual::new(Fixed(None));
        failed.evaluate();
        assert_eq!(failed.fitness, Some(f64::INFINITY));

        let mut nan = Individual::new(Fixed(Some(f64::NAN)));
        nan.evaluate();
        assert_eq!(nan.fitness, Some(f64::INFINITY));
    }

    #[test]
    fn test_is_better_than() {
        let mut a = Individual::new(Fixed(Some(1.0)));
        let mut b = Individual::new(Fixed(Some(2.0)));
        assert!(!a.is_better_than(&b));
        a.evaluate();
        assert!(a.is_better_than(&b));
        b.evaluate();
        assert!(a.is_better_than(&b));
        assert!(!b.is_better_than(&a));
    }

    #[test]
    fn test_age() {
        let ind = Individual::with_generation(Fixed(None), 3);
        assert_eq!(ind.age(10), 7);
        assert_eq!(ind.age(1), 0);
    }
}
