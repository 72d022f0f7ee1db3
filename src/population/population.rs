//! Population type
//!
//! This module provides the Population container type.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::genome::traits::Evolvable;
use crate::population::individual::Individual;

/// A population of individuals
#[derive(Clone, Debug)]
pub struct Population<G: Evolvable> {
    /// The individuals in this population
    individuals: Vec<Individual<G>>,
    /// Current generation number
    generation: usize,
}

impl<G: Evolvable> Default for Population<G> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<G: Evolvable> Population<G> {
    /// Create a population with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            individuals: Vec::with_capacity(capacity),
            generation: 0,
        }
    }

    /// Create a population from a vector of individuals
    pub fn from_individuals(individuals: Vec<Individual<G>>) -> Self {
        Self {
            individuals,
            generation: 0,
        }
    }

    /// Create a population of `size` genomes drawn from `factory`
    pub fn random<R, F>(size: usize, factory: &mut F, rng: &mut R) -> Self
    where
        F: FnMut(&mut R) -> G,
    {
        Self::from_individuals((0..size).map(|_| Individual::new(factory(rng))).collect())
    }

    /// Get the current generation
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Set the generation number
    pub fn set_generation(&mut self, generation: usize) {
        self.generation = generation;
    }

    /// Get the population size
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Check if the population is empty
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Add an individual to the population
    pub fn push(&mut self, individual: Individual<G>) {
        self.individuals.push(individual);
    }

    /// Get an iterator over the individuals
    pub fn iter(&self) -> impl Iterator<Item = &Individual<G>> {
        self.individuals.iter()
    }

    /// Get the underlying vector of individuals
    pub fn individuals(&self) -> &[Individual<G>] {
        &self.individuals
    }

    /// Get the best individual (lowest fitness)
    pub fn best(&self) -> Option<&Individual<G>> {
        self.individuals
            .iter()
            .filter(|i| i.is_evaluated())
            .min_by(|a, b| a.fitness_value().total_cmp(&b.fitness_value()))
    }

    /// Get the worst individual (highest fitness)
    pub fn worst(&self) -> Option<&Individual<G>> {
        self.individuals
            .iter()
            .filter(|i| i.is_evaluated())
            .max_by(|a, b| a.fitness_value().total_cmp(&b.fitness_value()))
    }

    /// Sort the population by fitness (best first)
    pub fn sort_by_fitness(&mut self) {
        self.individuals
            .sort_by(|a, b| a.fitness_value().total_cmp(&b.fitness_value()));
    }

    /// Fitness of every individual in order, `+inf` for unevaluated ones
    pub fn fitness_values(&self) -> Vec<f64> {
        self.individuals.iter().map(Individual::fitness_value).collect()
    }

    /// Evaluate all unevaluated individuals (sequential)
    pub fn evaluate(&mut self) {
        for individual in &mut self.individuals {
            if !individual.is_evaluated() {
                individual.evaluate();
            }
        }
    }

    /// Compute mean fitness over finite scores
    pub fn mean_fitness(&self) -> Option<f64> {
        let finite = self.finite_fitness();
        if finite.is_empty() {
            None
        } else {
            Some(finite.iter().sum::<f64>() / finite.len() as f64)
        }
    }

    /// Compute the standard deviation of finite scores
    pub fn fitness_std(&self) -> Option<f64> {
        let mean = self.mean_fitness()?;
        let finite = self.finite_fitness();
        if finite.len() < 2 {
            return None;
        }
        let variance =
            finite.iter().map(|f| (f - mean).powi(2)).sum::<f64>() / (finite.len() - 1) as f64;
        Some(variance.sqrt())
    }

    fn finite_fitness(&self) -> Vec<f64> {
        self.individuals
            .iter()
            .filter_map(|i| i.fitness)
            .filter(|f| f.is_finite())
            .collect()
    }
}

/// Parallel evaluation support (requires `parallel` feature)
#[cfg(feature = "parallel")]
impl<G: Evolvable> Population<G> {
    /// Evaluate all unevaluated individuals (parallel)
    pub fn evaluate_parallel(&mut self) {
        self.individuals
            .par_iter_mut()
            .filter(|i| !i.is_evaluated())
            .for_each(Individual::evaluate);
    }
}

/// Sequential fallback for parallel evaluation (when `parallel` feature is disabled)
#[cfg(not(feature = "parallel"))]
impl<G: Evolvable> Population<G> {
    /// Evaluate all unevaluated individuals (sequential fallback)
    pub fn evaluate_parallel(&mut self) {
        self.evaluate();
    }
}
