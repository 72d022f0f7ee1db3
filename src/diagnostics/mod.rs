//! Diagnostics and statistics
//!
//! This module provides statistics collection for evolutionary runs.
//! Fitness is minimized throughout.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::genome::traits::Evolvable;
use crate::population::population::Population;

/// Statistics for a single generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number
    pub generation: usize,
    /// Total fitness evaluations so far
    pub evaluations: usize,
    /// Best (lowest) fitness in this generation
    pub best_fitness: f64,
    /// Worst (highest) fitness in this generation
    pub worst_fitness: f64,
    /// Mean of the finite fitness values
    pub mean_fitness: f64,
    /// Median of the finite fitness values
    pub median_fitness: f64,
    /// Standard deviation of the finite fitness values
    pub fitness_std: f64,
    /// Number of individuals scored as `+inf`
    pub invalid: usize,
}

impl GenerationStats {
    /// Compute statistics from a population
    pub fn from_population<G: Evolvable>(
        population: &Population<G>,
        generation: usize,
        evaluations: usize,
    ) -> Self {
        let evaluated: Vec<f64> = population.iter().filter_map(|i| i.fitness).collect();
        let mut finite: Vec<f64> = evaluated.iter().copied().filter(|f| f.is_finite()).collect();
        finite.sort_by(f64::total_cmp);

        let best = evaluated.iter().copied().fold(f64::INFINITY, f64::min);
        let worst = evaluated.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let median = match finite.len() {
            0 => f64::NAN,
            n if n % 2 == 0 => (finite[n / 2 - 1] + finite[n / 2]) / 2.0,
            n => finite[n / 2],
        };

        Self {
            generation,
            evaluations,
            best_fitness: best,
            worst_fitness: worst,
            mean_fitness: population.mean_fitness().unwrap_or(f64::NAN),
            median_fitness: median,
            fitness_std: population.fitness_std().unwrap_or(0.0),
            invalid: evaluated.len() - finite.len(),
        }
    }
}

/// Statistics collector for an entire evolution run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Statistics per generation
    pub generations: Vec<GenerationStats>,
    /// Total runtime in milliseconds
    pub total_runtime_ms: f64,
}

impl EvolutionStats {
    /// Create a new stats collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a generation's statistics
    pub fn record(&mut self, stats: GenerationStats) {
        self.generations.push(stats);
    }

    /// Number of generations recorded
    pub fn num_generations(&self) -> usize {
        self.generations.len()
    }

    /// Best fitness across all generations
    pub fn best_fitness(&self) -> Option<f64> {
        self.generations
            .iter()
            .map(|g| g.best_fitness)
            .min_by(f64::total_cmp)
    }

    /// History of best fitness values
    pub fn best_fitness_history(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.best_fitness).collect()
    }

    /// History of mean fitness values
    pub fn mean_fitness_history(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.mean_fitness).collect()
    }

    /// Set the total runtime
    pub fn set_runtime(&mut self, duration: Duration) {
        self.total_runtime_ms = duration.as_secs_f64() * 1000.0;
    }

    /// One-paragraph summary of the run
    pub fn summary(&self) -> String {
        format!(
            "Evolution Summary:\n\
             - Generations: {}\n\
             - Best fitness: {:.6}\n\
             - Runtime: {:.2}ms",
            self.num_generations(),
            self.best_fitness().unwrap_or(f64::INFINITY),
            self.total_runtime_ms,
        )
    }
}

/// Result of an evolution run
#[derive(Clone, Debug)]
pub struct EvolutionResult<G: Evolvable> {
    /// The best genome found
    pub best_genome: G,
    /// Its fitness
    pub best_fitness: f64,
    /// Number of generations completed
    pub generations: usize,
    /// Total fitness evaluations
    pub evaluations: usize,
    /// Statistics for the run
    pub stats: EvolutionStats,
}

pub mod prelude {
    pub use super::{EvolutionResult, EvolutionStats, GenerationStats};
}
