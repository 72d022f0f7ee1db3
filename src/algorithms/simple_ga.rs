//! Simple Genetic Algorithm
//!
//! This module implements a standard generational genetic algorithm over any
//! [`Evolvable`] genome. Fitness is minimized.

use std::time::Instant;

use rand::Rng;

use crate::diagnostics::{EvolutionResult, EvolutionStats, GenerationStats};
use crate::error::{GpError, GpResult};
use crate::genome::traits::Evolvable;
use crate::operators::selection::TournamentSelection;
use crate::operators::traits::SelectionOperator;
use crate::population::individual::Individual;
use crate::population::population::Population;

/// Configuration for the Simple GA
#[derive(Clone, Debug)]
pub struct SimpleGAConfig {
    /// Population size
    pub population_size: usize,
    /// Number of generations bred after the initial one
    pub max_generations: usize,
    /// Number of elite individuals copied unchanged into the next generation
    pub elite_count: usize,
    /// Probability that a pair of parents is recombined
    pub crossover_probability: f64,
    /// Probability that an offspring is passed to `mutate`
    pub mutation_probability: f64,
    /// Whether to evaluate in parallel
    pub parallel_evaluation: bool,
}

impl Default for SimpleGAConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 30,
            elite_count: 1,
            crossover_probability: 0.5,
            mutation_probability: 1.0,
            parallel_evaluation: true,
        }
    }
}

/// Builder for SimpleGA
#[derive(Clone, Debug, Default)]
pub struct SimpleGABuilder {
    config: SimpleGAConfig,
    selection: TournamentSelection,
}

impl SimpleGABuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the population size
    pub fn population_size(mut self, size: usize) -> Self {
        self.config.population_size = size;
        self
    }

    /// Set the number of generations
    pub fn max_generations(mut self, generations: usize) -> Self {
        self.config.max_generations = generations;
        self
    }

    /// Set the number of elite individuals to preserve
    pub fn elite_count(mut self, count: usize) -> Self {
        self.config.elite_count = count;
        self
    }

    /// Set the crossover probability
    pub fn crossover_probability(mut self, probability: f64) -> Self {
        self.config.crossover_probability = probability;
        self
    }

    /// Set the mutation probability
    pub fn mutation_probability(mut self, probability: f64) -> Self {
        self.config.mutation_probability = probability;
        self
    }

    /// Enable or disable parallel evaluation
    pub fn parallel_evaluation(mut self, enabled: bool) -> Self {
        self.config.parallel_evaluation = enabled;
        self
    }

    /// Set the selection operator
    pub fn selection(mut self, selection: TournamentSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Build the SimpleGA instance
    pub fn build(self) -> GpResult<SimpleGA> {
        if self.config.population_size == 0 {
            return Err(GpError::Configuration(
                "Population size must be positive".to_string(),
            ));
        }
        if self.config.elite_count > self.config.population_size {
            return Err(GpError::Configuration(format!(
                "Elite count {} exceeds population size {}",
                self.config.elite_count, self.config.population_size
            )));
        }
        for (name, p) in [
            ("crossover", self.config.crossover_probability),
            ("mutation", self.config.mutation_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(GpError::Configuration(format!(
                    "{} probability {} is outside [0, 1]",
                    name, p
                )));
            }
        }
        Ok(SimpleGA {
            config: self.config,
            selection: self.selection,
        })
    }
}

/// Simple Genetic Algorithm
///
/// A generational GA: elites survive unchanged, the rest of each generation
/// is bred from tournament-selected parents.
#[derive(Clone, Debug)]
pub struct SimpleGA {
    config: SimpleGAConfig,
    selection: TournamentSelection,
}

impl SimpleGA {
    /// Create a builder for SimpleGA
    pub fn builder() -> SimpleGABuilder {
        SimpleGABuilder::new()
    }

    /// The configuration in use
    pub fn config(&self) -> &SimpleGAConfig {
        &self.config
    }

    /// Run the genetic algorithm on genomes drawn from `factory`
    pub fn run<G, R, F>(&self, factory: F, rng: &mut R) -> GpResult<EvolutionResult<G>>
    where
        G: Evolvable,
        R: Rng,
        F: FnMut(&mut R) -> G,
    {
        self.run_with_observer(factory, rng, |_, _| {})
    }

    /// Run the genetic algorithm, calling `observer` after every generation
    /// with that generation's statistics and the best genome found so far
    pub fn run_with_observer<G, R, F, O>(
        &self,
        mut factory: F,
        rng: &mut R,
        mut observer: O,
    ) -> GpResult<EvolutionResult<G>>
    where
        G: Evolvable,
        R: Rng,
        F: FnMut(&mut R) -> G,
        O: FnMut(&GenerationStats, &G),
    {
        let start_time = Instant::now();

        // Initialize population
        let mut population = Population::random(self.config.population_size, &mut factory, rng);
        let mut evaluations = self.evaluate(&mut population);

        let mut best_individual = population
            .best()
            .ok_or(GpError::EmptyPopulation)?
            .clone();

        let mut stats = EvolutionStats::new();
        let gen_stats = GenerationStats::from_population(&population, 0, evaluations);
        observer(&gen_stats, &best_individual.genome);
        stats.record(gen_stats);

        for generation in 1..=self.config.max_generations {
            let mut new_population = Population::with_capacity(self.config.population_size);

            // Elitism: copy best individuals
            let mut sorted = population.clone();
            sorted.sort_by_fitness();
            for elite in sorted.iter().take(self.config.elite_count) {
                new_population.push(elite.clone());
            }

            let fitness = population.fitness_values();
            let parents = population.individuals();

            while new_population.len() < self.config.population_size {
                let parent1 = &parents[self.selection.select(&fitness, rng)].genome;
                let parent2 = &parents[self.selection.select(&fitness, rng)].genome;

                let (mut child1, mut child2) =
                    if rng.gen::<f64>() < self.config.crossover_probability {
                        parent1.crossover(parent2, rng)
                    } else {
                        (parent1.clone(), parent2.clone())
                    };

                if rng.gen::<f64>() < self.config.mutation_probability {
                    child1.mutate(rng);
                }
                if rng.gen::<f64>() < self.config.mutation_probability {
                    child2.mutate(rng);
                }

                new_population.push(Individual::with_generation(child1, generation));
                if new_population.len() < self.config.population_size {
                    new_population.push(Individual::with_generation(child2, generation));
                }
            }

            evaluations += self.evaluate(&mut new_population);
            new_population.set_generation(generation);
            population = new_population;

            if let Some(best) = population.best() {
                if best.is_better_than(&best_individual) {
                    best_individual = best.clone();
                }
            }

            let gen_stats = GenerationStats::from_population(&population, generation, evaluations);
            log::debug!(
                "generation {}: best {:.6}, mean {:.6}, evaluations {}",
                generation,
                gen_stats.best_fitness,
                gen_stats.mean_fitness,
                evaluations
            );
            observer(&gen_stats, &best_individual.genome);
            stats.record(gen_stats);
        }

        stats.set_runtime(start_time.elapsed());

        Ok(EvolutionResult {
            best_fitness: best_individual.fitness_value(),
            best_genome: best_individual.into_genome(),
            generations: population.generation(),
            evaluations,
            stats,
        })
    }

    /// Evaluate the unevaluated individuals, returning how many there were
    fn evaluate<G: Evolvable>(&self, population: &mut Population<G>) -> usize {
        let pending = population.iter().filter(|i| !i.is_evaluated()).count();
        if self.config.parallel_evaluation {
            population.evaluate_parallel();
        } else {
            population.evaluate();
        }
        pending
    }
}
