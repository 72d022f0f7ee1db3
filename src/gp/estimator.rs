//! The GP estimator
//!
//! [`Gp`] wires a function palette and a tree generation policy into the
//! generational engine, reports training and validation scores while the
//! search runs, and optionally polishes the constants of the best program.

use log::Level;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::algorithms::simple_ga::SimpleGA;
use crate::dataset::{self, Dataset};
use crate::error::{GpError, GpResult, MetricError};
use crate::genome::palette::Palette;
use crate::genome::program::{Program, Task, Variation};
use crate::genome::tuner::ProgramTuner;
use crate::gp::config::GpConfig;
use crate::metrics::Metric;
use crate::op::Operator;
use crate::operators::mutation::{PointMutation, Weighting};
use crate::operators::selection::TournamentSelection;

/// Held-out rows scored in progress logs
#[derive(Clone, Debug, Default)]
pub struct ValidationSet {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<f64>,
    pub weights: Option<Vec<f64>>,
}

impl ValidationSet {
    pub fn new(x: Vec<Vec<f64>>, y: Vec<f64>) -> Self {
        Self { x, y, weights: None }
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }
}

impl From<&Dataset> for ValidationSet {
    fn from(dataset: &Dataset) -> Self {
        Self::new(dataset.x().to_vec(), dataset.y().to_vec())
    }
}

/// Genetic programming estimator
#[derive(Debug)]
pub struct Gp {
    config: GpConfig,
    rng: StdRng,
    task: Option<Task>,
    best: Option<Operator>,
    best_fitness: f64,
}

impl Gp {
    /// Validate `config` and create an untrained estimator
    pub fn new(config: GpConfig) -> GpResult<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            rng,
            task: None,
            best: None,
            best_fitness: f64::INFINITY,
        })
    }

    pub fn config(&self) -> &GpConfig {
        &self.config
    }

    /// Whether a search has completed
    pub fn is_fitted(&self) -> bool {
        self.best.is_some()
    }

    /// Fitness of the best program, if any
    pub fn best_fitness(&self) -> Option<f64> {
        self.best.as_ref().map(|_| self.best_fitness)
    }

    /// Evolve programs on `x` and `y`.
    ///
    /// Fails with [`GpError::MultiClass`] when the loss metric is a
    /// classification metric and `y` holds more than two distinct values.
    /// Two classes must be coded `0` and `1`, otherwise the fit fails with
    /// [`DatasetError::NonBinaryTarget`](crate::error::DatasetError::NonBinaryTarget).
    /// A failed fit leaves no best program behind.
    pub fn fit(
        &mut self,
        x: &[Vec<f64>],
        y: &[f64],
        weights: Option<&[f64]>,
        validation: Option<&ValidationSet>,
        verbose: bool,
    ) -> GpResult<()> {
        self.task = None;
        self.best = None;
        self.best_fitness = f64::INFINITY;

        dataset::validate(x, y)?;
        if let Some(w) = weights {
            if w.len() != y.len() {
                return Err(MetricError::WeightsMismatch {
                    expected: y.len(),
                    actual: w.len(),
                }
                .into());
            }
        }
        let n_features = x.first().map_or(0, Vec::len);
        if let Some(val) = validation {
            dataset::validate(&val.x, &val.y)?;
            dataset::check_width(&val.x, n_features)?;
        }

        let config = &self.config;
        let loss = config.loss()?;
        if loss.classification() {
            let n_classes = count_distinct(y);
            if n_classes > 2 {
                return Err(GpError::MultiClass(n_classes));
            }
            dataset::check_binary(y)?;
            if let Some(val) = validation {
                dataset::check_binary(&val.y)?;
            }
        }
        let eval_metric = config.eval()?;

        let palette = Palette::new(&config.parsed_functions()?, n_features)
            .with_const_range(config.const_min, config.const_max)
            .with_heights(config.min_height, config.max_height)
            .with_leaf_probabilities(config.p_constant, config.p_terminal)
            .with_initializer(config.initializer);
        let variation = Variation {
            p_point_mutation: config.p_point_mutation,
            p_subtree_mutation: config.p_subtree_mutation,
            p_hoist_mutation: config.p_hoist_mutation,
            point_mutation: PointMutation::new(Weighting::uniform(config.point_mutation_rate)),
            ..Variation::default()
        };
        let task = Task::new(palette, x, y.to_vec(), loss)?
            .with_weights(weights.map(<[f64]>::to_vec))
            .with_variation(variation)
            .with_parsimony(config.parsimony_coefficient);

        let ga = SimpleGA::builder()
            .population_size(config.population_size)
            .max_generations(config.generations)
            .elite_count(config.elite_count)
            .crossover_probability(config.p_subtree_crossover)
            .selection(TournamentSelection::new(config.tournament_size))
            .parallel_evaluation(config.parallel)
            .build()?;

        let level = if verbose { Level::Info } else { Level::Debug };
        let rng = &mut self.rng;
        let result = ga.run_with_observer(
            |rng: &mut StdRng| Program::random(&task, rng),
            rng,
            |stats, best| {
                if !log::log_enabled!(level) {
                    return;
                }
                match progress(eval_metric.as_ref(), best, x, y, validation) {
                    Ok(message) => log::log!(level, "generation {}: {}", stats.generation, message),
                    Err(e) => log::debug!("generation {}: scoring failed: {}", stats.generation, e),
                }
            },
        )?;

        let mut best_root = result.best_genome.root;
        let mut best_fitness = result.best_fitness;
        log::log!(
            level,
            "search finished after {} generations and {} evaluations, best fitness {:.6}",
            result.generations,
            result.evaluations,
            best_fitness
        );

        if config.polish_best {
            let program = Program::new(best_root.clone(), &task);
            match polish(config, &program, rng)? {
                Some((polished, fitness)) if fitness < best_fitness => {
                    log::log!(level, "polishing improved fitness {:.6} -> {:.6}", best_fitness, fitness);
                    best_root = polished;
                    best_fitness = fitness;
                }
                Some((_, fitness)) => {
                    log::debug!("polishing kept the best program (tuned fitness {:.6})", fitness)
                }
                None => log::debug!("best program has no constants to polish"),
            }
        }

        self.task = Some(task);
        self.best = Some(best_root);
        self.best_fitness = best_fitness;
        Ok(())
    }

    /// Fit on a [`Dataset`], optionally reporting scores on a validation
    /// dataset
    pub fn fit_dataset(
        &mut self,
        train: &Dataset,
        validation: Option<&Dataset>,
        verbose: bool,
    ) -> GpResult<()> {
        let validation = validation.map(ValidationSet::from);
        self.fit(train.x(), train.y(), None, validation.as_ref(), verbose)
    }

    /// The best program found by the last search
    pub fn best_program(&self) -> GpResult<Program<'_>> {
        match (&self.best, &self.task) {
            (Some(root), Some(task)) => Ok(Program::new(root.clone(), task)),
            _ => Err(GpError::NotFitted),
        }
    }

    /// Predict one value per row with the best program
    pub fn predict(&self, x: &[Vec<f64>], proba: bool) -> GpResult<Vec<f64>> {
        self.best_program()?.predict(x, proba)
    }

    /// Predict a single row with the best program
    pub fn predict_partial(&self, x: &[f64], proba: bool) -> GpResult<f64> {
        self.best_program()?.predict_partial(x, proba)
    }
}

/// Train and validation scores of `program` under `metric`
fn progress(
    metric: &dyn Metric,
    program: &Program<'_>,
    x: &[Vec<f64>],
    y: &[f64],
    validation: Option<&ValidationSet>,
) -> GpResult<String> {
    let proba = metric.needs_probabilities();
    let train = metric.apply(y, &program.predict(x, proba)?, None)?;
    let mut message = format!("train {}: {:.5}", metric.name(), train);
    if let Some(val) = validation {
        let y_pred = program.predict(&val.x, proba)?;
        let score = metric.apply(&val.y, &y_pred, val.weights.as_deref())?;
        message.push_str(&format!(", val {}: {:.5}", metric.name(), score));
    }
    Ok(message)
}

/// Re-optimize the constants of `program` with a short numeric search.
/// Returns the tuned tree and its fitness, or `None` when there is nothing
/// to tune.
fn polish<R: Rng>(
    config: &GpConfig,
    program: &Program<'_>,
    rng: &mut R,
) -> GpResult<Option<(Operator, f64)>> {
    let tuner = ProgramTuner::new(program).with_mutation_rate(config.tuning_mutation_rate);
    if tuner.is_empty() {
        return Ok(None);
    }
    let ga = SimpleGA::builder()
        .population_size(config.tuning_population_size)
        .max_generations(config.tuning_generations)
        .elite_count(1)
        .selection(TournamentSelection::new(config.tournament_size))
        .parallel_evaluation(config.parallel)
        .build()?;
    let result = ga.run(|rng: &mut R| tuner.jittered(rng), rng)?;
    let tuned = result.best_genome.into_program();
    Ok(Some((tuned.root, result.best_fitness)))
}

/// Number of distinct values in `y`
fn count_distinct(y: &[f64]) -> usize {
    let mut values = y.to_vec();
    values.sort_by(f64::total_cmp);
    values.dedup_by(|a, b| a.total_cmp(b).is_eq());
    values.len()
}
