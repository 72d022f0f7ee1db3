//! GP configuration
//!
//! [`GpConfig`] gathers every setting of a run. It is a plain serde struct,
//! so a configuration can be stored as JSON and loaded back; missing fields
//! take their default value.

use serde::{Deserialize, Serialize};

use crate::error::{GpError, GpResult};
use crate::genome::palette::Initializer;
use crate::gp::estimator::Gp;
use crate::metrics::{metric_by_name, Metric};
use crate::op::{parse_functions, Function};

/// Settings of a GP run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpConfig {
    /// Metric minimized during the search
    pub loss_metric: String,
    /// Metric reported in progress logs, defaults to the loss metric
    pub eval_metric: Option<String>,
    /// Comma separated names of the enabled functions
    pub functions: String,
    /// Lower bound of random constants
    pub const_min: f64,
    /// Upper bound of random constants
    pub const_max: f64,
    /// Probability that a generated leaf is a constant
    pub p_constant: f64,
    /// Probability of stopping a branch early when growing a tree
    pub p_terminal: f64,
    pub min_height: usize,
    pub max_height: usize,
    pub initializer: Initializer,

    pub population_size: usize,
    /// Number of generations bred after the initial population
    pub generations: usize,
    pub tournament_size: usize,
    pub elite_count: usize,
    /// Probability that offspring are produced by subtree crossover
    pub p_subtree_crossover: f64,
    pub p_point_mutation: f64,
    /// Per-node rewrite probability inside point mutation
    pub point_mutation_rate: f64,
    pub p_subtree_mutation: f64,
    pub p_hoist_mutation: f64,
    /// Fitness penalty per tree node
    pub parsimony_coefficient: f64,

    /// Re-optimize the constants of the best program after the search
    pub polish_best: bool,
    pub tuning_generations: usize,
    pub tuning_population_size: usize,
    /// Per-constant jitter probability during tuning
    pub tuning_mutation_rate: f64,

    /// Seed of the random source, drawn from entropy when absent
    pub seed: Option<u64>,
    /// Evaluate populations in parallel
    pub parallel: bool,
}

impl Default for GpConfig {
    fn default() -> Self {
        Self {
            loss_metric: "mae".to_string(),
            eval_metric: None,
            functions: "sum,sub,mul,div".to_string(),
            const_min: -5.0,
            const_max: 5.0,
            p_constant: 0.5,
            p_terminal: 0.3,
            min_height: 3,
            max_height: 5,
            initializer: Initializer::RampedHalfAndHalf,
            population_size: 100,
            generations: 30,
            tournament_size: 3,
            elite_count: 1,
            p_subtree_crossover: 0.5,
            p_point_mutation: 0.1,
            point_mutation_rate: 0.3,
            p_subtree_mutation: 0.1,
            p_hoist_mutation: 0.1,
            parsimony_coefficient: 0.0,
            polish_best: true,
            tuning_generations: 10,
            tuning_population_size: 30,
            tuning_mutation_rate: 0.8,
            seed: None,
            parallel: true,
        }
    }
}

impl GpConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_loss_metric(mut self, name: impl Into<String>) -> Self {
        self.loss_metric = name.into();
        self
    }

    pub fn with_eval_metric(mut self, name: impl Into<String>) -> Self {
        self.eval_metric = Some(name.into());
        self
    }

    pub fn with_functions(mut self, functions: impl Into<String>) -> Self {
        self.functions = functions.into();
        self
    }

    pub fn with_const_range(mut self, min: f64, max: f64) -> Self {
        self.const_min = min;
        self.const_max = max;
        self
    }

    pub fn with_heights(mut self, min: usize, max: usize) -> Self {
        self.min_height = min;
        self.max_height = max;
        self
    }

    pub fn with_initializer(mut self, initializer: Initializer) -> Self {
        self.initializer = initializer;
        self
    }

    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    pub fn with_elite_count(mut self, count: usize) -> Self {
        self.elite_count = count;
        self
    }

    /// Set the crossover and mutation probabilities
    pub fn with_variation(
        mut self,
        p_subtree_crossover: f64,
        p_point_mutation: f64,
        p_subtree_mutation: f64,
        p_hoist_mutation: f64,
    ) -> Self {
        self.p_subtree_crossover = p_subtree_crossover;
        self.p_point_mutation = p_point_mutation;
        self.p_subtree_mutation = p_subtree_mutation;
        self.p_hoist_mutation = p_hoist_mutation;
        self
    }

    pub fn with_parsimony(mut self, coefficient: f64) -> Self {
        self.parsimony_coefficient = coefficient;
        self
    }

    pub fn with_polish_best(mut self, polish: bool) -> Self {
        self.polish_best = polish;
        self
    }

    /// Set the tuning generations and population size
    pub fn with_tuning(mut self, generations: usize, population_size: usize) -> Self {
        self.tuning_generations = generations;
        self.tuning_population_size = population_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enabled functions, in the order they are listed
    pub fn parsed_functions(&self) -> GpResult<Vec<Function>> {
        Ok(parse_functions(&self.functions)?)
    }

    /// The loss metric
    pub fn loss(&self) -> GpResult<Box<dyn Metric>> {
        Ok(metric_by_name(&self.loss_metric)?)
    }

    /// The evaluation metric, falling back to the loss metric
    pub fn eval(&self) -> GpResult<Box<dyn Metric>> {
        Ok(metric_by_name(
            self.eval_metric.as_deref().unwrap_or(&self.loss_metric),
        )?)
    }

    /// Check that every setting is usable
    pub fn validate(&self) -> GpResult<()> {
        if self.parsed_functions()?.is_empty() {
            return Err(GpError::Configuration(
                "At least one function must be enabled".to_string(),
            ));
        }
        self.loss()?;
        self.eval()?;
        if !(self.const_min <= self.const_max) {
            return Err(GpError::Configuration(format!(
                "Constant range [{}, {}] is empty",
                self.const_min, self.const_max
            )));
        }
        if self.min_height > self.max_height {
            return Err(GpError::Configuration(format!(
                "Minimum height {} exceeds maximum height {}",
                self.min_height, self.max_height
            )));
        }
        for (name, p) in [
            ("p_constant", self.p_constant),
            ("p_terminal", self.p_terminal),
            ("p_subtree_crossover", self.p_subtree_crossover),
            ("p_point_mutation", self.p_point_mutation),
            ("point_mutation_rate", self.point_mutation_rate),
            ("p_subtree_mutation", self.p_subtree_mutation),
            ("p_hoist_mutation", self.p_hoist_mutation),
            ("tuning_mutation_rate", self.tuning_mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(GpError::Configuration(format!(
                    "{} must lie in [0, 1], got {}",
                    name, p
                )));
            }
        }
        if self.population_size == 0 {
            return Err(GpError::Configuration(
                "Population size must be positive".to_string(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(GpError::Configuration(
                "Tournament size must be positive".to_string(),
            ));
        }
        if self.elite_count > self.population_size {
            return Err(GpError::Configuration(format!(
                "Elite count {} exceeds population size {}",
                self.elite_count, self.population_size
            )));
        }
        if self.polish_best && self.tuning_population_size == 0 {
            return Err(GpError::Configuration(
                "Tuning population size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate and build an estimator
    pub fn build(self) -> GpResult<Gp> {
        Gp::new(self)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> GpResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON and validate
    pub fn from_json(json: &str) -> GpResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MetricError, ParseError};

    #[test]
    fn test_default_is_valid() {
        GpConfig::default().validate().unwrap();
        assert_eq!(GpConfig::default().parsed_functions().unwrap().len(), 4);
    }

    #[test]
    fn test_eval_metric_falls_back_to_loss() {
        let config = GpConfig::new().with_loss_metric("mse");
        assert_eq!(config.eval().unwrap().name(), "mse");
        let config = config.with_eval_metric("r2");
        assert_eq!(config.eval().unwrap().name(), "r2");
    }

    #[test]
    fn test_validation_rejects_bad_settings() {
        let bad = [
            GpConfig::new().with_functions(""),
            GpConfig::new().with_const_range(1.0, -1.0),
            GpConfig::new().with_heights(4, 2),
            GpConfig::new().with_population_size(0),
            GpConfig::new().with_tournament_size(0),
            GpConfig::new().with_population_size(2).with_elite_count(3),
            GpConfig::new().with_variation(1.5, 0.1, 0.1, 0.1),
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(GpError::Configuration(_))),
                "{:?} should be rejected",
                config
            );
        }
    }

    #[test]
    fn test_validation_reports_unknown_names() {
        assert!(matches!(
            GpConfig::new().with_functions("sum,tan").validate(),
            Err(GpError::Parse(ParseError::UnknownOperator(_)))
        ));
        assert!(matches!(
            GpConfig::new().with_loss_metric("huber").validate(),
            Err(GpError::Metric(MetricError::UnknownMetric(_)))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let config = GpConfig::new()
            .with_loss_metric("logloss")
            .with_functions("sum,mul,cos")
            .with_initializer(Initializer::Grow)
            .with_seed(7);
        let json = config.to_json().unwrap();
        assert!(json.contains("\"initializer\": \"grow\""));
        assert_eq!(GpConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_json_missing_fields_take_defaults() {
        let config = GpConfig::from_json(r#"{"generations": 5, "functions": "mul"}"#).unwrap();
        assert_eq!(config.generations, 5);
        assert_eq!(config.functions, "mul");
        assert_eq!(config.population_size, 100);
        assert_eq!(config.loss_metric, "mae");
    }

    #[test]
    fn test_json_invalid_config_is_rejected() {
        assert!(matches!(
            GpConfig::from_json(r#"{"population_size": 0}"#),
            Err(GpError::Configuration(_))
        ));
        assert!(matches!(GpConfig::from_json("{"), Err(GpError::Json(_))));
    }
}
