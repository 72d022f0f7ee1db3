//! Programs
//!
//! A [`Program`] is an expression tree bound to a [`Task`]: the training data,
//! the loss metric and the random operator source needed to evaluate and vary
//! it. Programs borrow their task, so a task outlives every program built for
//! it and never changes while they exist.

use rand::Rng;

use crate::dataset;
use crate::error::{DatasetError, GpResult};
use crate::genome::palette::Palette;
use crate::genome::traits::Evolvable;
use crate::metrics::Metric;
use crate::op::Operator;
use crate::operators::crossover::SubtreeCrossover;
use crate::operators::mutation::{HoistMutation, PointMutation, SubtreeMutation};
use crate::operators::traits::{TreeCrossover, TreeMutation};

/// Mutation probabilities and operators applied by [`Program::mutate`]
#[derive(Clone, Debug, Default)]
pub struct Variation {
    /// Probability of applying point mutation
    pub p_point_mutation: f64,
    /// Probability of applying subtree mutation
    pub p_subtree_mutation: f64,
    /// Probability of applying hoist mutation
    pub p_hoist_mutation: f64,
    pub point_mutation: PointMutation,
    pub subtree_mutation: SubtreeMutation,
    pub hoist_mutation: HoistMutation,
    pub crossover: SubtreeCrossover,
}

/// Everything a program needs besides its tree
#[derive(Debug)]
pub struct Task {
    /// Random operator source
    pub palette: Palette,
    /// Variation settings
    pub variation: Variation,
    columns: Vec<Vec<f64>>,
    n_features: usize,
    y: Vec<f64>,
    weights: Option<Vec<f64>>,
    loss: Box<dyn Metric>,
    parsimony_coefficient: f64,
}

impl Task {
    /// Bind training rows and targets to a loss metric
    pub fn new(palette: Palette, x: &[Vec<f64>], y: Vec<f64>, loss: Box<dyn Metric>) -> GpResult<Self> {
        dataset::validate(x, &y)?;
        Ok(Self {
            palette,
            variation: Variation::default(),
            columns: dataset::to_columns(x),
            n_features: x.first().map_or(0, Vec::len),
            y,
            weights: None,
            loss,
            parsimony_coefficient: 0.0,
        })
    }

    /// Weight each training row
    pub fn with_weights(mut self, weights: Option<Vec<f64>>) -> Self {
        self.weights = weights;
        self
    }

    /// Set the variation settings
    pub fn with_variation(mut self, variation: Variation) -> Self {
        self.variation = variation;
        self
    }

    /// Penalise each tree node by `coefficient`
    pub fn with_parsimony(mut self, coefficient: f64) -> Self {
        self.parsimony_coefficient = coefficient;
        self
    }

    /// Loss metric
    pub fn loss(&self) -> &dyn Metric {
        self.loss.as_ref()
    }

    /// Whether programs are binary classifiers
    pub fn classification(&self) -> bool {
        self.loss.classification()
    }

    /// Number of features in each training row
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Training targets
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Training weights
    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }
}

/// An expression tree bound to its task
#[derive(Clone, Debug)]
pub struct Program<'a> {
    pub root: Operator,
    task: &'a Task,
}

impl<'a> Program<'a> {
    /// Bind `root` to `task`
    pub fn new(root: Operator, task: &'a Task) -> Self {
        Self { root, task }
    }

    /// Random program drawn from the task's palette
    pub fn random<R: Rng>(task: &'a Task, rng: &mut R) -> Self {
        Self::new(task.palette.new_tree(rng), task)
    }

    /// The task this program is bound to
    pub fn task(&self) -> &'a Task {
        self.task
    }

    /// Predict one value per row.
    ///
    /// For classification tasks the raw output is a logit: `proba` yields
    /// `sigmoid(raw)`, otherwise the class `1` when `raw > 0` and `0` else.
    /// Every row must have the training width.
    pub fn predict(&self, x: &[Vec<f64>], proba: bool) -> GpResult<Vec<f64>> {
        dataset::check_rows(x)?;
        dataset::check_width(x, self.task.n_features)?;
        let y = self.root.eval_rows(&dataset::to_columns(x), x.len());
        Ok(self.finish(y, proba))
    }

    /// Predict a single row
    pub fn predict_partial(&self, x: &[f64], proba: bool) -> GpResult<f64> {
        if x.len() != self.task.n_features {
            return Err(DatasetError::FeatureMismatch {
                expected: self.task.n_features,
                actual: x.len(),
            }
            .into());
        }
        let raw = self.root.eval_row(x);
        Ok(self.output(raw, proba))
    }

    fn finish(&self, mut y: Vec<f64>, proba: bool) -> Vec<f64> {
        if self.task.classification() {
            for v in y.iter_mut() {
                *v = self.output(*v, proba);
            }
        }
        y
    }

    fn output(&self, raw: f64, proba: bool) -> f64 {
        if !self.task.classification() {
            return raw;
        }
        if proba {
            sigmoid(raw)
        } else if raw > 0.0 {
            1.0
        } else {
            0.0
        }
    }

    /// Score on the training data; lower is better.
    ///
    /// Metrics where bigger is better are negated and the parsimony penalty
    /// is added.
    pub fn evaluate(&self) -> GpResult<f64> {
        let task = self.task;
        let raw = self.root.eval_rows(&task.columns, task.y.len());
        let y_pred = self.finish(raw, task.loss.needs_probabilities());
        let score = task.loss.apply(&task.y, &y_pred, task.weights())?;
        let loss = if task.loss.bigger_is_better() { -score } else { score };
        Ok(loss + task.parsimony_coefficient * self.root.size() as f64)
    }
}

impl Evolvable for Program<'_> {
    fn evaluate(&self) -> GpResult<f64> {
        Program::evaluate(self)
    }

    fn mutate<R: Rng>(&mut self, rng: &mut R) {
        let task = self.task;
        let variation = &task.variation;
        if rng.gen::<f64>() < variation.p_point_mutation {
            variation.point_mutation.apply(&mut self.root, &task.palette, rng);
        }
        if rng.gen::<f64>() < variation.p_subtree_mutation {
            variation.subtree_mutation.apply(&mut self.root, &task.palette, rng);
        }
        if rng.gen::<f64>() < variation.p_hoist_mutation {
            variation.hoist_mutation.apply(&mut self.root, &task.palette, rng);
        }
    }

    fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> (Self, Self) {
        let mut left = self.clone();
        let mut right = other.clone();
        self.task
            .variation
            .crossover
            .apply(&mut left.root, &mut right.root, rng);
        (left, right)
    }
}

/// Logistic function
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
