//! Scoring metrics
//!
//! This module provides the `Metric` trait consumed by programs and the GP
//! estimator, and the built-in regression and classification metrics.

pub mod classification;
pub mod regression;

use std::fmt::Debug;

use crate::error::MetricError;

pub use classification::{Accuracy, LogLoss};
pub use regression::{MeanAbsoluteError, MeanSquaredError, RootMeanSquaredError, R2};

/// A score computed from true and predicted values
pub trait Metric: Debug + Send + Sync {
    /// Score `y_pred` against `y_true`, optionally weighting each observation
    fn apply(&self, y_true: &[f64], y_pred: &[f64], weights: Option<&[f64]>)
        -> Result<f64, MetricError>;

    /// Whether predictions must be probabilities rather than classes
    fn needs_probabilities(&self) -> bool {
        false
    }

    /// Whether this metric scores a classification task
    fn classification(&self) -> bool {
        false
    }

    /// Whether a bigger score is a better score
    fn bigger_is_better(&self) -> bool {
        false
    }

    /// Short name, as accepted by [`metric_by_name`]
    fn name(&self) -> &'static str;
}

/// Look up a built-in metric by name
pub fn metric_by_name(name: &str) -> Result<Box<dyn Metric>, MetricError> {
    let metric: Box<dyn Metric> = match name {
        "mae" => Box::new(MeanAbsoluteError),
        "mse" => Box::new(MeanSquaredError),
        "rmse" => Box::new(RootMeanSquaredError),
        "r2" => Box::new(R2),
        "logloss" => Box::new(LogLoss),
        "accuracy" => Box::new(Accuracy),
        _ => return Err(MetricError::UnknownMetric(name.to_string())),
    };
    Ok(metric)
}

/// Validate input shapes shared by all metrics
pub(crate) fn check_inputs(
    y_true: &[f64],
    y_pred: &[f64],
    weights: Option<&[f64]>,
) -> Result<(), MetricError> {
    if y_true.is_empty() {
        return Err(MetricError::Empty);
    }
    if y_pred.len() != y_true.len() {
        return Err(MetricError::LengthMismatch {
            expected: y_true.len(),
            actual: y_pred.len(),
        });
    }
    if let Some(w) = weights {
        if w.len() != y_true.len() {
            return Err(MetricError::WeightsMismatch {
                expected: y_true.len(),
                actual: w.len(),
            });
        }
    }
    Ok(())
}

/// Weighted mean of `values`; unit weights when `weights` is `None`
pub(crate) fn weighted_mean<I>(values: I, weights: Option<&[f64]>) -> f64
where
    I: Iterator<Item = f64>,
{
    match weights {
        None => {
            let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
            sum / n as f64
        }
        Some(w) => {
            let total: f64 = w.iter().sum();
            values.zip(w).map(|(v, wi)| v * wi).sum::<f64>() / total
        }
    }
}

pub mod prelude {
    pub use super::classification::*;
    pub use super::regression::*;
    pub use super::{metric_by_name, Metric};
}
