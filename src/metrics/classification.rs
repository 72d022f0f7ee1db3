//! Binary classification metrics
//!
//! Targets are coded `0` and `1`.

use super::{check_inputs, weighted_mean, Metric};
use crate::error::MetricError;

/// Probabilities are clipped to `[EPS, 1 - EPS]` before taking logarithms
const EPS: f64 = 1e-15;

/// Binary cross-entropy on predicted probabilities
#[derive(Clone, Copy, Debug, Default)]
pub struct LogLoss;

impl Metric for LogLoss {
    fn apply(
        &self,
        y_true: &[f64],
        y_pred: &[f64],
        weights: Option<&[f64]>,
    ) -> Result<f64, MetricError> {
        check_inputs(y_true, y_pred, weights)?;
        let losses = y_true.iter().zip(y_pred).map(|(&t, &p)| {
            let p = p.clamp(EPS, 1.0 - EPS);
            -(t * p.ln() + (1.0 - t) * (1.0 - p).ln())
        });
        Ok(weighted_mean(losses, weights))
    }

    fn needs_probabilities(&self) -> bool {
        true
    }

    fn classification(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "logloss"
    }
}

/// Fraction of predicted classes equal to the true class
#[derive(Clone, Copy, Debug, Default)]
pub struct Accuracy;

impl Metric for Accuracy {
    fn apply(
        &self,
        y_true: &[f64],
        y_pred: &[f64],
        weights: Option<&[f64]>,
    ) -> Result<f64, MetricError> {
        check_inputs(y_true, y_pred, weights)?;
        let hits = y_true
            .iter()
            .zip(y_pred)
            .map(|(t, p)| if t == p { 1.0 } else { 0.0 });
        Ok(weighted_mean(hits, weights))
    }

    fn classification(&self) -> bool {
        true
    }

    fn bigger_is_better(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "accuracy"
    }
}
