//! Regression metrics

use super::{check_inputs, weighted_mean, Metric};
use crate::error::MetricError;

/// Mean absolute error
#[derive(Clone, Copy, Debug, Default)]
pub struct MeanAbsoluteError;

impl Metric for MeanAbsoluteError {
    fn apply(
        &self,
        y_true: &[f64],
        y_pred: &[f64],
        weights: Option<&[f64]>,
    ) -> Result<f64, MetricError> {
        check_inputs(y_true, y_pred, weights)?;
        let errors = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).abs());
        Ok(weighted_mean(errors, weights))
    }

    fn name(&self) -> &'static str {
        "mae"
    }
}

/// Mean squared error
#[derive(Clone, Copy, Debug, Default)]
pub struct MeanSquaredError;

impl Metric for MeanSquaredError {
    fn apply(
        &self,
        y_true: &[f64],
        y_pred: &[f64],
        weights: Option<&[f64]>,
    ) -> Result<f64, MetricError> {
        check_inputs(y_true, y_pred, weights)?;
        let errors = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2));
        Ok(weighted_mean(errors, weights))
    }

    fn name(&self) -> &'static str {
        "mse"
    }
}

/// Root mean squared error
#[derive(Clone, Copy, Debug, Default)]
pub struct RootMeanSquaredError;

impl Metric for RootMeanSquaredError {
    fn apply(
        &self,
        y_true: &[f64],
        y_pred: &[f64],
        weights: Option<&[f64]>,
    ) -> Result<f64, MetricError> {
        Ok(MeanSquaredError.apply(y_true, y_pred, weights)?.sqrt())
    }

    fn name(&self) -> &'static str {
        "rmse"
    }
}

/// Coefficient of determination
///
/// A constant target scores `1` when predicted exactly and `0` otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct R2;

impl Metric for R2 {
    fn apply(
        &self,
        y_true: &[f64],
        y_pred: &[f64],
        weights: Option<&[f64]>,
    ) -> Result<f64, MetricError> {
        check_inputs(y_true, y_pred, weights)?;
        let mean = weighted_mean(y_true.iter().copied(), weights);
        let residual = weighted_mean(y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)), weights);
        let total = weighted_mean(y_true.iter().map(|t| (t - mean).powi(2)), weights);
        if total == 0.0 {
            return Ok(if residual == 0.0 { 1.0 } else { 0.0 });
        }
        Ok(1.0 - residual / total)
    }

    fn bigger_is_better(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "r2"
    }
}
