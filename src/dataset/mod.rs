//! In-memory datasets
//!
//! A [`Dataset`] is a row-major feature matrix with one target value per row,
//! column names and, for categorical targets, a [`ClassMap`] between labels
//! and integer codes.

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// Bidirectional mapping between class labels and integer codes
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMap {
    labels: Vec<String>,
}

impl ClassMap {
    /// Encode labels in order of first appearance, returning the map and the
    /// coded targets.
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> (Self, Vec<f64>) {
        let mut map = Self::default();
        let codes = labels.iter().map(|label| map.encode_or_insert(label.as_ref())).collect();
        (map, codes)
    }

    fn encode_or_insert(&mut self, label: &str) -> f64 {
        match self.encode(label) {
            Some(code) => code,
            None => {
                self.labels.push(label.to_string());
                (self.labels.len() - 1) as f64
            }
        }
    }

    /// Code of `label`
    pub fn encode(&self, label: &str) -> Option<f64> {
        self.labels.iter().position(|l| l == label).map(|i| i as f64)
    }

    /// Label of `code`
    pub fn decode(&self, code: f64) -> Option<&str> {
        if code < 0.0 || code.fract() != 0.0 {
            return None;
        }
        self.labels.get(code as usize).map(String::as_str)
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no class has been seen
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Feature matrix with targets
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    x: Vec<Vec<f64>>,
    x_names: Vec<String>,
    y: Vec<f64>,
    y_name: String,
    class_map: Option<ClassMap>,
}

impl Dataset {
    /// Create a dataset, checking that every row has the same width and that
    /// there is one target per row. Features are named `x0`, `x1`, ...
    pub fn new(x: Vec<Vec<f64>>, y: Vec<f64>) -> Result<Self, DatasetError> {
        validate(&x, &y)?;
        let width = x[0].len();
        Ok(Self {
            x,
            x_names: (0..width).map(|i| format!("x{}", i)).collect(),
            y,
            y_name: "y".to_string(),
            class_map: None,
        })
    }

    /// Create a classification dataset from string labels
    pub fn with_labels<S: AsRef<str>>(x: Vec<Vec<f64>>, labels: &[S]) -> Result<Self, DatasetError> {
        let (class_map, y) = ClassMap::fit(labels);
        let mut dataset = Self::new(x, y)?;
        dataset.class_map = Some(class_map);
        Ok(dataset)
    }

    /// Rename the feature columns and the target
    pub fn with_names(mut self, x_names: Vec<String>, y_name: impl Into<String>) -> Self {
        self.x_names = x_names;
        self.y_name = y_name.into();
        self
    }

    /// Rows of features
    pub fn x(&self) -> &[Vec<f64>] {
        &self.x
    }

    /// Targets
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Feature names
    pub fn x_names(&self) -> &[String] {
        &self.x_names
    }

    /// Target name
    pub fn y_name(&self) -> &str {
        &self.y_name
    }

    /// Class map, for categorical targets
    pub fn class_map(&self) -> Option<&ClassMap> {
        self.class_map.as_ref()
    }

    pub fn n_rows(&self) -> usize {
        self.x.len()
    }

    pub fn n_features(&self) -> usize {
        self.x.first().map_or(0, Vec::len)
    }

    /// `(rows, features + 1)`, counting the target as a column
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_features() + 1)
    }

    /// Number of classes of a categorical target
    pub fn n_classes(&self) -> Result<usize, DatasetError> {
        self.class_map
            .as_ref()
            .map(ClassMap::len)
            .ok_or(DatasetError::NotDiscrete)
    }

    /// Column-major copy of the features, as consumed by [`Operator::eval`]
    ///
    /// [`Operator::eval`]: crate::op::Operator::eval
    pub fn columns(&self) -> Vec<Vec<f64>> {
        to_columns(&self.x)
    }

    /// `k` distinct rows drawn uniformly without replacement
    pub fn sample<R: Rng>(&self, k: usize, rng: &mut R) -> Result<Dataset, DatasetError> {
        if k > self.n_rows() {
            return Err(DatasetError::SampleTooLarge {
                requested: k,
                available: self.n_rows(),
            });
        }
        let indices = index::sample(rng, self.n_rows(), k);
        Ok(Dataset {
            x: indices.iter().map(|i| self.x[i].clone()).collect(),
            x_names: self.x_names.clone(),
            y: indices.iter().map(|i| self.y[i]).collect(),
            y_name: self.y_name.clone(),
            class_map: self.class_map.clone(),
        })
    }
}

/// Check row widths and target length of a row-major matrix
pub fn validate(x: &[Vec<f64>], y: &[f64]) -> Result<(), DatasetError> {
    if x.is_empty() {
        return Err(DatasetError::Empty);
    }
    check_rows(x)?;
    if y.len() != x.len() {
        return Err(DatasetError::ShapeMismatch {
            rows: x.len(),
            targets: y.len(),
        });
    }
    Ok(())
}

/// Check that every row has the width of the first one
pub fn check_rows(x: &[Vec<f64>]) -> Result<(), DatasetError> {
    let expected = x.first().map_or(0, Vec::len);
    match x.iter().enumerate().find(|(_, r)| r.len() != expected) {
        Some((row, r)) => Err(DatasetError::RaggedRows {
            row,
            expected,
            actual: r.len(),
        }),
        None => Ok(()),
    }
}

/// Check that every row has exactly `expected` features
pub fn check_width(x: &[Vec<f64>], expected: usize) -> Result<(), DatasetError> {
    match x.iter().find(|r| r.len() != expected) {
        Some(r) => Err(DatasetError::FeatureMismatch {
            expected,
            actual: r.len(),
        }),
        None => Ok(()),
    }
}

/// Check that a binary target only holds `0` and `1`
pub fn check_binary(y: &[f64]) -> Result<(), DatasetError> {
    let mut bad: Vec<f64> = y.iter().copied().filter(|&v| v != 0.0 && v != 1.0).collect();
    if bad.is_empty() {
        return Ok(());
    }
    bad.sort_by(f64::total_cmp);
    bad.dedup_by(|a, b| a.total_cmp(b).is_eq());
    Err(DatasetError::NonBinaryTarget(bad))
}

/// Transpose row-major features into columns
pub fn to_columns(x: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let width = x.first().map_or(0, Vec::len);
    (0..width)
        .map(|j| x.iter().map(|row| row.get(j).copied().unwrap_or(0.0)).collect())
        .collect()
}

pub mod prelude {
    pub use super::{ClassMap, Dataset};
}
