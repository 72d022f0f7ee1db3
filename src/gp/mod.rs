//! Genetic programming estimator
//!
//! [`GpConfig`] describes a run and builds a [`Gp`], which fits programs to a
//! regression or binary classification target and predicts with the best one.

pub mod config;
pub mod estimator;

pub use config::GpConfig;
pub use estimator::{Gp, ValidationSet};

pub mod prelude {
    pub use super::config::GpConfig;
    pub use super::estimator::{Gp, ValidationSet};
}
