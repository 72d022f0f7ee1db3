//! # koza
//!
//! Symbolic regression and binary classification with genetic programming.
//!
//! Programs are expression trees over feature columns, constants and a small
//! set of arithmetic functions. A generational genetic algorithm evolves them
//! with point, subtree and hoist mutation and subtree crossover, and the
//! constants of the best program can then be polished by a second numeric
//! search over a flat vector.
//!
//! ## Core Concepts
//!
//! - **Operators**: a closed sum type with vectorized evaluation, protected
//!   division, simplification, symbolic differentiation and a textual form
//! - **Evolvable genomes**: anything that can be evaluated, mutated and
//!   crossed over, such as a [`genome::program::Program`] or a
//!   [`genome::tuner::ProgramTuner`]
//! - **Estimator**: [`gp::Gp`] ties the palette, the engine and the metrics
//!   together behind `fit` and `predict`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use koza::prelude::*;
//!
//! let x = vec![vec![1.0], vec![2.0], vec![3.0]];
//! let y = vec![2.0, 4.0, 6.0];
//!
//! let mut gp = GpConfig::new()
//!     .with_loss_metric("mse")
//!     .with_functions("mul")
//!     .with_seed(42)
//!     .build()?;
//! gp.fit(&x, &y, None, None, true)?;
//! println!("{}", gp.best_program()?.root);
//! let y_pred = gp.predict(&x, false)?;
//! ```

pub mod algorithms;
pub mod dataset;
pub mod diagnostics;
pub mod error;
pub mod genome;
pub mod gp;
pub mod metrics;
pub mod op;
pub mod operators;
pub mod population;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::prelude::*;
    pub use crate::dataset::prelude::*;
    pub use crate::diagnostics::prelude::*;
    pub use crate::error::*;
    pub use crate::genome::prelude::*;
    pub use crate::gp::prelude::*;
    pub use crate::metrics::prelude::*;
    pub use crate::op::prelude::*;
    pub use crate::operators::prelude::*;
    pub use crate::population::prelude::*;
}
