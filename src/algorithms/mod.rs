//! Evolutionary algorithms
//!
//! This module provides the generational search engine.

pub mod simple_ga;

pub mod prelude {
    pub use super::simple_ga::*;
}
