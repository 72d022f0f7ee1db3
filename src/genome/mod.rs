//! Genome abstractions and implementations
//!
//! This module provides the `Evolvable` trait, tree structure queries,
//! random generation, programs and the constant tuner.

pub mod palette;
pub mod program;
pub mod traits;
pub mod tree;
pub mod tuner;

pub mod prelude {
    pub use super::palette::*;
    pub use super::program::*;
    pub use super::traits::*;
    pub use super::tuner::*;
}
