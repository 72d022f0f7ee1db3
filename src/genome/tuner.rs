//! Constant tuning
//!
//! A [`ProgramTuner`] freezes the shape of a program and exposes its constant
//! leaves as a flat vector, so that a numeric search can re-optimize them.
//! Each constant is addressed by a [`ConstantSetter`] holding the path of its
//! leaf. Paths are resolved against whichever copy of the tree is active, so
//! clones never write into each other.

use rand::Rng;

use crate::error::{GpError, GpResult};
use crate::genome::program::Program;
use crate::genome::traits::Evolvable;
use crate::op::Operator;
use crate::operators::crossover::BlendCrossover;
use crate::operators::mutation::GaussianJitter;

/// Writes one constant leaf of a tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstantSetter {
    path: Vec<usize>,
}

impl ConstantSetter {
    /// Setter for the leaf at `path`
    pub fn new(path: Vec<usize>) -> Self {
        Self { path }
    }

    /// Path of the leaf from the root
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Overwrite the constant at this setter's path. Returns `false` when the
    /// path does not lead to a constant in `tree`.
    pub fn set(&self, tree: &mut Operator, value: f64) -> bool {
        match tree.get_subtree_mut(&self.path) {
            Some(Operator::Constant(c)) => {
                *c = value;
                true
            }
            _ => false,
        }
    }
}

/// A program whose constants are evolved as a flat vector
#[derive(Clone, Debug)]
pub struct ProgramTuner<'a> {
    program: Program<'a>,
    constants: Vec<f64>,
    setters: Vec<ConstantSetter>,
    jitter: GaussianJitter,
    blend: BlendCrossover,
}

impl<'a> ProgramTuner<'a> {
    /// Copy `program` and collect its constants in pre-order
    pub fn new(program: &Program<'a>) -> Self {
        let program = program.clone();
        let setters: Vec<ConstantSetter> = program
            .root
            .constant_positions()
            .into_iter()
            .map(ConstantSetter::new)
            .collect();
        let constants = setters
            .iter()
            .filter_map(|s| match program.root.get_subtree(s.path()) {
                Some(Operator::Constant(c)) => Some(*c),
                _ => None,
            })
            .collect();
        Self {
            program,
            constants,
            setters,
            jitter: GaussianJitter::default(),
            blend: BlendCrossover,
        }
    }

    /// Set the per-constant mutation probability
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.jitter = GaussianJitter::new(rate);
        self
    }

    /// Current constant vector
    pub fn constants(&self) -> &[f64] {
        &self.constants
    }

    /// Replace the constant vector.
    ///
    /// Fails with [`GpError::ConstantCount`] unless the length matches
    /// [`Self::len`].
    pub fn set_constants(&mut self, constants: Vec<f64>) -> GpResult<()> {
        if constants.len() != self.setters.len() {
            return Err(GpError::ConstantCount {
                expected: self.setters.len(),
                actual: constants.len(),
            });
        }
        self.constants = constants;
        Ok(())
    }

    /// Number of constants
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    /// Whether the program has no constants
    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    /// A copy with every constant jittered, used to seed a tuning population
    pub fn jittered<R: Rng>(&self, rng: &mut R) -> Self {
        let mut tuner = self.clone();
        GaussianJitter::new(1.0).apply(&mut tuner.constants, rng);
        tuner
    }

    /// Write the constant vector into the program's leaves
    pub fn apply_constants(&mut self) {
        for (setter, &value) in self.setters.iter().zip(&self.constants) {
            setter.set(&mut self.program.root, value);
        }
    }

    /// The tuned program
    pub fn into_program(mut self) -> Program<'a> {
        self.apply_constants();
        self.program
    }
}

impl Evolvable for ProgramTuner<'_> {
    fn evaluate(&self) -> GpResult<f64> {
        let mut program = self.program.clone();
        for (setter, &value) in self.setters.iter().zip(&self.constants) {
            setter.set(&mut program.root, value);
        }
        program.evaluate()
    }

    fn mutate<R: Rng>(&mut self, rng: &mut R) {
        self.jitter.apply(&mut self.constants, rng);
    }

    fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> (Self, Self) {
        let (c1, c2) = self.blend.apply(&self.constants, &other.constants, rng);
        let mut o1 = self.clone();
        let mut o2 = self.clone();
        o1.constants = c1;
        o2.constants = c2;
        (o1, o2)
    }
}
