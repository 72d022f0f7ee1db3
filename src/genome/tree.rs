//! Tree traversal and subtree addressing
//!
//! An [`Operator`] owns its operands, so every operator is also a tree. This
//! module adds the structural queries used by the variation operators: walks,
//! height and size, and paths. A path is the sequence of operand indices that
//! leads from the root to a node; the empty path is the root itself.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::op::Operator;

impl Operator {
    /// Pre-order walk. The visitor receives each node and its depth and
    /// returns `true` to stop the walk. Returns `true` if the walk stopped
    /// early.
    pub fn walk<F>(&self, visitor: &mut F) -> bool
    where
        F: FnMut(&Operator, usize) -> bool,
    {
        self.walk_at(0, visitor)
    }

    fn walk_at<F>(&self, depth: usize, visitor: &mut F) -> bool
    where
        F: FnMut(&Operator, usize) -> bool,
    {
        if visitor(self, depth) {
            return true;
        }
        for i in 0..self.arity() {
            if let Some(child) = self.operand(i) {
                if child.walk_at(depth + 1, visitor) {
                    return true;
                }
            }
        }
        false
    }

    /// Pre-order walk with mutable access. The visitor may rewrite the node
    /// in place; the walk then descends into the rewritten node's operands.
    pub fn walk_mut<F>(&mut self, visitor: &mut F) -> bool
    where
        F: FnMut(&mut Operator, usize) -> bool,
    {
        self.walk_mut_at(0, visitor)
    }

    fn walk_mut_at<F>(&mut self, depth: usize, visitor: &mut F) -> bool
    where
        F: FnMut(&mut Operator, usize) -> bool,
    {
        if visitor(self, depth) {
            return true;
        }
        for i in 0..self.arity() {
            if let Some(child) = self.operand_mut(i) {
                if child.walk_mut_at(depth + 1, visitor) {
                    return true;
                }
            }
        }
        false
    }

    /// Longest root-to-leaf edge count; a leaf has height 0
    pub fn height(&self) -> usize {
        match self {
            Self::Constant(_) | Self::Variable(_) => 0,
            Self::Unary(_, a) => 1 + a.height(),
            Self::Binary(_, a, b) => 1 + a.height().max(b.height()),
        }
    }

    /// Number of nodes
    pub fn size(&self) -> usize {
        let mut n = 0;
        self.walk(&mut |_, _| {
            n += 1;
            false
        });
        n
    }

    /// Paths of all nodes in pre-order
    pub fn positions(&self) -> Vec<Vec<usize>> {
        let mut positions = Vec::new();
        self.collect_positions(&mut Vec::new(), &mut |_, path| positions.push(path.to_vec()));
        positions
    }

    /// Paths of constant leaves in pre-order
    pub fn constant_positions(&self) -> Vec<Vec<usize>> {
        let mut positions = Vec::new();
        self.collect_positions(&mut Vec::new(), &mut |node, path| {
            if node.is_constant() {
                positions.push(path.to_vec());
            }
        });
        positions
    }

    fn collect_positions<F>(&self, path: &mut Vec<usize>, visit: &mut F)
    where
        F: FnMut(&Operator, &[usize]),
    {
        visit(self, path);
        for i in 0..self.arity() {
            if let Some(child) = self.operand(i) {
                path.push(i);
                child.collect_positions(path, visit);
                path.pop();
            }
        }
    }

    /// Subtree at `path`
    pub fn get_subtree(&self, path: &[usize]) -> Option<&Operator> {
        match path.split_first() {
            None => Some(self),
            Some((&i, rest)) => self.operand(i)?.get_subtree(rest),
        }
    }

    /// Mutable subtree at `path`
    pub fn get_subtree_mut(&mut self, path: &[usize]) -> Option<&mut Operator> {
        match path.split_first() {
            None => Some(self),
            Some((&i, rest)) => self.operand_mut(i)?.get_subtree_mut(rest),
        }
    }

    /// Replace the subtree at `path`. Returns `false` when the path does not
    /// address a node.
    pub fn replace_subtree(&mut self, path: &[usize], subtree: Operator) -> bool {
        match self.get_subtree_mut(path) {
            Some(slot) => {
                *slot = subtree;
                true
            }
            None => false,
        }
    }

    /// Uniformly pick the path of a node whose height lies in `[lo, hi]`.
    ///
    /// Returns `None` when no node qualifies.
    pub fn pick_subtree<R: Rng>(&self, lo: usize, hi: usize, rng: &mut R) -> Option<Vec<usize>> {
        let mut candidates = Vec::new();
        self.collect_positions(&mut Vec::new(), &mut |node, path| {
            let h = node.height();
            if lo <= h && h <= hi {
                candidates.push(path.to_vec());
            }
        });
        candidates.choose(rng).cloned()
    }

    /// Uniformly pick the path of any node
    pub fn random_position<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
        let positions = self.positions();
        let idx = rng.gen_range(0..positions.len());
        positions[idx].clone()
    }
}
