//! Evolvable programs and the individual contract.
//!
//! # Genetic Operators
//!
//! Operators never edit their inputs: each one clones the parent tree and edits the
//! clone, so a parent stays valid (and keeps its cached fitness) in the old generation.
//!
//! ## Mutation
//!
//! Picks an insertion depth `d` uniformly in `[1, h)` where `h` is the measured tree
//! height (`d = 1` when `h <= 1`), walks `d` random left/right steps from the root while
//! the current node is a primitive, and replaces the landing node with a new full
//! subtree of height `h - steps`. The result keeps height `h`.
//!
//! ## Crossover
//!
//! Picks one of the receiver's root children as the splice target and one of the donor's
//! root children as the source, each uniformly, and replaces the target with a copy of
//! the source. The resulting height is measured from the new tree.

use std::sync::Arc;

use rand::Rng;
use sudogene_evaluator::{
    ExprError,
    expr::{ExprNode, Side},
    function_set::FunctionSet,
};

/// Fitness of an individual that solves its puzzle.
pub const IDEAL_FITNESS: usize = 0;

/// A value the genetic operators can vary.
pub trait Variable: Sized {
    /// Returns a randomly altered copy of `self`.
    #[must_use]
    fn mutate<R>(&self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized;

    /// Returns a copy of `self` with genetic material taken from `other`.
    #[must_use]
    fn crossover<R>(&self, other: &Self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized;
}

/// A member of an evolving population.
///
/// Fitness is lower-is-better. It is computed at most once per individual; genetic
/// operators always produce new individuals instead of re-scoring old ones.
pub trait Individual: Variable + Clone {
    /// Returns a fresh individual of the same shape with a new random program.
    #[must_use]
    fn regenerate<R>(&self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized;

    fn program(&self) -> &Program;

    fn fitness(&self) -> usize;

    fn is_ideal(&self) -> bool {
        self.fitness() == IDEAL_FITNESS
    }
}

/// A heuristic program: an expression tree plus the operations it may be rebuilt from.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    tree: ExprNode,
    height: usize,
    function_set: Arc<FunctionSet>,
}

impl Program {
    /// Creates a random full tree of `height`.
    ///
    /// A whole program needs at least one primitive, so `height` must be at least `1`.
    pub fn random<R>(
        height: usize,
        function_set: Arc<FunctionSet>,
        rng: &mut R,
    ) -> Result<Self, ExprError>
    where
        R: Rng + ?Sized,
    {
        if height < 1 {
            return Err(ExprError::InvalidHeight(height));
        }
        let tree = ExprNode::generate_full(height, &function_set, rng);
        Ok(Self {
            tree,
            height,
            function_set,
        })
    }

    /// Wraps an existing tree, measuring its height.
    #[must_use]
    pub fn from_tree(tree: ExprNode, function_set: Arc<FunctionSet>) -> Self {
        let height = tree.height();
        Self {
            tree,
            height,
            function_set,
        }
    }

    #[must_use]
    pub fn tree(&self) -> &ExprNode {
        &self.tree
    }

    /// Height recorded when the program was built.
    ///
    /// Always equal to [`ExprNode::height`] of [`Self::tree`].
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn function_set(&self) -> &Arc<FunctionSet> {
        &self.function_set
    }

    #[must_use]
    pub fn to_prefix(&self) -> String {
        self.tree.to_prefix()
    }

    #[must_use]
    pub fn to_infix(&self) -> String {
        self.tree.to_infix()
    }

    /// Returns a new random program with the same height and function set.
    #[must_use]
    pub fn regenerate<R>(&self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            tree: ExprNode::generate_full(self.height, &self.function_set, rng),
            height: self.height,
            function_set: Arc::clone(&self.function_set),
        }
    }
}

impl Variable for Program {
    fn mutate<R>(&self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut tree = self.tree.clone();
        let height = tree.height();
        let depth = if height > 1 {
            rng.random_range(1..height)
        } else {
            1
        };

        let mut path = Vec::with_capacity(depth);
        let mut node = &tree;
        while path.len() < depth && node.is_primitive() {
            let side = Side::random(rng);
            let Some(child) = node.child(side) else {
                break;
            };
            node = child;
            path.push(side);
        }

        let subtree = ExprNode::generate_full(height - path.len(), &self.function_set, rng);
        tree.replace_subtree(&path, subtree)
            .expect("mutation path only crosses primitive nodes");
        Self::from_tree(tree, Arc::clone(&self.function_set))
    }

    fn crossover<R>(&self, other: &Self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let target = Side::random(rng);
        let source = Side::random(rng);

        let mut tree = self.tree.clone();
        if let Some(donor) = other.tree.child(source).filter(|_| tree.is_primitive()) {
            tree.replace_subtree(&[target], donor.clone())
                .expect("root of the receiver is a primitive");
        }
        Self::from_tree(tree, Arc::clone(&self.function_set))
    }
}
