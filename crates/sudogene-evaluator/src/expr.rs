//! Expression trees: the representation of a heuristic program.
//!
//! A tree node is either a [`TerminalOp`] leaf or a [`PrimitiveOp`] with exactly two
//! children. Children are owned by the node (`Box`), so cloning a tree always yields a
//! fully independent copy and there is a single place where structure is recorded.
//!
//! # Height
//!
//! The height of a terminal is `0`; a primitive is one taller than its tallest child. A
//! *full* tree of height `h` has every terminal at depth `h`. Genetic operators may
//! produce lopsided trees, so [`ExprNode::height`] always measures the actual structure.
//!
//! # Rendering
//!
//! - Prefix: `Plus( countEmptyCellInRow Minimum( numOfOptionsInCell countEmptyCellInCol ) )`
//! - Infix: `(countEmptyCellInRow + (numOfOptionsInCell Min countEmptyCellInCol))`

use std::fmt::{self, Write as _};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    function_set::FunctionSet,
    primitive::PrimitiveOp,
    terminal::{ScoringContext, TerminalOp},
};

/// Which child of a primitive node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Picks either side with equal probability.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        if rng.random_bool(0.5) {
            Side::Left
        } else {
            Side::Right
        }
    }
}

/// A node of a heuristic program, owning its subtrees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprNode {
    Terminal(TerminalOp),
    Primitive {
        op: PrimitiveOp,
        left: Box<ExprNode>,
        right: Box<ExprNode>,
    },
}

impl ExprNode {
    #[must_use]
    pub fn primitive(op: PrimitiveOp, left: ExprNode, right: ExprNode) -> Self {
        Self::Primitive {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Builds a random full tree of exactly `height`.
    ///
    /// Height `0` yields a single random terminal. Otherwise the root is a random
    /// primitive and both subtrees are full trees of `height - 1`, generated left first.
    #[must_use]
    pub fn generate_full<R>(height: usize, function_set: &FunctionSet, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        if height == 0 {
            return Self::Terminal(function_set.choose_terminal(rng));
        }
        let op = function_set.choose_primitive(rng);
        let left = Self::generate_full(height - 1, function_set, rng);
        let right = Self::generate_full(height - 1, function_set, rng);
        Self::primitive(op, left, right)
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }

    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive { .. })
    }

    /// Measures the height of the tree by full traversal.
    #[must_use]
    pub fn height(&self) -> usize {
        match self {
            Self::Terminal(_) => 0,
            Self::Primitive { left, right, .. } => 1 + usize::max(left.height(), right.height()),
        }
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Self::Terminal(_) => 1,
            Self::Primitive { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Returns a child of a primitive, or `None` for a terminal.
    #[must_use]
    pub fn child(&self, side: Side) -> Option<&ExprNode> {
        match (self, side) {
            (Self::Terminal(_), _) => None,
            (Self::Primitive { left, .. }, Side::Left) => Some(left),
            (Self::Primitive { right, .. }, Side::Right) => Some(right),
        }
    }

    /// Follows `path` from this node.
    ///
    /// Returns `None` if the path runs into a terminal before it ends.
    #[must_use]
    pub fn subtree(&self, path: &[Side]) -> Option<&ExprNode> {
        path.iter().try_fold(self, |node, &side| node.child(side))
    }

    /// Replaces the subtree at `path`, returning the subtree that was there.
    ///
    /// Returns `Err(replacement)` untouched if the path runs into a terminal before it
    /// ends.
    pub fn replace_subtree(
        &mut self,
        path: &[Side],
        replacement: ExprNode,
    ) -> Result<ExprNode, ExprNode> {
        let Some((&side, rest)) = path.split_first() else {
            return Ok(std::mem::replace(self, replacement));
        };
        match (self, side) {
            (Self::Terminal(_), _) => Err(replacement),
            (Self::Primitive { left, .. }, Side::Left) => left.replace_subtree(rest, replacement),
            (Self::Primitive { right, .. }, Side::Right) => {
                right.replace_subtree(rest, replacement)
            }
        }
    }

    /// Scores a candidate move. Lower is better.
    #[must_use]
    pub fn evaluate(&self, ctx: &ScoringContext<'_>) -> f64 {
        match self {
            Self::Terminal(op) => op.evaluate(ctx),
            Self::Primitive { op, left, right } => {
                op.apply(left.evaluate(ctx), right.evaluate(ctx))
            }
        }
    }

    /// Renders the tree as a prefix expression, operands separated by two spaces.
    #[must_use]
    pub fn to_prefix(&self) -> String {
        let mut out = String::new();
        self.write_prefix(&mut out);
        out
    }

    fn write_prefix(&self, out: &mut String) {
        match self {
            Self::Terminal(op) => out.push_str(op.name()),
            Self::Primitive { op, left, right } => {
                let _ = write!(out, "{}( ", op.name());
                left.write_prefix(out);
                out.push_str("  ");
                right.write_prefix(out);
                out.push_str(" )");
            }
        }
    }

    /// Renders the tree as a fully parenthesized infix expression.
    #[must_use]
    pub fn to_infix(&self) -> String {
        let mut out = String::new();
        self.write_infix(&mut out);
        out
    }

    fn write_infix(&self, out: &mut String) {
        match self {
            Self::Terminal(op) => out.push_str(op.name()),
            Self::Primitive { op, left, right } => {
                out.push('(');
                left.write_infix(out);
                let _ = write!(out, " {} ", op.symbol());
                right.write_infix(out);
                out.push(')');
            }
        }
    }
}

impl fmt::Display for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_prefix())
    }
}
