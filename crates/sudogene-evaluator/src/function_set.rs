//! The terminals and primitives a program may be built from.

use rand::{Rng, seq::IndexedRandom as _};

use crate::{ExprError, primitive::PrimitiveOp, terminal::TerminalOp};

/// Immutable set of operations available to program generation.
///
/// Both lists are guaranteed non-empty, so random picks always succeed. Duplicates are
/// kept: listing an operation twice doubles its chance of being picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSet {
    terminals: Vec<TerminalOp>,
    primitives: Vec<PrimitiveOp>,
}

impl FunctionSet {
    pub fn new(
        terminals: Vec<TerminalOp>,
        primitives: Vec<PrimitiveOp>,
    ) -> Result<Self, ExprError> {
        if terminals.is_empty() {
            return Err(ExprError::EmptyTerminalSet);
        }
        if primitives.is_empty() {
            return Err(ExprError::EmptyPrimitiveSet);
        }
        Ok(Self {
            terminals,
            primitives,
        })
    }

    /// Every supported terminal and primitive, in declaration order.
    #[must_use]
    pub fn all() -> Self {
        Self {
            terminals: TerminalOp::ALL.to_vec(),
            primitives: PrimitiveOp::ALL.to_vec(),
        }
    }

    /// Builds a set from operation names, failing on the first unknown one.
    pub fn from_names<T, P>(terminals: &[T], primitives: &[P]) -> Result<Self, ExprError>
    where
        T: AsRef<str>,
        P: AsRef<str>,
    {
        let terminals = terminals
            .iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<_, _>>()?;
        let primitives = primitives
            .iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<_, _>>()?;
        Self::new(terminals, primitives)
    }

    #[must_use]
    pub fn terminals(&self) -> &[TerminalOp] {
        &self.terminals
    }

    #[must_use]
    pub fn primitives(&self) -> &[PrimitiveOp] {
        &self.primitives
    }

    /// Picks a terminal uniformly at random.
    pub fn choose_terminal<R>(&self, rng: &mut R) -> TerminalOp
    where
        R: Rng + ?Sized,
    {
        *self
            .terminals
            .choose(rng)
            .expect("terminal set should never be empty")
    }

    /// Picks a primitive uniformly at random.
    pub fn choose_primitive<R>(&self, rng: &mut R) -> PrimitiveOp
    where
        R: Rng + ?Sized,
    {
        *self
            .primitives
            .choose(rng)
            .expect("primitive set should never be empty")
    }
}

impl Default for FunctionSet {
    fn default() -> Self {
        Self::all()
    }
}
