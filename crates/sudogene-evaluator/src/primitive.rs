//! Primitive operations: the internal nodes of a heuristic program.
//!
//! A primitive combines the scores of its left and right subtrees. Every operator is
//! total: division and modulo by zero return the left operand instead of a non-finite
//! value.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ExprError;

/// A binary operator combining two subtree scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PrimitiveOp {
    /// `a + b`
    Plus,
    /// `|a - b|`
    Minus,
    /// `a * b`
    Multi,
    /// `a / b`, or `a` when `b == 0`
    Div,
    /// `a % b`, or `a` when `b == 0`
    Mod,
    Maximum,
    Minimum,
}

impl PrimitiveOp {
    pub const ALL: [Self; 7] = [
        Self::Plus,
        Self::Minus,
        Self::Multi,
        Self::Div,
        Self::Mod,
        Self::Maximum,
        Self::Minimum,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Plus => "Plus",
            Self::Minus => "Minus",
            Self::Multi => "Multi",
            Self::Div => "div",
            Self::Mod => "Mod",
            Self::Maximum => "Maximum",
            Self::Minimum => "Minimum",
        }
    }

    /// Operator symbol used in infix rendering.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Multi => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Maximum => "Max",
            Self::Minimum => "Min",
        }
    }

    #[must_use]
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Self::Plus => left + right,
            // always non-negative
            Self::Minus => (left - right).abs(),
            Self::Multi => left * right,
            Self::Div => {
                if right == 0.0 {
                    left
                } else {
                    left / right
                }
            }
            Self::Mod => {
                if right == 0.0 {
                    left
                } else {
                    left % right
                }
            }
            Self::Maximum => {
                if left >= right {
                    left
                } else {
                    right
                }
            }
            Self::Minimum => {
                if left <= right {
                    left
                } else {
                    right
                }
            }
        }
    }
}

impl fmt::Display for PrimitiveOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PrimitiveOp {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| ExprError::UnknownPrimitive(s.to_owned()))
    }
}

impl TryFrom<String> for PrimitiveOp {
    type Error = ExprError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PrimitiveOp> for String {
    fn from(op: PrimitiveOp) -> Self {
        op.name().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        assert_eq!(PrimitiveOp::Plus.apply(3.0, 4.0), 7.0);
        assert_eq!(PrimitiveOp::Multi.apply(3.0, 4.0), 12.0);
        assert_eq!(PrimitiveOp::Div.apply(3.0, 4.0), 0.75);
        assert_eq!(PrimitiveOp::Mod.apply(7.0, 4.0), 3.0);
        assert_eq!(PrimitiveOp::Maximum.apply(3.0, 4.0), 4.0);
        assert_eq!(PrimitiveOp::Minimum.apply(3.0, 4.0), 3.0);
    }

    #[test]
    fn test_minus_is_absolute_difference() {
        assert_eq!(PrimitiveOp::Minus.apply(3.0, 4.0), 1.0);
        assert_eq!(PrimitiveOp::Minus.apply(4.0, 3.0), 1.0);
        assert_eq!(PrimitiveOp::Minus.apply(-2.0, 5.0), 7.0);
    }

    #[test]
    fn test_division_by_zero_falls_back_to_left() {
        assert_eq!(PrimitiveOp::Div.apply(5.0, 0.0), 5.0);
        assert_eq!(PrimitiveOp::Mod.apply(5.0, 0.0), 5.0);
        assert_eq!(PrimitiveOp::Div.apply(0.0, 0.0), 0.0);
        assert!(PrimitiveOp::Div.apply(5.0, -0.0).is_finite());
    }

    #[test]
    fn test_symbols() {
        let symbols: Vec<_> = PrimitiveOp::ALL.iter().map(|op| op.symbol()).collect();
        assert_eq!(symbols, ["+", "-", "*", "/", "%", "Max", "Min"]);
    }

    #[test]
    fn test_names_round_trip() {
        for op in PrimitiveOp::ALL {
            assert_eq!(op.name().parse::<PrimitiveOp>().unwrap(), op);
        }
        assert_eq!(
            "Pow".parse::<PrimitiveOp>().unwrap_err(),
            ExprError::UnknownPrimitive("Pow".to_owned())
        );
    }
}
