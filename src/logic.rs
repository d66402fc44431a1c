//! The six-valued D-calculus logic alphabet.
//!
//! Besides plain `0`, `1` and unknown `X`, the alphabet carries the two
//! sensitized fault values used for stuck-at analysis:
//!
//! - `D`: good circuit 1, faulty circuit 0
//! - `D'`: good circuit 0, faulty circuit 1
//!
//! and an `Error` value that poisons every gate it reaches.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a logic symbol cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid logic symbol '{0}' (expected one of 0, 1, X, D, D', E)")]
pub struct ParseLogicError(pub String);

/// A single value of the D-calculus alphabet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Logic {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
    /// Unknown value. Every flip-flop starts here.
    #[default]
    #[serde(rename = "X", alias = "x")]
    X,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D'", alias = "~D", alias = "DN")]
    NotD,
    #[serde(rename = "E", alias = "ERR", alias = "Error")]
    Error,
}

impl Logic {
    /// All six values, in declaration order.
    pub const ALL: [Logic; 6] = [
        Logic::Zero,
        Logic::One,
        Logic::X,
        Logic::D,
        Logic::NotD,
        Logic::Error,
    ];

    /// Returns the complement of this value.
    ///
    /// `X` and `Error` have no complement.
    pub fn complement(self) -> Option<Logic> {
        match self {
            Logic::Zero => Some(Logic::One),
            Logic::One => Some(Logic::Zero),
            Logic::D => Some(Logic::NotD),
            Logic::NotD => Some(Logic::D),
            Logic::X | Logic::Error => None,
        }
    }

    /// Returns true for the sensitized fault values `D` and `D'`.
    pub fn is_sensitized(self) -> bool {
        matches!(self, Logic::D | Logic::NotD)
    }

    /// Returns true for the fully known Boolean values `0` and `1`.
    pub fn is_known(self) -> bool {
        matches!(self, Logic::Zero | Logic::One)
    }

    /// Canonical text symbol of this value.
    pub fn symbol(self) -> &'static str {
        match self {
            Logic::Zero => "0",
            Logic::One => "1",
            Logic::X => "X",
            Logic::D => "D",
            Logic::NotD => "D'",
            Logic::Error => "E",
        }
    }
}

impl From<bool> for Logic {
    fn from(value: bool) -> Self {
        if value {
            Logic::One
        } else {
            Logic::Zero
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.symbol())
    }
}

impl FromStr for Logic {
    type Err = ParseLogicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Logic::Zero),
            "1" => Ok(Logic::One),
            "X" | "x" => Ok(Logic::X),
            "D" | "d" => Ok(Logic::D),
            "D'" | "d'" | "~D" | "DN" => Ok(Logic::NotD),
            "E" | "ERR" | "Error" => Ok(Logic::Error),
            other => Err(ParseLogicError(other.to_string())),
        }
    }
}
