//! Quantity adjustment rules.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// A one-unit change to a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityDelta {
    /// Add one unit.
    Increment,
    /// Take one unit away.
    Decrement,
}

impl QuantityDelta {
    /// The signed change this delta applies.
    #[must_use]
    pub fn value(self) -> i32 {
        match self {
            Self::Increment => 1,
            Self::Decrement => -1,
        }
    }
}

/// What a decrement does to a line that would drop below one unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroQuantityPolicy {
    /// Delete the line and report quantity 0.
    #[default]
    Remove,
    /// Keep the line at zero units; further decrements leave it there.
    Keep,
    /// Refuse the decrement and leave the line unchanged.
    Reject,
}

impl fmt::Display for ZeroQuantityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Remove => "remove",
            Self::Keep => "keep",
            Self::Reject => "reject",
        })
    }
}

/// Error returned when parsing an unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown zero-quantity policy {0:?} (expected remove, keep or reject)")]
pub struct UnknownPolicy(pub String);

impl FromStr for ZeroQuantityPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remove" => Ok(Self::Remove),
            "keep" => Ok(Self::Keep),
            "reject" => Ok(Self::Reject),
            _ => Err(UnknownPolicy(s.to_owned())),
        }
    }
}
