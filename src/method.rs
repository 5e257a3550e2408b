//! The fixed set of console methods subject to interception.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Method
// =============================================================================

/// A console output method that can be intercepted.
///
/// The set is fixed: informational output, warnings, and errors. There are
/// no further levels and no user-defined methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Log,
    Warn,
    Error,
}

impl Method {
    /// All methods, in dispatch order.
    pub const ALL: [Self; 3] = [Self::Log, Self::Warn, Self::Error];

    /// Lowercase name, as it appears in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Parse from a configuration string (case-insensitive).
    ///
    /// Accepts the canonical names plus the common aliases `warning` and
    /// `err`.
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "log" => Some(Self::Log),
            "warn" | "warning" => Some(Self::Warn),
            "error" | "err" => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown method name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown console method: {0:?} (expected log, warn, or error)")]
pub struct ParseMethodError(String);

impl FromStr for Method {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_arg(s).ok_or_else(|| ParseMethodError(s.to_string()))
    }
}

// =============================================================================
// MethodSet
// =============================================================================

/// A small set of [`Method`]s.
///
/// Backs the selective pass-through policy; the three methods fit in one
/// byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MethodSet {
    bits: u8,
}

impl MethodSet {
    /// The empty set.
    pub const EMPTY: Self = Self { bits: 0 };

    const fn bit(method: Method) -> u8 {
        match method {
            Method::Log => 1,
            Method::Warn => 1 << 1,
            Method::Error => 1 << 2,
        }
    }

    /// Whether `method` is in the set.
    #[must_use]
    pub const fn contains(self, method: Method) -> bool {
        self.bits & Self::bit(method) != 0
    }

    /// Add `method` to the set. Adding a member twice is a no-op.
    pub fn insert(&mut self, method: Method) {
        self.bits |= Self::bit(method);
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Number of methods in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    /// The contained methods, in dispatch order.
    #[must_use]
    pub fn methods(self) -> Vec<Method> {
        Method::ALL
            .into_iter()
            .filter(|method| self.contains(*method))
            .collect()
    }
}

impl FromIterator<Method> for MethodSet {
    fn from_iter<I: IntoIterator<Item = Method>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for method in iter {
            set.insert(method);
        }
        set
    }
}

impl<const N: usize> From<[Method; N]> for MethodSet {
    fn from(methods: [Method; N]) -> Self {
        methods.into_iter().collect()
    }
}

impl From<&[Method]> for MethodSet {
    fn from(methods: &[Method]) -> Self {
        methods.iter().copied().collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
