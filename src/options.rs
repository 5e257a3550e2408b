//! Pass-through policy and interceptor options.
//!
//! The policy decides which intercepted methods also reach the real sink.
//! Configuration accepts either a uniform boolean or an explicit method
//! list, and a process-wide environment flag can force everything through
//! at call time.

use serde::{Deserialize, Serialize};

use crate::method::{Method, MethodSet};

/// Environment variable that forces pass-through for every method.
///
/// Checked fresh on every intercepted call, so toggling it mid-run takes
/// effect immediately. Truthy values are `1`, `true`, `yes`, and `on`
/// (case-insensitive); anything else leaves the configured options in
/// charge.
pub const PASSTHROUGH_ENV: &str = "CONSOLE_SPY_PASSTHROUGH";

// =============================================================================
// PassThrough
// =============================================================================

/// Which intercepted methods are forwarded to the real sink after recording.
///
/// Serializes as the boolean-or-list configuration shape: `true` is
/// [`PassThrough::All`], `false` is [`PassThrough::None`], and a method list
/// such as `["warn", "error"]` is [`PassThrough::Only`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PassThroughRepr", into = "PassThroughRepr")]
pub enum PassThrough {
    /// Record only; nothing reaches the real sink. The default.
    #[default]
    None,
    /// Every method is forwarded after recording.
    All,
    /// Only the listed methods are forwarded.
    Only(MethodSet),
}

impl PassThrough {
    /// Pass through only the given methods.
    #[must_use]
    pub fn only<I: IntoIterator<Item = Method>>(methods: I) -> Self {
        Self::Only(methods.into_iter().collect())
    }

    /// Whether this policy forwards `method`.
    #[must_use]
    pub const fn allows(self, method: Method) -> bool {
        match self {
            Self::None => false,
            Self::All => true,
            Self::Only(set) => set.contains(method),
        }
    }
}

impl From<bool> for PassThrough {
    fn from(uniform: bool) -> Self {
        if uniform { Self::All } else { Self::None }
    }
}

impl<const N: usize> From<[Method; N]> for PassThrough {
    fn from(methods: [Method; N]) -> Self {
        Self::Only(methods.into())
    }
}

impl From<MethodSet> for PassThrough {
    fn from(set: MethodSet) -> Self {
        Self::Only(set)
    }
}

/// Wire shape: a uniform boolean or an explicit method list.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PassThroughRepr {
    Uniform(bool),
    Methods(Vec<Method>),
}

impl From<PassThroughRepr> for PassThrough {
    fn from(repr: PassThroughRepr) -> Self {
        match repr {
            PassThroughRepr::Uniform(uniform) => uniform.into(),
            PassThroughRepr::Methods(methods) => Self::Only(methods.into_iter().collect()),
        }
    }
}

impl From<PassThrough> for PassThroughRepr {
    fn from(policy: PassThrough) -> Self {
        match policy {
            PassThrough::None => Self::Uniform(false),
            PassThrough::All => Self::Uniform(true),
            PassThrough::Only(set) => Self::Methods(set.methods()),
        }
    }
}

// =============================================================================
// Options
// =============================================================================

/// Options accepted at install time and by per-test overrides.
///
/// Deserializes from configuration such as `{ "pass_through": ["warn"] }`.
/// The field may be omitted entirely, in which case nothing passes through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Which methods also reach the real sink.
    pub pass_through: PassThrough,
}

impl Options {
    /// Options with the given pass-through policy.
    #[must_use]
    pub const fn new(pass_through: PassThrough) -> Self {
        Self { pass_through }
    }
}

impl From<PassThrough> for Options {
    fn from(pass_through: PassThrough) -> Self {
        Self { pass_through }
    }
}

impl From<bool> for Options {
    fn from(uniform: bool) -> Self {
        Self {
            pass_through: uniform.into(),
        }
    }
}

impl<const N: usize> From<[Method; N]> for Options {
    fn from(methods: [Method; N]) -> Self {
        Self {
            pass_through: methods.into(),
        }
    }
}

// =============================================================================
// Environment flag
// =============================================================================

/// Whether the environment forces pass-through for all methods.
///
/// Reads [`PASSTHROUGH_ENV`] fresh on every call; nothing is cached.
#[must_use]
pub fn passthrough_forced() -> bool {
    std::env::var(PASSTHROUGH_ENV).is_ok_and(|value| is_truthy(&value))
}

/// Boolean-like parsing for the environment flag.
fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_passes_nothing() {
        let policy = PassThrough::default();
        for method in Method::ALL {
            assert!(!policy.allows(method));
        }
    }

    #[test]
    fn uniform_policies() {
        assert_eq!(PassThrough::from(true), PassThrough::All);
        assert_eq!(PassThrough::from(false), PassThrough::None);
        for method in Method::ALL {
            assert!(PassThrough::All.allows(method));
        }
    }

    #[test]
    fn subset_policy_allows_only_members() {
        let policy = PassThrough::only([Method::Warn, Method::Error]);
        assert!(!policy.allows(Method::Log));
        assert!(policy.allows(Method::Warn));
        assert!(policy.allows(Method::Error));
    }

    #[test]
    fn empty_subset_behaves_like_none() {
        let policy = PassThrough::only([]);
        for method in Method::ALL {
            assert!(!policy.allows(method));
        }
    }

    #[test]
    fn options_conversions() {
        assert_eq!(Options::from(true).pass_through, PassThrough::All);
        assert_eq!(Options::from(PassThrough::All).pass_through, PassThrough::All);
        assert_eq!(
            Options::from([Method::Log]).pass_through,
            PassThrough::only([Method::Log])
        );
        assert_eq!(Options::default().pass_through, PassThrough::None);
    }

    #[test]
    fn truthy_values() {
        for value in ["1", "true", "True", "YES", "on", " on "] {
            assert!(is_truthy(value), "{value:?} should be truthy");
        }
        for value in ["", "0", "false", "no", "off", "2", "enabled"] {
            assert!(!is_truthy(value), "{value:?} should not be truthy");
        }
    }
}
