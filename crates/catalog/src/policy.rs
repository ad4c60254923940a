//! Seeding policies.
//!
//! Both policies default to the lenient behavior: a failed clear does not
//! block seeding, and a product whose category or brand cannot be resolved
//! keeps the name written in its definition.

use std::fmt;
use std::str::FromStr;

/// What to do when clearing the catalog collections fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClearPolicy {
    /// Log the failure and keep seeding. The catalog may end up with
    /// duplicate entries next to the stale ones.
    #[default]
    BestEffort,
    /// Abort the run before anything is inserted.
    FailFast,
}

/// What to do when a product references a category or brand that was not
/// inserted in the same run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReferencePolicy {
    /// Store the referenced name as written and log a warning.
    #[default]
    Fallback,
    /// Abort the run before any product is inserted.
    Strict,
}

impl ClearPolicy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BestEffort => "best-effort",
            Self::FailFast => "fail-fast",
        }
    }
}

impl ReferencePolicy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fallback => "fallback",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for ClearPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ReferencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClearPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best-effort" | "best_effort" => Ok(Self::BestEffort),
            "fail-fast" | "fail_fast" => Ok(Self::FailFast),
            other => Err(format!(
                "invalid clear policy: {other} (expected best-effort or fail-fast)"
            )),
        }
    }
}

impl FromStr for ReferencePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fallback" => Ok(Self::Fallback),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "invalid reference policy: {other} (expected fallback or strict)"
            )),
        }
    }
}
