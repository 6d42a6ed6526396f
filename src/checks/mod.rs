//! Check handlers and the comparisons they share.
//!
//! Every handler follows the same shape: acquire a list of identifiers, test
//! the target against it with one of the helpers below, and render a
//! [`Verdict`](crate::core::verdict::Verdict).

pub mod builtin;
pub mod docker;

use crate::core::error::{Error, Result};
use regex::Regex;

/// Returns true if `target` equals some entry exactly.
#[must_use]
pub fn str_in(target: &str, candidates: &[String]) -> bool {
    candidates.iter().any(|candidate| candidate == target)
}

/// Returns true if `target` is a substring of some entry.
#[must_use]
pub fn str_contained_in(target: &str, candidates: &[String]) -> bool {
    candidates.iter().any(|candidate| candidate.contains(target))
}

/// Returns true if `pattern` matches some entry.
#[must_use]
pub fn re_in(pattern: &Regex, candidates: &[String]) -> bool {
    candidates.iter().any(|candidate| pattern.is_match(candidate))
}

/// Compiles a user-supplied regular expression.
pub fn parse_user_regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
