//! Check verdicts.
//!
//! A verdict is the exit code plus message produced by one check invocation.
//! Passing verdicts carry no message; failing verdicts always say what was
//! searched for and what was actually observed.

use std::fmt;

/// Outcome of a single check invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    exit_code: i32,
    message: String,
}

impl Verdict {
    /// A passing verdict.
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            exit_code: 0,
            message: String::new(),
        }
    }

    /// A failing verdict naming the intent, the searched value and the
    /// observed candidates.
    ///
    /// The full candidate list is always rendered so a mismatch (typo, case,
    /// missing resource) is visible without re-running.
    #[must_use]
    pub fn fail(intent: &str, specified: impl fmt::Display, actual: &[String]) -> Self {
        Self {
            exit_code: 1,
            message: format!(
                "{intent}:\n\tSpecified: {specified}\n\tActual: {}",
                render_candidates(actual)
            ),
        }
    }

    /// Returns true if the check passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.exit_code == 0
    }

    /// Process exit code for this verdict (0 = pass).
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Diagnostic message; empty when passed.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            write!(f, "passed")
        } else {
            write!(f, "{}", self.message)
        }
    }
}

fn render_candidates(actual: &[String]) -> String {
    format!("[{}]", actual.join(", "))
}
