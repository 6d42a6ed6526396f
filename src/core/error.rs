//! Error types for host-probe.
//!
//! Errors fall into three groups. Configuration errors (unknown check, wrong
//! parameter count, bad pattern, unreadable config) are the caller's fault.
//! Acquisition errors mean the probe could not observe the host at all; they
//! are fatal for the whole run. Everything else is I/O or internal.
//!
//! A check that runs and simply does not find its target is not an error, it
//! is a failing [`Verdict`](crate::core::verdict::Verdict).

use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in host-probe.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // =========================================================================
    // Configuration errors
    // =========================================================================
    /// Configuration file not found.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path where config was expected.
        path: PathBuf,
    },

    /// Failed to parse configuration file.
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        /// Description of the parse error.
        message: String,
        /// Underlying parser error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {field} - {message}")]
    ConfigInvalid {
        /// Field name that is invalid.
        field: String,
        /// Description of why it's invalid.
        message: String,
    },

    /// No check is registered under this name.
    #[error("Unknown check: {name}")]
    UnknownCheck {
        /// Name that was looked up.
        name: String,
    },

    /// A check was invoked with the wrong number of parameters.
    #[error("Check '{name}' expects {expected} parameter(s), got {actual}")]
    ArityMismatch {
        /// Name of the check.
        name: String,
        /// Registered parameter count.
        expected: usize,
        /// Number of parameters supplied.
        actual: usize,
    },

    /// A user-supplied regular expression did not compile.
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as given.
        pattern: String,
        /// Compilation error.
        #[source]
        source: regex::Error,
    },

    // =========================================================================
    // Acquisition errors (fatal)
    // =========================================================================
    /// The external command was refused for lack of privilege.
    #[error("Permission denied when running: {operation}")]
    PermissionDenied {
        /// The command line that was refused.
        operation: String,
    },

    /// The external command exited non-zero.
    #[error("Error while running `{operation}` (exit code {exit_code})\n\t{output}")]
    CommandFailed {
        /// The command line that failed.
        operation: String,
        /// Exit code reported by the command.
        exit_code: i32,
        /// Combined stdout/stderr of the command.
        output: String,
    },

    /// The external command did not finish in time.
    #[error("`{operation}` timed out after {timeout}")]
    CommandTimeout {
        /// The command line that timed out.
        operation: String,
        /// Timeout duration as string.
        timeout: String,
    },

    /// Command not found.
    #[error("Command not found: {command}")]
    CommandNotFound {
        /// The command that wasn't found.
        command: String,
    },

    /// A Docker API client could not be built for the endpoint.
    #[error("Couldn't create Docker API client for {endpoint}: {message}")]
    ApiConnect {
        /// Endpoint locator.
        endpoint: String,
        /// Underlying client error.
        message: String,
    },

    /// A Docker API call failed.
    #[error("Docker API call failed: {operation} - {message}")]
    ApiRequest {
        /// Name of the API operation.
        operation: String,
        /// Underlying client error.
        message: String,
    },

    // =========================================================================
    // I/O errors
    // =========================================================================
    /// File I/O error.
    #[error("I/O error: {message}")]
    Io {
        /// Description of what failed.
        message: String,
        /// Source error.
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Internal errors
    // =========================================================================
    /// Internal error (should never happen).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl Error {
    /// Creates a new configuration parse error with source.
    pub fn config_parse_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Creates a new I/O error with context.
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Creates a new command failed error.
    pub fn command_failed(
        operation: impl Into<String>,
        exit_code: i32,
        output: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            operation: operation.into(),
            exit_code,
            output: output.into(),
        }
    }

    /// Creates a new API request error.
    pub fn api_request(operation: impl Into<String>, message: impl ToString) -> Self {
        Self::ApiRequest {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Returns true if the error means the check list itself is wrong.
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. }
                | Self::ConfigParse { .. }
                | Self::ConfigInvalid { .. }
                | Self::UnknownCheck { .. }
                | Self::ArityMismatch { .. }
                | Self::InvalidPattern { .. }
        )
    }

    /// Returns true if host state could not be acquired.
    ///
    /// Unknown state is neither a pass nor a fail, so a run stops here.
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied { .. }
                | Self::CommandFailed { .. }
                | Self::CommandTimeout { .. }
                | Self::CommandNotFound { .. }
                | Self::ApiConnect { .. }
                | Self::ApiRequest { .. }
        )
    }

    /// Returns an exit code appropriate for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandTimeout { .. } => 124, // Standard timeout exit code
            Self::ConfigNotFound { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. }
            | Self::UnknownCheck { .. }
            | Self::ArityMismatch { .. }
            | Self::InvalidPattern { .. } => 78, // EX_CONFIG
            Self::PermissionDenied { .. } => 77, // EX_NOPERM
            Self::CommandFailed { .. }
            | Self::CommandNotFound { .. }
            | Self::ApiConnect { .. }
            | Self::ApiRequest { .. } => 69, // EX_UNAVAILABLE
            _ => 1,
        }
    }
}
