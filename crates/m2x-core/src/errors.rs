//! Structured error types shared across m2x crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`M2xError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (lines, counts, type ids, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for m2x.
///
/// Every family except [`M2xError::Config`] and [`M2xError::Input`] is scoped
/// to a single event: the stream skips the event and continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum M2xError {
    /// A particle entry could not be turned into a record.
    #[error("record error: {0}")]
    Record(ErrorInfo),
    /// A parent chain could not be resolved (reference cycle).
    #[error("ancestry error: {0}")]
    Ancestry(ErrorInfo),
    /// The event is not a two-branch topology.
    #[error("topology error: {0}")]
    Topology(ErrorInfo),
    /// The hypothesised invisible sector is unphysical for this event.
    #[error("hypothesis error: {0}")]
    Hypothesis(ErrorInfo),
    /// The external solver rejected its input or failed to converge.
    #[error("solver error: {0}")]
    Solver(ErrorInfo),
    /// Configuration could not be loaded or is inconsistent.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// The event stream could not be opened or read.
    #[error("input error: {0}")]
    Input(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl M2xError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            M2xError::Record(info)
            | M2xError::Ancestry(info)
            | M2xError::Topology(info)
            | M2xError::Hypothesis(info)
            | M2xError::Solver(info)
            | M2xError::Config(info)
            | M2xError::Input(info) => info,
        }
    }

    /// Returns the stable code of the payload.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Returns whether processing may continue with the next event.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, M2xError::Config(_) | M2xError::Input(_))
    }

    /// Adds a context entry to the payload, keeping the error family.
    pub fn with_context(self, key: impl Into<String>, value: impl ToString) -> Self {
        match self {
            M2xError::Record(info) => M2xError::Record(info.with_context(key, value)),
            M2xError::Ancestry(info) => M2xError::Ancestry(info.with_context(key, value)),
            M2xError::Topology(info) => M2xError::Topology(info.with_context(key, value)),
            M2xError::Hypothesis(info) => M2xError::Hypothesis(info.with_context(key, value)),
            M2xError::Solver(info) => M2xError::Solver(info.with_context(key, value)),
            M2xError::Config(info) => M2xError::Config(info.with_context(key, value)),
            M2xError::Input(info) => M2xError::Input(info.with_context(key, value)),
        }
    }
}
