//! Execution error types shared by every machine
//!
//! This module defines [`ErrorKind`], the closed taxonomy of failures a machine can
//! report, and [`ExecutionError`], which pairs a kind with whatever output had been
//! produced before the failing step.
//!
//! Static errors (bracket mismatch, malformed digraphs) are raised before any
//! instruction runs, so their partial output is always empty. Dynamic errors keep the
//! output accumulated up to the failing step.

use serde::Serialize;
use thiserror::Error;

/// What went wrong during a run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// A loop-open or loop-close has no partner
    #[error("Unmatched bracket at position {position}")]
    UnmatchedBracket { position: usize },

    /// A memory or stack access fell outside the machine's bounds
    #[error("Pointer out of bounds at position {position}")]
    PointerOutOfBounds { position: usize },

    /// The step ceiling was reached before the program halted
    #[error("Step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64 },

    /// A token sequence could not be decoded into an instruction or literal
    #[error("Malformed literal {text:?} at position {position}")]
    MalformedLiteral { position: usize, text: String },

    /// The caller's cancellation token was set
    #[error("Execution cancelled")]
    Cancelled,
}

impl ErrorKind {
    pub fn position(&self) -> Option<usize> {
        match self {
            ErrorKind::UnmatchedBracket { position } => Some(*position),
            ErrorKind::PointerOutOfBounds { position } => Some(*position),
            ErrorKind::MalformedLiteral { position, .. } => Some(*position),
            ErrorKind::StepLimitExceeded { .. } => None,
            ErrorKind::Cancelled => None,
        }
    }

    /// Stable tag used in serialized reports
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::UnmatchedBracket { .. } => "UnmatchedBracket",
            ErrorKind::PointerOutOfBounds { .. } => "PointerOutOfBounds",
            ErrorKind::StepLimitExceeded { .. } => "StepLimitExceeded",
            ErrorKind::MalformedLiteral { .. } => "MalformedLiteral",
            ErrorKind::Cancelled => "Cancelled",
        }
    }
}

/// A failed run: the error kind plus the output emitted before it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ExecutionError {
    kind: ErrorKind,
    partial_output: String,
}

impl ExecutionError {
    pub fn new(kind: ErrorKind, partial_output: String) -> Self {
        ExecutionError {
            kind,
            partial_output,
        }
    }

    /// An error detected before execution started
    pub fn before_execution(kind: ErrorKind) -> Self {
        Self::new(kind, String::new())
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn position(&self) -> Option<usize> {
        self.kind.position()
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn partial_output(&self) -> &str {
        &self.partial_output
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind_name(),
            message: self.message(),
            position: self.position(),
            partial_output: self.partial_output.clone(),
        }
    }
}

/// Serializable failure shape handed to the surrounding application
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    pub partial_output: String,
}
