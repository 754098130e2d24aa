//! Error types for onboard-assist.

use crate::onboarding::{Deliverable, OnboardingStage};

/// Top-level error type for the interactive session.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Generation endpoint errors.
///
/// Callers that must never fail go through [`crate::llm::respond`], which
/// renders these into the text shown in place of a draft.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API Error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the onboarding flows.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("Cannot complete {requested}: onboarding is at {current}")]
    StageMismatch {
        requested: OnboardingStage,
        current: OnboardingStage,
    },

    #[error("Onboarding is already complete")]
    AlreadyComplete,

    #[error("Unknown deliverable: {0}")]
    UnknownDeliverable(String),

    #[error("Unknown department: {0}")]
    UnknownDepartment(String),

    #[error("{0} cannot be sent")]
    NotSendable(Deliverable),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid start date {value:?}: expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("Employee not found: {0}")]
    EmployeeNotFound(String),

    #[error("{0} has not been generated yet; it is drafted at {stage}", stage = .0.stage())]
    NotGenerated(Deliverable),

    #[error("No {deliverable} draft for {employee} yet")]
    NoDraft {
        employee: String,
        deliverable: Deliverable,
    },
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
