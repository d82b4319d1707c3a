use thiserror::Error;

/// Errors raised while turning raw user input into a [`crate::LoanRequest`]
/// or while converting schedule totals into money amounts.
///
/// The schedule engine itself never fails; these only come from the layers
/// around it.
#[derive(Debug, Error)]
pub enum LoanError {
    #[error("Invalid loan amount: {0:?}")]
    InvalidAmount(String),

    #[error("Invalid loan term: {0:?}")]
    InvalidTerm(String),

    #[error("Invalid interest rate at position {index}: {value:?}")]
    InvalidRate { index: usize, value: String },

    #[error("At least one interest rate is required")]
    MissingRates,

    #[error("Unknown amortization method: {0:?}")]
    UnknownMethod(String),

    #[error("Non-finite value in {field}, cannot express it as money")]
    NonFiniteResult { field: &'static str },

    #[error("Malformed loan input: {0}")]
    Json(#[from] serde_json::Error),
}
