use thiserror::Error;

use crate::services::conversation::{COST_FAILURE_TEXT, GUIDANCE_TEXT, SUMMARY_FAILURE_TEXT};

/// Per-turn pipeline failure, caught at the conversation boundary and mapped
/// to a stable user-facing reply.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("range parse error: {0}")]
    Parse(#[from] costbot_core::RangeParseError),
    #[error("billing error: {0}")]
    Billing(#[from] billing::BillingError),
    #[error("model error: {0}")]
    Model(#[from] completion::CompletionError),
}

impl AppError {
    /// The short apologetic reply sent when this failure ends a turn.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Parse(_) => GUIDANCE_TEXT,
            Self::Billing(_) => COST_FAILURE_TEXT,
            Self::Model(_) => SUMMARY_FAILURE_TEXT,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
