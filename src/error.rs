use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Draft cannot be committed, missing: {0}")]
    IncompleteDraft(String),

    #[error("No card with id {0}")]
    CardNotFound(String),

    #[error("No payment with id {0}")]
    PaymentNotFound(String),

    #[error("Invalid day setting {0}: must be 1-31 or 99 (end of month)")]
    InvalidDaySetting(u32),

    #[error("Invalid month key '{0}': expected YYYY-MM")]
    InvalidMonthKey(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Discarded stale {kind} response (request #{token}, latest is #{latest})")]
    StaleResponse {
        kind: String,
        token: u64,
        latest: u64,
    },

    #[error("The {kind} response for request #{token} was already applied")]
    AlreadySettled { kind: String, token: u64 },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
