//! Error types for the fee and performance engine

use chrono::NaiveDate;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, EngineError>;

/// Top-level error type.
///
/// `InvalidInput`, `NoValidData` and `Convergence` are raised by the
/// computation core. The remaining variants come from the loading layer.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("no valid observation with an asset value on or before {as_of}")]
    NoValidData { as_of: NaiveDate },

    #[error("IRR did not converge after {iterations} iterations: {reason}")]
    Convergence { reason: String, iterations: u32 },

    #[error("investor {investor} not found in investor directory")]
    UnknownInvestor { investor: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("fetching remote sheet: {0}")]
    Http(#[from] reqwest::Error),
}

impl EngineError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Malformed series, mismatched lengths, or an unknown identifier
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidInput { .. } | EngineError::UnknownInvestor { .. }
        )
    }

    /// Process exit code used by the command-line binaries
    pub fn exit_code(&self) -> u8 {
        match self {
            EngineError::Io(_)
            | EngineError::Csv(_)
            | EngineError::Json(_)
            | EngineError::Http(_) => 1,
            EngineError::InvalidInput { .. } | EngineError::UnknownInvestor { .. } => 2,
            EngineError::NoValidData { .. } => 3,
            EngineError::Convergence { .. } => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_investor_is_invalid_input() {
        let err = EngineError::UnknownInvestor {
            investor: "nobody@example.com".to_string(),
        };
        assert!(err.is_invalid_input());
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("nobody@example.com"));
    }

    #[test]
    fn test_no_valid_data_message() {
        let as_of = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let err = EngineError::NoValidData { as_of };
        assert!(!err.is_invalid_input());
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("2025-01-31"));
    }
}
