//! Error types for the camp rating tracker
//!
//! Operations return `anyhow::Result`; the typed failures a caller may want to
//! react to are raised as [`CampError`] and can be recovered with
//! `downcast_ref::<CampError>()`.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CampError {
    #[error("Unknown player: {name}")]
    UnknownPlayer { name: String },

    #[error("Player already exists: {name}")]
    DuplicatePlayer { name: String },

    #[error("Invalid set score: {reason}")]
    InvalidSetScore { reason: String },

    #[error("Ambiguous match result: both sides won {sets_won} sets")]
    AmbiguousMatchResult { sets_won: u32 },

    #[error("Invalid window: {reason}")]
    InvalidWindow { reason: String },

    #[error("Invalid participants: {reason}")]
    InvalidParticipants { reason: String },

    #[error("Invalid rating: {value} is not a finite number")]
    InvalidRating { value: f64 },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl CampError {
    /// Short machine-friendly name of the error kind, used by the CLI
    pub fn kind(&self) -> &'static str {
        match self {
            CampError::UnknownPlayer { .. } => "UnknownPlayer",
            CampError::DuplicatePlayer { .. } => "DuplicatePlayer",
            CampError::InvalidSetScore { .. } => "InvalidSetScore",
            CampError::AmbiguousMatchResult { .. } => "AmbiguousMatchResult",
            CampError::InvalidWindow { .. } => "InvalidWindow",
            CampError::InvalidParticipants { .. } => "InvalidParticipants",
            CampError::InvalidRating { .. } => "InvalidRating",
            CampError::ConfigurationError { .. } => "ConfigurationError",
            CampError::Storage { .. } => "Storage",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = CampError::UnknownPlayer {
            name: "Zed".to_string(),
        }
        .into();

        let camp = err.downcast_ref::<CampError>().unwrap();
        assert_eq!(camp.kind(), "UnknownPlayer");
        assert_eq!(err.to_string(), "Unknown player: Zed");
    }

    #[test]
    fn test_ambiguous_message() {
        let err = CampError::AmbiguousMatchResult { sets_won: 1 };
        assert_eq!(
            err.to_string(),
            "Ambiguous match result: both sides won 1 sets"
        );
    }
}
