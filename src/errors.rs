//! Error handling for the ballot engine

use crate::types::{Alternative, BallotId, VoterId};
use chrono::{DateTime, Utc};

/// Result type alias for the ballot engine
pub type Result<T> = std::result::Result<T, Error>;

/// Malformed ballot parameters or preference lists.
///
/// Always a client input problem; never retried.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("expected {expected} entries, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("alternative {value} is outside 1..={alts}")]
    OutOfRange { value: Alternative, alts: usize },

    #[error("alternative {value} appears more than once")]
    Duplicate { value: Alternative },

    #[error("alternative {missing} is never listed")]
    IncompleteCoverage { missing: Alternative },

    #[error("unknown voting rule: {0}")]
    UnknownRule(String),

    #[error("deadline {deadline} is not in the future")]
    DeadlineInPast { deadline: DateTime<Utc> },

    #[error("a ballot needs at least 2 alternatives, got {alts}")]
    TooFewAlternatives { alts: usize },

    #[error("{alts} alternatives exceeds the configured maximum of {max}")]
    TooManyAlternatives { alts: usize, max: usize },

    #[error("the eligible voter list is empty")]
    NoEligibleVoters,

    #[error("{count} eligible voters exceeds the configured maximum of {max}")]
    TooManyVoters { count: usize, max: usize },

    #[error("approval threshold {threshold} is outside 0..={alts}")]
    InvalidThreshold { threshold: usize, alts: usize },

    #[error("approval ballots require a threshold with every vote")]
    MissingThreshold,
}

/// Rejections of a vote submission. None of them change ballot state.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VoteError {
    #[error("ballot {0} not found")]
    NotFound(BallotId),

    #[error("voter {voter_id} is not eligible on ballot {ballot_id}")]
    Ineligible {
        ballot_id: BallotId,
        voter_id: VoterId,
    },

    #[error("ballot {ballot_id} stopped accepting votes at {deadline}")]
    Expired {
        ballot_id: BallotId,
        deadline: DateTime<Utc>,
    },

    #[error("ballot {0} is closed")]
    Closed(BallotId),

    #[error("voter {voter_id} already voted on ballot {ballot_id}")]
    AlreadyVoted {
        ballot_id: BallotId,
        voter_id: VoterId,
    },

    #[error("invalid preference: {0}")]
    InvalidPreference(#[from] ValidationError),
}

/// Rejections of a result request.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("ballot {0} not found")]
    NotFound(BallotId),

    #[error("ballot {0} has no votes yet")]
    NoVotesYet(BallotId),
}

/// Failures of the tally engine and tie breaker.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TallyError {
    #[error("cannot tally an empty profile")]
    EmptyProfile,

    #[error("{thresholds} thresholds supplied for {voters} voters")]
    ThresholdCountMismatch { voters: usize, thresholds: usize },

    #[error("approval threshold {threshold} exceeds the {alts} alternatives")]
    ThresholdOutOfRange { threshold: usize, alts: usize },

    #[error("no alternative beats every other one pairwise")]
    NoCondorcetWinner,

    #[error("no candidate to break the tie between")]
    NoCandidate,
}

/// Main error type for the ballot engine
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Malformed ballot parameters
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Rejected vote submission
    #[error("Vote rejected: {0}")]
    Vote(#[from] VoteError),

    /// Rejected result request
    #[error("Result unavailable: {0}")]
    Resolve(#[from] ResolveError),

    /// Tally engine failure
    #[error("Tally failed: {0}")]
    Tally(#[from] TallyError),

    /// Unknown ballot outside of voting and resolving
    #[error("Ballot {ballot_id} not found")]
    NotFound { ballot_id: BallotId },

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Convenience macros for creating specific error types
#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::Error::internal($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::internal(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::Error::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::config(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let err: Error = ValidationError::Duplicate { value: 3 }.into();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::Duplicate { value: 3 })
        ));

        let err: Error = TallyError::EmptyProfile.into();
        assert!(matches!(err, Error::Tally(TallyError::EmptyProfile)));

        let vote_err: VoteError = ValidationError::WrongLength {
            expected: 3,
            actual: 2,
        }
        .into();
        assert!(matches!(vote_err, VoteError::InvalidPreference(_)));
    }

    #[test]
    fn test_error_macros() {
        let err = internal_error!("lock poisoned");
        assert!(matches!(err, Error::Internal { .. }));

        let err = config_error!("bad value {}", 7);
        match err {
            Error::Config { message } => assert_eq!(message, "bad value 7"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_error_messages() {
        let err = VoteError::AlreadyVoted {
            ballot_id: "Borda0".to_string(),
            voter_id: "ag_1".to_string(),
        };
        assert_eq!(err.to_string(), "voter ag_1 already voted on ballot Borda0");

        let err = ValidationError::OutOfRange { value: 0, alts: 4 };
        assert_eq!(err.to_string(), "alternative 0 is outside 1..=4");
    }
}
