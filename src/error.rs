//! Error taxonomy.
//!
//! Errors are scoped to what they abort:
//! - `ExtractionError`: one structured block. The stream continues.
//! - `MatchError`: one match. Other matches in the log are unaffected;
//!   the failure is reported as a `MatchFailure` carrying the match id.
//! - `LogError`: the whole log.
//! - `RegistryError`: loading the card database.

use thiserror::Error;

use crate::core::{InstanceId, MatchId};

/// A structured block that could not be decoded. Skipped, never fatal.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("undecodable structured block at byte {offset}: {source}")]
    Decode {
        offset: u64,
        #[source]
        source: serde_json::Error,
    },

    #[error("structured block at byte {offset} is cut short by the next log line")]
    Unterminated { offset: u64 },
}

impl ExtractionError {
    /// Byte offset of the rejected block.
    #[must_use]
    pub fn offset(&self) -> u64 {
        match self {
            ExtractionError::Decode { offset, .. } | ExtractionError::Unterminated { offset } => *offset,
        }
    }
}

/// Reason a single match could not be reconstructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("no connection response states the local seat")]
    SeatUnresolved,

    #[error("corrupt state: {0}")]
    CorruptState(CorruptState),

    #[error("detailed logging is disabled; enable \"Detailed Logs (Plugin Support)\" in the client account settings and restart it")]
    MissingDetailedLogging,
}

/// Instance transitions that cannot be reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorruptState {
    #[error("id change {from} -> {to} would create a remap cycle")]
    RemapCycle { from: InstanceId, to: InstanceId },

    #[error("{0} has no owner seat")]
    MissingOwner(InstanceId),

    #[error("{0} has no permanent card id")]
    MissingCardId(InstanceId),
}

impl From<CorruptState> for MatchError {
    fn from(reason: CorruptState) -> Self {
        MatchError::CorruptState(reason)
    }
}

/// A match that could not be reconstructed, reported by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("match {match_id}: {error}")]
pub struct MatchFailure {
    pub match_id: MatchId,
    #[source]
    pub error: MatchError,
}

/// Outcomes that concern the whole log.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("no matches found in log")]
    NoMatchesFound,

    #[error("detailed logging is disabled; enable \"Detailed Logs (Plugin Support)\" in the client account settings and restart it")]
    MissingDetailedLogging,

    #[error("match {0} not found in log")]
    MatchNotFound(MatchId),

    #[error(transparent)]
    Match(#[from] MatchFailure),

    #[error("failed to read log: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to load the card database.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read card database: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed card database: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("card database key {0:?} is not a card id")]
    BadKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_state_converts() {
        let err: MatchError = CorruptState::MissingOwner(InstanceId(7)).into();
        assert_eq!(err.to_string(), "corrupt state: Instance(7) has no owner seat");
    }

    #[test]
    fn test_extraction_offset() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ExtractionError::Decode { offset: 42, source };
        assert_eq!(err.offset(), 42);
        assert!(err.to_string().starts_with("undecodable structured block at byte 42"));
    }

    #[test]
    fn test_match_failure_names_match() {
        let failure = MatchFailure {
            match_id: MatchId::new("m-9"),
            error: MatchError::SeatUnresolved,
        };
        let err: LogError = failure.into();
        assert_eq!(
            err.to_string(),
            "match m-9: no connection response states the local seat"
        );
    }
}
