//! Whole-log entry point.

use std::path::Path;

use tracing::{info, warn};

use super::reconstruct::{reconstruct_match, MatchReport};
use crate::core::{MatchId, ParseConfig};
use crate::error::{LogError, MatchFailure};
use crate::log::{detailed_logging_disabled, MessageExtractor};
use crate::matches::{MatchBucket, MatchSegmenter, MatchSummary};

/// A parsed log: messages extracted and grouped by match.
///
/// ## Usage
///
/// ```
/// use arena_log::engine::ArenaLog;
/// use arena_log::error::LogError;
///
/// let log = ArenaLog::parse(b"[UnityCrossThreadLogger] nothing structured here\n");
/// assert!(matches!(log.list_matches(), Err(LogError::NoMatchesFound)));
/// ```
#[derive(Clone, Debug)]
pub struct ArenaLog {
    segmenter: MatchSegmenter,
    config: ParseConfig,
    skipped: usize,
    detailed_logging_disabled: bool,
}

impl ArenaLog {
    /// Parse a complete log with the default configuration.
    #[must_use]
    pub fn parse(bytes: &[u8]) -> Self {
        Self::parse_with(bytes, ParseConfig::default())
    }

    /// Parse a complete log.
    #[must_use]
    pub fn parse_with(bytes: &[u8], config: ParseConfig) -> Self {
        let disabled = detailed_logging_disabled(bytes);
        if disabled {
            warn!("log header says detailed logging is disabled");
        }

        let mut segmenter = MatchSegmenter::new();
        let mut skipped = 0;
        for item in MessageExtractor::new(bytes) {
            match item {
                Ok(extracted) => segmenter.push(extracted.message),
                Err(err) => {
                    warn!(error = %err, "skipping structured block");
                    skipped += 1;
                }
            }
        }
        info!(matches = segmenter.len(), skipped, "log parsed");

        Self {
            segmenter,
            config,
            skipped,
            detailed_logging_disabled: disabled,
        }
    }

    /// Read and parse a log file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LogError> {
        Self::open_with(path, ParseConfig::default())
    }

    /// Read and parse a log file with a custom configuration.
    pub fn open_with(path: impl AsRef<Path>, config: ParseConfig) -> Result<Self, LogError> {
        let bytes = std::fs::read(path)?;
        Ok(Self::parse_with(&bytes, config))
    }

    fn usable(&self) -> Result<&MatchSegmenter, LogError> {
        if self.detailed_logging_disabled {
            return Err(LogError::MissingDetailedLogging);
        }
        if self.segmenter.is_empty() {
            return Err(LogError::NoMatchesFound);
        }
        Ok(&self.segmenter)
    }

    fn reconstruct_bucket(&self, bucket: &MatchBucket) -> Result<MatchReport, MatchFailure> {
        reconstruct_match(bucket, &self.config).map_err(|error| {
            warn!(match_id = %bucket.id, %error, "match skipped");
            MatchFailure {
                match_id: bucket.id.clone(),
                error,
            }
        })
    }

    /// Summaries of every match, in log order.
    pub fn list_matches(&self) -> Result<Vec<MatchSummary>, LogError> {
        Ok(self.usable()?.summaries())
    }

    /// Reconstruct one match by id.
    pub fn reconstruct(&self, id: &MatchId) -> Result<MatchReport, LogError> {
        let bucket = self
            .usable()?
            .find(id)
            .ok_or_else(|| LogError::MatchNotFound(id.clone()))?;
        Ok(self.reconstruct_bucket(bucket)?)
    }

    /// Reconstruct the most recent match.
    pub fn reconstruct_latest(&self) -> Result<MatchReport, LogError> {
        let bucket = self.usable()?.latest().ok_or(LogError::NoMatchesFound)?;
        Ok(self.reconstruct_bucket(bucket)?)
    }

    /// Reconstruct every match. A failing match is reported in place and
    /// does not affect the others.
    pub fn reconstruct_all(&self) -> Result<Vec<Result<MatchReport, MatchFailure>>, LogError> {
        let segmenter = self.usable()?;
        Ok(segmenter
            .buckets()
            .iter()
            .map(|bucket| self.reconstruct_bucket(bucket))
            .collect())
    }

    /// Structured blocks that could not be decoded.
    #[must_use]
    pub fn skipped_blocks(&self) -> usize {
        self.skipped
    }

    /// The underlying match partition.
    #[must_use]
    pub fn segmenter(&self) -> &MatchSegmenter {
        &self.segmenter
    }
}
