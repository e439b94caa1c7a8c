//! Live reconstruction over a log that is still being written.
//!
//! Each poll extracts only the bytes appended since the previous one and
//! routes the new messages to their matches. Reconstruction replays the
//! open match's bucket, so a report is provisional until its match
//! completes.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use super::reconstruct::{reconstruct_match, MatchReport};
use crate::core::ParseConfig;
use crate::error::{LogError, MatchFailure};
use crate::log::{detailed_logging_disabled, LogTail, HEADER_SCAN_LEN};
use crate::matches::{MatchBucket, MatchSegmenter, MatchSummary};

/// Incremental view of a growing log.
#[derive(Clone, Debug)]
pub struct LiveSession {
    tail: LogTail,
    segmenter: MatchSegmenter,
    config: ParseConfig,
    skipped: usize,
    header_checked: bool,
}

impl LiveSession {
    /// Follow a log from its beginning.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_config(path, ParseConfig::default())
    }

    /// Follow a log with a custom configuration.
    pub fn with_config(path: impl Into<PathBuf>, config: ParseConfig) -> Self {
        Self {
            tail: LogTail::new(path),
            segmenter: MatchSegmenter::new(),
            config,
            skipped: 0,
            header_checked: false,
        }
    }

    fn check_header(&mut self) -> Result<(), LogError> {
        let mut head = Vec::with_capacity(HEADER_SCAN_LEN);
        File::open(self.tail.path())?
            .take(HEADER_SCAN_LEN as u64)
            .read_to_end(&mut head)?;

        if detailed_logging_disabled(&head) {
            return Err(LogError::MissingDetailedLogging);
        }
        // A header shorter than the scan window may still be growing.
        self.header_checked = head.len() == HEADER_SCAN_LEN;
        Ok(())
    }

    /// Consume newly appended content. Returns the number of new messages.
    ///
    /// A replaced (rotated) log discards every match read so far and has its
    /// header checked again.
    pub fn poll(&mut self) -> Result<usize, LogError> {
        let batch = self.tail.poll()?;
        if batch.restarted {
            info!(matches = self.segmenter.len(), "log replaced; dropping earlier matches");
            self.segmenter = MatchSegmenter::new();
            self.skipped = 0;
            self.header_checked = false;
        }
        if !self.header_checked {
            self.check_header()?;
        }

        self.skipped += batch.skipped;
        let count = batch.messages.len();
        for extracted in batch.messages {
            self.segmenter.push(extracted.message);
        }

        if count > 0 {
            debug!(count, offset = self.tail.offset(), "new messages");
        }
        Ok(count)
    }

    /// The match receiving messages, or the last one if none is open.
    #[must_use]
    pub fn current_match(&self) -> Option<&MatchBucket> {
        self.segmenter.current().or_else(|| self.segmenter.latest())
    }

    /// Reconstruct the current match from everything read so far.
    #[must_use]
    pub fn reconstruct_current(&self) -> Option<Result<MatchReport, MatchFailure>> {
        let bucket = self.current_match()?;
        Some(reconstruct_match(bucket, &self.config).map_err(|error| {
            warn!(match_id = %bucket.id, %error, "current match not reconstructable yet");
            MatchFailure {
                match_id: bucket.id.clone(),
                error,
            }
        }))
    }

    /// Summaries of every match seen so far.
    #[must_use]
    pub fn summaries(&self) -> Vec<MatchSummary> {
        self.segmenter.summaries()
    }

    /// Byte offset up to which the log has been consumed.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.tail.offset()
    }

    /// Structured blocks that could not be decoded.
    #[must_use]
    pub fn skipped_blocks(&self) -> usize {
        self.skipped
    }
}
