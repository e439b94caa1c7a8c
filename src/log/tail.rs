//! Incremental reading of a growing log file.
//!
//! `LogTail` remembers the byte offset up to which the file has been
//! consumed. Each `poll` reads whatever was appended since, extracts the
//! complete blocks, and advances the offset to the start of any incomplete
//! trailing block so it is re-read once the client finishes writing it.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::extractor::{Extracted, MessageExtractor};

/// Result of one poll.
#[derive(Debug, Default)]
pub struct TailBatch {
    /// Newly completed messages, in file order.
    pub messages: Vec<Extracted>,
    /// Blocks that could not be decoded and were skipped.
    pub skipped: usize,
    /// The file was replaced since the last poll and was read from the start.
    pub restarted: bool,
}

/// Cursor over a log file that may still be growing.
#[derive(Clone, Debug)]
pub struct LogTail {
    path: PathBuf,
    offset: u64,
}

impl LogTail {
    /// Follow `path` from its beginning.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::from_offset(path, 0)
    }

    /// Follow `path` from a known byte offset.
    pub fn from_offset(path: impl Into<PathBuf>, offset: u64) -> Self {
        Self {
            path: path.into(),
            offset,
        }
    }

    /// The followed file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte offset of the first unconsumed byte.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Read and extract everything appended since the last poll.
    ///
    /// A file shorter than the current offset has been replaced (the client
    /// rotates its log on restart); reading then starts over from zero.
    pub fn poll(&mut self) -> std::io::Result<TailBatch> {
        let mut file = File::open(&self.path)?;
        let len = file.metadata()?.len();

        let restarted = len < self.offset;
        if restarted {
            warn!(path = %self.path.display(), "log shrank; restarting from the beginning");
            self.offset = 0;
        }
        if len == self.offset {
            return Ok(TailBatch {
                restarted,
                ..TailBatch::default()
            });
        }

        file.seek(SeekFrom::Start(self.offset))?;
        let mut chunk = Vec::new();
        file.take(len - self.offset).read_to_end(&mut chunk)?;

        let mut extractor = MessageExtractor::with_base_offset(&chunk, self.offset);
        let mut batch = TailBatch {
            restarted,
            ..TailBatch::default()
        };
        for item in extractor.by_ref() {
            match item {
                Ok(extracted) => batch.messages.push(extracted),
                Err(err) => {
                    warn!(error = %err, "skipping structured block");
                    batch.skipped += 1;
                }
            }
        }

        debug!(
            from = self.offset,
            to = extractor.resume_offset(),
            messages = batch.messages.len(),
            "polled log"
        );
        self.offset = extractor.resume_offset();
        Ok(batch)
    }
}
