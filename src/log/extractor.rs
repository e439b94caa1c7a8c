//! Message extraction from raw log bytes.
//!
//! The client log interleaves free-form diagnostic lines with JSON blocks.
//! A block starts on a line whose first non-blank byte is `{` and ends at
//! the matching `}`, possibly many lines later (pretty-printed payloads).
//!
//! `MessageExtractor` is a lazy iterator over those blocks:
//! - non-structured lines are skipped
//! - a block that fails to decode yields one `ExtractionError` and the
//!   stream continues after it
//! - a block cut short by a new top-level line (another block, or a
//!   diagnostic line starting in column 0) yields `Unterminated` and
//!   extraction resumes at that line
//! - a block still open at the end of the buffer is an incomplete tail; it
//!   is left unconsumed and `resume_offset` points at its first byte so a
//!   later read can pick it up once the file has grown

use tracing::{debug, trace};

use super::message::LogMessage;
use crate::error::ExtractionError;

/// Marker the client writes near the top of the log when detailed logs are off.
pub const DETAILED_LOGS_DISABLED: &str = "DETAILED LOGS: DISABLED";

/// How many leading bytes of a log are inspected for the logging-mode header.
pub const HEADER_SCAN_LEN: usize = 1000;

/// Check the log header for the detailed-logging marker.
#[must_use]
pub fn detailed_logging_disabled(log: &[u8]) -> bool {
    let head = &log[..log.len().min(HEADER_SCAN_LEN)];
    let marker = DETAILED_LOGS_DISABLED.as_bytes();
    head.windows(marker.len()).any(|w| w == marker)
}

/// A decoded message with the byte offset of its block.
#[derive(Clone, Debug)]
pub struct Extracted {
    pub offset: u64,
    pub message: LogMessage,
}

/// Lazy, restartable sequence of structured messages.
///
/// ## Usage
///
/// ```
/// use arena_log::log::{LogMessage, MessageExtractor};
///
/// let log = b"[Client] booting\n{ \"id\": 1 }\n{ \"greToClientEvent\": {";
/// let mut extractor = MessageExtractor::new(log);
///
/// let first = extractor.next().unwrap().unwrap();
/// assert!(matches!(first.message, LogMessage::Unrecognized));
///
/// // The open block at the end is left for the next read.
/// assert!(extractor.next().is_none());
/// assert!(extractor.is_truncated());
/// assert_eq!(extractor.resume_offset(), 29);
/// ```
#[derive(Clone, Debug)]
pub struct MessageExtractor<'a> {
    buf: &'a [u8],
    pos: usize,
    base_offset: u64,
    truncated: bool,
}

impl<'a> MessageExtractor<'a> {
    /// Extract from the start of `buf`.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_base_offset(buf, 0)
    }

    /// Extract from `buf`, which begins at `base_offset` in the underlying file.
    ///
    /// Offsets in results and `resume_offset` are file offsets.
    #[must_use]
    pub fn with_base_offset(buf: &'a [u8], base_offset: u64) -> Self {
        Self {
            buf,
            pos: 0,
            base_offset,
            truncated: false,
        }
    }

    /// Resume extraction of a whole-file buffer at a file offset.
    ///
    /// Offsets past the end of the buffer yield an empty sequence.
    #[must_use]
    pub fn resume(buf: &'a [u8], offset: u64) -> Self {
        let pos = usize::try_from(offset).map_or(buf.len(), |o| o.min(buf.len()));
        Self {
            buf,
            pos,
            base_offset: 0,
            truncated: false,
        }
    }

    /// File offset of the first byte not yet consumed.
    #[must_use]
    pub fn resume_offset(&self) -> u64 {
        self.base_offset + self.pos as u64
    }

    /// Check if extraction stopped at an incomplete block.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    fn line_end(&self, from: usize) -> Option<usize> {
        self.buf[from..].iter().position(|&b| b == b'\n').map(|i| from + i)
    }

    /// Scan the block opened at `start` for its closing brace.
    fn scan_block(&self, start: usize) -> BlockScan {
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (i, &byte) in self.buf[start..].iter().enumerate() {
            if byte == b'\n' {
                let next = start + i + 1;
                if starts_top_level(&self.buf[next..]) {
                    return BlockScan::Interrupted(next);
                }
                // JSON strings never span lines.
                in_string = false;
                escaped = false;
                continue;
            }
            if in_string {
                match byte {
                    _ if escaped => escaped = false,
                    b'\\' => escaped = true,
                    b'"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match byte {
                b'"' => in_string = true,
                b'{' | b'[' => depth += 1,
                b'}' | b']' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return BlockScan::Closed(start + i + 1);
                    }
                }
                _ => {}
            }
        }
        BlockScan::Open
    }
}

enum BlockScan {
    /// One past the closing brace.
    Closed(usize),
    /// Start of the line that cut the block short.
    Interrupted(usize),
    /// Still open at the end of the buffer.
    Open,
}

/// Check if a line opens new top-level content rather than continuing a
/// pretty-printed block, whose inner lines are indented or close brackets.
fn starts_top_level(line: &[u8]) -> bool {
    match line {
        [b'{', ..] => true,
        [b'[', next, ..] => next.is_ascii_alphabetic(),
        [first, ..] => first.is_ascii_alphanumeric(),
        [] => false,
    }
}

impl Iterator for MessageExtractor<'_> {
    type Item = Result<Extracted, ExtractionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.truncated {
            return None;
        }

        while self.pos < self.buf.len() {
            let line_start = self.pos;
            let line_end = self.line_end(line_start);
            let line = &self.buf[line_start..line_end.unwrap_or(self.buf.len())];

            let Some(indent) = line.iter().position(|b| !b.is_ascii_whitespace()) else {
                match line_end {
                    Some(end) => {
                        self.pos = end + 1;
                        continue;
                    }
                    // A blank partial line may still become the start of a block.
                    None => return None,
                }
            };

            if line[indent] != b'{' {
                self.pos = line_end.map_or(self.buf.len(), |end| end + 1);
                continue;
            }

            let start = line_start + indent;
            let offset = self.base_offset + start as u64;
            let end = match self.scan_block(start) {
                BlockScan::Closed(end) => end,
                BlockScan::Interrupted(next) => {
                    debug!(offset, "skipping unterminated block");
                    self.pos = next;
                    return Some(Err(ExtractionError::Unterminated { offset }));
                }
                BlockScan::Open => {
                    trace!(offset, "incomplete block at end of buffer");
                    self.pos = line_start;
                    self.truncated = true;
                    return None;
                }
            };

            // Anything after the closing brace on the same line is noise.
            self.pos = self.line_end(end).map_or(self.buf.len(), |e| e + 1);

            let block = &self.buf[start..end];
            return Some(match serde_json::from_slice::<LogMessage>(block) {
                Ok(message) => Ok(Extracted { offset, message }),
                Err(source) => {
                    debug!(offset, error = %source, "skipping undecodable block");
                    Err(ExtractionError::Decode { offset, source })
                }
            });
        }

        None
    }
}
