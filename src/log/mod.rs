//! Log input: extraction of structured messages from raw client logs.
//!
//! ## Key Types
//!
//! - `MessageExtractor`: lazy, restartable iterator over structured blocks
//! - `LogMessage`: typed protocol event (game-engine batch, room state)
//! - `LogTail`: incremental reader for a log that is still being written

pub mod extractor;
pub mod message;
pub mod tail;

pub use extractor::{
    detailed_logging_disabled, Extracted, MessageExtractor, DETAILED_LOGS_DISABLED, HEADER_SCAN_LEN,
};
pub use message::{
    Annotation, AnnotationKind, ConnectResp, DeckMessage, GameInfo, GameObject, GameStateEvent,
    GameStateMessage, GreEvent, GreMessage, InstanceRemap, LogMessage, MatchState, ObjectKind,
    ReservedPlayer, RoomStateChange, RoomStateKind, Timestamp, ZoneInfo,
};
pub use tail::{LogTail, TailBatch};
