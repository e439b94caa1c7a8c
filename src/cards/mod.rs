//! Card system: permanent identifiers, instances, and metadata registry.
//!
//! ## Key Types
//!
//! - `CardId`: permanent card identifier (stable across matches)
//! - `CardInstance`: one physical card during a match
//! - `CardDefinition`: display metadata (name, set, types)
//! - `CardRegistry`: metadata lookup, tolerant of unknown IDs

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{CardDefinition, CardId, CardType};
pub use instance::CardInstance;
pub use registry::{CardLookup, CardRegistry};
