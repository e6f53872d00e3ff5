//! Ledgerflow Config
//!
//! This crate contains the serializable configuration types that steer how a
//! ledger-resident state machine is projected into a diagram graph.
//!
//! Configuration can be loaded from:
//! - JSON files (via CLI with `--config=projection.json`)
//! - Inline JSON strings (tests, embedding applications)
//!
//! Every field is optional. An empty document (`{}`) yields the defaults.

mod enums;
mod fields;
mod layout;
mod projection;

pub use enums::{EdgePolicy, LoopBound};
pub use fields::FieldNames;
pub use layout::LayoutConfig;
pub use projection::ProjectionConfig;
