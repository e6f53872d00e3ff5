//! Ledgerflow Ledger
//!
//! This crate defines the single capability ledgerflow needs from a ledger
//! client: read a named field, optionally by index, from one fixed record
//! store and get back a tuple of raw values.
//!
//! Transport, signing and RPC retries live behind [`LedgerReader`]
//! implementations. This crate ships [`SnapshotLedger`], which serves a
//! captured copy of a record store from memory or from a JSON file.

mod error;
mod reader;
mod snapshot;
mod value;

pub use error::LedgerError;
pub use reader::LedgerReader;
pub use snapshot::{LedgerSnapshot, SnapshotLedger};
pub use value::RawValue;
