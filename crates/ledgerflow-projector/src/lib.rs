//! Ledgerflow Projector
//!
//! This crate turns the state machine stored in a ledger record store into a
//! classified diagram graph, ready to hand to a renderer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      DiagramSession                         │
//! │  - owns the Graph and its phase                             │
//! │  - load() runs one projection                               │
//! │  - renderer callbacks (init, drag, connect)                 │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    WorkflowProjector                        │
//! │  - joins the two count reads                                │
//! │  - fetches states, then transitions, one at a time          │
//! │  - classifies, then emits Ready                             │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      LedgerReader                           │
//! │  - read_field(name, args) → tuple of raw values             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use ledgerflow_ledger::SnapshotLedger;
//! use ledgerflow_projector::{DiagramSession, WorkflowProjector};
//!
//! let ledger = SnapshotLedger::load("snapshot.json").await?;
//! let projector = WorkflowProjector::new(ledger, ProjectionConfig::default());
//!
//! let mut session = DiagramSession::new(projector);
//! session.load().await?;
//! println!("{}", session.layout());
//! ```

mod error;
mod events;
mod projector;
mod session;

pub use error::ProjectError;
pub use events::{ChannelNotifier, NoopNotifier, ProjectionEvent, ProjectionNotifier};
pub use projector::{ProjectionSummary, Projector, WorkflowProjector};
pub use session::{DiagramSession, SessionPhase, ViewportCommand};
