//! # cargotrack-core — Foundational Types for the Shipment Tracker
//!
//! This crate is the leaf of the cargotrack workspace DAG. It defines the
//! status catalog, identifier newtypes, and plain data records that every
//! other crate reasons about. It performs no I/O and holds no mutable state.
//!
//! ## Key Design Principles
//!
//! 1. **One status table.** The shipment and consolidation pipelines, the
//!    shared rank table, and the stage mapping live in [`status`] and
//!    nowhere else. The system this replaces carried several diverging
//!    copies of the same tables; here a second copy cannot exist.
//!
//! 2. **Newtype wrappers for identifiers.** `ShipmentId`, `ConsolidationId`,
//!    `DocumentId` and friends are distinct types — a document id cannot be
//!    passed where a shipment id is expected.
//!
//! 3. **Unknown is a value, not a crash.** Status codes arrive from
//!    persistence as untrusted strings. Both status enums carry an
//!    `Unknown` variant that ranks below every known status, so lookups on
//!    bad input degrade instead of panicking.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cargotrack-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod comment;
pub mod consolidation;
pub mod document;
pub mod error;
pub mod event;
pub mod ids;
pub mod shipment;
pub mod status;

// Re-export primary types for ergonomic imports.
pub use comment::Comment;
pub use consolidation::{Consolidation, ConsolidationStatusChange, Membership};
pub use document::{
    Document, DocumentReview, DocumentStatusChange, DocumentType, REQUIRED_DOC_TYPES,
};
pub use error::{NotFoundError, ValidationError};
pub use event::{EventKind, EventRecord};
pub use ids::{
    ClientId, CommentId, ConsolidationId, DocumentId, EventId, ShipmentId, UserId,
};
pub use shipment::{Quote, Shipment};
pub use status::{
    shared_rank, ConsolidationStatus, ShipmentStatus, Stage, CONS_PIPELINE, ORDERED_STAGES,
    SHIPMENT_PIPELINE,
};
