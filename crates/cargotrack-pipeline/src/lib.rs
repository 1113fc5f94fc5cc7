//! # cargotrack-pipeline — Pipeline Decision Functions
//!
//! Pure decision functions guarding the shipment and consolidation
//! pipelines:
//!
//! - **Transition validation** ([`advance`]): forward-only status moves
//!   with stage prerequisites (client price recorded, required documents
//!   reviewed, pre-declaration filed before customs).
//! - **Membership validation** ([`membership`]): only `to_load` shipments
//!   may join a consolidation, and advancing a consolidation must never
//!   leave a member shipment behind.
//! - **Numbering** ([`numbering`]): concurrency-safe `CONS-<year>-<n>`
//!   generation with a collision-resistant fallback, plus `PL-<year>-<id>`
//!   shipment numbers.
//!
//! All validators are pure over already-fetched snapshots; the caller owns
//! persistence and transactional isolation around check-then-write.

pub mod advance;
pub mod membership;
pub mod numbering;

pub use advance::{can_advance, check_forward, validate_transition, AdvanceDecision};
pub use membership::{ensure_eligible, ensure_members_not_behind};
pub use numbering::{
    shipment_number, AtomicSequence, ConsNumberGenerator, SequenceError, SequenceSource,
};
