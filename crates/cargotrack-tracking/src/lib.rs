//! # cargotrack-tracking — Read-Side Projections
//!
//! Derivations computed on demand from stored rows, performing no writes:
//!
//! - **Readiness** ([`readiness`]): the 0–100 document-readiness score an
//!   operator sees on a shipment card. A progress indicator only — the
//!   pipeline gates are enforced independently by `cargotrack-pipeline`.
//! - **Timeline** ([`timeline`]): one chronological feed per shipment,
//!   merging explicit audit events with events derived from documents,
//!   review history, comments, and consolidation membership.

pub mod readiness;
pub mod timeline;

pub use readiness::{percent_for_doc, readiness_for_shipment, ready_to_release};
pub use timeline::{assemble, ConsolidationLink, TimelineEvent, TimelineSources};
