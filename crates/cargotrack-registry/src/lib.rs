//! # cargotrack-registry — In-Memory Lifecycle Registry
//!
//! Ties the decision functions together into a working system: `DashMap`
//! backed stores for shipments and consolidations. Shipment-local
//! check-then-act sequences (validate a transition, then write it) run
//! under a single entry lock, so two racing requests on one shipment
//! cannot both pass a guard that only one write can satisfy. Membership
//! operations read shipment statuses as a snapshot outside the shipments'
//! locks; a shipment advancing concurrently with an attach can slip past
//! the eligibility check.
//!
//! This is a reference collaborator, not a storage engine. A deployment
//! that persists to a database keeps the same operation surface and runs
//! each operation in one transaction, which also closes the membership
//! snapshot window.

use thiserror::Error;

use cargotrack_core::{NotFoundError, ValidationError};

pub mod registry;

pub use registry::{
    Actor, ConsolidationRecord, NewDocument, NewShipment, ShipmentPatch, ShipmentRecord,
    ShipmentRegistry,
};

/// Any failure an operation on the registry can produce.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
}
