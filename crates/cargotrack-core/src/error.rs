//! # Error Types — Structured Error Hierarchy
//!
//! Business-rule failures are detected before any write and returned as
//! typed errors. The `Display` strings are designed to be surfaced to the
//! end user verbatim, so they name the offending shipments and statuses.

use thiserror::Error;

use crate::ids::{CommentId, ConsolidationId, DocumentId, ShipmentId};
use crate::status::{ConsolidationStatus, ShipmentStatus};

/// A requested status transition or membership change violates a business
/// rule. Recoverable: the caller surfaces the message and performs no
/// mutation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Backward or sideways status move, or a move out of a terminal or
    /// off-pipeline status.
    #[error("invalid status transition {from} → {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    /// A stage prerequisite is unmet (price missing, documents not
    /// reviewed, ...). The reason is the operator-facing requirement text.
    #[error("cannot advance from {status}: {reason}")]
    PrerequisiteUnmet { status: ShipmentStatus, reason: String },

    /// Candidate shipments not in the single eligible status for
    /// consolidation membership. All-or-nothing: none were attached.
    #[error("only shipments in status \"to_load\" may be attached; offending: {details}")]
    IneligibleShipments {
        ids: Vec<ShipmentId>,
        details: String,
    },

    /// Some member shipments lag behind the target consolidation status.
    #[error("some shipments lag behind status \"{target}\": {details}")]
    MembersBehind {
        target: ConsolidationStatus,
        ids: Vec<ShipmentId>,
        details: String,
    },

    /// A membership operation referenced shipments that do not exist.
    #[error("some shipments were not found: {details}")]
    ShipmentsMissing {
        ids: Vec<ShipmentId>,
        details: String,
    },
}

impl ValidationError {
    /// Build the `id:status` offender list the membership validators embed
    /// in their messages.
    pub fn offender_details(pairs: &[(ShipmentId, ShipmentStatus)]) -> String {
        pairs
            .iter()
            .map(|(id, status)| format!("{id}:{status}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A referenced row does not exist. Surfaced as a user-visible "not
/// found"; no partial mutation occurs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("shipment {0} not found")]
    Shipment(ShipmentId),
    #[error("consolidation {0} not found")]
    Consolidation(ConsolidationId),
    #[error("document {0} not found")]
    Document(DocumentId),
    #[error("comment {0} not found")]
    Comment(CommentId),
    #[error("shipment {shipment} is not a member of consolidation {consolidation}")]
    MembershipLink {
        consolidation: ConsolidationId,
        shipment: ShipmentId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_end_user_readable() {
        let err = ValidationError::IneligibleShipments {
            ids: vec![ShipmentId(2)],
            details: "2:draft".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("to_load"));
        assert!(msg.contains("2:draft"));
    }

    #[test]
    fn offender_details_formats_pairs() {
        let details = ValidationError::offender_details(&[
            (ShipmentId(1), ShipmentStatus::ToLoad),
            (ShipmentId(2), ShipmentStatus::Draft),
        ]);
        assert_eq!(details, "1:to_load, 2:draft");
    }

    #[test]
    fn not_found_names_the_row() {
        let err = NotFoundError::Shipment(ShipmentId(14));
        assert_eq!(err.to_string(), "shipment 14 not found");
    }
}
