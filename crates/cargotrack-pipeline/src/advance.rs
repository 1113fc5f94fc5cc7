//! # Transition Validator
//!
//! Decides whether a requested shipment status change is permitted and
//! what unmet requirement (if any) blocks it.
//!
//! Transitions are strictly forward along the shipment pipeline. On top of
//! the ordering rule, three stages carry prerequisites:
//!
//! - leaving `draft` requires a positive client price,
//! - leaving `awaiting_docs` requires every required document to exist and
//!   be at least staff-reviewed,
//! - entering `to_customs` requires a staff-reviewed pre-declaration.
//!
//! These functions are pure: the caller persists the new status and
//! appends the status-history/event rows.

use serde::{Deserialize, Serialize};

use cargotrack_core::{
    Document, DocumentType, Shipment, ShipmentStatus, ValidationError, REQUIRED_DOC_TYPES,
};

/// Outcome of a `can_advance` check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceDecision {
    pub allowed: bool,
    /// The status the shipment would advance to, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<ShipmentStatus>,
    /// Operator-facing explanation of what blocks the move.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AdvanceDecision {
    fn allowed(target: ShipmentStatus) -> Self {
        Self {
            allowed: true,
            target: Some(target),
            reason: None,
        }
    }

    fn blocked(target: Option<ShipmentStatus>, reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            target,
            reason: Some(reason.into()),
        }
    }
}

/// Check the forward-only ordering rule for an explicit target status.
///
/// Both statuses must sit on the pipeline and the target must rank
/// strictly above the current status.
pub fn check_forward(
    current: ShipmentStatus,
    target: ShipmentStatus,
) -> Result<(), ValidationError> {
    let from_rank = current.pipeline_rank().ok_or_else(|| {
        ValidationError::InvalidTransition {
            from: current.to_string(),
            to: target.to_string(),
            reason: format!("status \"{current}\" is not part of the pipeline"),
        }
    })?;
    if current.is_terminal() {
        return Err(ValidationError::InvalidTransition {
            from: current.to_string(),
            to: target.to_string(),
            reason: "a closed shipment permits no further transitions".to_string(),
        });
    }
    let to_rank =
        target
            .pipeline_rank()
            .ok_or_else(|| ValidationError::InvalidTransition {
                from: current.to_string(),
                to: target.to_string(),
                reason: format!("status \"{target}\" is not part of the pipeline"),
            })?;
    if to_rank <= from_rank {
        return Err(ValidationError::InvalidTransition {
            from: current.to_string(),
            to: target.to_string(),
            reason: "only forward moves along the pipeline are allowed".to_string(),
        });
    }
    Ok(())
}

/// Validate a full transition: ordering plus stage prerequisites.
///
/// `docs` is the shipment's current document set (at most one per type).
pub fn validate_transition(
    shipment: &Shipment,
    docs: &[Document],
    target: ShipmentStatus,
) -> Result<(), ValidationError> {
    check_forward(shipment.status, target)?;

    if let Some(reason) = prerequisite_gap(shipment, docs, target) {
        return Err(ValidationError::PrerequisiteUnmet {
            status: shipment.status,
            reason,
        });
    }
    Ok(())
}

/// Decide whether the shipment may advance to its next pipeline status.
pub fn can_advance(shipment: &Shipment, docs: &[Document]) -> AdvanceDecision {
    let Some(target) = shipment.status.next() else {
        let reason = if shipment.status.is_terminal() {
            "a closed shipment permits no further transitions".to_string()
        } else {
            format!("status \"{}\" is not part of the pipeline", shipment.status)
        };
        return AdvanceDecision::blocked(None, reason);
    };

    match prerequisite_gap(shipment, docs, target) {
        Some(reason) => AdvanceDecision::blocked(Some(target), reason),
        None => AdvanceDecision::allowed(target),
    }
}

/// The unmet prerequisite blocking `current → target`, if any.
fn prerequisite_gap(
    shipment: &Shipment,
    docs: &[Document],
    target: ShipmentStatus,
) -> Option<String> {
    if shipment.status == ShipmentStatus::Draft && !shipment.quote.has_positive_price() {
        return Some(
            "quote the client a price and save the calculation before advancing".to_string(),
        );
    }

    if shipment.status == ShipmentStatus::AwaitingDocs {
        let mut missing = Vec::new();
        let mut not_reviewed = Vec::new();
        for doc_type in REQUIRED_DOC_TYPES {
            match doc_of(docs, *doc_type) {
                None => missing.push(doc_type.title()),
                Some(d) if !d.status.is_reviewed() => not_reviewed.push(doc_type.title()),
                Some(_) => {}
            }
        }
        if !missing.is_empty() || !not_reviewed.is_empty() {
            let mut parts = Vec::new();
            if !missing.is_empty() {
                parts.push(format!("upload: {}", missing.join(", ")));
            }
            if !not_reviewed.is_empty() {
                parts.push(format!("mark as reviewed: {}", not_reviewed.join(", ")));
            }
            return Some(parts.join("; "));
        }
    }

    if target == ShipmentStatus::ToCustoms {
        let ok = doc_of(docs, DocumentType::PreDeclaration)
            .map(|d| d.status.is_reviewed())
            .unwrap_or(false);
        if !ok {
            return Some(
                "upload the pre-declaration and mark it as reviewed before customs".to_string(),
            );
        }
    }

    None
}

fn doc_of(docs: &[Document], doc_type: DocumentType) -> Option<&Document> {
    docs.iter().find(|d| d.doc_type == doc_type)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
