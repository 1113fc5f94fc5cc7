//! # Consolidation Membership Validator
//!
//! Protects the consistency of a consolidation's member set relative to
//! its status:
//!
//! - only shipments at exactly `to_load` may be attached, all-or-nothing;
//! - advancing a consolidation must never leave a member shipment behind,
//!   compared on the shared rank table.
//!
//! Both checks are pure pre-conditions over `(id, status)` snapshots. The
//! caller must evaluate them and perform the write inside one transaction;
//! two racing requests can only be refused on the data each was given.

use cargotrack_core::{shared_rank, ConsolidationStatus, ShipmentId, ShipmentStatus, ValidationError};

/// Fail unless every candidate shipment is in the single eligible status
/// (`to_load`). An empty candidate list passes.
///
/// All-or-nothing: the error lists every ineligible candidate and the
/// caller attaches none of them.
pub fn ensure_eligible(
    candidates: &[(ShipmentId, ShipmentStatus)],
) -> Result<(), ValidationError> {
    let offenders: Vec<(ShipmentId, ShipmentStatus)> = candidates
        .iter()
        .filter(|(_, status)| *status != ShipmentStatus::ToLoad)
        .copied()
        .collect();

    if offenders.is_empty() {
        return Ok(());
    }
    Err(ValidationError::IneligibleShipments {
        ids: offenders.iter().map(|(id, _)| *id).collect(),
        details: ValidationError::offender_details(&offenders),
    })
}

/// Fail if advancing the consolidation to `target` would leave any member
/// shipment behind on the shared rank table. An empty member set advances
/// freely.
///
/// Member statuses outside the shared table (early stages, `cancelled`,
/// unknown codes) rank below everything and therefore always lag.
pub fn ensure_members_not_behind(
    members: &[(ShipmentId, ShipmentStatus)],
    target: ConsolidationStatus,
) -> Result<(), ValidationError> {
    if members.is_empty() {
        return Ok(());
    }

    // An unknown target ranks at the bottom, so nothing can lag behind it.
    let target_rank = i16::from(target.shared_rank().unwrap_or(0));

    let behind: Vec<(ShipmentId, ShipmentStatus)> = members
        .iter()
        .filter(|(_, status)| {
            let member_rank = shared_rank(status.as_str())
                .map(i16::from)
                .unwrap_or(-1);
            member_rank < target_rank
        })
        .copied()
        .collect();

    if behind.is_empty() {
        return Ok(());
    }
    Err(ValidationError::MembersBehind {
        target,
        ids: behind.iter().map(|(id, _)| *id).collect(),
        details: ValidationError::offender_details(&behind),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
