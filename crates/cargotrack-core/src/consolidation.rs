//! # Transport Consolidations
//!
//! A consolidation groups shipments that travel together. Membership is a
//! set — the same shipment cannot appear twice in one consolidation — and
//! each link remembers when it was added, which feeds the shipment
//! timeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ConsolidationId, ShipmentId};
use crate::status::ConsolidationStatus;

/// A membership link between a consolidation and a shipment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub shipment_id: ShipmentId,
    pub added_at: DateTime<Utc>,
}

/// A transport consolidation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consolidation {
    pub id: ConsolidationId,
    /// Human-legible number `CONS-<year>-<n>`.
    pub cons_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub status: ConsolidationStatus,
    /// Member links. Set semantics: no duplicate shipment ids.
    #[serde(default)]
    pub members: Vec<Membership>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Consolidation {
    /// Whether a shipment is already a member.
    pub fn contains(&self, shipment_id: ShipmentId) -> bool {
        self.members.iter().any(|m| m.shipment_id == shipment_id)
    }

    /// Member shipment ids in insertion order.
    pub fn member_ids(&self) -> Vec<ShipmentId> {
        self.members.iter().map(|m| m.shipment_id).collect()
    }

    /// Add a member if not already present. Returns `true` when the link
    /// was created.
    pub fn add_member(&mut self, shipment_id: ShipmentId, at: DateTime<Utc>) -> bool {
        if self.contains(shipment_id) {
            return false;
        }
        self.members.push(Membership {
            shipment_id,
            added_at: at,
        });
        true
    }

    /// Remove a member link. Returns `true` when a link existed.
    pub fn remove_member(&mut self, shipment_id: ShipmentId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m.shipment_id != shipment_id);
        self.members.len() != before
    }
}

/// Append-only consolidation status history row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationStatusChange {
    pub consolidation_id: ConsolidationId,
    /// `None` for the initial status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_status: Option<ConsolidationStatus>,
    pub to_status: ConsolidationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_by: Option<String>,
    pub created_at: DateTime<Utc>,
}
