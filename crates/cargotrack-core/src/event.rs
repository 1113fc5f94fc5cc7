//! # Audit Events
//!
//! Immutable audit records tied to a shipment. One row is appended for
//! every lifecycle action; rows are never updated or deleted by normal
//! flow (deleting the shipment cascades them away).
//!
//! The kind strings (`pl.created`, `pl.status_changed`, ...) are the wire
//! vocabulary shared with the timeline feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{EventId, ShipmentId, UserId};

/// The closed set of audit event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "pl.created")]
    ShipmentCreated,
    #[serde(rename = "pl.status_changed")]
    StatusChanged,
    #[serde(rename = "pl.responsible_changed")]
    ResponsibleChanged,
    #[serde(rename = "pl.doc_uploaded")]
    DocUploaded,
    #[serde(rename = "pl.doc_status_changed")]
    DocStatusChanged,
    #[serde(rename = "pl.doc_deleted")]
    DocDeleted,
    #[serde(rename = "pl.comment")]
    CommentAdded,
    #[serde(rename = "pl.added_to_consolidation")]
    AddedToConsolidation,
}

impl EventKind {
    /// The kind string (e.g. `"pl.status_changed"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShipmentCreated => "pl.created",
            Self::StatusChanged => "pl.status_changed",
            Self::ResponsibleChanged => "pl.responsible_changed",
            Self::DocUploaded => "pl.doc_uploaded",
            Self::DocStatusChanged => "pl.doc_status_changed",
            Self::DocDeleted => "pl.doc_deleted",
            Self::CommentAdded => "pl.comment",
            Self::AddedToConsolidation => "pl.added_to_consolidation",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An explicit audit event recorded at the moment an action occurred.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    pub shipment_id: ShipmentId,
    pub kind: EventKind,
    /// End-user readable message, e.g. `Status: draft → awaiting_docs`.
    pub message: String,
    /// Structured payload (ids, from/to values) for consumers that need
    /// more than the message.
    #[serde(default)]
    pub meta: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_user_id: Option<UserId>,
    /// Actor display name, captured at write time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_strings_are_stable() {
        assert_eq!(EventKind::ShipmentCreated.as_str(), "pl.created");
        assert_eq!(EventKind::CommentAdded.as_str(), "pl.comment");
        assert_eq!(
            EventKind::AddedToConsolidation.as_str(),
            "pl.added_to_consolidation"
        );
    }

    #[test]
    fn kind_serializes_to_wire_string() {
        let json = serde_json::to_string(&EventKind::StatusChanged).unwrap();
        assert_eq!(json, "\"pl.status_changed\"");
        let back: EventKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EventKind::StatusChanged);
    }
}
