//! # Shipment Timeline
//!
//! Assembles one chronological feed for a shipment by merging the explicit
//! audit events with events derived from the current document set, the
//! document review history, comments, and consolidation membership.
//!
//! Derivation happens entirely at read time; nothing here writes. Derived
//! entries get synthesized ids that are unique within a single assembled
//! feed but carry no meaning across calls.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use cargotrack_core::{
    Comment, Consolidation, Document, DocumentStatusChange, EventKind, EventRecord, Shipment,
    ShipmentId,
};

/// One entry in the assembled feed.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEvent {
    /// Stored event id, or a synthesized `<kind>-<shipment>-<seq>` id for
    /// derived entries.
    pub id: String,
    pub kind: EventKind,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_name: Option<String>,
    pub occurred_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub meta: serde_json::Value,
}

/// A shipment's membership in one consolidation, as seen from the
/// shipment side.
#[derive(Debug, Clone)]
pub struct ConsolidationLink {
    pub cons_number: String,
    pub cons_status: String,
    pub added_at: DateTime<Utc>,
}

impl ConsolidationLink {
    /// Project the link for one member out of a consolidation row.
    pub fn for_member(cons: &Consolidation, shipment_id: ShipmentId) -> Option<Self> {
        cons.members
            .iter()
            .find(|m| m.shipment_id == shipment_id)
            .map(|m| Self {
                cons_number: cons.cons_number.clone(),
                cons_status: cons.status.as_str().to_string(),
                added_at: m.added_at,
            })
    }
}

/// Everything the assembler reads. All slices belong to the one shipment.
#[derive(Debug, Clone, Copy)]
pub struct TimelineSources<'a> {
    pub shipment: &'a Shipment,
    pub events: &'a [EventRecord],
    pub documents: &'a [Document],
    pub doc_history: &'a [DocumentStatusChange],
    pub comments: &'a [Comment],
    pub consolidations: &'a [ConsolidationLink],
}

/// Merge explicit and derived events into one feed, ascending by time.
///
/// The creation entry is derived from the shipment row only when no stored
/// `pl.created` event exists, so older rows predating the audit log still
/// show a starting point without ever duplicating it. The sort is stable:
/// entries with equal timestamps keep source order (stored events first,
/// then derived).
pub fn assemble(sources: TimelineSources<'_>) -> Vec<TimelineEvent> {
    let shipment_id = sources.shipment.id;
    let mut seq: u32 = 0;
    let mut synth_id = |kind: EventKind| {
        seq += 1;
        format!("{kind}-{shipment_id}-{seq}")
    };

    let mut feed: Vec<TimelineEvent> = sources
        .events
        .iter()
        .map(|event| TimelineEvent {
            id: event.id.to_string(),
            kind: event.kind,
            title: event.message.clone(),
            details: String::new(),
            actor_name: event.actor_name.clone(),
            occurred_at: event.created_at,
            meta: event.meta.clone(),
        })
        .collect();

    let has_stored_created = sources
        .events
        .iter()
        .any(|e| e.kind == EventKind::ShipmentCreated);
    if !has_stored_created {
        let number = sources
            .shipment
            .pl_number
            .clone()
            .unwrap_or_else(|| sources.shipment.name.clone());
        feed.push(TimelineEvent {
            id: synth_id(EventKind::ShipmentCreated),
            kind: EventKind::ShipmentCreated,
            title: format!("Shipment {number} created"),
            details: String::new(),
            actor_name: None,
            occurred_at: sources.shipment.created_at,
            meta: serde_json::Value::Null,
        });
    }

    for doc in sources.documents {
        feed.push(TimelineEvent {
            id: synth_id(EventKind::DocUploaded),
            kind: EventKind::DocUploaded,
            title: format!("Uploaded {}", doc.doc_type.title()),
            details: doc.name.clone().unwrap_or_else(|| doc.file_name.clone()),
            actor_name: doc.uploaded_by.clone(),
            occurred_at: doc.uploaded_at,
            meta: json!({ "doc_id": doc.id, "doc_type": doc.doc_type }),
        });
    }

    for change in sources.doc_history {
        let doc_title = sources
            .documents
            .iter()
            .find(|d| d.id == change.doc_id)
            .map(|d| d.doc_type.title())
            .unwrap_or("Document");
        let from = change
            .from_status
            .map(|s| s.as_str())
            .unwrap_or("\u{2014}");
        feed.push(TimelineEvent {
            id: synth_id(EventKind::DocStatusChanged),
            kind: EventKind::DocStatusChanged,
            title: format!("{doc_title} review updated"),
            details: format!("{from} \u{2192} {}", change.to_status.as_str()),
            actor_name: change.changed_by.clone(),
            occurred_at: change.changed_at,
            meta: json!({
                "doc_id": change.doc_id,
                "from": change.from_status,
                "to": change.to_status,
                "note": change.note,
            }),
        });
    }

    for comment in sources.comments {
        feed.push(TimelineEvent {
            id: synth_id(EventKind::CommentAdded),
            kind: EventKind::CommentAdded,
            title: "Comment".to_string(),
            details: comment.body.clone(),
            actor_name: Some(comment.author.clone()),
            occurred_at: comment.created_at,
            meta: serde_json::Value::Null,
        });
    }

    for link in sources.consolidations {
        feed.push(TimelineEvent {
            id: synth_id(EventKind::AddedToConsolidation),
            kind: EventKind::AddedToConsolidation,
            title: format!("Added to consolidation {}", link.cons_number),
            details: String::new(),
            actor_name: None,
            occurred_at: link.added_at,
            meta: json!({
                "cons_number": link.cons_number,
                "cons_status": link.cons_status,
            }),
        });
    }

    feed.sort_by_key(|event| event.occurred_at);
    feed
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    use cargotrack_core::{
        ClientId, CommentId, ConsolidationId, ConsolidationStatus, DocumentId, DocumentReview,
        DocumentType, EventId, Membership, Quote, ShipmentStatus,
    };

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, minute, 0).unwrap()
    }

    fn sample_shipment() -> Shipment {
        Shipment {
            id: ShipmentId(7),
            pl_number: Some("PL-2026-7".to_string()),
            client_id: ClientId(1),
            name: "Spare parts".to_string(),
            weight_kg: None,
            volume_cbm: None,
            incoterm: None,
            pickup_address: None,
            shipper_name: None,
            shipper_contacts: None,
            status: ShipmentStatus::AwaitingDocs,
            quote: Quote::default(),
            responsible_user_id: None,
            created_at: at(0),
        }
    }

    fn sample_event(kind: EventKind, minute: u32, message: &str) -> EventRecord {
        EventRecord {
            id: EventId::new(),
            shipment_id: ShipmentId(7),
            kind,
            message: message.to_string(),
            meta: serde_json::Value::Null,
            actor_user_id: None,
            actor_name: Some("olga".to_string()),
            created_at: at(minute),
        }
    }

    fn sample_doc(minute: u32) -> Document {
        Document {
            id: DocumentId::new(),
            shipment_id: ShipmentId(7),
            doc_type: DocumentType::Invoice,
            status: DocumentReview::Pending,
            name: Some("Commercial invoice".to_string()),
            file_name: "invoice.pdf".to_string(),
            mime_type: None,
            size_bytes: None,
            note: None,
            uploaded_by: Some("olga".to_string()),
            uploaded_at: at(minute),
            updated_at: at(minute),
        }
    }

    fn empty_sources(shipment: &Shipment) -> TimelineSources<'_> {
        TimelineSources {
            shipment,
            events: &[],
            documents: &[],
            doc_history: &[],
            comments: &[],
            consolidations: &[],
        }
    }

    #[test]
    fn bare_shipment_gets_a_derived_creation_entry() {
        let shipment = sample_shipment();
        let feed = assemble(empty_sources(&shipment));
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].kind, EventKind::ShipmentCreated);
        assert_eq!(feed[0].title, "Shipment PL-2026-7 created");
        assert_eq!(feed[0].occurred_at, shipment.created_at);
    }

    #[test]
    fn stored_creation_event_suppresses_the_derived_one() {
        let shipment = sample_shipment();
        let events = vec![sample_event(EventKind::ShipmentCreated, 0, "Shipment created")];
        let feed = assemble(TimelineSources {
            events: &events,
            ..empty_sources(&shipment)
        });
        let created: Vec<_> = feed
            .iter()
            .filter(|e| e.kind == EventKind::ShipmentCreated)
            .collect();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].title, "Shipment created");
    }

    #[test]
    fn feed_is_sorted_ascending() {
        let shipment = sample_shipment();
        let events = vec![
            sample_event(EventKind::StatusChanged, 30, "Status: draft \u{2192} awaiting_docs"),
            sample_event(EventKind::ShipmentCreated, 0, "Shipment created"),
        ];
        let documents = vec![sample_doc(10)];
        let comments = vec![Comment {
            id: CommentId::new(),
            shipment_id: ShipmentId(7),
            user_id: None,
            author: "ivan".to_string(),
            body: "Waiting on the supplier".to_string(),
            created_at: at(20),
        }];
        let feed = assemble(TimelineSources {
            events: &events,
            documents: &documents,
            comments: &comments,
            ..empty_sources(&shipment)
        });

        assert_eq!(feed.len(), 4);
        for pair in feed.windows(2) {
            assert!(pair[0].occurred_at <= pair[1].occurred_at);
        }
        assert_eq!(feed[1].kind, EventKind::DocUploaded);
        assert_eq!(feed[1].details, "Commercial invoice");
        assert_eq!(feed[2].kind, EventKind::CommentAdded);
        assert_eq!(feed[2].actor_name.as_deref(), Some("ivan"));
    }

    #[test]
    fn review_history_names_the_document() {
        let shipment = sample_shipment();
        let documents = vec![sample_doc(5)];
        let history = vec![DocumentStatusChange {
            doc_id: documents[0].id,
            from_status: Some(DocumentReview::Pending),
            to_status: DocumentReview::Reviewed,
            note: None,
            changed_by: Some("olga".to_string()),
            changed_at: at(15),
        }];
        let feed = assemble(TimelineSources {
            documents: &documents,
            doc_history: &history,
            ..empty_sources(&shipment)
        });
        let change = feed
            .iter()
            .find(|e| e.kind == EventKind::DocStatusChanged)
            .unwrap();
        assert_eq!(change.title, "Invoice review updated");
        assert_eq!(change.details, "pending \u{2192} reviewed");
    }

    #[test]
    fn consolidation_links_appear_at_their_added_time() {
        let shipment = sample_shipment();
        let mut cons = Consolidation {
            id: ConsolidationId::new(),
            cons_number: "CONS-2026-3".to_string(),
            title: None,
            status: ConsolidationStatus::Loaded,
            members: Vec::new(),
            created_at: at(0),
            updated_at: at(25),
        };
        cons.members.push(Membership {
            shipment_id: ShipmentId(7),
            added_at: at(25),
        });
        let link = ConsolidationLink::for_member(&cons, ShipmentId(7)).unwrap();
        let links = vec![link];
        let feed = assemble(TimelineSources {
            consolidations: &links,
            ..empty_sources(&shipment)
        });
        let entry = feed
            .iter()
            .find(|e| e.kind == EventKind::AddedToConsolidation)
            .unwrap();
        assert_eq!(entry.title, "Added to consolidation CONS-2026-3");
        assert_eq!(entry.occurred_at, at(25));
    }

    #[test]
    fn link_projection_requires_membership() {
        let cons = Consolidation {
            id: ConsolidationId::new(),
            cons_number: "CONS-2026-3".to_string(),
            title: None,
            status: ConsolidationStatus::Loaded,
            members: Vec::new(),
            created_at: at(0),
            updated_at: at(0),
        };
        assert!(ConsolidationLink::for_member(&cons, ShipmentId(7)).is_none());
    }

    #[test]
    fn ids_are_unique_within_a_feed() {
        let shipment = sample_shipment();
        let documents = vec![sample_doc(5), {
            let mut d = sample_doc(6);
            d.doc_type = DocumentType::PackingList;
            d
        }];
        let comments = vec![
            Comment {
                id: CommentId::new(),
                shipment_id: ShipmentId(7),
                user_id: None,
                author: "ivan".to_string(),
                body: "first".to_string(),
                created_at: at(7),
            },
            Comment {
                id: CommentId::new(),
                shipment_id: ShipmentId(7),
                user_id: None,
                author: "ivan".to_string(),
                body: "second".to_string(),
                created_at: at(8),
            },
        ];
        let feed = assemble(TimelineSources {
            documents: &documents,
            comments: &comments,
            ..empty_sources(&shipment)
        });
        let ids: HashSet<_> = feed.iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids.len(), feed.len());
    }

    #[test]
    fn equal_timestamps_keep_source_order() {
        let shipment = sample_shipment();
        let events = vec![sample_event(EventKind::ShipmentCreated, 0, "Shipment created")];
        let documents = vec![{
            let mut d = sample_doc(0);
            d.uploaded_at = shipment.created_at;
            d
        }];
        let feed = assemble(TimelineSources {
            events: &events,
            documents: &documents,
            ..empty_sources(&shipment)
        });
        assert_eq!(feed[0].kind, EventKind::ShipmentCreated);
        assert_eq!(feed[1].kind, EventKind::DocUploaded);
    }
}
