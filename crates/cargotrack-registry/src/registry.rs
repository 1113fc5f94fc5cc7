//! # Shipment Registry
//!
//! In-memory shipment and consolidation lifecycle registry backed by
//! `DashMap`. Owns the rows, runs the pipeline validators before every
//! write, and appends audit events and history rows as the original
//! system's transaction boundaries require.
//!
//! Each shipment record bundles the shipment row with its documents,
//! review history, comments, and audit events, so one entry lock covers a
//! whole check-then-act sequence and a delete cascades the lot.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{Datelike, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use cargotrack_core::{
    ClientId, Comment, CommentId, Consolidation, ConsolidationId, ConsolidationStatus,
    ConsolidationStatusChange, Document, DocumentId, DocumentReview, DocumentStatusChange,
    DocumentType, EventId, EventKind, EventRecord, NotFoundError, Quote, Shipment, ShipmentId,
    ShipmentStatus, UserId, ValidationError,
};
use cargotrack_pipeline::{
    can_advance, ensure_eligible, ensure_members_not_behind, shipment_number, validate_transition,
    AdvanceDecision, ConsNumberGenerator,
};
use cargotrack_tracking::{
    assemble, readiness_for_shipment, ready_to_release, ConsolidationLink, TimelineEvent,
    TimelineSources,
};

use crate::RegistryError;

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// A shipment with everything that lives and dies with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentRecord {
    pub shipment: Shipment,
    /// Current documents, at most one per type.
    pub documents: Vec<Document>,
    /// Append-only review history across all documents.
    pub doc_history: Vec<DocumentStatusChange>,
    pub comments: Vec<Comment>,
    /// Append-only audit events.
    pub events: Vec<EventRecord>,
}

/// A consolidation with its status history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationRecord {
    pub consolidation: Consolidation,
    pub history: Vec<ConsolidationStatusChange>,
}

/// Who performed an operation, for audit rows.
#[derive(Debug, Clone, Default)]
pub struct Actor {
    pub user_id: Option<UserId>,
    /// Display name, captured into the event at write time.
    pub name: Option<String>,
}

/// Input for creating a shipment.
#[derive(Debug, Clone)]
pub struct NewShipment {
    pub client_id: ClientId,
    pub name: String,
    pub weight_kg: Option<f64>,
    pub volume_cbm: Option<f64>,
    pub incoterm: Option<String>,
    pub pickup_address: Option<String>,
    pub shipper_name: Option<String>,
    pub shipper_contacts: Option<String>,
    pub responsible_user_id: Option<UserId>,
}

impl NewShipment {
    /// A minimal request; the optional cargo and shipper details default
    /// to none.
    pub fn new(client_id: ClientId, name: impl Into<String>) -> Self {
        Self {
            client_id,
            name: name.into(),
            weight_kg: None,
            volume_cbm: None,
            incoterm: None,
            pickup_address: None,
            shipper_name: None,
            shipper_contacts: None,
            responsible_user_id: None,
        }
    }
}

/// Partial shipment update. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ShipmentPatch {
    pub name: Option<String>,
    pub weight_kg: Option<f64>,
    pub volume_cbm: Option<f64>,
    pub incoterm: Option<String>,
    pub pickup_address: Option<String>,
    pub shipper_name: Option<String>,
    pub shipper_contacts: Option<String>,
}

/// Input for uploading a document.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub doc_type: DocumentType,
    pub name: Option<String>,
    pub file_name: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<u64>,
    pub uploaded_by: Option<String>,
}

// ---------------------------------------------------------------------------
// Shipment Registry
// ---------------------------------------------------------------------------

/// In-memory lifecycle registry.
///
/// Thread-safe via `DashMap`. Shipment-local validate-then-write
/// sequences run under a single entry lock, so two racing requests on
/// one shipment cannot both pass a guard that only one write can
/// satisfy. Cross-record checks (membership eligibility) work on status
/// snapshots; see the crate docs for the isolation boundary.
pub struct ShipmentRegistry {
    shipments: DashMap<ShipmentId, ShipmentRecord>,
    consolidations: DashMap<ConsolidationId, ConsolidationRecord>,
    next_shipment_id: AtomicI64,
    cons_numbers: ConsNumberGenerator,
}

impl ShipmentRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            shipments: DashMap::new(),
            consolidations: DashMap::new(),
            next_shipment_id: AtomicI64::new(1),
            cons_numbers: ConsNumberGenerator::default(),
        }
    }

    // -- shipments ----------------------------------------------------------

    /// Create a shipment in `draft`, assign its `PL-<year>-<id>` number,
    /// and record the creation event.
    pub fn create_shipment(&self, input: NewShipment, actor: &Actor) -> Shipment {
        let now = Utc::now();
        let id = ShipmentId(self.next_shipment_id.fetch_add(1, Ordering::Relaxed));
        let pl_number = shipment_number(now.year(), id);

        let shipment = Shipment {
            id,
            pl_number: Some(pl_number.clone()),
            client_id: input.client_id,
            name: input.name,
            weight_kg: input.weight_kg,
            volume_cbm: input.volume_cbm,
            incoterm: input.incoterm,
            pickup_address: input.pickup_address,
            shipper_name: input.shipper_name,
            shipper_contacts: input.shipper_contacts,
            status: ShipmentStatus::Draft,
            quote: Quote::default(),
            responsible_user_id: input.responsible_user_id,
            created_at: now,
        };

        let mut record = ShipmentRecord {
            shipment: shipment.clone(),
            documents: Vec::new(),
            doc_history: Vec::new(),
            comments: Vec::new(),
            events: Vec::new(),
        };
        push_event(
            &mut record,
            EventKind::ShipmentCreated,
            format!("Shipment {pl_number} created"),
            serde_json::Value::Null,
            actor,
        );
        self.shipments.insert(id, record);
        info!(shipment = %id, number = %pl_number, "shipment created");
        shipment
    }

    /// Get a shipment by id.
    pub fn get_shipment(&self, id: ShipmentId) -> Option<Shipment> {
        self.shipments.get(&id).map(|r| r.shipment.clone())
    }

    /// Get the full record (shipment plus documents, comments, events).
    pub fn get_record(&self, id: ShipmentId) -> Option<ShipmentRecord> {
        self.shipments.get(&id).map(|r| r.value().clone())
    }

    /// List all shipments.
    pub fn list_shipments(&self) -> Vec<Shipment> {
        self.shipments
            .iter()
            .map(|r| r.shipment.clone())
            .collect()
    }

    /// Apply a partial update to the shipment's descriptive fields.
    pub fn update_shipment(
        &self,
        id: ShipmentId,
        patch: ShipmentPatch,
    ) -> Result<Shipment, NotFoundError> {
        let mut entry = self
            .shipments
            .get_mut(&id)
            .ok_or(NotFoundError::Shipment(id))?;
        let shipment = &mut entry.value_mut().shipment;
        if let Some(name) = patch.name {
            shipment.name = name;
        }
        if let Some(v) = patch.weight_kg {
            shipment.weight_kg = Some(v);
        }
        if let Some(v) = patch.volume_cbm {
            shipment.volume_cbm = Some(v);
        }
        if let Some(v) = patch.incoterm {
            shipment.incoterm = Some(v);
        }
        if let Some(v) = patch.pickup_address {
            shipment.pickup_address = Some(v);
        }
        if let Some(v) = patch.shipper_name {
            shipment.shipper_name = Some(v);
        }
        if let Some(v) = patch.shipper_contacts {
            shipment.shipper_contacts = Some(v);
        }
        Ok(shipment.clone())
    }

    /// Replace the shipment's quote snapshot.
    pub fn save_quote(&self, id: ShipmentId, quote: Quote) -> Result<Shipment, NotFoundError> {
        let mut entry = self
            .shipments
            .get_mut(&id)
            .ok_or(NotFoundError::Shipment(id))?;
        entry.value_mut().shipment.quote = quote;
        Ok(entry.shipment.clone())
    }

    /// Change (or clear) the responsible user, recording the event.
    pub fn set_responsible(
        &self,
        id: ShipmentId,
        user_id: Option<UserId>,
        actor: &Actor,
    ) -> Result<Shipment, NotFoundError> {
        let mut entry = self
            .shipments
            .get_mut(&id)
            .ok_or(NotFoundError::Shipment(id))?;
        let record = entry.value_mut();
        let previous = record.shipment.responsible_user_id.clone();
        record.shipment.responsible_user_id = user_id.clone();
        push_event(
            record,
            EventKind::ResponsibleChanged,
            "Responsible changed".to_string(),
            json!({ "from": previous, "to": user_id }),
            actor,
        );
        Ok(record.shipment.clone())
    }

    /// What would happen if the shipment were advanced now.
    pub fn check_advance(&self, id: ShipmentId) -> Result<AdvanceDecision, NotFoundError> {
        let entry = self.shipments.get(&id).ok_or(NotFoundError::Shipment(id))?;
        Ok(can_advance(&entry.shipment, &entry.documents))
    }

    /// Advance the shipment to the next pipeline status.
    pub fn advance_shipment(
        &self,
        id: ShipmentId,
        actor: &Actor,
    ) -> Result<Shipment, RegistryError> {
        let mut entry = self
            .shipments
            .get_mut(&id)
            .ok_or(NotFoundError::Shipment(id))?;
        let record = entry.value_mut();
        let current = record.shipment.status;
        let target = current.next().ok_or_else(|| {
            let reason = if current.is_terminal() {
                "a closed shipment permits no further transitions".to_string()
            } else {
                format!("status \"{current}\" is not part of the pipeline")
            };
            ValidationError::InvalidTransition {
                from: current.to_string(),
                to: current.to_string(),
                reason,
            }
        })?;
        apply_transition(record, target, actor)?;
        Ok(record.shipment.clone())
    }

    /// Move the shipment to an explicit target status (forward only).
    pub fn set_shipment_status(
        &self,
        id: ShipmentId,
        target: ShipmentStatus,
        actor: &Actor,
    ) -> Result<Shipment, RegistryError> {
        let mut entry = self
            .shipments
            .get_mut(&id)
            .ok_or(NotFoundError::Shipment(id))?;
        let record = entry.value_mut();
        apply_transition(record, target, actor)?;
        Ok(record.shipment.clone())
    }

    /// Delete a shipment. Documents, comments, and events go with it, and
    /// any consolidation membership is detached.
    pub fn delete_shipment(&self, id: ShipmentId) -> Result<(), NotFoundError> {
        self.shipments
            .remove(&id)
            .ok_or(NotFoundError::Shipment(id))?;
        for mut cons in self.consolidations.iter_mut() {
            cons.value_mut().consolidation.remove_member(id);
        }
        info!(shipment = %id, "shipment deleted");
        Ok(())
    }

    // -- documents ----------------------------------------------------------

    /// Upload a document. At most one document per type exists: uploading
    /// a type again replaces the previous file while the review history
    /// rows of the replaced document are kept.
    pub fn upsert_document(
        &self,
        id: ShipmentId,
        input: NewDocument,
        actor: &Actor,
    ) -> Result<Document, NotFoundError> {
        let mut entry = self
            .shipments
            .get_mut(&id)
            .ok_or(NotFoundError::Shipment(id))?;
        let record = entry.value_mut();
        let now = Utc::now();

        record.documents.retain(|d| d.doc_type != input.doc_type);

        let doc = Document {
            id: DocumentId::new(),
            shipment_id: id,
            doc_type: input.doc_type,
            status: DocumentReview::Pending,
            name: input.name,
            file_name: input.file_name,
            mime_type: input.mime_type,
            size_bytes: input.size_bytes,
            note: None,
            uploaded_by: input.uploaded_by,
            uploaded_at: now,
            updated_at: now,
        };
        record.doc_history.push(DocumentStatusChange {
            doc_id: doc.id,
            from_status: None,
            to_status: DocumentReview::Pending,
            note: None,
            changed_by: actor.name.clone(),
            changed_at: now,
        });
        push_event(
            record,
            EventKind::DocUploaded,
            format!("Uploaded {}", doc.doc_type.title()),
            json!({ "doc_id": doc.id, "doc_type": doc.doc_type }),
            actor,
        );
        record.documents.push(doc.clone());
        info!(shipment = %id, doc_type = %doc.doc_type.as_str(), "document uploaded");
        Ok(doc)
    }

    /// Change a document's review status, appending the history row and
    /// the audit event. A no-op when the status is unchanged.
    pub fn set_document_status(
        &self,
        id: ShipmentId,
        doc_id: DocumentId,
        status: DocumentReview,
        note: Option<String>,
        actor: &Actor,
    ) -> Result<Document, RegistryError> {
        let mut entry = self
            .shipments
            .get_mut(&id)
            .ok_or(NotFoundError::Shipment(id))?;
        let record = entry.value_mut();
        let doc = record
            .documents
            .iter_mut()
            .find(|d| d.id == doc_id)
            .ok_or(NotFoundError::Document(doc_id))?;

        let previous = doc.status;
        if previous == status {
            return Ok(doc.clone());
        }
        let now = Utc::now();
        doc.status = status;
        doc.note = note.clone();
        doc.updated_at = now;
        let title = doc.doc_type.title();
        let snapshot = doc.clone();

        record.doc_history.push(DocumentStatusChange {
            doc_id,
            from_status: Some(previous),
            to_status: status,
            note: note.clone(),
            changed_by: actor.name.clone(),
            changed_at: now,
        });
        push_event(
            record,
            EventKind::DocStatusChanged,
            format!("{title}: {} \u{2192} {}", previous.as_str(), status.as_str()),
            json!({ "doc_id": doc_id, "from": previous, "to": status, "note": note }),
            actor,
        );
        Ok(snapshot)
    }

    /// Delete a document, recording the event. History rows remain.
    pub fn delete_document(
        &self,
        id: ShipmentId,
        doc_id: DocumentId,
        actor: &Actor,
    ) -> Result<(), RegistryError> {
        let mut entry = self
            .shipments
            .get_mut(&id)
            .ok_or(NotFoundError::Shipment(id))?;
        let record = entry.value_mut();
        let position = record
            .documents
            .iter()
            .position(|d| d.id == doc_id)
            .ok_or(NotFoundError::Document(doc_id))?;
        let doc = record.documents.remove(position);
        push_event(
            record,
            EventKind::DocDeleted,
            format!("Deleted {}", doc.doc_type.title()),
            json!({ "doc_id": doc_id, "doc_type": doc.doc_type }),
            actor,
        );
        Ok(())
    }

    // -- comments -----------------------------------------------------------

    /// Add a comment, recording the event.
    pub fn add_comment(
        &self,
        id: ShipmentId,
        author: impl Into<String>,
        body: impl Into<String>,
        actor: &Actor,
    ) -> Result<Comment, NotFoundError> {
        let mut entry = self
            .shipments
            .get_mut(&id)
            .ok_or(NotFoundError::Shipment(id))?;
        let record = entry.value_mut();
        let comment = Comment {
            id: CommentId::new(),
            shipment_id: id,
            user_id: actor.user_id.clone(),
            author: author.into(),
            body: body.into(),
            created_at: Utc::now(),
        };
        push_event(
            record,
            EventKind::CommentAdded,
            "Comment added".to_string(),
            json!({ "comment_id": comment.id }),
            actor,
        );
        record.comments.push(comment.clone());
        Ok(comment)
    }

    /// Delete a comment.
    pub fn delete_comment(
        &self,
        id: ShipmentId,
        comment_id: CommentId,
    ) -> Result<(), RegistryError> {
        let mut entry = self
            .shipments
            .get_mut(&id)
            .ok_or(NotFoundError::Shipment(id))?;
        let record = entry.value_mut();
        let before = record.comments.len();
        record.comments.retain(|c| c.id != comment_id);
        if record.comments.len() == before {
            return Err(NotFoundError::Comment(comment_id).into());
        }
        Ok(())
    }

    // -- projections --------------------------------------------------------

    /// The shipment's document-readiness score.
    pub fn readiness(&self, id: ShipmentId) -> Result<u8, NotFoundError> {
        let entry = self.shipments.get(&id).ok_or(NotFoundError::Shipment(id))?;
        Ok(readiness_for_shipment(entry.shipment.status, &entry.documents))
    }

    /// Whether the shipment satisfies the historical release rule.
    pub fn ready_to_release(&self, id: ShipmentId) -> Result<bool, NotFoundError> {
        let entry = self.shipments.get(&id).ok_or(NotFoundError::Shipment(id))?;
        Ok(ready_to_release(entry.shipment.status, &entry.documents))
    }

    /// Assemble the shipment's merged event timeline.
    pub fn timeline(&self, id: ShipmentId) -> Result<Vec<TimelineEvent>, NotFoundError> {
        let record = self
            .shipments
            .get(&id)
            .map(|r| r.value().clone())
            .ok_or(NotFoundError::Shipment(id))?;
        let links: Vec<ConsolidationLink> = self
            .consolidations
            .iter()
            .filter_map(|c| ConsolidationLink::for_member(&c.consolidation, id))
            .collect();
        let feed = assemble(TimelineSources {
            shipment: &record.shipment,
            events: &record.events,
            documents: &record.documents,
            doc_history: &record.doc_history,
            comments: &record.comments,
            consolidations: &links,
        });
        info!(shipment = %id, entries = feed.len(), "timeline assembled");
        Ok(feed)
    }

    // -- consolidations -----------------------------------------------------

    /// Create a consolidation over an initial member set. Every member
    /// must exist and sit at `to_load`; an empty set is allowed.
    pub fn create_consolidation(
        &self,
        title: Option<String>,
        member_ids: &[ShipmentId],
    ) -> Result<Consolidation, RegistryError> {
        let candidates = self.statuses_of(member_ids)?;
        ensure_eligible(&candidates)?;

        let now = Utc::now();
        let cons_number = self.cons_numbers.next_number();
        let mut consolidation = Consolidation {
            id: ConsolidationId::new(),
            cons_number: cons_number.clone(),
            title,
            status: ConsolidationStatus::Loaded,
            members: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        for (shipment_id, _) in &candidates {
            consolidation.add_member(*shipment_id, now);
        }
        let record = ConsolidationRecord {
            consolidation: consolidation.clone(),
            history: vec![ConsolidationStatusChange {
                consolidation_id: consolidation.id,
                from_status: None,
                to_status: ConsolidationStatus::Loaded,
                note: None,
                changed_by: None,
                created_at: now,
            }],
        };
        self.consolidations.insert(consolidation.id, record);
        info!(
            consolidation = %consolidation.id,
            number = %cons_number,
            members = consolidation.members.len(),
            "consolidation created"
        );
        Ok(consolidation)
    }

    /// Get a consolidation by id.
    pub fn get_consolidation(&self, id: ConsolidationId) -> Option<Consolidation> {
        self.consolidations.get(&id).map(|r| r.consolidation.clone())
    }

    /// List all consolidations.
    pub fn list_consolidations(&self) -> Vec<Consolidation> {
        self.consolidations
            .iter()
            .map(|r| r.consolidation.clone())
            .collect()
    }

    /// The consolidation's status history, oldest first.
    pub fn consolidation_history(
        &self,
        id: ConsolidationId,
    ) -> Result<Vec<ConsolidationStatusChange>, NotFoundError> {
        let entry = self
            .consolidations
            .get(&id)
            .ok_or(NotFoundError::Consolidation(id))?;
        Ok(entry.history.clone())
    }

    /// Attach shipments to a consolidation. All-or-nothing: every
    /// candidate must exist and sit at `to_load` when its status is
    /// snapshotted. Already-attached shipments are skipped silently
    /// (set semantics).
    pub fn attach_members(
        &self,
        id: ConsolidationId,
        shipment_ids: &[ShipmentId],
    ) -> Result<Consolidation, RegistryError> {
        let candidates = self.statuses_of(shipment_ids)?;
        ensure_eligible(&candidates)?;

        let mut entry = self
            .consolidations
            .get_mut(&id)
            .ok_or(NotFoundError::Consolidation(id))?;
        let record = entry.value_mut();
        let now = Utc::now();
        for (shipment_id, _) in &candidates {
            record.consolidation.add_member(*shipment_id, now);
        }
        record.consolidation.updated_at = now;
        Ok(record.consolidation.clone())
    }

    /// Detach one member from a consolidation.
    pub fn detach_member(
        &self,
        id: ConsolidationId,
        shipment_id: ShipmentId,
    ) -> Result<Consolidation, RegistryError> {
        let mut entry = self
            .consolidations
            .get_mut(&id)
            .ok_or(NotFoundError::Consolidation(id))?;
        let record = entry.value_mut();
        if !record.consolidation.remove_member(shipment_id) {
            return Err(NotFoundError::MembershipLink {
                consolidation: id,
                shipment: shipment_id,
            }
            .into());
        }
        record.consolidation.updated_at = Utc::now();
        Ok(record.consolidation.clone())
    }

    /// Replace the member set wholesale: shipments not in `shipment_ids`
    /// are detached, new ones attached. Only the additions are checked
    /// for eligibility; existing members may have moved on since they
    /// were attached.
    pub fn set_members(
        &self,
        id: ConsolidationId,
        shipment_ids: &[ShipmentId],
    ) -> Result<Consolidation, RegistryError> {
        let current = self
            .consolidations
            .get(&id)
            .map(|r| r.consolidation.member_ids())
            .ok_or(NotFoundError::Consolidation(id))?;
        let additions: Vec<ShipmentId> = shipment_ids
            .iter()
            .filter(|sid| !current.contains(sid))
            .copied()
            .collect();
        let candidates = self.statuses_of(&additions)?;
        ensure_eligible(&candidates)?;

        let mut entry = self
            .consolidations
            .get_mut(&id)
            .ok_or(NotFoundError::Consolidation(id))?;
        let record = entry.value_mut();
        let now = Utc::now();
        record
            .consolidation
            .members
            .retain(|m| shipment_ids.contains(&m.shipment_id));
        for shipment_id in &additions {
            record.consolidation.add_member(*shipment_id, now);
        }
        record.consolidation.updated_at = now;
        Ok(record.consolidation.clone())
    }

    /// Advance a consolidation to a later pipeline status. Forward-only,
    /// and no member shipment may lag behind the target on the shared
    /// rank table. An empty consolidation advances freely.
    pub fn advance_consolidation(
        &self,
        id: ConsolidationId,
        target: ConsolidationStatus,
        note: Option<String>,
        actor: &Actor,
    ) -> Result<Consolidation, RegistryError> {
        let mut entry = self
            .consolidations
            .get_mut(&id)
            .ok_or(NotFoundError::Consolidation(id))?;
        let record = entry.value_mut();
        let current = record.consolidation.status;

        check_cons_forward(current, target)?;
        let members = self.statuses_of(&record.consolidation.member_ids())?;
        ensure_members_not_behind(&members, target)?;

        let now = Utc::now();
        record.consolidation.status = target;
        record.consolidation.updated_at = now;
        record.history.push(ConsolidationStatusChange {
            consolidation_id: id,
            from_status: Some(current),
            to_status: target,
            note,
            changed_by: actor.name.clone(),
            created_at: now,
        });
        info!(consolidation = %id, from = %current, to = %target, "consolidation advanced");
        Ok(record.consolidation.clone())
    }

    /// Dissolve a consolidation: the record and its history go away, the
    /// member shipments stay untouched.
    pub fn dissolve_consolidation(&self, id: ConsolidationId) -> Result<(), NotFoundError> {
        self.consolidations
            .remove(&id)
            .ok_or(NotFoundError::Consolidation(id))?;
        info!(consolidation = %id, "consolidation dissolved");
        Ok(())
    }

    // -- helpers ------------------------------------------------------------

    /// Snapshot `(id, status)` for each shipment, failing with the full
    /// missing list if any do not exist.
    fn statuses_of(
        &self,
        ids: &[ShipmentId],
    ) -> Result<Vec<(ShipmentId, ShipmentStatus)>, ValidationError> {
        let mut found = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();
        for id in ids {
            match self.shipments.get(id) {
                Some(entry) => found.push((*id, entry.shipment.status)),
                None => missing.push(*id),
            }
        }
        if !missing.is_empty() {
            let details = missing
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ValidationError::ShipmentsMissing {
                ids: missing,
                details,
            });
        }
        Ok(found)
    }
}

impl Default for ShipmentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShipmentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShipmentRegistry")
            .field("shipments_count", &self.shipments.len())
            .field("consolidations_count", &self.consolidations.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validate and apply a shipment status change under the caller's entry
/// lock, appending the `pl.status_changed` event.
fn apply_transition(
    record: &mut ShipmentRecord,
    target: ShipmentStatus,
    actor: &Actor,
) -> Result<(), ValidationError> {
    validate_transition(&record.shipment, &record.documents, target)?;
    let from = record.shipment.status;
    record.shipment.status = target;
    push_event(
        record,
        EventKind::StatusChanged,
        format!("Status: {from} \u{2192} {target}"),
        json!({ "from": from, "to": target }),
        actor,
    );
    info!(shipment = %record.shipment.id, from = %from, to = %target, "shipment advanced");
    Ok(())
}

fn push_event(
    record: &mut ShipmentRecord,
    kind: EventKind,
    message: String,
    meta: serde_json::Value,
    actor: &Actor,
) {
    record.events.push(EventRecord {
        id: EventId::new(),
        shipment_id: record.shipment.id,
        kind,
        message,
        meta,
        actor_user_id: actor.user_id.clone(),
        actor_name: actor.name.clone(),
        created_at: Utc::now(),
    });
}

/// Forward-only ordering for the consolidation pipeline.
fn check_cons_forward(
    current: ConsolidationStatus,
    target: ConsolidationStatus,
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
            reason: "a closed consolidation permits no further transitions".to_string(),
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

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
