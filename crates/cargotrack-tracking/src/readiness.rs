//! # Document Readiness Score
//!
//! Derives a 0–100 readiness percentage for a shipment from the review
//! states of its required documents. Pure and deterministic; used for
//! operator-facing progress indication only.
//!
//! Per-document weights: rejected 0, fresh upload 10, staff-reviewed 50,
//! fully re-verified 100 — with the twist that 100 is only honored once
//! the shipment has reached the loading stage, so a card cannot show
//! "100% ready" while the shipment is still collecting documents.

use cargotrack_core::{Document, DocumentReview, DocumentType, ShipmentStatus, REQUIRED_DOC_TYPES};

/// Progress contribution of a single document given the shipment status.
pub fn percent_for_doc(review: DocumentReview, shipment_status: ShipmentStatus) -> u8 {
    match review {
        DocumentReview::Rejected => 0,
        DocumentReview::Pending => 10,
        DocumentReview::Reviewed => 50,
        DocumentReview::Approved => {
            // Full credit only from the loading stage onward; the shared
            // rank table covers exactly to_load..closed.
            if shipment_status.shared_rank().is_some() {
                100
            } else {
                50
            }
        }
    }
}

/// Shipment-level readiness: the average over the required document set
/// (invoice, packing list, inspection).
///
/// If any required document is missing entirely the score is 0 regardless
/// of the others. While the shipment sits at `to_load` without every
/// required document fully re-verified, the score is smoothed to
/// `max(avg, 90)` so the indicator does not visually regress at a stage
/// operators perceive as nearly complete.
pub fn readiness_for_shipment(status: ShipmentStatus, docs: &[Document]) -> u8 {
    if docs.is_empty() {
        return 0;
    }

    let mut reviews = Vec::with_capacity(REQUIRED_DOC_TYPES.len());
    for doc_type in REQUIRED_DOC_TYPES {
        match doc_of(docs, *doc_type) {
            Some(d) => reviews.push(d.status),
            None => return 0,
        }
    }

    let total: u32 = reviews
        .iter()
        .map(|r| u32::from(percent_for_doc(*r, status)))
        .sum();
    let avg = ((total as f64) / (reviews.len() as f64)).round() as u8;

    let all_approved = reviews.iter().all(|r| *r == DocumentReview::Approved);
    if status == ShipmentStatus::ToLoad && !all_approved {
        return avg.max(90);
    }
    avg
}

/// Historical release rule: the shipment is ready to release when the
/// score is full and both invoice and packing list are fully re-verified.
pub fn ready_to_release(status: ShipmentStatus, docs: &[Document]) -> bool {
    let approved = |t: DocumentType| {
        doc_of(docs, t)
            .map(|d| d.status == DocumentReview::Approved)
            .unwrap_or(false)
    };
    readiness_for_shipment(status, docs) >= 100
        && approved(DocumentType::Invoice)
        && approved(DocumentType::PackingList)
}

fn doc_of(docs: &[Document], doc_type: DocumentType) -> Option<&Document> {
    docs.iter().find(|d| d.doc_type == doc_type)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use cargotrack_core::{DocumentId, ShipmentId};
    use chrono::Utc;

    fn sample_doc(doc_type: DocumentType, status: DocumentReview) -> Document {
        let now = Utc::now();
        Document {
            id: DocumentId::new(),
            shipment_id: ShipmentId(1),
            doc_type,
            status,
            name: None,
            file_name: format!("{}.pdf", doc_type.as_str()),
            mime_type: None,
            size_bytes: None,
            note: None,
            uploaded_by: None,
            uploaded_at: now,
            updated_at: now,
        }
    }

    fn required(invoice: DocumentReview, packing: DocumentReview, inspection: DocumentReview) -> Vec<Document> {
        vec![
            sample_doc(DocumentType::Invoice, invoice),
            sample_doc(DocumentType::PackingList, packing),
            sample_doc(DocumentType::Inspection, inspection),
        ]
    }

    #[test]
    fn rejected_contributes_zero_regardless_of_stage() {
        for status in [
            ShipmentStatus::Draft,
            ShipmentStatus::ToLoad,
            ShipmentStatus::Closed,
        ] {
            assert_eq!(percent_for_doc(DocumentReview::Rejected, status), 0);
        }
    }

    #[test]
    fn approved_is_capped_at_50_before_loading() {
        assert_eq!(
            percent_for_doc(DocumentReview::Approved, ShipmentStatus::AwaitingDocs),
            50
        );
        assert_eq!(
            percent_for_doc(DocumentReview::Approved, ShipmentStatus::Draft),
            50
        );
        assert_eq!(
            percent_for_doc(DocumentReview::Approved, ShipmentStatus::ToLoad),
            100
        );
        assert_eq!(
            percent_for_doc(DocumentReview::Approved, ShipmentStatus::Delivered),
            100
        );
    }

    #[test]
    fn no_documents_means_zero() {
        assert_eq!(readiness_for_shipment(ShipmentStatus::AwaitingDocs, &[]), 0);
    }

    #[test]
    fn missing_required_document_means_zero() {
        let docs = vec![
            sample_doc(DocumentType::Invoice, DocumentReview::Approved),
            sample_doc(DocumentType::PackingList, DocumentReview::Approved),
        ];
        assert_eq!(readiness_for_shipment(ShipmentStatus::ToLoad, &docs), 0);
    }

    #[test]
    fn extra_documents_do_not_affect_the_average() {
        let mut docs = required(
            DocumentReview::Reviewed,
            DocumentReview::Reviewed,
            DocumentReview::Reviewed,
        );
        docs.push(sample_doc(DocumentType::PreDeclaration, DocumentReview::Rejected));
        assert_eq!(
            readiness_for_shipment(ShipmentStatus::AwaitingDocs, &docs),
            50
        );
    }

    #[test]
    fn all_approved_at_loading_is_100() {
        let docs = required(
            DocumentReview::Approved,
            DocumentReview::Approved,
            DocumentReview::Approved,
        );
        assert_eq!(readiness_for_shipment(ShipmentStatus::ToLoad, &docs), 100);
        assert_eq!(readiness_for_shipment(ShipmentStatus::Released, &docs), 100);
    }

    #[test]
    fn to_load_smooths_to_at_least_90() {
        let docs = required(
            DocumentReview::Approved,
            DocumentReview::Approved,
            DocumentReview::Reviewed,
        );
        // Raw average would be (100 + 100 + 50) / 3 = 83.
        assert_eq!(readiness_for_shipment(ShipmentStatus::ToLoad, &docs), 90);
    }

    #[test]
    fn smoothing_applies_only_at_to_load() {
        let docs = required(
            DocumentReview::Approved,
            DocumentReview::Approved,
            DocumentReview::Reviewed,
        );
        assert_eq!(readiness_for_shipment(ShipmentStatus::Loaded, &docs), 83);
        assert_eq!(
            readiness_for_shipment(ShipmentStatus::AwaitingDocs, &docs),
            50
        );
    }

    #[test]
    fn rejected_required_document_drags_the_average() {
        let docs = required(
            DocumentReview::Rejected,
            DocumentReview::Reviewed,
            DocumentReview::Reviewed,
        );
        // (0 + 50 + 50) / 3 = 33.
        assert_eq!(
            readiness_for_shipment(ShipmentStatus::AwaitingDocs, &docs),
            33
        );
    }

    #[test]
    fn readiness_is_deterministic() {
        let docs = required(
            DocumentReview::Pending,
            DocumentReview::Reviewed,
            DocumentReview::Approved,
        );
        let first = readiness_for_shipment(ShipmentStatus::Loaded, &docs);
        for _ in 0..10 {
            assert_eq!(readiness_for_shipment(ShipmentStatus::Loaded, &docs), first);
        }
    }

    #[test]
    fn release_rule_requires_invoice_and_packing_list_approved() {
        let docs = required(
            DocumentReview::Approved,
            DocumentReview::Approved,
            DocumentReview::Approved,
        );
        assert!(ready_to_release(ShipmentStatus::ToLoad, &docs));

        let docs = required(
            DocumentReview::Approved,
            DocumentReview::Reviewed,
            DocumentReview::Approved,
        );
        assert!(!ready_to_release(ShipmentStatus::ToLoad, &docs));
    }
}
