//! # Shipment Documents
//!
//! Document types, review states, the document record itself, and the
//! append-only review-status history row.
//!
//! A shipment holds at most one document per type; a later upload replaces
//! the prior one logically while the status history is preserved.
//!
//! ## Legacy Review Codes
//!
//! The system this replaces used two parallel vocabularies for review
//! status: the server wrote `pending | reviewed | approved | rejected`
//! while older UI rows carried `uploaded | checked_by_logistic |
//! recheck_ok`. [`DocumentReview::parse`] accepts both so historical rows
//! never fail to load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{DocumentId, ShipmentId};

// ---------------------------------------------------------------------------
// Document type
// ---------------------------------------------------------------------------

/// The closed set of document types a shipment can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Commercial invoice (with translation).
    Invoice,
    /// Packing list.
    PackingList,
    /// Cargo inspection report / photo evidence.
    Inspection,
    /// Pre-declaration filing for China customs formalities.
    PreDeclaration,
}

/// Documents that must exist and be reviewed before a shipment may leave
/// the document-collection stage. Pre-declaration is gated separately at
/// the customs stage.
pub const REQUIRED_DOC_TYPES: &[DocumentType] = &[
    DocumentType::Invoice,
    DocumentType::PackingList,
    DocumentType::Inspection,
];

impl DocumentType {
    /// The wire code for this document type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::PackingList => "packing_list",
            Self::Inspection => "inspection",
            Self::PreDeclaration => "pre_declaration",
        }
    }

    /// Human-readable title for operator displays.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Invoice => "Invoice",
            Self::PackingList => "Packing list",
            Self::Inspection => "Inspection",
            Self::PreDeclaration => "Pre-declaration",
        }
    }

    /// Parse a wire code, tolerating legacy field spellings.
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "invoice" => Some(Self::Invoice),
            "packing_list" => Some(Self::PackingList),
            "inspection" => Some(Self::Inspection),
            "pre_declaration" => Some(Self::PreDeclaration),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Review status
// ---------------------------------------------------------------------------

/// Review state of a document.
///
/// `Pending` is a fresh upload, `Reviewed` has been checked by logistics
/// staff, `Approved` has passed the full re-verification, `Rejected` must
/// be re-uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentReview {
    Pending,
    Reviewed,
    Approved,
    Rejected,
}

impl DocumentReview {
    /// The wire code for this review state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Normalize a stored code, accepting both the server vocabulary and
    /// the legacy UI vocabulary. Anything unrecognized is treated as a
    /// fresh upload, matching the original normalization.
    pub fn parse(code: &str) -> Self {
        match code.to_ascii_lowercase().as_str() {
            "pending" | "uploaded" => Self::Pending,
            "reviewed" | "checked_by_logistic" => Self::Reviewed,
            "approved" | "recheck_ok" => Self::Approved,
            "rejected" => Self::Rejected,
            _ => Self::Pending,
        }
    }

    /// Whether logistics staff have signed off on this document
    /// (`Reviewed` or better).
    pub fn is_reviewed(&self) -> bool {
        matches!(self, Self::Reviewed | Self::Approved)
    }
}

impl std::fmt::Display for DocumentReview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A document attached to a shipment.
///
/// Invariant: at most one document per `(shipment, doc_type)` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub shipment_id: ShipmentId,
    pub doc_type: DocumentType,
    pub status: DocumentReview,
    /// Operator-supplied display name, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Append-only review-status history row. Never mutated, only appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStatusChange {
    pub doc_id: DocumentId,
    /// `None` for the first recorded status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_status: Option<DocumentReview>,
    pub to_status: DocumentReview,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_by: Option<String>,
    pub changed_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
