//! # Status Catalog — Single Source of Truth
//!
//! Defines the shipment and consolidation status enumerations, their
//! ordered pipelines, the shared rank table used to compare a shipment
//! against a consolidation, and the operator-facing stage mapping.
//!
//! Every rank, label, and "next status" lookup in the workspace flows
//! through this module. There is deliberately no second copy of any of
//! these tables.
//!
//! ## Unknown Status Handling
//!
//! Status codes originate from untrusted persistence rows. Parsing never
//! fails: an unrecognized code becomes [`ShipmentStatus::Unknown`] /
//! [`ConsolidationStatus::Unknown`], which has no pipeline position, no
//! next status, and ranks below every known status.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Shipment status
// ---------------------------------------------------------------------------

/// Lifecycle status of a shipment (PL record).
///
/// The pipeline runs `draft → awaiting_docs → to_load → loaded →
/// to_customs → released → kg_customs → delivered → closed`.
/// `cancelled` is a valid status but sits outside the pipeline: it has no
/// rank and no next status, and can only be reached by a direct edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    Draft,
    AwaitingDocs,
    ToLoad,
    Loaded,
    ToCustoms,
    Released,
    KgCustoms,
    Delivered,
    Closed,
    Cancelled,
    /// Catch-all for unrecognized codes from persistence.
    #[serde(other)]
    Unknown,
}

/// The canonical ordered shipment pipeline. Fixed, non-empty, no duplicates.
pub const SHIPMENT_PIPELINE: &[ShipmentStatus] = &[
    ShipmentStatus::Draft,
    ShipmentStatus::AwaitingDocs,
    ShipmentStatus::ToLoad,
    ShipmentStatus::Loaded,
    ShipmentStatus::ToCustoms,
    ShipmentStatus::Released,
    ShipmentStatus::KgCustoms,
    ShipmentStatus::Delivered,
    ShipmentStatus::Closed,
];

impl ShipmentStatus {
    /// The wire code for this status (snake_case string constant).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::AwaitingDocs => "awaiting_docs",
            Self::ToLoad => "to_load",
            Self::Loaded => "loaded",
            Self::ToCustoms => "to_customs",
            Self::Released => "released",
            Self::KgCustoms => "kg_customs",
            Self::Delivered => "delivered",
            Self::Closed => "closed",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a wire code. Never fails: unrecognized codes map to `Unknown`.
    pub fn parse(code: &str) -> Self {
        match code {
            "draft" => Self::Draft,
            "awaiting_docs" => Self::AwaitingDocs,
            "to_load" => Self::ToLoad,
            "loaded" => Self::Loaded,
            "to_customs" => Self::ToCustoms,
            "released" => Self::Released,
            "kg_customs" => Self::KgCustoms,
            "delivered" => Self::Delivered,
            "closed" => Self::Closed,
            "cancelled" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }

    /// Human-readable label for operator displays.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::AwaitingDocs => "Awaiting documents",
            Self::ToLoad => "To load",
            Self::Loaded => "Loaded",
            Self::ToCustoms => "China customs",
            Self::Released => "In transit",
            Self::KgCustoms => "KG customs clearance",
            Self::Delivered => "Payment",
            Self::Closed => "Closed",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
        }
    }

    /// Zero-based position in [`SHIPMENT_PIPELINE`], or `None` for statuses
    /// outside the pipeline (`cancelled`, `unknown`).
    pub fn pipeline_rank(&self) -> Option<usize> {
        SHIPMENT_PIPELINE.iter().position(|s| s == self)
    }

    /// The status immediately following this one in the pipeline, or `None`
    /// if this status is terminal or outside the pipeline.
    pub fn next(&self) -> Option<ShipmentStatus> {
        let i = self.pipeline_rank()?;
        SHIPMENT_PIPELINE.get(i + 1).copied()
    }

    /// Whether this is the terminal pipeline status.
    pub fn is_terminal(&self) -> bool {
        *self == Self::Closed
    }

    /// Shared cross-enumeration rank. See [`shared_rank`].
    pub fn shared_rank(&self) -> Option<u8> {
        shared_rank(self.as_str())
    }

    /// The operator-facing stage this status belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Draft => Stage::Intake,
            Self::AwaitingDocs => Stage::Collect,
            Self::ToLoad | Self::Loaded => Stage::Loading,
            Self::ToCustoms => Stage::CnFormalities,
            Self::Released => Stage::InTransit,
            Self::KgCustoms => Stage::KgCustoms,
            Self::Delivered => Stage::Payment,
            Self::Closed => Stage::Closing,
            // Cancelled and unknown rows still render somewhere on the
            // stage strip; the original system showed them as in transit.
            Self::Cancelled | Self::Unknown => Stage::InTransit,
        }
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Consolidation status
// ---------------------------------------------------------------------------

/// Lifecycle status of a transport consolidation.
///
/// Shares the tail of the shipment pipeline: a consolidation is born
/// `loaded` and runs `loaded → to_customs → released → kg_customs →
/// delivered → closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsolidationStatus {
    Loaded,
    ToCustoms,
    Released,
    KgCustoms,
    Delivered,
    Closed,
    /// Catch-all for unrecognized codes from persistence.
    #[serde(other)]
    Unknown,
}

/// The canonical ordered consolidation pipeline.
pub const CONS_PIPELINE: &[ConsolidationStatus] = &[
    ConsolidationStatus::Loaded,
    ConsolidationStatus::ToCustoms,
    ConsolidationStatus::Released,
    ConsolidationStatus::KgCustoms,
    ConsolidationStatus::Delivered,
    ConsolidationStatus::Closed,
];

impl ConsolidationStatus {
    /// The wire code for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::ToCustoms => "to_customs",
            Self::Released => "released",
            Self::KgCustoms => "kg_customs",
            Self::Delivered => "delivered",
            Self::Closed => "closed",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a wire code. Never fails: unrecognized codes map to `Unknown`.
    pub fn parse(code: &str) -> Self {
        match code {
            "loaded" => Self::Loaded,
            "to_customs" => Self::ToCustoms,
            "released" => Self::Released,
            "kg_customs" => Self::KgCustoms,
            "delivered" => Self::Delivered,
            "closed" => Self::Closed,
            _ => Self::Unknown,
        }
    }

    /// Human-readable label for operator displays.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loaded => "Loaded",
            Self::ToCustoms => "China customs",
            Self::Released => "In transit",
            Self::KgCustoms => "KG customs clearance",
            Self::Delivered => "Payment",
            Self::Closed => "Closed",
            Self::Unknown => "Unknown",
        }
    }

    /// Zero-based position in [`CONS_PIPELINE`], or `None` for `Unknown`.
    pub fn pipeline_rank(&self) -> Option<usize> {
        CONS_PIPELINE.iter().position(|s| s == self)
    }

    /// The next status in the consolidation pipeline, if any.
    pub fn next(&self) -> Option<ConsolidationStatus> {
        let i = self.pipeline_rank()?;
        CONS_PIPELINE.get(i + 1).copied()
    }

    /// Whether this is the terminal consolidation status.
    pub fn is_terminal(&self) -> bool {
        *self == Self::Closed
    }

    /// Shared cross-enumeration rank. See [`shared_rank`].
    pub fn shared_rank(&self) -> Option<u8> {
        shared_rank(self.as_str())
    }
}

impl std::fmt::Display for ConsolidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Shared rank table
// ---------------------------------------------------------------------------

/// Cross-enumeration rank table keyed by wire code.
///
/// Shipment and consolidation statuses must compare meaningfully when a
/// consolidation advances: a member shipment "lags behind" when its shared
/// rank is below the consolidation's target rank. Codes absent from this
/// table (early shipment stages, `cancelled`, anything unrecognized) rank
/// below everything and return `None`.
pub fn shared_rank(code: &str) -> Option<u8> {
    match code {
        "to_load" => Some(0),
        "loaded" => Some(1),
        "to_customs" => Some(2),
        "released" => Some(3),
        "kg_customs" => Some(4),
        "delivered" => Some(5),
        "closed" => Some(6),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Operator-facing business stage. A display grouping over statuses, not a
/// second state machine: `to_load` and `loaded` share the loading stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Intake,
    Collect,
    Loading,
    CnFormalities,
    InTransit,
    KgCustoms,
    Payment,
    Closing,
}

/// Stages in business order.
pub const ORDERED_STAGES: &[Stage] = &[
    Stage::Intake,
    Stage::Collect,
    Stage::Loading,
    Stage::CnFormalities,
    Stage::InTransit,
    Stage::KgCustoms,
    Stage::Payment,
    Stage::Closing,
];

impl Stage {
    /// Numbered label for the stage strip.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Intake => "1. Client intake",
            Self::Collect => "2. Cargo and document collection",
            Self::Loading => "3. Loading",
            Self::CnFormalities => "4. China formalities",
            Self::InTransit => "5. In transit",
            Self::KgCustoms => "6. KG customs clearance",
            Self::Payment => "7. Payment",
            Self::Closing => "8. Closing",
        }
    }

    /// The stage after this one in business order, if any.
    pub fn next(&self) -> Option<Stage> {
        let i = ORDERED_STAGES.iter().position(|s| s == self)?;
        ORDERED_STAGES.get(i + 1).copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipment_pipeline_order() {
        assert_eq!(SHIPMENT_PIPELINE.len(), 9);
        assert_eq!(SHIPMENT_PIPELINE[0], ShipmentStatus::Draft);
        assert_eq!(SHIPMENT_PIPELINE[8], ShipmentStatus::Closed);
    }

    #[test]
    fn shipment_next_walks_pipeline() {
        assert_eq!(
            ShipmentStatus::Draft.next(),
            Some(ShipmentStatus::AwaitingDocs)
        );
        assert_eq!(
            ShipmentStatus::Delivered.next(),
            Some(ShipmentStatus::Closed)
        );
        assert_eq!(ShipmentStatus::Closed.next(), None);
    }

    #[test]
    fn cancelled_is_outside_pipeline() {
        assert_eq!(ShipmentStatus::Cancelled.pipeline_rank(), None);
        assert_eq!(ShipmentStatus::Cancelled.next(), None);
    }

    #[test]
    fn unknown_parse_never_fails() {
        assert_eq!(ShipmentStatus::parse("warehouse_42"), ShipmentStatus::Unknown);
        assert_eq!(ShipmentStatus::Unknown.pipeline_rank(), None);
        assert_eq!(ShipmentStatus::Unknown.next(), None);
        assert_eq!(ShipmentStatus::Unknown.shared_rank(), None);
        assert_eq!(
            ConsolidationStatus::parse("banana"),
            ConsolidationStatus::Unknown
        );
    }

    #[test]
    fn unknown_deserializes_from_bad_code() {
        let s: ShipmentStatus = serde_json::from_str("\"definitely_not_a_status\"").unwrap();
        assert_eq!(s, ShipmentStatus::Unknown);
        let c: ConsolidationStatus = serde_json::from_str("\"nope\"").unwrap();
        assert_eq!(c, ConsolidationStatus::Unknown);
    }

    #[test]
    fn wire_codes_round_trip() {
        for s in SHIPMENT_PIPELINE {
            assert_eq!(ShipmentStatus::parse(s.as_str()), *s);
            let json = serde_json::to_string(s).unwrap();
            assert_eq!(json, format!("\"{}\"", s.as_str()));
        }
        for c in CONS_PIPELINE {
            assert_eq!(ConsolidationStatus::parse(c.as_str()), *c);
        }
    }

    #[test]
    fn shared_rank_aligns_both_pipelines() {
        assert_eq!(ShipmentStatus::ToLoad.shared_rank(), Some(0));
        assert_eq!(ShipmentStatus::Loaded.shared_rank(), Some(1));
        assert_eq!(ConsolidationStatus::Loaded.shared_rank(), Some(1));
        assert_eq!(ConsolidationStatus::Closed.shared_rank(), Some(6));
        assert_eq!(ShipmentStatus::Draft.shared_rank(), None);
        assert_eq!(ShipmentStatus::Cancelled.shared_rank(), None);
    }

    #[test]
    fn shared_rank_is_monotone_over_cons_pipeline() {
        let ranks: Vec<u8> = CONS_PIPELINE
            .iter()
            .map(|c| c.shared_rank().unwrap())
            .collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        assert_eq!(ranks, sorted);
    }

    #[test]
    fn stage_mapping() {
        assert_eq!(ShipmentStatus::Draft.stage(), Stage::Intake);
        assert_eq!(ShipmentStatus::ToLoad.stage(), Stage::Loading);
        assert_eq!(ShipmentStatus::Loaded.stage(), Stage::Loading);
        assert_eq!(ShipmentStatus::Unknown.stage(), Stage::InTransit);
        assert_eq!(Stage::Intake.next(), Some(Stage::Collect));
        assert_eq!(Stage::Closing.next(), None);
    }

    #[test]
    fn cons_pipeline_starts_at_loaded() {
        assert_eq!(CONS_PIPELINE[0], ConsolidationStatus::Loaded);
        assert_eq!(
            ConsolidationStatus::Loaded.next(),
            Some(ConsolidationStatus::ToCustoms)
        );
        assert_eq!(ConsolidationStatus::Closed.next(), None);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Parsing accepts any string without panicking, and anything it
        /// does not recognize degrades to `Unknown`.
        #[test]
        fn parse_never_panics(code in "[a-z_]{0,24}") {
            let s = ShipmentStatus::parse(&code);
            let c = ConsolidationStatus::parse(&code);
            if s == ShipmentStatus::Unknown {
                prop_assert_eq!(s.pipeline_rank(), None);
            } else {
                prop_assert_eq!(s.as_str(), code.as_str());
            }
            if c != ConsolidationStatus::Unknown {
                prop_assert_eq!(c.as_str(), code.as_str());
            }
        }

        /// Unrecognized codes never appear in the shared rank table.
        #[test]
        fn unknown_codes_rank_below_everything(code in "[a-z_]{0,24}") {
            if ShipmentStatus::parse(&code) == ShipmentStatus::Unknown
                && ConsolidationStatus::parse(&code) == ConsolidationStatus::Unknown
            {
                prop_assert_eq!(shared_rank(&code), None);
            }
        }

        /// Deserializing an arbitrary JSON string yields a value, never an
        /// error, matching what `parse` returns.
        #[test]
        fn deserialize_matches_parse(code in "[a-z_]{0,24}") {
            let json = format!("\"{code}\"");
            let s: ShipmentStatus = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(s, ShipmentStatus::parse(&code));
        }
    }
}
