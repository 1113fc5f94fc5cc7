//! # Shipment Record
//!
//! The shipment (PL) snapshot the validators and calculators reason about,
//! plus the quote/calculator snapshot attached to it. Persistence of these
//! rows is owned by an external collaborator; this crate only defines their
//! shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ClientId, ShipmentId, UserId};
use crate::status::ShipmentStatus;

/// Pricing snapshot for a shipment.
///
/// `calculator` holds the full cost-calculator state (inputs and computed
/// totals) as an opaque JSON blob; the core only ever inspects
/// `client_price`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Quote {
    /// Price quoted to the client, in USD. `None` until a quote is saved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_price: Option<f64>,
    /// Calculator snapshot (inputs and outputs), kept opaque.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub calculator: serde_json::Value,
}

impl Quote {
    /// Whether a positive client price has been recorded. Leaving the
    /// draft stage requires this.
    pub fn has_positive_price(&self) -> bool {
        self.client_price.map(|p| p > 0.0).unwrap_or(false)
    }
}

/// A shipment (PL record).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    pub id: ShipmentId,
    /// Human-legible number `PL-<year>-<id>`, assigned at creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pl_number: Option<String>,
    pub client_id: ClientId,
    pub name: String,
    /// Gross weight in kilograms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Volume in cubic meters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_cbm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incoterm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipper_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipper_contacts: Option<String>,
    pub status: ShipmentStatus,
    #[serde(default)]
    pub quote: Quote,
    /// Responsible logistics staff member, if assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible_user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}
