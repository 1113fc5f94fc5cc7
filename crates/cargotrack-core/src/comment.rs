//! Free-text shipment comments. Append-only; individually deletable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CommentId, ShipmentId, UserId};

/// A comment on a shipment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub shipment_id: ShipmentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Display name of the author (kept even if the user row goes away).
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
