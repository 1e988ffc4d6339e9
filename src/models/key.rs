//! Key data models, API request/response types and the QR payload.
//!
//! This module defines:
//! - `KeyStatus`: the two-state availability machine
//! - `Key`: database entity representing a physical key
//! - `KeyWithHolder`: catalog row joined with the holder's display name
//! - `QrPayload`: the structure printed into key QR codes and decoded on scan

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Availability state of a key.
///
/// Maps to the `key_status` Postgres enum. The only permitted transitions
/// are `Available -> InUse` (checkout) and `InUse -> Available` (check-in),
/// and both happen exclusively through conditional updates in the
/// reservation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "key_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum KeyStatus {
    Available,
    InUse,
}

/// Represents a key record from the database.
///
/// # Database Table
///
/// Maps to the `keys` table. A CHECK constraint guarantees that
/// `holder_id` is set exactly when `status` is `in_use`, so the pair can
/// never drift apart regardless of which code path writes the row.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Key {
    /// Unique identifier for this key, server-assigned
    pub id: Uuid,

    /// Human-readable name (e.g. "Lab 3")
    pub name: String,

    /// Where the key hangs or which door it opens
    pub location: String,

    /// Current availability
    pub status: KeyStatus,

    /// User currently holding the key
    ///
    /// NULL exactly when the key is available.
    pub holder_id: Option<Uuid>,

    /// When the key was registered
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last status transition
    pub updated_at: DateTime<Utc>,
}

/// Catalog row: a key joined with its holder's profile name.
///
/// `holder_name` is NULL for available keys and for holders without a
/// profile; the UI renders a placeholder in both cases.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct KeyWithHolder {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub status: KeyStatus,
    pub holder_id: Option<Uuid>,
    pub holder_name: Option<String>,
}

/// Request body for registering a new key.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Lab 3",
///   "location": "Bloco B"
/// }
/// ```
///
/// Keys always start out available with no holder; there is no way to
/// create one mid-checkout.
#[derive(Debug, Deserialize)]
pub struct CreateKeyRequest {
    pub name: String,
    pub location: String,
}

/// Request body for the scan endpoint.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    /// Raw text decoded from the QR code
    pub payload: String,
}

/// Confirmation preview returned after a successful scan.
///
/// Status and holder name are re-fetched at scan time so the user confirms
/// against current state, not against whatever was printed on the label.
#[derive(Debug, Serialize)]
pub struct ScanPreview {
    pub key_id: Uuid,
    pub name: String,
    pub location: String,
    pub status: KeyStatus,
    pub holder_name: Option<String>,
}

/// Response body for the printable-QR endpoint.
#[derive(Debug, Serialize)]
pub struct QrResponse {
    /// Text to encode into the printed QR code
    pub payload: String,
}

/// The structure serialized into printed key QR codes.
///
/// `id` is the only required field; name and location are carried so a
/// scanner app can show something meaningful before it reaches the server.
/// Encoding and decoding share this type, so printed payloads always
/// round-trip through the scan endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrPayload {
    pub id: Uuid,
    pub name: Option<String>,
    pub location: Option<String>,
}

impl QrPayload {
    /// Build the payload for a catalog key.
    pub fn for_key(key: &Key) -> Self {
        Self {
            id: key.id,
            name: Some(key.name.clone()),
            location: Some(key.location.clone()),
        }
    }

    /// Serialize to the exact text printed into the QR code.
    pub fn encode(&self) -> String {
        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "location": self.location,
        })
        .to_string()
    }

    /// Parse a scanned payload.
    ///
    /// Anything that is not a JSON object with a valid uuid `id` field is
    /// rejected. This runs before any database access so junk scans never
    /// cost a round trip.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        serde_json::from_str(raw).map_err(|_| AppError::MalformedPayload)
    }
}
