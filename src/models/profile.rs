//! Profile data models and API request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a profile record from the database.
///
/// # Database Table
///
/// Maps to the `profiles` table. One-to-one with `users` (same primary
/// key). Created at signup and lazily re-created on first fetch if an
/// older account is missing one; only the owning user can read or write
/// it through the API.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Profile {
    /// Same as the owning user's id
    pub id: Uuid,

    /// Display name shown next to held keys and in the history report
    pub full_name: Option<String>,

    pub username: Option<String>,

    /// Personal URL; validated as http(s) on update
    pub website: Option<String>,

    /// File name inside the avatar store, served by the avatar route
    pub avatar_path: Option<String>,

    pub updated_at: DateTime<Utc>,
}

/// Request body for updating the caller's profile.
///
/// Absent fields keep their current value.
///
/// # JSON Example
///
/// ```json
/// {
///   "full_name": "Maria Fagundes",
///   "website": "https://example.com"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub website: Option<String>,
    pub avatar_path: Option<String>,
}

/// Response body after an avatar upload.
#[derive(Debug, Serialize)]
pub struct AvatarUploadResponse {
    /// File name stored in the profile
    pub path: String,

    /// Route the stored image can be downloaded from
    pub url: String,
}
