//! Movement audit log models and history query types.
//!
//! This module defines:
//! - `MovementAction`: checkout vs check-in, with the localized labels the
//!   exported report uses
//! - `Movement`: database entity, one row per successful transition
//! - `MovementRecord`: history row joined with key name and holder name
//! - `HistoryQuery`: raw filter parameters from the query string

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which direction a key moved.
///
/// Maps to the `movement_action` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "movement_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MovementAction {
    Checkout,
    Checkin,
}

impl MovementAction {
    /// Label used in the exported report.
    pub fn label(self) -> &'static str {
        match self {
            MovementAction::Checkout => "Retirada",
            MovementAction::Checkin => "Devolução",
        }
    }
}

/// Represents a movement record from the database.
///
/// # Database Table
///
/// Maps to the `key_movements` table. The log is append-only: rows are
/// inserted in the same transaction as the key-status update and never
/// modified afterwards.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Movement {
    /// Unique identifier for this movement
    pub id: Uuid,

    /// Key that moved
    pub key_id: Uuid,

    /// User who moved it
    ///
    /// NULL only after that user account has been deleted.
    pub user_id: Option<Uuid>,

    /// Checkout or check-in
    pub action: MovementAction,

    /// When the transition committed
    pub created_at: DateTime<Utc>,
}

/// History row: a movement joined with key name and holder full name.
///
/// Both joined fields are optional; the report renders placeholders for
/// references that no longer resolve.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct MovementRecord {
    pub id: Uuid,
    pub key_id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: MovementAction,
    pub created_at: DateTime<Utc>,
    pub key_name: Option<String>,
    pub holder_name: Option<String>,
}

/// Raw history filters from the query string.
///
/// # Query Parameters
///
/// - `start_date` / `end_date`: `YYYY-MM-DD`, inclusive day bounds
/// - `holder`: case-insensitive substring of the holder's full name
///
/// Empty strings are treated the same as absent parameters.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub holder: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_the_report_language() {
        assert_eq!(MovementAction::Checkout.label(), "Retirada");
        assert_eq!(MovementAction::Checkin.label(), "Devolução");
    }

    #[test]
    fn actions_serialize_as_snake_case_codes() {
        assert_eq!(
            serde_json::to_string(&MovementAction::Checkout).unwrap(),
            "\"checkout\""
        );
        assert_eq!(
            serde_json::to_string(&MovementAction::Checkin).unwrap(),
            "\"checkin\""
        );
    }
}
