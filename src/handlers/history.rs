//! Movement history HTTP handlers.
//!
//! This module implements the history endpoints:
//! - GET /api/v1/movements - Filterable movement history
//! - GET /api/v1/movements/export - The same rows as a CSV report

use crate::{
    AppState,
    error::AppError,
    models::movement::{HistoryQuery, MovementRecord},
    services::report_service::{self, EXPORT_FILE_NAME, HistoryFilter},
};
use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};

/// Filterable movement history, newest first.
///
/// # Query Parameters
///
/// - `start_date`, `end_date`: inclusive `YYYY-MM-DD` bounds
/// - `holder`: case-insensitive substring of the holder's full name
///
/// No matches returns an empty list with 200, not an error.
pub async fn list_movements(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<MovementRecord>>, AppError> {
    let filter = HistoryFilter::from_query(&query)?;
    let records = report_service::fetch_movements(&state.pool, &filter).await?;

    Ok(Json(records))
}

/// Export the filtered movement history as CSV.
///
/// Same filters as the list endpoint. One row per movement, columns fixed
/// as {Chave, Usuário, Ação, Data/Hora}; action labels are the localized
/// report strings rather than the raw enum codes.
pub async fn export_movements(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Response, AppError> {
    let filter = HistoryFilter::from_query(&query)?;
    let records = report_service::fetch_movements(&state.pool, &filter).await?;
    let csv = report_service::to_csv(&records);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        csv,
    )
        .into_response())
}
