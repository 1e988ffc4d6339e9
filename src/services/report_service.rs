//! Movement history queries and report export.
//!
//! Projects the movement log, joined with key names and holder names, into
//! a filterable list and a CSV report with a fixed column order.

use crate::{
    db::DbPool,
    error::AppError,
    models::movement::{HistoryQuery, MovementRecord},
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// File name suggested to clients downloading the export.
pub const EXPORT_FILE_NAME: &str = "relatorio_movimentacao.csv";

/// Fixed column order of the exported report.
pub const CSV_COLUMNS: [&str; 4] = ["Chave", "Usuário", "Ação", "Data/Hora"];

/// Placeholder for a movement whose key no longer resolves.
const UNKNOWN_KEY: &str = "Desconhecida";

/// Placeholder for a movement whose holder no longer resolves.
const UNKNOWN_HOLDER: &str = "Ninguém";

/// Parsed and validated history filters.
#[derive(Debug, Default)]
pub struct HistoryFilter {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub holder: Option<String>,
}

impl HistoryFilter {
    /// Validate raw query parameters.
    ///
    /// Dates are `YYYY-MM-DD`; a start date becomes the first instant of
    /// that day and an end date the last whole second, so the range is
    /// inclusive on both sides. Empty strings count as absent.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest`: a date parameter does not parse
    pub fn from_query(query: &HistoryQuery) -> Result<Self, AppError> {
        Ok(Self {
            start: parse_day(query.start_date.as_deref())?
                .map(|d| d.and_time(NaiveTime::MIN).and_utc()),
            end: parse_day(query.end_date.as_deref())?.map(|d| {
                d.and_time(NaiveTime::from_hms_opt(23, 59, 59).expect("valid end-of-day time"))
                    .and_utc()
            }),
            holder: query
                .holder
                .as_deref()
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(str::to_string),
        })
    }
}

fn parse_day(raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::InvalidRequest(format!("Invalid date: {s}, expected YYYY-MM-DD"))),
    }
}

/// Fetch movements matching the filter, newest first.
///
/// Joins are LEFT so movements survive deleted keys or holders; the holder
/// substring filter is case-insensitive and, when set, only matches rows
/// whose holder still resolves. No matches is an empty list, not an error.
pub async fn fetch_movements(
    pool: &DbPool,
    filter: &HistoryFilter,
) -> Result<Vec<MovementRecord>, AppError> {
    let records = sqlx::query_as::<_, MovementRecord>(
        r#"
        SELECT m.id, m.key_id, m.user_id, m.action, m.created_at,
               k.name AS key_name, p.full_name AS holder_name
        FROM key_movements m
        LEFT JOIN keys k ON k.id = m.key_id
        LEFT JOIN profiles p ON p.id = m.user_id
        WHERE ($1::timestamptz IS NULL OR m.created_at >= $1)
          AND ($2::timestamptz IS NULL OR m.created_at <= $2)
          AND ($3::text IS NULL OR p.full_name ILIKE '%' || $3 || '%')
        ORDER BY m.created_at DESC
        "#,
    )
    .bind(filter.start)
    .bind(filter.end)
    .bind(filter.holder.as_deref())
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Serialize history rows to CSV.
///
/// One row per movement, columns fixed as {Chave, Usuário, Ação,
/// Data/Hora} regardless of content. Unresolved references render as
/// placeholders instead of failing the export.
pub fn to_csv(records: &[MovementRecord]) -> String {
    let mut out = String::new();

    out.push_str(&CSV_COLUMNS.map(csv_field).join(","));
    out.push('\n');

    for record in records {
        let when = record.created_at.format("%d/%m/%Y %H:%M:%S").to_string();
        let row = [
            record.key_name.as_deref().unwrap_or(UNKNOWN_KEY),
            record.holder_name.as_deref().unwrap_or(UNKNOWN_HOLDER),
            record.action.label(),
            when.as_str(),
        ];
        out.push_str(&row.map(csv_field).join(","));
        out.push('\n');
    }

    out
}

/// Quote a field when it contains the delimiter, quotes or line breaks.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
