//! Column conversions shared by the SQLite repositories.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use delver_domain::DomainError;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::infrastructure::ports::RepoError;

pub(super) fn get_string(row: &SqliteRow, column: &str) -> Result<String, RepoError> {
    row.try_get::<String, _>(column)
        .map_err(|e| RepoError::serialization(format!("column {column}: {e}")))
}

/// Counters are stored as INTEGER (i64); anything outside u32 is corrupt data.
pub(super) fn get_u32(row: &SqliteRow, column: &str) -> Result<u32, RepoError> {
    let raw = row
        .try_get::<i64, _>(column)
        .map_err(|e| RepoError::serialization(format!("column {column}: {e}")))?;
    u32::try_from(raw)
        .map_err(|_| RepoError::serialization(format!("column {column} out of range: {raw}")))
}

pub(super) fn get_bool(row: &SqliteRow, column: &str) -> Result<bool, RepoError> {
    Ok(get_u32(row, column)? != 0)
}

pub(super) fn get_id<T>(row: &SqliteRow, column: &str) -> Result<T, RepoError>
where
    T: FromStr<Err = DomainError>,
{
    get_string(row, column)?
        .parse()
        .map_err(|e: DomainError| RepoError::serialization(e))
}

pub(super) fn get_timestamp(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>, RepoError> {
    let raw = get_string(row, column)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepoError::serialization(format!("column {column}: {e}")))
}

/// Lowercased key used for case-insensitive lookups.
pub(super) fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// LIKE pattern matching `query` anywhere, with wildcards in the query escaped.
pub(super) fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in name_key(query).chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Map a sqlx error, turning unique-index violations into constraint errors.
pub(super) fn map_db_error(operation: &'static str, err: sqlx::Error) -> RepoError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return RepoError::constraint(db_err.message());
        }
    }
    RepoError::database(operation, err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("Ar"), "%ar%");
        assert_eq!(contains_pattern("100%_"), "%100\\%\\_%");
    }

    #[test]
    fn name_key_trims_and_lowercases() {
        assert_eq!(name_key("  ÉLise "), "élise");
    }
}
