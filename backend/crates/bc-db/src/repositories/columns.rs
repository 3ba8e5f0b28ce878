//! Column decoding shared by the repositories.
//!
//! UUIDs are stored as TEXT, timestamps as INTEGER milliseconds since the
//! epoch, enums as their `as_str()` form.

use crate::{DbError, Result as DbErrorResult};

use std::fmt::Display;
use std::panic::Location;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

#[track_caller]
fn decode_error(column: &'static str, message: impl Into<String>) -> DbError {
    DbError::Decode {
        column,
        message: message.into(),
        location: ErrorLocation::from(Location::caller()),
    }
}

pub(crate) fn millis(timestamp: DateTime<Utc>) -> i64 {
    timestamp.timestamp_millis()
}

#[track_caller]
pub(crate) fn uuid(row: &SqliteRow, column: &'static str) -> DbErrorResult<Uuid> {
    let raw: String = row.try_get(column)?;
    Uuid::parse_str(&raw).map_err(|e| decode_error(column, e.to_string()))
}

#[track_caller]
pub(crate) fn timestamp(row: &SqliteRow, column: &'static str) -> DbErrorResult<DateTime<Utc>> {
    let raw: i64 = row.try_get(column)?;
    DateTime::from_timestamp_millis(raw)
        .ok_or_else(|| decode_error(column, format!("timestamp out of range: {}", raw)))
}

#[track_caller]
pub(crate) fn optional_timestamp(
    row: &SqliteRow,
    column: &'static str,
) -> DbErrorResult<Option<DateTime<Utc>>> {
    let raw: Option<i64> = row.try_get(column)?;
    raw.map(|ms| {
        DateTime::from_timestamp_millis(ms)
            .ok_or_else(|| decode_error(column, format!("timestamp out of range: {}", ms)))
    })
    .transpose()
}

/// Decode a TEXT column through the type's `FromStr`
#[track_caller]
pub(crate) fn parsed<T>(row: &SqliteRow, column: &'static str) -> DbErrorResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw: String = row.try_get(column)?;
    T::from_str(&raw).map_err(|e| decode_error(column, e.to_string()))
}
