//! Repository layer: entity-scoped database operations.
//!
//! Rows are read into plain tuples first, then converted into models so
//! that enum and timestamp parse failures surface as `DatabaseError`.

mod alert;
mod vital_sign;

use chrono::{NaiveDateTime, Timelike};
use uuid::Uuid;

use super::{DatabaseError, DATETIME_FORMAT};

pub use alert::*;
pub use vital_sign::*;

pub(crate) fn parse_uuid(raw: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(raw).map_err(|e| DatabaseError::CorruptRow(format!("bad id '{raw}': {e}")))
}

pub(crate) fn parse_datetime(raw: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
        .map_err(|e| DatabaseError::CorruptRow(format!("bad timestamp '{raw}': {e}")))
}

pub(crate) fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Drop sub-second precision so a value reads back exactly as stored.
pub fn to_storage_precision(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_nanosecond(0).unwrap_or(dt)
}

/// Map SQLite constraint failures to `ConstraintViolation`, keep the rest.
pub(crate) fn map_constraint(err: rusqlite::Error, what: &str) -> DatabaseError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DatabaseError::ConstraintViolation(format!("{what}: {err}"))
        }
        _ => DatabaseError::Sqlite(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_round_trip_uses_storage_format() {
        let dt = parse_datetime("2025-03-15 08:30:00").unwrap();
        assert_eq!(format_datetime(&dt), "2025-03-15 08:30:00");
    }

    #[test]
    fn malformed_stored_values_are_corrupt_rows() {
        assert!(matches!(
            parse_uuid("not-a-uuid"),
            Err(DatabaseError::CorruptRow(_))
        ));
        assert!(matches!(
            parse_datetime("15/03/2025"),
            Err(DatabaseError::CorruptRow(_))
        ));
    }

    #[test]
    fn storage_precision_survives_round_trip() {
        let precise = parse_datetime("2025-03-15 08:30:00").unwrap()
            + chrono::Duration::milliseconds(734);
        let truncated = to_storage_precision(precise);
        assert_eq!(truncated.nanosecond(), 0);
        assert_eq!(parse_datetime(&format_datetime(&truncated)).unwrap(), truncated);
    }
}
