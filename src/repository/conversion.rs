use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, PrimitiveDateTime};

use crate::models::{types::UtcDateTime, SubmissionId};

/// Layout SQLite uses for `CURRENT_TIMESTAMP`, always in UTC.
const SQLITE_TIMESTAMP: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

pub trait DBConvertible: Sized {
    type DBType;

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError>;
}

#[derive(Debug, Error)]
pub enum DBFromConversionError {
    #[error("Failed to parse datetime: {0}")]
    DateTime(#[from] time::error::Parse),
    #[error("Invalid number: {0}")]
    InvalidNumber(i64),
}

impl DBConvertible for UtcDateTime {
    type DBType = String;

    fn from_db(db_value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        let datetime = PrimitiveDateTime::parse(db_value, SQLITE_TIMESTAMP)?;
        Ok(UtcDateTime::assume_utc(datetime))
    }
}

impl DBConvertible for SubmissionId {
    type DBType = i64;

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        u64::try_from(*value)
            .map(SubmissionId)
            .map_err(|_| DBFromConversionError::InvalidNumber(*value))
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{DBConvertible, DBFromConversionError};
    use crate::models::{types::UtcDateTime, SubmissionId};

    #[test]
    fn parses_sqlite_current_timestamp() {
        let parsed = UtcDateTime::from_db(&"2024-05-17 08:04:59".to_string()).unwrap();
        assert_eq!(parsed.as_primitive(), datetime!(2024-05-17 08:04:59));
    }

    #[test]
    fn rejects_iso_timestamp_with_offset() {
        assert!(matches!(
            UtcDateTime::from_db(&"2024-05-17T08:04:59Z".to_string()),
            Err(DBFromConversionError::DateTime(_))
        ));
    }

    #[test]
    fn negative_submission_id_is_invalid() {
        assert!(matches!(
            SubmissionId::from_db(&-1),
            Err(DBFromConversionError::InvalidNumber(-1))
        ));
        assert_eq!(SubmissionId::from_db(&42).unwrap(), SubmissionId(42));
    }
}
