use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct UtcDateTime(PrimitiveDateTime);

impl UtcDateTime {
    pub fn assume_utc(datetime: PrimitiveDateTime) -> UtcDateTime {
        UtcDateTime(datetime)
    }

    #[cfg(test)]
    pub fn as_primitive(&self) -> PrimitiveDateTime {
        self.0
    }
}

impl From<OffsetDateTime> for UtcDateTime {
    fn from(value: OffsetDateTime) -> Self {
        let value_utc = value.to_offset(UtcOffset::UTC);
        UtcDateTime(PrimitiveDateTime::new(value_utc.date(), value_utc.time()))
    }
}

impl From<UtcDateTime> for OffsetDateTime {
    fn from(value: UtcDateTime) -> Self {
        value.0.assume_utc()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;
    use time::OffsetDateTime;

    use super::UtcDateTime;

    #[test]
    fn converts_offset_to_utc() {
        let local = datetime!(2024-03-01 12:30:00 +03:00);
        let utc = UtcDateTime::from(local);

        assert_eq!(utc.as_primitive(), datetime!(2024-03-01 09:30:00));
        assert_eq!(OffsetDateTime::from(utc), local);
    }
}
