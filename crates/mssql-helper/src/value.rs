//! Owned SQL values for parameters and materialized results.

// Allow unwrap for chrono date construction with known-valid constant dates
#![allow(clippy::unwrap_used)]

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use tiberius::{ColumnData, ToSql};
use uuid::Uuid;

use crate::error::{Error, Result};

/// An owned SQL value.
///
/// Used both for binding command parameters and for holding materialized
/// query results. NULL is a value of its own rather than an `Option`
/// wrapper, mirroring how the server reports it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// BIT.
    Bool(bool),
    /// TINYINT.
    TinyInt(u8),
    /// SMALLINT.
    SmallInt(i16),
    /// INT.
    Int(i32),
    /// BIGINT.
    BigInt(i64),
    /// REAL.
    Real(f32),
    /// FLOAT.
    Float(f64),
    /// DECIMAL/NUMERIC, carried in its textual form.
    Decimal(String),
    /// Character data (VARCHAR, NVARCHAR, XML).
    String(String),
    /// Binary data (BINARY, VARBINARY, IMAGE).
    Binary(Vec<u8>),
    /// UNIQUEIDENTIFIER.
    Uuid(Uuid),
    /// DATE.
    Date(NaiveDate),
    /// TIME.
    Time(NaiveTime),
    /// DATETIME, SMALLDATETIME, DATETIME2.
    DateTime(NaiveDateTime),
    /// DATETIMEOFFSET, normalized to UTC.
    DateTimeUtc(DateTime<Utc>),
}

impl Value {
    /// Check whether this value is SQL NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Convert a column of a fetched row into an owned value.
    ///
    /// The legacy DATETIME/SMALLDATETIME encodings count days from
    /// 1900-01-01; DATETIME2/DATE/TIME count from 0001-01-01 with
    /// 100-nanosecond increments.
    pub(crate) fn from_column_data(data: ColumnData<'static>) -> Result<Self> {
        let value = match data {
            ColumnData::Bit(None)
            | ColumnData::U8(None)
            | ColumnData::I16(None)
            | ColumnData::I32(None)
            | ColumnData::I64(None)
            | ColumnData::F32(None)
            | ColumnData::F64(None)
            | ColumnData::String(None)
            | ColumnData::Guid(None)
            | ColumnData::Binary(None)
            | ColumnData::Numeric(None)
            | ColumnData::Xml(None)
            | ColumnData::DateTime(None)
            | ColumnData::SmallDateTime(None)
            | ColumnData::Date(None)
            | ColumnData::Time(None)
            | ColumnData::DateTime2(None)
            | ColumnData::DateTimeOffset(None) => Self::Null,
            ColumnData::Bit(Some(v)) => Self::Bool(v),
            ColumnData::U8(Some(v)) => Self::TinyInt(v),
            ColumnData::I16(Some(v)) => Self::SmallInt(v),
            ColumnData::I32(Some(v)) => Self::Int(v),
            ColumnData::I64(Some(v)) => Self::BigInt(v),
            ColumnData::F32(Some(v)) => Self::Real(v),
            ColumnData::F64(Some(v)) => Self::Float(v),
            ColumnData::String(Some(v)) => Self::String(v.into_owned()),
            ColumnData::Guid(Some(v)) => Self::Uuid(v),
            ColumnData::Binary(Some(v)) => Self::Binary(v.into_owned()),
            ColumnData::Numeric(Some(v)) => Self::Decimal(v.to_string()),
            ColumnData::Xml(Some(v)) => Self::String(v.into_owned().into_string()),
            ColumnData::DateTime(Some(v)) => {
                let date = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()
                    + Duration::days(i64::from(v.days()));
                let time = NaiveTime::from_num_seconds_from_midnight_opt(
                    (f64::from(v.seconds_fragments()) / 300.0) as u32,
                    0,
                )
                .ok_or_else(|| Error::Query("DATETIME time out of range".to_string()))?;
                Self::DateTime(NaiveDateTime::new(date, time))
            }
            ColumnData::SmallDateTime(Some(v)) => {
                let date = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()
                    + Duration::days(i64::from(v.days()));
                let time = NaiveTime::from_num_seconds_from_midnight_opt(
                    u32::from(v.seconds_fragments()) * 60,
                    0,
                )
                .ok_or_else(|| Error::Query("SMALLDATETIME time out of range".to_string()))?;
                Self::DateTime(NaiveDateTime::new(date, time))
            }
            ColumnData::Date(Some(v)) => Self::Date(date_from_days(i64::from(v.days()))),
            ColumnData::Time(Some(v)) => Self::Time(time_from_increments(v.increments(), v.scale())?),
            ColumnData::DateTime2(Some(v)) => {
                let date = date_from_days(i64::from(v.date().days()));
                let time = time_from_increments(v.time().increments(), v.time().scale())?;
                Self::DateTime(NaiveDateTime::new(date, time))
            }
            ColumnData::DateTimeOffset(Some(v)) => {
                let dt2 = v.datetime2();
                let date = date_from_days(i64::from(dt2.date().days()));
                let time = time_from_increments(dt2.time().increments(), dt2.time().scale())?;
                let naive = NaiveDateTime::new(date, time) - Duration::minutes(i64::from(v.offset()));
                Self::DateTimeUtc(DateTime::from_naive_utc_and_offset(naive, Utc))
            }
        };

        Ok(value)
    }
}

/// Days counted from 0001-01-01 to a calendar date.
fn date_from_days(days: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(1, 1, 1).unwrap() + Duration::days(days)
}

/// Sub-second increments since midnight, in units of `10^-scale` seconds,
/// to a time of day.
fn time_from_increments(increments: u64, scale: u8) -> Result<NaiveTime> {
    let per_second = 10u64.pow(u32::from(scale));
    NaiveTime::from_num_seconds_from_midnight_opt(
        (increments / per_second) as u32,
        ((increments % per_second) * 10u64.pow(9 - u32::from(scale))) as u32,
    )
    .ok_or_else(|| Error::Query("TIME out of range".to_string()))
}

impl ToSql for Value {
    fn to_sql(&self) -> ColumnData<'_> {
        match self {
            Self::Null => ColumnData::I32(None),
            Self::Bool(v) => ColumnData::Bit(Some(*v)),
            Self::TinyInt(v) => ColumnData::U8(Some(*v)),
            Self::SmallInt(v) => ColumnData::I16(Some(*v)),
            Self::Int(v) => ColumnData::I32(Some(*v)),
            Self::BigInt(v) => ColumnData::I64(Some(*v)),
            Self::Real(v) => ColumnData::F32(Some(*v)),
            Self::Float(v) => ColumnData::F64(Some(*v)),
            // Textual forms convert server-side, same as sending a literal
            Self::Decimal(v) => ColumnData::String(Some(Cow::Borrowed(v.as_str()))),
            Self::String(v) => ColumnData::String(Some(Cow::Borrowed(v.as_str()))),
            Self::Binary(v) => ColumnData::Binary(Some(Cow::Borrowed(v.as_slice()))),
            Self::Uuid(v) => ColumnData::Guid(Some(*v)),
            Self::Date(v) => ColumnData::String(Some(Cow::Owned(v.to_string()))),
            Self::Time(v) => ColumnData::String(Some(Cow::Owned(v.to_string()))),
            Self::DateTime(v) => {
                ColumnData::String(Some(Cow::Owned(v.format("%Y-%m-%d %H:%M:%S%.f").to_string())))
            }
            Self::DateTimeUtc(v) => {
                ColumnData::String(Some(Cow::Owned(v.format("%Y-%m-%d %H:%M:%S%.f").to_string())))
            }
        }
    }
}

impl fmt::Display for Value {
    /// Textual form of the value; NULL renders as the empty string. Binary
    /// data renders as lowercase hex.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(v) => write!(f, "{v}"),
            Self::TinyInt(v) => write!(f, "{v}"),
            Self::SmallInt(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::BigInt(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Decimal(v) | Self::String(v) => f.write_str(v),
            Self::Binary(v) => {
                for byte in v {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            Self::Uuid(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{v}"),
            Self::Time(v) => write!(f, "{v}"),
            Self::DateTime(v) => write!(f, "{v}"),
            Self::DateTimeUtc(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Self::TinyInt(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::SmallInt(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::BigInt(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Real(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Binary(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::Binary(v.to_vec())
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Self::Time(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTimeUtc(v)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_null() {
        assert!(Value::Null.is_null());
        assert!(!Value::Int(0).is_null());
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(7)), Value::Int(7));
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i64), Value::BigInt(42));
        assert_eq!(Value::from("abc"), Value::String("abc".to_string()));
        assert_eq!(Value::from(vec![1u8, 2]), Value::Binary(vec![1, 2]));
    }

    #[test]
    fn test_display_null_is_empty() {
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_display_binary_is_hex() {
        assert_eq!(Value::Binary(vec![0xde, 0xad, 0x01]).to_string(), "dead01");
    }

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::Int(-5).to_string(), "-5");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::String("x,y".to_string()).to_string(), "x,y");
    }

    #[test]
    fn test_to_sql_roundtrip_shapes() {
        assert!(matches!(Value::Null.to_sql(), ColumnData::I32(None)));
        assert!(matches!(Value::Int(3).to_sql(), ColumnData::I32(Some(3))));
        assert!(matches!(Value::String("s".to_string()).to_sql(), ColumnData::String(Some(_))));
    }

    #[test]
    fn test_time_from_increments() {
        // 01:02:03.5 at scale 7
        let increments = (3_723 * 10_000_000) + 5_000_000;
        let time = time_from_increments(increments, 7).unwrap();
        assert_eq!(time, NaiveTime::from_hms_milli_opt(1, 2, 3, 500).unwrap());

        // Same instant at scale 3
        let time = time_from_increments(3_723_500, 3).unwrap();
        assert_eq!(time, NaiveTime::from_hms_milli_opt(1, 2, 3, 500).unwrap());
    }

    #[test]
    fn test_date_from_days() {
        assert_eq!(date_from_days(0), NaiveDate::from_ymd_opt(1, 1, 1).unwrap());
        // 2000-01-01 is 730119 days after 0001-01-01
        assert_eq!(date_from_days(730_119), NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
    }
}
