//! Decoding of wire cells into native values.
//!
//! A wire cell carries one optional payload field per SQL type; which field
//! is authoritative is decided by the column descriptor, never by inspecting
//! the cell itself. A set null flag overrides everything. Column types this
//! client does not recognize are passed through opaquely rather than
//! rejected, so engine-side type additions never break decoding.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use tracing::warn;

use crate::error::DecodeError;
use crate::protocol::types::{ColumnDescriptor, ColumnValue, SqlType, WireDecimal};

/// One decoded column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    TinyInt(i8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Double(f64),
    Decimal(Decimal),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    String(String),
    Binary(Vec<u8>),
    /// Inline chunk of a BLOB column.
    Blob(Vec<u8>),
    /// Inline chunk of a CLOB, JSON or XML column.
    Clob(String),
    Array(Vec<Value>),
    /// Key/value pairs in server order. Keys are snapshot scalars, so the
    /// pairs are kept as a sequence rather than a hash container.
    Map(Vec<(Value, Value)>),
    /// Struct fields in declaration order; field names live on the
    /// descriptor, not on the value.
    Struct(Vec<Value>),
    /// Pass-through for NULLTYPE, JAVA_OBJECT and unrecognized types.
    Opaque(ColumnValue),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of this value's kind, e.g. `"BIGINT"` or `"ARRAY"`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "BOOLEAN",
            Value::TinyInt(_) => "TINYINT",
            Value::SmallInt(_) => "SMALLINT",
            Value::Int(_) => "INTEGER",
            Value::BigInt(_) => "BIGINT",
            Value::Double(_) => "DOUBLE",
            Value::Decimal(_) => "DECIMAL",
            Value::Date(_) => "DATE",
            Value::Time(_) => "TIME",
            Value::Timestamp(_) => "TIMESTAMP",
            Value::String(_) => "VARCHAR",
            Value::Binary(_) => "VARBINARY",
            Value::Blob(_) => "BLOB",
            Value::Clob(_) => "CLOB",
            Value::Array(_) => "ARRAY",
            Value::Map(_) => "MAP",
            Value::Struct(_) => "STRUCT",
            Value::Opaque(_) => "OPAQUE",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Widens any integer variant to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::TinyInt(v) => Some(i64::from(*v)),
            Value::SmallInt(v) => Some(i64::from(*v)),
            Value::Int(v) => Some(i64::from(*v)),
            Value::BigInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) | Value::Clob(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(v) | Value::Blob(v) => Some(v),
            _ => None,
        }
    }
}

/// Decodes one wire cell using its column descriptor.
///
/// A set null flag decodes to [`Value::Null`] regardless of the declared
/// type. Missing scalar payloads also degrade to `Null`; missing collection
/// payloads and missing nested descriptors are structural errors.
///
/// # Errors
///
/// Returns [`DecodeError`] only for structurally malformed cells. An
/// unrecognized type code is not an error: the cell is passed through as
/// [`Value::Opaque`].
pub fn decode(cell: &ColumnValue, descriptor: &ColumnDescriptor) -> Result<Value, DecodeError> {
    if cell.null_val.unwrap_or(false) {
        return Ok(Value::Null);
    }

    match descriptor.sql_type {
        SqlType::Boolean => Ok(cell.bool_val.map(Value::Bool).unwrap_or(Value::Null)),
        SqlType::TinyInt => Ok(cell.byte_val.map(Value::TinyInt).unwrap_or(Value::Null)),
        SqlType::SmallInt => Ok(cell.i16_val.map(Value::SmallInt).unwrap_or(Value::Null)),
        SqlType::Integer => Ok(cell.i32_val.map(Value::Int).unwrap_or(Value::Null)),
        SqlType::BigInt => Ok(cell.i64_val.map(Value::BigInt).unwrap_or(Value::Null)),
        // FLOAT shares the double payload on the wire.
        SqlType::Float | SqlType::Double => {
            Ok(cell.double_val.map(Value::Double).unwrap_or(Value::Null))
        }
        SqlType::Char | SqlType::Varchar | SqlType::LongVarchar => Ok(cell
            .string_val
            .clone()
            .map(Value::String)
            .unwrap_or(Value::Null)),
        SqlType::Decimal => match &cell.decimal_val {
            Some(wire) => decode_decimal(wire, descriptor),
            None => Ok(Value::Null),
        },
        SqlType::Date => match cell.date_val {
            Some(secs) => decode_date(secs, descriptor).map(Value::Date),
            None => Ok(Value::Null),
        },
        SqlType::Time => match cell.time_val {
            Some(secs) => decode_time(secs, descriptor).map(Value::Time),
            None => Ok(Value::Null),
        },
        SqlType::Timestamp => match cell.timestamp_val {
            Some(nanos) => Ok(Value::Timestamp(
                DateTime::from_timestamp_nanos(nanos).naive_utc(),
            )),
            None => Ok(Value::Null),
        },
        SqlType::Binary | SqlType::Varbinary | SqlType::LongVarbinary => Ok(cell
            .binary_val
            .clone()
            .map(Value::Binary)
            .unwrap_or(Value::Null)),
        SqlType::Blob => Ok(cell
            .blob_val
            .as_ref()
            .map(|blob| Value::Blob(blob.chunk.clone()))
            .unwrap_or(Value::Null)),
        SqlType::Clob | SqlType::Json | SqlType::SqlXml => Ok(cell
            .clob_val
            .as_ref()
            .map(|clob| Value::Clob(clob.chunk.clone()))
            .unwrap_or(Value::Null)),
        SqlType::Array => {
            let element = element_type(descriptor, 0, 1)?;
            let items = cell
                .array_val
                .as_ref()
                .ok_or_else(|| missing_collection(descriptor))?;
            items
                .iter()
                .map(|item| decode(item, element))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        SqlType::Map => {
            let key_type = element_type(descriptor, 0, 2)?;
            let value_type = element_type(descriptor, 1, 2)?;
            let entries = cell
                .map_val
                .as_ref()
                .ok_or_else(|| missing_collection(descriptor))?;
            entries
                .iter()
                .map(|(key, value)| Ok((decode(key, key_type)?, decode(value, value_type)?)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Map)
        }
        SqlType::Struct => {
            let fields = cell
                .struct_val
                .as_ref()
                .ok_or_else(|| missing_collection(descriptor))?;
            fields
                .iter()
                .zip(&descriptor.element_types)
                .map(|(field, field_type)| decode(field, field_type))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Struct)
        }
        SqlType::NullType | SqlType::JavaObject => Ok(Value::Opaque(cell.clone())),
        SqlType::Unrecognized(code) => {
            warn!(
                code,
                column = %descriptor.name,
                "passing through column of unrecognized type"
            );
            Ok(Value::Opaque(cell.clone()))
        }
    }
}

fn element_type<'a>(
    descriptor: &'a ColumnDescriptor,
    index: usize,
    expected: usize,
) -> Result<&'a ColumnDescriptor, DecodeError> {
    descriptor
        .element_types
        .get(index)
        .ok_or_else(|| DecodeError::MissingElementTypes {
            column: descriptor.name.clone(),
            sql_type: descriptor.sql_type,
            expected,
            found: descriptor.element_types.len(),
        })
}

fn missing_collection(descriptor: &ColumnDescriptor) -> DecodeError {
    DecodeError::MissingCollection {
        column: descriptor.name.clone(),
        sql_type: descriptor.sql_type,
    }
}

fn decode_decimal(
    wire: &WireDecimal,
    descriptor: &ColumnDescriptor,
) -> Result<Value, DecodeError> {
    let out_of_range = || DecodeError::DecimalOutOfRange {
        column: descriptor.name.clone(),
    };

    let mut unscaled: i128 = 0;
    for &byte in &wire.magnitude {
        unscaled = unscaled
            .checked_mul(256)
            .and_then(|v| v.checked_add(i128::from(byte)))
            .ok_or_else(out_of_range)?;
    }
    if wire.signum < 0 {
        unscaled = -unscaled;
    }

    let scale = u32::try_from(wire.scale).map_err(|_| out_of_range())?;
    Decimal::try_from_i128_with_scale(unscaled, scale)
        .map(Value::Decimal)
        .map_err(|_| out_of_range())
}

fn decode_date(secs: i64, descriptor: &ColumnDescriptor) -> Result<NaiveDate, DecodeError> {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| DecodeError::TemporalOutOfRange {
            column: descriptor.name.clone(),
            sql_type: SqlType::Date,
            value: secs,
        })
}

fn decode_time(secs: i64, descriptor: &ColumnDescriptor) -> Result<NaiveTime, DecodeError> {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.time())
        .ok_or_else(|| DecodeError::TemporalOutOfRange {
            column: descriptor.name.clone(),
            sql_type: SqlType::Time,
            value: secs,
        })
}
