//! Wire-level entities exchanged with the SnappyData engine.
//!
//! These structs mirror the shapes produced by the engine's generated RPC
//! stubs: a column value is a bag of optional per-type payload fields, and the
//! column descriptor decides which payload is the live one. The [`crate::value`]
//! module turns these into native [`crate::Value`]s.

use std::collections::HashMap;
use std::fmt;

/// SQL type codes as assigned by the engine.
///
/// The engine is free to grow new codes over time; anything this client does
/// not know about is carried as [`SqlType::Unrecognized`] so that decoding
/// never fails on a newer server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Double,
    Decimal,
    Char,
    Varchar,
    LongVarchar,
    Date,
    Time,
    Timestamp,
    Binary,
    Varbinary,
    LongVarbinary,
    Blob,
    Clob,
    SqlXml,
    Array,
    Map,
    Struct,
    NullType,
    Json,
    JavaObject,
    /// A type code this client does not know about.
    Unrecognized(i32),
}

impl SqlType {
    /// Maps a wire type code to the corresponding variant.
    pub fn from_code(code: i32) -> SqlType {
        match code {
            1 => SqlType::Boolean,
            2 => SqlType::TinyInt,
            3 => SqlType::SmallInt,
            4 => SqlType::Integer,
            5 => SqlType::BigInt,
            6 => SqlType::Float,
            7 => SqlType::Double,
            8 => SqlType::Decimal,
            9 => SqlType::Char,
            10 => SqlType::Varchar,
            11 => SqlType::LongVarchar,
            12 => SqlType::Date,
            13 => SqlType::Time,
            14 => SqlType::Timestamp,
            15 => SqlType::Binary,
            16 => SqlType::Varbinary,
            17 => SqlType::LongVarbinary,
            18 => SqlType::Blob,
            19 => SqlType::Clob,
            20 => SqlType::SqlXml,
            21 => SqlType::Array,
            22 => SqlType::Map,
            23 => SqlType::Struct,
            24 => SqlType::NullType,
            25 => SqlType::Json,
            26 => SqlType::JavaObject,
            other => SqlType::Unrecognized(other),
        }
    }

    /// The wire type code for this variant.
    pub fn code(&self) -> i32 {
        match self {
            SqlType::Boolean => 1,
            SqlType::TinyInt => 2,
            SqlType::SmallInt => 3,
            SqlType::Integer => 4,
            SqlType::BigInt => 5,
            SqlType::Float => 6,
            SqlType::Double => 7,
            SqlType::Decimal => 8,
            SqlType::Char => 9,
            SqlType::Varchar => 10,
            SqlType::LongVarchar => 11,
            SqlType::Date => 12,
            SqlType::Time => 13,
            SqlType::Timestamp => 14,
            SqlType::Binary => 15,
            SqlType::Varbinary => 16,
            SqlType::LongVarbinary => 17,
            SqlType::Blob => 18,
            SqlType::Clob => 19,
            SqlType::SqlXml => 20,
            SqlType::Array => 21,
            SqlType::Map => 22,
            SqlType::Struct => 23,
            SqlType::NullType => 24,
            SqlType::Json => 25,
            SqlType::JavaObject => 26,
            SqlType::Unrecognized(code) => *code,
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SqlType::Boolean => "BOOLEAN",
            SqlType::TinyInt => "TINYINT",
            SqlType::SmallInt => "SMALLINT",
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Float => "FLOAT",
            SqlType::Double => "DOUBLE",
            SqlType::Decimal => "DECIMAL",
            SqlType::Char => "CHAR",
            SqlType::Varchar => "VARCHAR",
            SqlType::LongVarchar => "LONGVARCHAR",
            SqlType::Date => "DATE",
            SqlType::Time => "TIME",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Binary => "BINARY",
            SqlType::Varbinary => "VARBINARY",
            SqlType::LongVarbinary => "LONGVARBINARY",
            SqlType::Blob => "BLOB",
            SqlType::Clob => "CLOB",
            SqlType::SqlXml => "SQLXML",
            SqlType::Array => "ARRAY",
            SqlType::Map => "MAP",
            SqlType::Struct => "STRUCT",
            SqlType::NullType => "NULLTYPE",
            SqlType::Json => "JSON",
            SqlType::JavaObject => "JAVA_OBJECT",
            SqlType::Unrecognized(code) => return write!(f, "UNRECOGNIZED({code})"),
        };
        f.write_str(name)
    }
}

/// Per-column metadata produced by the server for each statement.
///
/// `element_types` carries the nested descriptors of composite columns:
/// one entry for ARRAY, key and value for MAP, one entry per field for STRUCT.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub sql_type: SqlType,
    pub nullable: bool,
    pub precision: Option<i32>,
    pub scale: Option<i32>,
    pub element_types: Vec<ColumnDescriptor>,
}

impl ColumnDescriptor {
    /// Creates a nullable descriptor with no precision and no nested types.
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        ColumnDescriptor {
            name: name.into(),
            sql_type,
            nullable: true,
            precision: None,
            scale: None,
            element_types: Vec::new(),
        }
    }

    pub fn with_precision(mut self, precision: i32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_scale(mut self, scale: i32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_element_types(mut self, element_types: Vec<ColumnDescriptor>) -> Self {
        self.element_types = element_types;
        self
    }
}

/// Arbitrary-precision decimal as sent on the wire: a sign, a scale and the
/// big-endian magnitude of the unscaled value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireDecimal {
    pub signum: i8,
    pub scale: i32,
    pub magnitude: Vec<u8>,
}

/// One chunk of a BLOB value. Only the first chunk is delivered inline with
/// the row; `lob_id` lets a caller stream the remainder out of band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobChunk {
    pub chunk: Vec<u8>,
    pub last: bool,
    pub lob_id: Option<i64>,
    pub offset: Option<i64>,
    pub total_length: Option<i64>,
}

/// One chunk of a CLOB (or JSON/XML) value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClobChunk {
    pub chunk: String,
    pub last: bool,
    pub lob_id: Option<i64>,
    pub offset: Option<i64>,
    pub total_length: Option<i64>,
}

/// A single wire cell: at most one payload field is populated, and the
/// associated [`ColumnDescriptor`] decides which one is authoritative.
///
/// A set `null_val` flag overrides every other field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnValue {
    pub null_val: Option<bool>,
    pub bool_val: Option<bool>,
    pub byte_val: Option<i8>,
    pub i16_val: Option<i16>,
    pub i32_val: Option<i32>,
    pub i64_val: Option<i64>,
    pub double_val: Option<f64>,
    pub string_val: Option<String>,
    pub decimal_val: Option<WireDecimal>,
    /// Seconds since the Unix epoch.
    pub date_val: Option<i64>,
    /// Seconds since the Unix epoch.
    pub time_val: Option<i64>,
    /// Nanoseconds since the Unix epoch.
    pub timestamp_val: Option<i64>,
    pub binary_val: Option<Vec<u8>>,
    pub blob_val: Option<BlobChunk>,
    pub clob_val: Option<ClobChunk>,
    pub array_val: Option<Vec<ColumnValue>>,
    pub map_val: Option<Vec<(ColumnValue, ColumnValue)>>,
    pub struct_val: Option<Vec<ColumnValue>>,
    /// Serialized java object for JAVA_OBJECT columns.
    pub java_val: Option<Vec<u8>>,
}

impl ColumnValue {
    /// A cell with the null flag set.
    pub fn null() -> Self {
        ColumnValue {
            null_val: Some(true),
            ..ColumnValue::default()
        }
    }
}

/// One row of a result batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub values: Vec<ColumnValue>,
}

/// One page of rows plus the column metadata that describes them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    pub metadata: Vec<ColumnDescriptor>,
    pub rows: Vec<Row>,
}

/// Outcome of one executed statement: either an update count or a result
/// batch. A `cursor_id` greater than zero means further batches can be paged
/// with `getNextResultSet`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementResult {
    pub result_set: Option<RowSet>,
    pub update_count: i64,
    pub cursor_id: i64,
}

/// Session handle returned by `openConnection`; `conn_id` and `token`
/// parametrize every subsequent call on the channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionProperties {
    pub conn_id: i64,
    pub client_host_name: Option<String>,
    pub client_id: Option<String>,
    pub token: Option<Vec<u8>>,
    pub default_schema: Option<String>,
}

/// Authentication mechanism requested at connection open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityMechanism {
    Plain,
    DiffieHellman,
}

/// Arguments for the `openConnection` call.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenConnectionArgs {
    pub client_host_name: String,
    /// Diagnostic identifier built from host, thread identity and timestamp.
    pub client_id: String,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub security: SecurityMechanism,
    pub properties: Option<HashMap<String, String>>,
}

/// Kinds of endpoints a locator can hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerType {
    ThriftLocatorCp,
    ThriftLocatorBp,
    ThriftSnappyCp,
    ThriftSnappyBp,
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServerType::ThriftLocatorCp => "thrift-locator-compact-protocol",
            ServerType::ThriftLocatorBp => "thrift-locator-binary-protocol",
            ServerType::ThriftSnappyCp => "thrift-snappy-compact-protocol",
            ServerType::ThriftSnappyBp => "thrift-snappy-binary-protocol",
        };
        f.write_str(name)
    }
}

/// Network address of an engine or locator member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerEndpoint {
    pub host: String,
    pub port: u16,
}

impl ServerEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        ServerEndpoint {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for ServerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Per-statement execution attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatementAttrs {
    /// Maximum rows per result batch.
    pub batch_size: Option<i32>,
    /// Server-side timeout in seconds.
    pub query_timeout: Option<i32>,
}

/// Declared type of a procedure output parameter, keyed by 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputParameter {
    pub sql_type: SqlType,
    pub scale: Option<i32>,
}

/// Structured exception reported by the server, surfaced unchanged to the
/// caller: the code and message are the server's own.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("SQL error {error_code} (state {sql_state}): {reason}")]
pub struct ExceptionData {
    pub error_code: i32,
    pub sql_state: String,
    pub reason: String,
}

impl ExceptionData {
    pub fn new(error_code: i32, sql_state: impl Into<String>, reason: impl Into<String>) -> Self {
        ExceptionData {
            error_code,
            sql_state: sql_state.into(),
            reason: reason.into(),
        }
    }

    /// True when the server reports that a named SQL object (table, view)
    /// does not exist. Used by schema-introspection layers built on top of
    /// this driver.
    pub fn is_object_missing(&self) -> bool {
        matches!(self.sql_state.as_str(), "42X05" | "X0X05")
    }
}
