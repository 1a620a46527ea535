//! Error types for the driver.
//!
//! Each concern gets its own enum so callers can match on exactly the
//! failures a given operation can produce; [`SnappyError`] is the umbrella
//! for cursor-level operations that mix RPC and decode concerns. Server
//! error codes and messages are carried through unchanged in
//! [`ExceptionData`] — the driver never translates or renumbers them.

use thiserror::Error;

use crate::protocol::types::{ExceptionData, SqlType};

/// Failure of a single RPC call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RpcError {
    /// The transport could not deliver the call or lost the channel.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server reported a structured exception for the call.
    #[error(transparent)]
    Remote(#[from] ExceptionData),

    /// The session was closed locally; no further calls are valid.
    #[error("connection already closed")]
    Closed,
}

/// Failure while establishing a session.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("failed to connect to {host}:{port}: {message}")]
    ConnectFailed {
        host: String,
        port: u16,
        message: String,
    },

    /// The server refused the open request (bad credentials, capacity, ...).
    #[error("server rejected connection: {0}")]
    Rejected(ExceptionData),

    #[error(transparent)]
    Locator(#[from] LocatorError),
}

/// Failure while asking a locator for a server.
#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("no server of the requested type is available")]
    NoServerAvailable,

    #[error("locator request failed: {0}")]
    Rpc(#[from] RpcError),
}

/// A structurally malformed wire cell.
///
/// Unrecognized-but-well-formed column types never produce this error; they
/// decode to an opaque pass-through value instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("column {column}: {sql_type} cell is missing its collection payload")]
    MissingCollection { column: String, sql_type: SqlType },

    #[error(
        "column {column}: {sql_type} descriptor carries {found} element type(s), expected {expected}"
    )]
    MissingElementTypes {
        column: String,
        sql_type: SqlType,
        expected: usize,
        found: usize,
    },

    #[error("column {column}: decimal value does not fit the native decimal range")]
    DecimalOutOfRange { column: String },

    #[error("column {column}: {sql_type} value {value} is outside the representable range")]
    TemporalOutOfRange {
        column: String,
        sql_type: SqlType,
        value: i64,
    },
}

/// Umbrella error for cursor-level operations.
#[derive(Debug, Error)]
pub enum SnappyError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Locator(#[from] LocatorError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Escape(#[from] EscapeError),
}

/// Failure while rendering statement parameters into SQL literals.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EscapeError {
    #[error("{kind} values cannot be rendered as SQL literals")]
    Unsupported { kind: &'static str },

    #[error("statement has {placeholders} placeholder(s) but {parameters} parameter(s) were supplied")]
    ParameterCount {
        placeholders: usize,
        parameters: usize,
    },
}
