//! # snappydata-client
//!
//! Client driver for the SnappyData distributed SQL engine.
//!
//! The driver speaks the engine's Thrift-based session/statement protocol
//! through an externally supplied generated RPC stub and exposes a
//! cursor-style API on top of it: execute a statement, read its description
//! and row count, fetch rows, page further batches, cancel, close.
//!
//! ## Features
//!
//! - **Sessions**: one authenticated channel per [`Connection`], with reset,
//!   cancellation and forced close
//! - **Locator resolution**: optionally ask a locator for the preferred
//!   server before connecting
//! - **Tagged-value decoding**: every SQL type the engine sends — including
//!   nested ARRAY/MAP/STRUCT columns — is decoded into a native [`Value`];
//!   unknown types degrade to an opaque pass-through instead of failing
//! - **Cursors**: DB-API flavored statement handles with multi-batch
//!   pagination
//!
//! The Thrift transport itself is not part of this crate: plug the generated
//! compact-protocol clients in behind the [`RpcConnector`], [`EngineService`]
//! and [`LocatorService`] traits.
//!
//! ## Example
//!
//! ```no_run
//! use snappydata_client::{connect, ConnectParams, RpcConnector, SnappyError};
//!
//! fn run(connector: &dyn RpcConnector) -> Result<(), SnappyError> {
//!     let params = ConnectParams::new("server-1.internal")
//!         .with_credentials("app", "secret");
//!     let mut conn = connect(params, connector)?;
//!     {
//!         let mut cursor = conn.cursor();
//!         cursor.execute("SELECT id, name FROM members", None)?;
//!         while let Some(row) = cursor.fetch_one() {
//!             println!("{row:?}");
//!         }
//!         cursor.close()?;
//!     }
//!     conn.close()?;
//!     Ok(())
//! }
//! ```
//!
//! To connect through a locator instead of a fixed server, mark the
//! parameters with [`ConnectParams::via_locator`]; the locator is asked for
//! a preferred server and the session is opened there.

// Module declarations
pub mod connection;
pub mod cursor;
pub mod error;
pub mod escape;
pub mod locator;
pub mod protocol;
pub mod results;
pub mod value;

// =============================================================================
// Connection & Session
// =============================================================================

/// Re-export connection types.
pub use connection::{ConnectParams, Connection, DEFAULT_PORT};

/// Opens a session described by `params` over the given connector.
///
/// Convenience wrapper around [`Connection::open`].
///
/// # Errors
///
/// Returns [`ConnectionError`] when the transport cannot connect, the
/// locator has no server, or the server rejects the credentials.
pub fn connect(
    params: ConnectParams,
    connector: &dyn RpcConnector,
) -> Result<Connection, ConnectionError> {
    Connection::open(params, connector)
}

// =============================================================================
// Cursor
// =============================================================================

/// Re-export cursor types.
pub use cursor::{Cursor, DEFAULT_ARRAY_SIZE};

// =============================================================================
// Values & Results
// =============================================================================

/// Re-export the native value type and the cell decoder.
pub use value::{decode, Value};

/// Re-export result materialization types.
pub use results::{ColumnDescription, ResultBuffer};

// =============================================================================
// Errors
// =============================================================================

/// Re-export error types for convenient error handling.
pub use error::{
    ConnectionError, DecodeError, EscapeError, LocatorError, RpcError, SnappyError,
};

// =============================================================================
// Parameter escaping
// =============================================================================

/// Re-export the escaping collaborator.
pub use escape::{ParamEscaper, SnappyEscaper};

// =============================================================================
// Protocol surface
// =============================================================================

/// Re-export the wire entities and the RPC collaborator traits.
pub use protocol::{
    ColumnDescriptor, ColumnValue, ConnectionProperties, EngineService, ExceptionData,
    LocatorService, OpenConnectionArgs, RpcConnector, Row, RowSet, SecurityMechanism,
    ServerEndpoint, ServerType, SqlType, StatementAttrs, StatementResult,
    NO_CURRENT_STATEMENT,
};

/// Re-export locator resolution.
pub use locator::resolve_preferred_server;
