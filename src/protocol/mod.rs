//! Wire entities and RPC collaborator traits.
//!
//! The protocol module is organized into:
//! - `types` - the entities exchanged with the engine (type codes, column
//!   descriptors, wire cells, operation handles, session properties)
//! - `service` - the blocking traits a transport implementation plugs into

pub mod service;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use service::{EngineService, LocatorService, RpcConnector, NO_CURRENT_STATEMENT};
pub use types::{
    BlobChunk, ClobChunk, ColumnDescriptor, ColumnValue, ConnectionProperties, ExceptionData,
    OpenConnectionArgs, OutputParameter, Row, RowSet, SecurityMechanism, ServerEndpoint,
    ServerType, SqlType, StatementAttrs, StatementResult, WireDecimal,
};
