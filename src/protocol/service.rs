//! Collaborator traits standing in for the generated RPC stubs.
//!
//! The driver does not implement the Thrift transport itself; callers supply
//! the generated compact-protocol clients behind these traits, one stub per
//! TCP channel. All calls block until the transport returns or errors; the
//! driver adds no retries and no timeouts of its own.

use std::collections::HashMap;

use crate::error::RpcError;
use crate::protocol::types::{
    ConnectionProperties, OpenConnectionArgs, OutputParameter, ServerEndpoint, ServerType,
    StatementAttrs, StatementResult,
};

/// Server error code meaning "no statement is currently active" on this
/// session. `Connection::reset` treats it as a benign no-op.
pub const NO_CURRENT_STATEMENT: i32 = 2000;

/// RPC surface of one engine server, scoped to a single channel.
///
/// Every call after `open_connection` is parametrized by the connection id
/// and token of the session it belongs to.
pub trait EngineService: Send {
    /// Opens and authenticates a session on this channel.
    fn open_connection(
        &mut self,
        args: OpenConnectionArgs,
    ) -> Result<ConnectionProperties, RpcError>;

    /// Closes the session; `close_socket` tears the channel down with it.
    fn close_connection(
        &mut self,
        conn_id: i64,
        close_socket: bool,
        token: &[u8],
    ) -> Result<(), RpcError>;

    /// Executes one SQL statement and returns its operation handle.
    fn execute(
        &mut self,
        conn_id: i64,
        sql: &str,
        output_params: Option<&HashMap<i32, OutputParameter>>,
        attrs: Option<&StatementAttrs>,
        token: &[u8],
    ) -> Result<StatementResult, RpcError>;

    /// Pages the next batch of an open result; valid while the prior
    /// handle's cursor id is greater than zero.
    fn get_next_result_set(
        &mut self,
        cursor_id: i64,
        token: &[u8],
    ) -> Result<StatementResult, RpcError>;

    /// Releases any open result-set resources held by the session.
    fn close_result_set(&mut self, conn_id: i64, token: &[u8]) -> Result<(), RpcError>;

    /// Best-effort cancellation of the statement currently associated with
    /// the session.
    fn cancel_current_statement(&mut self, conn_id: i64, token: &[u8]) -> Result<(), RpcError>;
}

/// RPC surface of a locator member.
pub trait LocatorService: Send {
    /// Asks the locator for a preferred server of one of the given types,
    /// optionally restricted to server groups and excluding known-failed
    /// servers.
    fn get_preferred_server(
        &mut self,
        server_types: &[ServerType],
        server_groups: Option<&[String]>,
        failed_servers: Option<&[ServerEndpoint]>,
    ) -> Result<ServerEndpoint, RpcError>;
}

/// Factory for RPC stubs, opening one fresh channel per call.
///
/// This is the seam where the transport lives: production code plugs in the
/// generated Thrift clients, tests plug in scripted fakes.
pub trait RpcConnector {
    fn engine(&self, endpoint: &ServerEndpoint) -> Result<Box<dyn EngineService>, RpcError>;

    fn locator(&self, endpoint: &ServerEndpoint) -> Result<Box<dyn LocatorService>, RpcError>;
}
