//! Session management.
//!
//! A [`Connection`] owns exactly one authenticated RPC channel and the
//! session handle the server issued for it; every call is parametrized by
//! that handle. The connection itself is stateless beyond the handle — all
//! statement state lives server-side and in the [`Cursor`](crate::Cursor)
//! driving it.

pub mod params;

use std::collections::HashMap;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use crate::cursor::Cursor;
use crate::error::{ConnectionError, LocatorError, RpcError};
use crate::escape::{ParamEscaper, SnappyEscaper};
use crate::locator;
use crate::protocol::service::{EngineService, RpcConnector, NO_CURRENT_STATEMENT};
use crate::protocol::types::{
    ConnectionProperties, OpenConnectionArgs, OutputParameter, SecurityMechanism, ServerEndpoint,
    ServerType, StatementAttrs, StatementResult,
};

pub use params::{ConnectParams, DEFAULT_PORT};

/// One authenticated session with an engine server.
pub struct Connection {
    client: Box<dyn EngineService>,
    /// Session handle; taken on close, after which no call is valid.
    props: Option<ConnectionProperties>,
    endpoint: ServerEndpoint,
    client_id: String,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("props", &self.props)
            .field("endpoint", &self.endpoint)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Opens a session, going through a locator first when the parameters
    /// ask for one.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] when the transport cannot connect, the
    /// locator has no server to offer, or the server rejects the open
    /// request.
    pub fn open(params: ConnectParams, connector: &dyn RpcConnector) -> Result<Self, ConnectionError> {
        let endpoint = if params.use_locator {
            let locator_endpoint = params.endpoint();
            info!(host = %locator_endpoint.host, port = locator_endpoint.port, "connecting to locator");
            let mut locator_client = connector
                .locator(&locator_endpoint)
                .map_err(LocatorError::Rpc)?;
            // The locator channel is dropped after resolution; the session
            // gets its own channel below.
            locator::resolve_preferred_server(
                locator_client.as_mut(),
                &[ServerType::ThriftSnappyCp],
            )?
        } else {
            params.endpoint()
        };

        info!(host = %endpoint.host, port = endpoint.port, "connecting to server");
        let client_id = build_client_id(&endpoint.host);
        let mut client =
            connector
                .engine(&endpoint)
                .map_err(|err| ConnectionError::ConnectFailed {
                    host: endpoint.host.clone(),
                    port: endpoint.port,
                    message: err.to_string(),
                })?;

        let args = OpenConnectionArgs {
            client_host_name: endpoint.host.clone(),
            client_id: client_id.clone(),
            user_name: params.username.clone(),
            password: params.password.clone(),
            security: SecurityMechanism::Plain,
            properties: None,
        };
        let props = client.open_connection(args).map_err(|err| match err {
            RpcError::Remote(data) => ConnectionError::Rejected(data),
            other => ConnectionError::ConnectFailed {
                host: endpoint.host.clone(),
                port: endpoint.port,
                message: other.to_string(),
            },
        })?;

        Ok(Connection {
            client,
            props: Some(props),
            endpoint,
            client_id,
        })
    }

    /// A cursor using the default parameter escaper.
    pub fn cursor(&mut self) -> Cursor<'_> {
        Cursor::new(self, Box::new(SnappyEscaper))
    }

    /// A cursor using a caller-supplied parameter escaper.
    pub fn cursor_with_escaper(&mut self, escaper: Box<dyn ParamEscaper>) -> Cursor<'_> {
        Cursor::new(self, escaper)
    }

    /// Executes one SQL statement and returns the server's operation handle
    /// as-is. The statement text is sent verbatim; any parameter
    /// substitution happens before this layer.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError`] on transport failure, on a structured server
    /// exception, or when the session is closed.
    pub fn execute(
        &mut self,
        sql: &str,
        attrs: Option<&StatementAttrs>,
        output_params: Option<&HashMap<i32, OutputParameter>>,
    ) -> Result<StatementResult, RpcError> {
        let props = self.props.as_ref().ok_or(RpcError::Closed)?;
        debug!(%sql, "executing statement");
        self.client.execute(
            props.conn_id,
            sql,
            output_params,
            attrs,
            props.token.as_deref().unwrap_or(&[]),
        )
    }

    /// Pages the next batch of a multi-batch result.
    pub fn get_next_result_set(&mut self, cursor_id: i64) -> Result<StatementResult, RpcError> {
        let props = self.props.as_ref().ok_or(RpcError::Closed)?;
        self.client
            .get_next_result_set(cursor_id, props.token.as_deref().unwrap_or(&[]))
    }

    /// Releases any open result-set resources for this session.
    pub fn reset_state(&mut self) -> Result<(), RpcError> {
        let props = self.props.as_ref().ok_or(RpcError::Closed)?;
        self.client
            .close_result_set(props.conn_id, props.token.as_deref().unwrap_or(&[]))
    }

    /// Asks the server to cancel whatever statement is currently associated
    /// with this session. Best-effort: the in-flight statement may not stop
    /// immediately.
    pub fn cancel_current_statement(&mut self) -> Result<(), RpcError> {
        let props = self.props.as_ref().ok_or(RpcError::Closed)?;
        self.client
            .cancel_current_statement(props.conn_id, props.token.as_deref().unwrap_or(&[]))
    }

    /// Releases result-set state, then cancels the current statement.
    ///
    /// The server's "no current statement" code is a benign no-op here and
    /// is swallowed; every other error propagates.
    pub fn reset(&mut self) -> Result<(), RpcError> {
        let outcome = self
            .reset_state()
            .and_then(|()| self.cancel_current_statement());
        match outcome {
            Err(RpcError::Remote(data)) if data.error_code == NO_CURRENT_STATEMENT => Ok(()),
            other => other,
        }
    }

    /// Closes the session with `force = true`, invalidating the handle.
    /// Calling it again is a no-op; any other call afterwards fails with
    /// [`RpcError::Closed`].
    pub fn close(&mut self) -> Result<(), RpcError> {
        if let Some(props) = self.props.take() {
            info!(conn_id = props.conn_id, "closing connection");
            self.client.close_connection(
                props.conn_id,
                true,
                props.token.as_deref().unwrap_or(&[]),
            )?;
        }
        Ok(())
    }

    /// The engine runs autocommit from this client's perspective; nothing
    /// to do.
    pub fn commit(&self) {}

    /// See [`Connection::commit`].
    pub fn rollback(&self) {}

    /// Server-assigned connection id, or -1 once closed.
    pub fn connection_id(&self) -> i64 {
        self.props.as_ref().map(|p| p.conn_id).unwrap_or(-1)
    }

    /// Session token, empty once closed.
    pub fn token(&self) -> &[u8] {
        self.props
            .as_ref()
            .and_then(|p| p.token.as_deref())
            .unwrap_or(&[])
    }

    /// Host the session is connected to (post locator resolution).
    pub fn host_name(&self) -> &str {
        &self.endpoint.host
    }

    /// Diagnostic client identifier sent at open.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if self.props.is_some() {
            let _ = self.close();
        }
    }
}

/// Diagnostic identifier: target host, opening thread and wall-clock time.
/// Uniqueness only, no security meaning.
fn build_client_id(host: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    format!("{host}|{:?}|{millis}", thread::current().id())
}
