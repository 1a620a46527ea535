//! Scripted in-memory stubs used by the unit tests.
//!
//! The mocks record every call they receive in shared state so tests can
//! assert on the exact RPC sequence the driver issued.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::error::RpcError;
use crate::protocol::service::{EngineService, LocatorService, RpcConnector};
use crate::protocol::types::{
    ConnectionProperties, OpenConnectionArgs, OutputParameter, ServerEndpoint, ServerType,
    StatementAttrs, StatementResult,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EngineCall {
    OpenConnection(OpenConnectionArgs),
    CloseConnection { conn_id: i64, close_socket: bool, token: Vec<u8> },
    Execute { conn_id: i64, sql: String, token: Vec<u8> },
    GetNextResultSet { cursor_id: i64 },
    CloseResultSet { conn_id: i64 },
    CancelCurrentStatement { conn_id: i64 },
}

/// Shared script: what the engine stub should answer, and what it saw.
#[derive(Default)]
pub(crate) struct EngineScript {
    pub calls: Vec<EngineCall>,
    pub connected_to: Vec<ServerEndpoint>,
    pub open_result: Option<Result<ConnectionProperties, RpcError>>,
    pub execute_results: VecDeque<Result<StatementResult, RpcError>>,
    pub next_results: VecDeque<Result<StatementResult, RpcError>>,
    pub close_result_set_error: Option<RpcError>,
    pub cancel_error: Option<RpcError>,
}

impl EngineScript {
    pub fn shared() -> Arc<Mutex<EngineScript>> {
        Arc::new(Mutex::new(EngineScript::default()))
    }

    pub fn default_properties() -> ConnectionProperties {
        ConnectionProperties {
            conn_id: 7,
            token: Some(vec![0xAB, 0xCD]),
            ..ConnectionProperties::default()
        }
    }
}

pub(crate) struct MockEngine {
    pub script: Arc<Mutex<EngineScript>>,
}

impl EngineService for MockEngine {
    fn open_connection(
        &mut self,
        args: OpenConnectionArgs,
    ) -> Result<ConnectionProperties, RpcError> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(EngineCall::OpenConnection(args));
        script
            .open_result
            .clone()
            .unwrap_or_else(|| Ok(EngineScript::default_properties()))
    }

    fn close_connection(
        &mut self,
        conn_id: i64,
        close_socket: bool,
        token: &[u8],
    ) -> Result<(), RpcError> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(EngineCall::CloseConnection {
            conn_id,
            close_socket,
            token: token.to_vec(),
        });
        Ok(())
    }

    fn execute(
        &mut self,
        conn_id: i64,
        sql: &str,
        _output_params: Option<&HashMap<i32, OutputParameter>>,
        _attrs: Option<&StatementAttrs>,
        token: &[u8],
    ) -> Result<StatementResult, RpcError> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(EngineCall::Execute {
            conn_id,
            sql: sql.to_string(),
            token: token.to_vec(),
        });
        script
            .execute_results
            .pop_front()
            .unwrap_or_else(|| Ok(StatementResult::default()))
    }

    fn get_next_result_set(
        &mut self,
        cursor_id: i64,
        _token: &[u8],
    ) -> Result<StatementResult, RpcError> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(EngineCall::GetNextResultSet { cursor_id });
        script
            .next_results
            .pop_front()
            .unwrap_or_else(|| Ok(StatementResult::default()))
    }

    fn close_result_set(&mut self, conn_id: i64, _token: &[u8]) -> Result<(), RpcError> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(EngineCall::CloseResultSet { conn_id });
        match script.close_result_set_error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn cancel_current_statement(&mut self, conn_id: i64, _token: &[u8]) -> Result<(), RpcError> {
        let mut script = self.script.lock().unwrap();
        script
            .calls
            .push(EngineCall::CancelCurrentStatement { conn_id });
        match script.cancel_error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Shared locator script.
#[derive(Default)]
pub(crate) struct LocatorScript {
    /// (server_types, server_groups passed, failed_servers passed)
    pub requests: Vec<(Vec<ServerType>, bool, bool)>,
    pub result: Option<Result<ServerEndpoint, RpcError>>,
}

impl LocatorScript {
    pub fn shared() -> Arc<Mutex<LocatorScript>> {
        Arc::new(Mutex::new(LocatorScript::default()))
    }
}

pub(crate) struct MockLocator {
    pub script: Arc<Mutex<LocatorScript>>,
}

impl LocatorService for MockLocator {
    fn get_preferred_server(
        &mut self,
        server_types: &[ServerType],
        server_groups: Option<&[String]>,
        failed_servers: Option<&[ServerEndpoint]>,
    ) -> Result<ServerEndpoint, RpcError> {
        let mut script = self.script.lock().unwrap();
        script.requests.push((
            server_types.to_vec(),
            server_groups.is_some(),
            failed_servers.is_some(),
        ));
        script
            .result
            .clone()
            .unwrap_or_else(|| Ok(ServerEndpoint::new("server-1", 1528)))
    }
}

/// Connector handing out mocks that share the given scripts.
pub(crate) struct MockConnector {
    pub engine_script: Arc<Mutex<EngineScript>>,
    pub locator_script: Arc<Mutex<LocatorScript>>,
}

impl MockConnector {
    pub fn new(engine_script: Arc<Mutex<EngineScript>>) -> Self {
        MockConnector {
            engine_script,
            locator_script: LocatorScript::shared(),
        }
    }
}

impl RpcConnector for MockConnector {
    fn engine(&self, endpoint: &ServerEndpoint) -> Result<Box<dyn EngineService>, RpcError> {
        self.engine_script
            .lock()
            .unwrap()
            .connected_to
            .push(endpoint.clone());
        Ok(Box::new(MockEngine {
            script: Arc::clone(&self.engine_script),
        }))
    }

    fn locator(&self, _endpoint: &ServerEndpoint) -> Result<Box<dyn LocatorService>, RpcError> {
        Ok(Box::new(MockLocator {
            script: Arc::clone(&self.locator_script),
        }))
    }
}
