//! Shared test doubles for the integration tests.
//!
//! `ScriptedConnector` stands in for the generated Thrift stubs: the engine
//! side answers `execute`/`getNextResultSet` from a queue of scripted
//! results and keeps a readable log of every call it served.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use snappydata_client::protocol::OutputParameter;
use snappydata_client::{
    ColumnDescriptor, ColumnValue, ConnectionProperties, EngineService, LocatorService,
    OpenConnectionArgs, RpcConnector, RpcError, Row, RowSet, ServerEndpoint, ServerType, SqlType,
    StatementAttrs, StatementResult,
};

#[derive(Default)]
pub struct ServerState {
    pub log: Vec<String>,
    pub execute_results: VecDeque<StatementResult>,
    pub next_results: VecDeque<StatementResult>,
}

pub struct ScriptedConnector {
    pub state: Arc<Mutex<ServerState>>,
    /// Endpoint the locator hands out, when the locator path is used.
    pub preferred_server: ServerEndpoint,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        ScriptedConnector {
            state: Arc::new(Mutex::new(ServerState::default())),
            preferred_server: ServerEndpoint::new("server-1", 1528),
        }
    }

    pub fn log(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn push_execute_result(&self, result: StatementResult) {
        self.state.lock().unwrap().execute_results.push_back(result);
    }

    pub fn push_next_result(&self, result: StatementResult) {
        self.state.lock().unwrap().next_results.push_back(result);
    }
}

impl RpcConnector for ScriptedConnector {
    fn engine(&self, endpoint: &ServerEndpoint) -> Result<Box<dyn EngineService>, RpcError> {
        let mut state = self.state.lock().unwrap();
        state.log.push(format!("connect:{endpoint}"));
        drop(state);
        Ok(Box::new(ScriptedEngine {
            state: Arc::clone(&self.state),
        }))
    }

    fn locator(&self, endpoint: &ServerEndpoint) -> Result<Box<dyn LocatorService>, RpcError> {
        let mut state = self.state.lock().unwrap();
        state.log.push(format!("locator-connect:{endpoint}"));
        drop(state);
        Ok(Box::new(ScriptedLocator {
            state: Arc::clone(&self.state),
            preferred_server: self.preferred_server.clone(),
        }))
    }
}

struct ScriptedEngine {
    state: Arc<Mutex<ServerState>>,
}

impl EngineService for ScriptedEngine {
    fn open_connection(
        &mut self,
        args: OpenConnectionArgs,
    ) -> Result<ConnectionProperties, RpcError> {
        let mut state = self.state.lock().unwrap();
        state.log.push(format!(
            "openConnection:{}",
            args.user_name.as_deref().unwrap_or("<anonymous>")
        ));
        Ok(ConnectionProperties {
            conn_id: 11,
            token: Some(vec![0x01, 0x02]),
            ..ConnectionProperties::default()
        })
    }

    fn close_connection(
        &mut self,
        conn_id: i64,
        close_socket: bool,
        _token: &[u8],
    ) -> Result<(), RpcError> {
        let mut state = self.state.lock().unwrap();
        state
            .log
            .push(format!("closeConnection:{conn_id}:force={close_socket}"));
        Ok(())
    }

    fn execute(
        &mut self,
        _conn_id: i64,
        sql: &str,
        _output_params: Option<&HashMap<i32, OutputParameter>>,
        _attrs: Option<&StatementAttrs>,
        _token: &[u8],
    ) -> Result<StatementResult, RpcError> {
        let mut state = self.state.lock().unwrap();
        state.log.push(format!("execute:{sql}"));
        Ok(state.execute_results.pop_front().unwrap_or_default())
    }

    fn get_next_result_set(
        &mut self,
        cursor_id: i64,
        _token: &[u8],
    ) -> Result<StatementResult, RpcError> {
        let mut state = self.state.lock().unwrap();
        state.log.push(format!("getNextResultSet:{cursor_id}"));
        Ok(state.next_results.pop_front().unwrap_or_default())
    }

    fn close_result_set(&mut self, conn_id: i64, _token: &[u8]) -> Result<(), RpcError> {
        let mut state = self.state.lock().unwrap();
        state.log.push(format!("closeResultSet:{conn_id}"));
        Ok(())
    }

    fn cancel_current_statement(&mut self, conn_id: i64, _token: &[u8]) -> Result<(), RpcError> {
        let mut state = self.state.lock().unwrap();
        state.log.push(format!("cancelCurrentStatement:{conn_id}"));
        Ok(())
    }
}

struct ScriptedLocator {
    state: Arc<Mutex<ServerState>>,
    preferred_server: ServerEndpoint,
}

impl LocatorService for ScriptedLocator {
    fn get_preferred_server(
        &mut self,
        server_types: &[ServerType],
        _server_groups: Option<&[String]>,
        _failed_servers: Option<&[ServerEndpoint]>,
    ) -> Result<ServerEndpoint, RpcError> {
        let mut state = self.state.lock().unwrap();
        let types: Vec<String> = server_types.iter().map(|t| t.to_string()).collect();
        state
            .log
            .push(format!("getPreferredServer:{}", types.join(",")));
        Ok(self.preferred_server.clone())
    }
}

/// A two-column (INTEGER, VARCHAR) batch.
pub fn number_name_batch(rows: &[(Option<i32>, Option<&str>)]) -> RowSet {
    RowSet {
        metadata: vec![
            ColumnDescriptor::new("id", SqlType::Integer),
            ColumnDescriptor::new("name", SqlType::Varchar),
        ],
        rows: rows
            .iter()
            .map(|(id, name)| Row {
                values: vec![
                    match id {
                        Some(v) => ColumnValue {
                            i32_val: Some(*v),
                            ..ColumnValue::default()
                        },
                        None => ColumnValue::null(),
                    },
                    match name {
                        Some(s) => ColumnValue {
                            string_val: Some((*s).to_string()),
                            ..ColumnValue::default()
                        },
                        None => ColumnValue::null(),
                    },
                ],
            })
            .collect(),
    }
}

pub fn rows_result(cursor_id: i64, rows: &[(Option<i32>, Option<&str>)]) -> StatementResult {
    StatementResult {
        result_set: Some(number_name_batch(rows)),
        update_count: 0,
        cursor_id,
    }
}

pub fn update_result(count: i64) -> StatementResult {
    StatementResult {
        result_set: None,
        update_count: count,
        cursor_id: 0,
    }
}
