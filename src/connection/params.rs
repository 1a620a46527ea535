//! Connection parameters.

use std::fmt;

use crate::protocol::types::ServerEndpoint;

/// Default port of an engine server.
pub const DEFAULT_PORT: u16 = 1528;

/// Parameters for opening a session.
///
/// `host`/`port` name either an engine server directly or, when
/// `use_locator` is set, a locator that picks the server to connect to.
#[derive(Clone)]
pub struct ConnectParams {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_locator: bool,
}

impl ConnectParams {
    /// Parameters for a direct connection to `host` on the default port.
    pub fn new(host: impl Into<String>) -> Self {
        ConnectParams {
            host: host.into(),
            port: DEFAULT_PORT,
            username: None,
            password: None,
            use_locator: false,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Treat `host:port` as a locator and ask it for a preferred server.
    pub fn via_locator(mut self) -> Self {
        self.use_locator = true;
        self
    }

    /// The endpoint these parameters point at (server or locator).
    pub fn endpoint(&self) -> ServerEndpoint {
        ServerEndpoint::new(self.host.clone(), self.port)
    }
}

impl fmt::Debug for ConnectParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("use_locator", &self.use_locator)
            .finish()
    }
}
