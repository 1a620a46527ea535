//! Locator-based server resolution.
//!
//! A locator is a discovery member that recommends which engine server a new
//! session should connect to. Resolution happens on a throwaway channel; the
//! session opens its own channel to whatever server comes back.

use tracing::info;

use crate::error::LocatorError;
use crate::protocol::service::LocatorService;
use crate::protocol::types::{ServerEndpoint, ServerType};

/// Asks `locator` for a preferred server of one of the given types.
///
/// The base case applies no server-group restriction and no failed-server
/// exclusion.
///
/// # Errors
///
/// Returns [`LocatorError::NoServerAvailable`] when the locator has nothing
/// usable to offer, and [`LocatorError::Rpc`] when the locator call itself
/// fails.
pub fn resolve_preferred_server(
    locator: &mut dyn LocatorService,
    server_types: &[ServerType],
) -> Result<ServerEndpoint, LocatorError> {
    let server = locator.get_preferred_server(server_types, None, None)?;
    if server.host.is_empty() || server.port == 0 {
        return Err(LocatorError::NoServerAvailable);
    }
    info!(host = %server.host, port = server.port, "locator picked server");
    Ok(server)
}
