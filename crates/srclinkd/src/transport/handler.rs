//! Connection handling abstraction for the listener.

use std::net::TcpStream;

/// Handles accepted socket connections.
///
/// The accept loop calls [`ConnectionHandler::handle`] synchronously, so the
/// next connection is only accepted once the current call returns.
pub(crate) trait ConnectionHandler: Send + Sync + 'static {
    /// Handles a single connection. Implementations should avoid panicking.
    fn handle(&self, stream: TcpStream);
}
