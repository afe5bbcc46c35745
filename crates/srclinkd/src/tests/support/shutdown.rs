//! Shutdown signal that plays a client request before releasing the daemon.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::{Arc, Mutex};

use crate::process::{ShutdownError, ShutdownSignal};

use super::reporter::RecordingHealthReporter;

/// Writes `request` to `addr` and returns whatever the listener answered.
pub fn send_request(addr: SocketAddr, request: &[u8]) -> String {
    let mut client = TcpStream::connect(addr).expect("connect client");
    client.write_all(request).expect("write request");
    let mut response = String::new();
    client
        .read_to_string(&mut response)
        .expect("read response");
    response
}

/// Sends each request to the started listener, then lets shutdown proceed.
pub struct ClientThenShutdown {
    reporter: Arc<RecordingHealthReporter>,
    requests: Vec<Vec<u8>>,
    responses: Mutex<Vec<String>>,
}

impl ClientThenShutdown {
    #[must_use]
    pub fn new(reporter: Arc<RecordingHealthReporter>, requests: Vec<Vec<u8>>) -> Self {
        Self {
            reporter,
            requests,
            responses: Mutex::new(Vec::new()),
        }
    }

    /// Responses received, in request order.
    #[must_use]
    pub fn responses(&self) -> Vec<String> {
        self.responses
            .lock()
            .expect("responses mutex poisoned")
            .clone()
    }
}

impl ShutdownSignal for ClientThenShutdown {
    fn wait(&self) -> Result<(), ShutdownError> {
        let addr = self
            .reporter
            .started_addr()
            .expect("listener should have started before shutdown is awaited");
        for request in &self.requests {
            let response = send_request(addr, request);
            self.responses
                .lock()
                .expect("responses mutex poisoned")
                .push(response);
        }
        Ok(())
    }
}
