//! Connection handler wiring the read, respond, parse and dispatch phases.

use std::io::{self, Write};
use std::net::{Shutdown, TcpStream};

use srclink_config::SecretPolicy;
use tracing::{debug, info, warn};

use crate::lifecycle::ListenerConfig;
use crate::navigation::NavigationQueue;
use crate::transport::ConnectionHandler;

use super::read::read_request;
use super::{DropReason, Outcome, REQUEST_TARGET, RequestLimits, evaluate};

/// Acknowledgment written to every client before its request is evaluated.
pub(crate) const ACKNOWLEDGMENT: &[u8] = b"HTTP/1.1 200 OK\r\n\r\n";

/// Handles `GET /open?src=...&p=...` requests from the browser extension.
#[derive(Debug)]
pub(crate) struct OpenRequestHandler {
    secret: String,
    policy: SecretPolicy,
    limits: RequestLimits,
    queue: NavigationQueue,
}

impl OpenRequestHandler {
    pub(crate) fn new(config: &ListenerConfig, queue: NavigationQueue) -> Self {
        Self {
            secret: config.secret().to_owned(),
            policy: config.secret_policy(),
            limits: config.limits(),
            queue,
        }
    }

    fn dispatch(&self, outcome: Outcome) {
        match outcome {
            Outcome::Dispatch(target) => {
                debug!(
                    target: REQUEST_TARGET,
                    name = %target.fully_qualified_name,
                    line = target.line_number,
                    "dispatching navigation"
                );
                if let Err(error) = self.queue.submit(target) {
                    warn!(target: REQUEST_TARGET, error = %error, "navigation dispatch failed");
                }
            }
            Outcome::Dropped(DropReason::SecretMismatch) => {
                info!(target: REQUEST_TARGET, "request rejected: secret does not match");
            }
            Outcome::Dropped(reason) => {
                debug!(target: REQUEST_TARGET, reason = ?reason, "request dropped");
            }
        }
    }
}

impl ConnectionHandler for OpenRequestHandler {
    fn handle(&self, mut stream: TcpStream) {
        if let Err(error) = stream.set_read_timeout(self.limits.read_timeout) {
            warn!(target: REQUEST_TARGET, error = %error, "failed to set read timeout");
        }
        let request = read_request(&mut stream, &self.limits);

        if let Err(error) = acknowledge(&mut stream) {
            debug!(target: REQUEST_TARGET, error = %error, "failed to acknowledge request");
        }
        close(&stream);
        drop(stream);

        match request {
            Ok(raw) => {
                debug!(target: REQUEST_TARGET, request = raw.as_str(), "received request");
                self.dispatch(evaluate(&raw, &self.secret, self.policy));
            }
            Err(error) => {
                warn!(target: REQUEST_TARGET, error = %error, "request dropped");
            }
        }
    }
}

fn acknowledge(stream: &mut TcpStream) -> io::Result<()> {
    stream.write_all(ACKNOWLEDGMENT)?;
    stream.flush()
}

fn close(stream: &TcpStream) {
    if let Err(error) = stream.shutdown(Shutdown::Both)
        && error.kind() != io::ErrorKind::NotConnected
    {
        debug!(target: REQUEST_TARGET, error = %error, "failed to close connection");
    }
}
