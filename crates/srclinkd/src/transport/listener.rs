//! Listener implementation for the loopback TCP socket.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{ConnectionHandler, LISTENER_TARGET, ListenerError};

const ACCEPT_THREAD_NAME: &str = "srclink-accept";
const ACCEPT_BACKOFF: Duration = Duration::from_millis(25);
const ERROR_BACKOFF: Duration = Duration::from_millis(150);

/// Listener bound to a TCP address but not yet accepting.
#[derive(Debug)]
pub(crate) struct SocketListener {
    local_addr: SocketAddr,
    listener: TcpListener,
}

impl SocketListener {
    /// Resolves `host:port` and binds the first address it yields.
    pub(crate) fn bind(host: &str, port: u16) -> Result<Self, ListenerError> {
        let addr = resolve(host, port)?;
        let listener =
            TcpListener::bind(addr).map_err(|source| ListenerError::BindTcp { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ListenerError::LocalAddr { addr, source })?;
        Ok(Self {
            local_addr,
            listener,
        })
    }

    /// Address the socket is bound to, with any ephemeral port resolved.
    pub(crate) fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Moves the socket onto a background thread running the accept loop.
    ///
    /// The socket is closed when the thread exits, which happens once
    /// [`ListenerHandle::shutdown`] has been called.
    pub(crate) fn start(
        self,
        handler: Arc<dyn ConnectionHandler>,
    ) -> Result<ListenerHandle, ListenerError> {
        self.listener
            .set_nonblocking(true)
            .map_err(|source| ListenerError::NonBlocking { source })?;
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::clone(&shutdown);
        let local_addr = self.local_addr();
        let handle = thread::Builder::new()
            .name(ACCEPT_THREAD_NAME.to_owned())
            .spawn(move || run_accept_loop(&self, &shutdown_flag, &*handler))
            .map_err(|source| ListenerError::Spawn { source })?;
        Ok(ListenerHandle {
            local_addr,
            shutdown,
            handle: Some(handle),
        })
    }
}

/// Handle to the background accept thread.
pub(crate) struct ListenerHandle {
    local_addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ListenerHandle {
    pub(crate) fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Waits for the accept thread to exit and release the socket.
    pub(crate) fn join(mut self) -> Result<(), ListenerError> {
        if let Some(handle) = self.handle.take() {
            match handle.join() {
                Ok(()) => Ok(()),
                Err(_) => Err(ListenerError::ThreadPanic),
            }
        } else {
            Ok(())
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

fn run_accept_loop(
    listener: &SocketListener,
    shutdown: &AtomicBool,
    handler: &dyn ConnectionHandler,
) {
    info!(
        target: LISTENER_TARGET,
        addr = %listener.local_addr,
        "socket listener active"
    );
    serve(|| accept_connection(&listener.listener), shutdown, handler);
    info!(
        target: LISTENER_TARGET,
        addr = %listener.local_addr,
        "socket listener stopped"
    );
}

/// Accepts and handles connections one at a time until `shutdown` is set.
///
/// Accept errors never end the loop: each is followed by a backoff, and only
/// the first of a run of identical error kinds is logged.
pub(super) fn serve<A>(mut accept: A, shutdown: &AtomicBool, handler: &dyn ConnectionHandler)
where
    A: FnMut() -> io::Result<Option<(TcpStream, SocketAddr)>>,
{
    let mut errors = AcceptErrors::default();
    while !shutdown.load(Ordering::SeqCst) {
        match accept() {
            Ok(Some((stream, peer))) => {
                errors.clear();
                debug!(target: LISTENER_TARGET, peer = %peer, "connection accepted");
                handler.handle(stream);
            }
            Ok(None) => {
                thread::sleep(ACCEPT_BACKOFF);
            }
            Err(error) => {
                if errors.is_new(&error) {
                    warn!(
                        target: LISTENER_TARGET,
                        error = %error,
                        "socket accept error"
                    );
                }
                thread::sleep(ERROR_BACKOFF);
            }
        }
    }
}

/// Remembers the kind of the last accept error so repeats stay quiet.
#[derive(Debug, Default)]
pub(super) struct AcceptErrors {
    last: Option<io::ErrorKind>,
}

impl AcceptErrors {
    /// Records `error`, returning whether its kind differs from the last one.
    pub(super) fn is_new(&mut self, error: &io::Error) -> bool {
        let kind = error.kind();
        let new = self.last != Some(kind);
        self.last = Some(kind);
        new
    }

    /// Forgets the last error after a successful accept.
    pub(super) fn clear(&mut self) {
        self.last = None;
    }
}

pub(super) fn accept_connection(
    listener: &TcpListener,
) -> Result<Option<(TcpStream, SocketAddr)>, io::Error> {
    match listener.accept() {
        Ok((stream, peer)) => {
            stream.set_nonblocking(false)?;
            Ok(Some((stream, peer)))
        }
        Err(error) if error.kind() == io::ErrorKind::WouldBlock => Ok(None),
        Err(error) if error.kind() == io::ErrorKind::Interrupted => Ok(None),
        Err(error) => Err(error),
    }
}

fn resolve(host: &str, port: u16) -> Result<SocketAddr, ListenerError> {
    let mut addrs = (host, port)
        .to_socket_addrs()
        .map_err(|source| ListenerError::Resolve {
            host: host.to_owned(),
            port,
            source,
        })?;
    addrs.next().ok_or_else(|| ListenerError::ResolveEmpty {
        host: host.to_owned(),
        port,
    })
}
