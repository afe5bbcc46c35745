//! Tests for the socket listener.

use std::cell::Cell;
use std::io;
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rstest::{fixture, rstest};

use super::listener::{AcceptErrors, SocketListener, accept_connection, serve};
use super::{ConnectionHandler, CountingHandler, ListenerError};

#[derive(Clone)]
struct CountingFixture {
    count: Arc<AtomicUsize>,
    handler: Arc<CountingHandler>,
}

#[fixture]
fn counting_fixture() -> CountingFixture {
    let (count, handler) = CountingHandler::new();
    CountingFixture { count, handler }
}

fn wait_for_count(count: &AtomicUsize, expected: usize) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if count.load(Ordering::SeqCst) >= expected {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

#[rstest]
fn tcp_listener_accepts_connections(counting_fixture: CountingFixture) {
    let listener = SocketListener::bind("127.0.0.1", 0).expect("bind tcp listener");
    let addr = listener.local_addr();
    assert_ne!(addr.port(), 0, "ephemeral port should be resolved");
    let CountingFixture { count, handler } = counting_fixture;
    let handler: Arc<dyn ConnectionHandler> = handler;
    let handle = listener.start(handler).expect("start listener");

    TcpStream::connect(addr).expect("connect first client");
    TcpStream::connect(addr).expect("connect second client");

    assert!(wait_for_count(&count, 2), "expected two connections");
    handle.shutdown();
    handle.join().expect("join listener");
}

#[rstest]
fn join_releases_the_port(counting_fixture: CountingFixture) {
    let listener = SocketListener::bind("127.0.0.1", 0).expect("bind tcp listener");
    let port = listener.local_addr().port();
    let handle = listener
        .start(counting_fixture.handler)
        .expect("start listener");
    handle.shutdown();
    handle.join().expect("join listener");

    let rebound = SocketListener::bind("127.0.0.1", port).expect("rebind released port");
    assert_eq!(rebound.local_addr().port(), port);
}

#[rstest]
fn bind_reports_port_in_use() {
    let reserved = TcpListener::bind(("127.0.0.1", 0)).expect("reserve port");
    let port = reserved.local_addr().expect("reserved addr").port();

    let error = SocketListener::bind("127.0.0.1", port).expect_err("port should be taken");
    assert!(matches!(error, ListenerError::BindTcp { .. }));
    assert!(
        error.to_string().contains(&port.to_string()),
        "error should name the attempted address: {error}"
    );
}

#[rstest]
fn bind_reports_unresolvable_host() {
    let error = SocketListener::bind("host.invalid", 9123).expect_err("resolution should fail");
    assert!(matches!(
        error,
        ListenerError::Resolve { .. } | ListenerError::ResolveEmpty { .. }
    ));
}

#[rstest]
fn serve_keeps_accepting_after_errors(counting_fixture: CountingFixture) {
    let peer_listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind peer listener");
    let peer_addr = peer_listener.local_addr().expect("peer address");
    let shutdown = AtomicBool::new(false);
    let calls = Cell::new(0_usize);

    let accept = || {
        calls.set(calls.get() + 1);
        match calls.get() {
            1 | 2 => Err(io::Error::from(io::ErrorKind::ConnectionAborted)),
            3 => Err(io::Error::other("descriptor table full")),
            _ => {
                let _client = TcpStream::connect(peer_addr)?;
                let accepted = peer_listener.accept()?;
                shutdown.store(true, Ordering::SeqCst);
                Ok(Some(accepted))
            }
        }
    };
    serve(accept, &shutdown, &*counting_fixture.handler);

    assert_eq!(calls.get(), 4, "loop should retry after every error");
    assert_eq!(counting_fixture.count.load(Ordering::SeqCst), 1);
}

#[rstest]
fn repeated_accept_errors_are_reported_once_per_kind() {
    let aborted = || io::Error::from(io::ErrorKind::ConnectionAborted);
    let mut errors = AcceptErrors::default();

    assert!(errors.is_new(&aborted()));
    assert!(!errors.is_new(&aborted()));
    assert!(errors.is_new(&io::Error::other("descriptor table full")));
    assert!(errors.is_new(&aborted()));
    errors.clear();
    assert!(errors.is_new(&aborted()));
}

#[rstest]
fn idle_non_blocking_accept_yields_nothing() {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind listener");
    listener.set_nonblocking(true).expect("set non-blocking");
    let accepted = accept_connection(&listener).expect("would-block is not an error");
    assert!(accepted.is_none());
}
