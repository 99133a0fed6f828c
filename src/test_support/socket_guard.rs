//! Lets wiremock-backed tests bow out on hosts that forbid loopback sockets.
//!
//! Sandboxed CI runners sometimes refuse to bind `127.0.0.1`. Tests call
//! [`start_mock_server_or_skip`] and return early on `None`. Setting
//! `HARVESTER_REQUIRE_SOCKET_TESTS=1` turns the skip into a panic.

use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

const STRICT_VAR: &str = "HARVESTER_REQUIRE_SOCKET_TESTS";

fn strict_mode() -> bool {
    std::env::var(STRICT_VAR).is_ok_and(|value| {
        ["1", "true", "yes"]
            .iter()
            .any(|accepted| value.eq_ignore_ascii_case(accepted))
    })
}

/// Returns a running mock server, or `None` when loopback binding is denied.
///
/// # Panics
///
/// Panics instead of skipping when `HARVESTER_REQUIRE_SOCKET_TESTS` is set.
#[track_caller]
pub fn start_mock_server_or_skip() -> impl Future<Output = Option<MockServer>> {
    let caller = Location::caller();
    let bindable = TcpListener::bind(("127.0.0.1", 0)).is_ok();
    if !bindable {
        let note = format!(
            "loopback bind refused for test at {}:{}",
            caller.file(),
            caller.line()
        );
        assert!(!strict_mode(), "{note} ({STRICT_VAR} is set)");
        eprintln!("{note}; skipping (set {STRICT_VAR}=1 to fail instead)");
    }
    async move {
        if bindable {
            Some(MockServer::start().await)
        } else {
            None
        }
    }
}
