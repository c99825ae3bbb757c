#![allow(dead_code)]

use hummingbird_rs::Hummingbird;
use tracing_subscriber::EnvFilter;
use url::Url;
use wiremock::MockServer;

#[macro_export]
macro_rules! assert_result {
    ($some:expr) => {
        assert!($some.is_ok(), "{}", $some.unwrap_err())
    };
}

/// Base url pointing to the root of `server`.
pub fn base_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}/", server.uri())).unwrap()
}

/// Anonymous client talking to `server`.
pub fn client(server: &MockServer) -> Hummingbird {
    init_tracing();
    Hummingbird::builder().base_url(base_url(server)).build()
}

/// Client talking to `server` with a cached authentication token.
pub fn client_with_token(server: &MockServer, token: &str) -> Hummingbird {
    init_tracing();
    Hummingbird::builder()
        .base_url(base_url(server))
        .login_with_token(token)
}

/// Url of a local port nothing listens on.
pub fn closed_port_url() -> Url {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap()
}

/// Show library logs with `RUST_LOG=hummingbird_rs=debug cargo test -- --nocapture`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
