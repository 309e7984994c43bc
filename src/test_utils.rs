//! Test utilities and global setup
//!
//! Provides centralized test logging configuration and a stub HTTP endpoint
//! for exercising the forwarder without network access.

/// Test logging utilities
#[cfg(all(test, feature = "test-logging"))]
pub mod logging {
    use std::sync::Once;
    use tracing_subscriber::{EnvFilter, fmt};

    static INIT: Once = Once::new();

    /// Initialize test logging globally - safe to call multiple times
    ///
    /// Respects `RUST_LOG`, defaulting to debug for this crate and info for
    /// the HTTP stack.
    ///
    /// ```bash
    /// RUST_LOG=spectrum2_mcp_proxy=trace cargo test --features test-logging
    /// ```
    pub fn init() {
        INIT.call_once(|| {
            let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("debug,tokio=info,hyper=info,hyper_util=info,reqwest=info")
            });

            fmt()
                .with_env_filter(env_filter)
                .with_test_writer()
                .with_target(true)
                .with_thread_ids(true)
                .compact()
                .try_init()
                // Ignore errors if already initialized by another test module
                .ok();
        });
    }
}

/// Global test logging setup
///
/// Add `setup_test_logging!();` to a test module to initialize logging
/// before any of its tests run.
#[cfg(all(test, feature = "test-logging"))]
#[macro_export]
macro_rules! setup_test_logging {
    () => {
        #[ctor::ctor]
        fn init_test_logging() {
            $crate::test_utils::logging::init();
        }
    };
}

/// Local HTTP endpoint for forwarder tests
#[cfg(test)]
pub mod http {
    use axum::Router;
    use axum::extract::State;
    use axum::http::{HeaderMap, Method, Uri};
    use axum::response::{IntoResponse, Response};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    pub use axum::http::StatusCode;

    /// A request as seen by the stub endpoint
    #[derive(Debug, Clone)]
    pub struct CapturedRequest {
        pub method: Method,
        pub path: String,
        pub headers: HeaderMap,
        pub body: String,
    }

    impl CapturedRequest {
        /// Header value by case-insensitive name
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers.get(name).and_then(|value| value.to_str().ok())
        }
    }

    type Responder = dyn Fn(&CapturedRequest) -> Response + Send + Sync;

    #[derive(Clone)]
    struct StubState {
        requests: Arc<Mutex<Vec<CapturedRequest>>>,
        responder: Arc<Responder>,
    }

    /// Answers every request, on any path, with whatever a closure returns
    pub struct StubServer {
        url: String,
        requests: Arc<Mutex<Vec<CapturedRequest>>>,
    }

    impl StubServer {
        pub async fn start<F, R>(responder: F) -> Self
        where
            F: Fn(&CapturedRequest) -> R + Send + Sync + 'static,
            R: IntoResponse,
        {
            let responder: Arc<Responder> =
                Arc::new(move |request: &CapturedRequest| responder(request).into_response());
            let requests = Arc::new(Mutex::new(Vec::new()));
            let state = StubState {
                requests: Arc::clone(&requests),
                responder,
            };
            let app = Router::new().fallback(capture).with_state(state);

            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let url = format!("http://{}/", listener.local_addr().unwrap());
            tokio::spawn(async move {
                axum::serve(listener, app).await.expect("Stub server error");
            });

            Self { url, requests }
        }

        /// Server that always answers `status` with `body`
        pub async fn fixed(status: StatusCode, body: &str) -> Self {
            let body = body.to_string();
            Self::start(move |_| (status, body.clone())).await
        }

        pub fn url(&self) -> &str {
            &self.url
        }

        pub fn requests(&self) -> Vec<CapturedRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    /// Record the request before answering it
    async fn capture(
        State(state): State<StubState>,
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: String,
    ) -> Response {
        let request = CapturedRequest {
            method,
            path: uri.path().to_string(),
            headers,
            body,
        };

        let response = (state.responder)(&request);
        state.requests.lock().unwrap().push(request);
        response
    }

    /// URL of a local port with nothing listening on it
    pub async fn refused_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/")
    }
}
