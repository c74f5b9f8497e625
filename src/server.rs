//! HTTP transport for slash commands and chat.
//!
//! Uses axum to expose the same [`CommandRegistry`] the interactive loop
//! drives. Every request locks the shared session on a blocking worker, since
//! the registry, the stores and the backend client are all synchronous.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{debug, info, warn};

use crate::commands::{CommandRegistry, CommandResponse, CommandResult};
use crate::core::session::ChatSession;

/// Shared state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    session: Arc<Mutex<ChatSession>>,
    registry: Arc<CommandRegistry>,
}

impl AppState {
    pub fn new(session: Arc<Mutex<ChatSession>>, registry: Arc<CommandRegistry>) -> Self {
        Self { session, registry }
    }
}

type Reply = (StatusCode, Json<CommandResponse>);

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/syscmd", post(syscmd_handler))
        .route("/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Serve on `listen_addr` until Ctrl-C.
pub async fn serve(listen_addr: &str, state: AppState) -> Result<(), String> {
    let addr: SocketAddr = listen_addr
        .parse()
        .map_err(|e| format!("invalid listen address {listen_addr:?}: {e}"))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("failed to bind {addr}: {e}"))?;
    info!(addr = %addr, "starting HTTP server");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("HTTP server error: {e}"))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "cannot listen for Ctrl-C; serving until killed");
        std::future::pending::<()>().await;
    }
    info!("shutting down HTTP server");
}

/// Run `work` against the locked session on a blocking worker.
async fn with_session<T, F>(session: Arc<Mutex<ChatSession>>, work: F) -> Result<T, String>
where
    T: Send + 'static,
    F: FnOnce(&mut ChatSession) -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut session = session
            .lock()
            .map_err(|_| "chat session is unavailable".to_string())?;
        Ok(work(&mut *session))
    })
    .await
    .map_err(|e| format!("request worker failed: {e}"))?
}

fn failure(status: StatusCode, error: impl Into<String>) -> Reply {
    (status, Json(CommandResponse::failure(error)))
}

async fn syscmd_handler(State(state): State<AppState>, line: String) -> Reply {
    let registry = Arc::clone(&state.registry);
    let input = line.clone();
    let result = with_session(state.session, move |session| {
        registry.execute(session, &input)
    })
    .await;

    match result {
        Ok(CommandResult::NotACommand) => failure(
            StatusCode::BAD_REQUEST,
            format!("not a command: {}", line.trim()),
        ),
        Ok(CommandResult::Quit(response)) => {
            debug!("quit requested over HTTP; server keeps running");
            (StatusCode::OK, Json(response))
        }
        Ok(CommandResult::Reply(response)) => {
            let status = if response.success {
                StatusCode::OK
            } else {
                StatusCode::BAD_REQUEST
            };
            (status, Json(response))
        }
        Err(err) => failure(StatusCode::INTERNAL_SERVER_ERROR, err),
    }
}

async fn chat_handler(State(state): State<AppState>, message: String) -> Reply {
    let message = message.trim().to_string();
    if message.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "message is empty");
    }

    match with_session(state.session, move |session| session.chat(&message)).await {
        Ok(Ok(reply)) => (StatusCode::OK, Json(CommandResponse::ok(reply))),
        Ok(Err(err)) => {
            warn!(error = %err, "chat request failed");
            failure(StatusCode::BAD_GATEWAY, err.to_string())
        }
        Err(err) => failure(StatusCode::INTERNAL_SERVER_ERROR, err),
    }
}

async fn health_handler() -> Reply {
    (StatusCode::OK, Json(CommandResponse::ok("ok")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{AccessTier, ChatHost};
    use crate::utils::test_utils::{create_test_session, ScriptedBackend};
    use axum::body::Body;
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_state(temp_dir: &TempDir, backend: ScriptedBackend) -> AppState {
        let session = create_test_session(temp_dir.path(), backend);
        AppState::new(
            Arc::new(Mutex::new(session)),
            Arc::new(CommandRegistry::new(AccessTier::Beta)),
        )
    }

    async fn send(
        state: &AppState,
        method: &str,
        uri: &str,
        body: &str,
    ) -> (StatusCode, CommandResponse) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap();
        let res = router(state.clone()).oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn syscmd_maps_success_to_ok() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir, ScriptedBackend::new());

        let (status, response) = send(&state, "POST", "/syscmd", "/model set gpt-x").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.message, "Model set to gpt-x");
        assert_eq!(state.session.lock().unwrap().model(), "gpt-x");
    }

    #[tokio::test]
    async fn syscmd_maps_failures_to_bad_request() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir, ScriptedBackend::new());

        let (status, response) = send(&state, "POST", "/syscmd", "/bogus").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!response.success);
        assert!(response.error.unwrap().contains("bogus"));

        let (status, response) = send(&state, "POST", "/syscmd", "hello there").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.as_deref(), Some("not a command: hello there"));

        let (status, response) = send(&state, "POST", "/syscmd", " /model set gpt-x").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.as_deref(), Some("not a command: /model set gpt-x"));
        assert_eq!(state.session.lock().unwrap().model(), "test-model");
    }

    #[tokio::test]
    async fn quit_over_http_only_says_goodbye() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir, ScriptedBackend::new());

        let (status, response) = send(&state, "POST", "/syscmd", "/q").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.message, "Goodbye!");

        let (status, _) = send(&state, "GET", "/health", "").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn chat_returns_reply_and_records_history() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir, ScriptedBackend::new().reply("Hi there!"));

        let (status, response) = send(&state, "POST", "/chat", "Hello\n").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.message, "Hi there!");
        assert_eq!(state.session.lock().unwrap().history().len(), 3);
    }

    #[tokio::test]
    async fn chat_backend_failure_is_bad_gateway() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir, ScriptedBackend::new().fail("upstream down"));

        let (status, response) = send(&state, "POST", "/chat", "Hello").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(response.error.unwrap().contains("upstream down"));

        let (status, _) = send(&state, "POST", "/chat", "   ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
