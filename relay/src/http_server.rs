use crate::prompt::build_request;
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use neura_core::config::PersonaConfig;
use neura_core::errors::GeminiError;
use neura_core::model::LanguageModelRef;
use neura_ipc::{
    ChatReply, ChatRequest, ErrorBody, CHAT_PATH, ERROR_MESSAGE_REQUIRED,
    ERROR_METHOD_NOT_ALLOWED, ERROR_PROCESSING_FAILED,
};
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info};

/// Application state shared with all routes
#[derive(Clone)]
pub struct AppState {
    persona: Arc<PersonaConfig>,
    model: LanguageModelRef,
}

impl AppState {
    pub fn new(persona: PersonaConfig, model: LanguageModelRef) -> Self {
        Self {
            persona: Arc::new(persona),
            model,
        }
    }
}

/// Error type for the chat route
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("method {0} is not allowed")]
    MethodNotAllowed(Method),
    #[error("request carried no message")]
    MissingMessage,
    #[error("model call failed: {0}")]
    Upstream(#[from] GeminiError),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::MethodNotAllowed(_) => (StatusCode::METHOD_NOT_ALLOWED, ERROR_METHOD_NOT_ALLOWED),
            Self::MissingMessage => (StatusCode::BAD_REQUEST, ERROR_MESSAGE_REQUIRED),
            Self::Upstream(e) => {
                error!(error = %e, "Error in chat API");
                (StatusCode::INTERNAL_SERVER_ERROR, ERROR_PROCESSING_FAILED)
            }
        };
        (status, Json(ErrorBody::new(message))).into_response()
    }
}

/// Builds the relay router
pub fn router(state: AppState) -> Router {
    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route(CHAT_PATH, any(handle_chat))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on `addr`
pub async fn run_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;
    serve(listener, state).await
}

/// Serve the relay on an already bound listener
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    info!("Starting HTTP server on {}", listener.local_addr()?);

    axum::Server::from_tcp(listener)?
        .serve(router(state).into_make_service())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start HTTP server: {}", e))
}

/// Health check handler
async fn health() -> impl IntoResponse {
    "Neura relay is running"
}

/// Handler for chat turns.
///
/// The body is taken raw so that a wrong method is reported before any
/// attempt to parse it, and so that every malformed body maps to the same 400.
async fn handle_chat(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Json<ChatReply>, RelayError> {
    if method != Method::POST {
        return Err(RelayError::MethodNotAllowed(method));
    }

    let request: ChatRequest =
        serde_json::from_slice(&body).map_err(|_| RelayError::MissingMessage)?;
    if request.message.is_empty() {
        return Err(RelayError::MissingMessage);
    }

    debug!(
        message_len = request.message.len(),
        history = request.history.len(),
        "Relaying chat message"
    );

    let model_request = build_request(&state.persona, &request.history, &request.message);
    let reply = state.model.generate(model_request).await?;

    Ok(Json(ChatReply { reply }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use neura_core::errors::GeminiResult;
    use neura_core::types::GenerateContentRequest;
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Replies with the last user text and remembers what it was sent
    #[derive(Debug, Default)]
    struct EchoModel {
        seen: Mutex<Vec<GenerateContentRequest>>,
    }

    #[async_trait]
    impl neura_core::LanguageModel for EchoModel {
        async fn generate(&self, request: GenerateContentRequest) -> GeminiResult<String> {
            let last = request
                .contents
                .last()
                .and_then(|c| c.parts[0].text.clone())
                .unwrap_or_default();
            self.seen.lock().unwrap().push(request);
            Ok(format!("echo: {}", last))
        }
    }

    #[derive(Debug)]
    struct FailingModel;

    #[async_trait]
    impl neura_core::LanguageModel for FailingModel {
        async fn generate(&self, _request: GenerateContentRequest) -> GeminiResult<String> {
            Err(GeminiError::HttpError {
                status_code: 503,
                message: "model overloaded".to_string(),
            })
        }
    }

    fn echo_app() -> (Router, Arc<EchoModel>) {
        let model = Arc::new(EchoModel::default());
        let app = router(AppState::new(PersonaConfig::default(), model.clone()));
        (app, model)
    }

    fn chat_request(method: Method, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(CHAT_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_post_returns_reply() {
        let (app, model) = echo_app();
        let (status, body) = send(app, chat_request(Method::POST, r#"{"message":"hello"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "reply": "echo: hello" }));

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].contents.len(), 3);
        assert!(seen[0].system_instruction.is_some());
    }

    #[tokio::test]
    async fn test_missing_message_is_bad_request() {
        let (app, model) = echo_app();
        let (status, body) = send(app, chat_request(Method::POST, "{}")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Message is required" }));
        assert!(model.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_or_malformed_message_is_bad_request() {
        for body in [r#"{"message":""}"#, r#"{"message":7}"#, "not json", ""] {
            let (app, _) = echo_app();
            let (status, response) = send(app, chat_request(Method::POST, body)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(response["error"], "Message is required");
        }
    }

    #[tokio::test]
    async fn test_get_is_method_not_allowed() {
        let (app, model) = echo_app();
        let request = Request::builder()
            .method(Method::GET)
            .uri(CHAT_PATH)
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "error": "Method not allowed" }));
        assert!(model.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_method_wins_over_bad_body() {
        let (app, _) = echo_app();
        let (status, _) = send(app, chat_request(Method::PUT, "{}")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_generic_500() {
        let app = router(AppState::new(PersonaConfig::default(), Arc::new(FailingModel)));
        let (status, body) = send(app, chat_request(Method::POST, r#"{"message":"hello"}"#)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to process your message" }));
    }

    #[tokio::test]
    async fn test_history_is_replayed() {
        let (app, model) = echo_app();
        let body = json!({
            "message": "and today?",
            "history": [
                { "role": "user", "content": "yesterday was rough" },
                { "role": "assistant", "content": "I'm sorry to hear that" }
            ]
        })
        .to_string();
        let (status, _) = send(app, chat_request(Method::POST, &body)).await;

        assert_eq!(status, StatusCode::OK);
        let seen = model.seen.lock().unwrap();
        assert_eq!(seen[0].contents.len(), 5);
        assert_eq!(seen[0].contents[3].role.as_deref(), Some("model"));
    }

    #[tokio::test]
    async fn test_requests_do_not_share_state() {
        let (app, model) = echo_app();
        let first = send(app.clone(), chat_request(Method::POST, r#"{"message":"first"}"#)).await;
        let second = send(app, chat_request(Method::POST, r#"{"message":"second"}"#)).await;

        assert_eq!(first.1["reply"], "echo: first");
        assert_eq!(second.1["reply"], "echo: second");

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen[0].contents.len(), seen[1].contents.len());
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = echo_app();
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert_eq!(&bytes[..], b"Neura relay is running");
    }
}
