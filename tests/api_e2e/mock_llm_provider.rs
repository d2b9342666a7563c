//! Completion doubles for E2E tests.
//!
//! `ScriptedProvider` answers from a queue. `MockMessagesApi` is an
//! in-process HTTP server imitating the Anthropic Messages endpoint.

use std::collections::VecDeque;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, post, web};
use async_trait::async_trait;
use qa_scenario_lib::services::{CompletionError, CompletionProvider};
use serde_json::{Value, json};

/// Provider that returns queued answers in order.
pub struct ScriptedProvider {
    answers: Mutex<VecDeque<Result<String, CompletionError>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            answers: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(answers: impl IntoIterator<Item = String>) -> Self {
        let provider = Self::new();
        for answer in answers {
            provider.push(Ok(answer));
        }
        provider
    }

    pub fn push(&self, answer: Result<String, CompletionError>) {
        self.answers.lock().unwrap().push_back(answer);
    }

    /// (system, user) prompt pairs received so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(CompletionError::NoTextContent))
    }
}

/// What the mock Messages API saw and how it answers.
pub struct MockMessagesState {
    pub reply_status: u16,
    pub reply_body: Value,
    pub requests: Vec<RecordedRequest>,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub api_key: Option<String>,
    pub anthropic_version: Option<String>,
    pub body: Value,
}

fn header(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[post("/v1/messages")]
async fn messages_endpoint(
    req: HttpRequest,
    body: web::Json<Value>,
    state: web::Data<Arc<Mutex<MockMessagesState>>>,
) -> HttpResponse {
    let mut state = state.lock().unwrap();
    state.requests.push(RecordedRequest {
        api_key: header(&req, "x-api-key"),
        anthropic_version: header(&req, "anthropic-version"),
        body: body.into_inner(),
    });

    let status = actix_web::http::StatusCode::from_u16(state.reply_status)
        .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(state.reply_body.clone())
}

/// Mock Messages API on an ephemeral port.
pub struct MockMessagesApi {
    pub base_url: String,
    pub state: Arc<Mutex<MockMessagesState>>,
}

impl MockMessagesApi {
    /// Start a server that answers every request with a single text block.
    pub async fn start_with_text(text: &str) -> Self {
        Self::start(
            200,
            json!({
                "id": "msg_test",
                "type": "message",
                "role": "assistant",
                "content": [{ "type": "text", "text": text }]
            }),
        )
        .await
    }

    pub async fn start(reply_status: u16, reply_body: Value) -> Self {
        let state = Arc::new(Mutex::new(MockMessagesState {
            reply_status,
            reply_body,
            requests: Vec::new(),
        }));

        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let state_data = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(state_data.clone()))
                .service(messages_endpoint)
        })
        .workers(1)
        .listen(listener)
        .expect("failed to listen")
        .disable_signals()
        .run();

        // Fire and forget: the server lives for the process lifetime
        tokio::spawn(server);

        MockMessagesApi { base_url, state }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }
}
