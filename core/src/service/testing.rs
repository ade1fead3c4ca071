//! Scripted `HttpGateway` for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::gateway::{GatewayError, HttpGateway, HttpRequest, HttpResponse};

#[derive(Clone)]
enum Reply {
    Response { status: u16, body: String },
    Connect,
}

#[derive(Clone)]
struct Scripted {
    reply: Reply,
    delay: Option<Duration>,
}

#[derive(Default)]
struct State {
    queue: VecDeque<Scripted>,
    routes: Vec<(String, Scripted)>,
    requests: Vec<HttpRequest>,
}

/// Replies come from path routes first, then from the FIFO queue.
#[derive(Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<State>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, reply: Reply) -> Self {
        self.state.lock().unwrap().queue.push_back(Scripted { reply, delay: None });
        self
    }

    pub fn respond(self, status: u16, body: Value) -> Self {
        self.push(Reply::Response { status, body: body.to_string() })
    }

    pub fn respond_raw(self, status: u16, body: &str) -> Self {
        self.push(Reply::Response { status, body: body.to_string() })
    }

    pub fn fail_connect(self) -> Self {
        self.push(Reply::Connect)
    }

    pub fn route_after(self, delay: Duration, path: &str, status: u16, body: Value) -> Self {
        self.state.lock().unwrap().routes.push((
            path.to_string(),
            Scripted {
                reply: Reply::Response { status, body: body.to_string() },
                delay: Some(delay),
            },
        ));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn single_request(&self) -> HttpRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request, got {:?}", requests);
        requests.into_iter().next().unwrap()
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "",
    }
}

#[async_trait]
impl HttpGateway for MockGateway {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, GatewayError> {
        let url = format!("http://mock/gestao-tarefas{}", request.path);
        let scripted = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(request.clone());
            let routed = state
                .routes
                .iter()
                .find(|(path, _)| *path == request.path)
                .map(|(_, s)| s.clone());
            routed.or_else(|| state.queue.pop_front())
        };

        let scripted = scripted.unwrap_or(Scripted {
            reply: Reply::Response {
                status: 500,
                body: r#"{"message":"no scripted response"}"#.to_string(),
            },
            delay: None,
        });

        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }

        match scripted.reply {
            Reply::Response { status, body } => Ok(HttpResponse {
                url,
                status,
                status_text: status_text(status).to_string(),
                body,
            }),
            Reply::Connect => Err(GatewayError::Connect {
                url,
                message: "connection refused".to_string(),
            }),
        }
    }
}
