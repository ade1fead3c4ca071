use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::error;

use crate::error::ApiError;
use crate::gateway::{GatewayError, HttpResponse};

const NO_BACKEND_DETAILS: &str = "No additional details from backend.";

/// Turns gateway failures and non-2xx responses into `ApiError`, tagging each
/// message with the name of the service that issued the request.
#[derive(Debug, Clone, Copy)]
pub struct ErrorTranslator {
    service: &'static str,
}

impl ErrorTranslator {
    pub fn new(service: &'static str) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn transport(&self, err: GatewayError) -> ApiError {
        let translated = match err {
            GatewayError::Connect { url, .. } => ApiError::Network {
                message: format!(
                    "[NETWORK_ERROR - {}] Could not connect. URL: {}. \
                     Is backend running & proxy configured?",
                    self.service, url
                ),
                url,
            },
            GatewayError::Request { url, message } => ApiError::Client {
                message: format!("[CLIENT_ERROR - {}] {} (URL: {})", self.service, message, url),
            },
        };
        self.report(translated)
    }

    /// Passes 2xx JSON responses through; everything else becomes an error.
    pub fn check(&self, response: HttpResponse) -> Result<HttpResponse, ApiError> {
        if looks_like_html(&response.body) {
            return Err(self.report(ApiError::ProxyMisconfiguration {
                message: format!(
                    "[PROXY_ERROR - {}] Server returned HTML, not JSON. \
                     Proxy issue or wrong API endpoint? Code: {}. URL: {}",
                    self.service, response.status, response.url
                ),
                url: response.url,
                status: response.status,
            }));
        }
        if response.is_success() {
            return Ok(response);
        }
        let backend = backend_message(&response.body);
        Err(self.server_error(response, backend))
    }

    pub fn decode<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        let response = self.check(response)?;
        if response.body.trim().is_empty() {
            let backend = "Response body was empty, expected JSON.".to_string();
            return Err(self.server_error(response, backend));
        }
        match serde_json::from_str(&response.body) {
            Ok(value) => Ok(value),
            Err(e) => {
                let backend = format!("Unparseable response body: {}", e);
                Err(self.server_error(response, backend))
            }
        }
    }

    fn server_error(&self, response: HttpResponse, backend: String) -> ApiError {
        self.report(ApiError::Server {
            message: format!(
                "[SERVER_ERROR - {}] Code: {}. StatusText: {}. URL: {}. Backend: {}",
                self.service, response.status, response.status_text, response.url, backend
            ),
            url: response.url,
            status: response.status,
            status_text: response.status_text,
            backend,
        })
    }

    fn report(&self, err: ApiError) -> ApiError {
        error!(service = self.service, "{}", err);
        err
    }
}

/// True for bodies that are an HTML page, typically a dev server or proxy fallback.
pub fn looks_like_html(body: &str) -> bool {
    let head = body.trim_start().to_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html")
}

/// Best-effort extraction of the backend's own error description.
pub fn backend_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return NO_BACKEND_DETAILS.to_string();
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        Err(_) => return trimmed.to_string(),
    };

    match &value {
        Value::String(s) => s.clone(),
        Value::Object(map) => {
            if let Some(message) = map.get("message").and_then(non_empty_text) {
                return message;
            }
            if let Some(error) = map.get("error").and_then(non_empty_text) {
                return match map.get("path").and_then(non_empty_text) {
                    Some(path) => format!("{} on path {}", error, path),
                    None => error,
                };
            }
            value.to_string()
        }
        Value::Null => NO_BACKEND_DETAILS.to_string(),
        other => other.to_string(),
    }
}

fn non_empty_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Task;

    fn response(status: u16, status_text: &str, body: &str) -> HttpResponse {
        HttpResponse {
            url: "http://localhost:8080/gestao-tarefas/5".to_string(),
            status,
            status_text: status_text.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_backend_message_shapes() {
        assert_eq!(backend_message(""), NO_BACKEND_DETAILS);
        assert_eq!(backend_message(r#"{"message":"Task not found"}"#), "Task not found");
        assert_eq!(
            backend_message(r#"{"error":"Not Found","path":"/gestao-tarefas/5"}"#),
            "Not Found on path /gestao-tarefas/5"
        );
        assert_eq!(backend_message(r#"{"error":"Bad Request"}"#), "Bad Request");
        assert_eq!(backend_message(r#""plain json string""#), "plain json string");
        assert_eq!(backend_message("something broke"), "something broke");
        assert_eq!(backend_message(r#"{"code":42}"#), r#"{"code":42}"#);
        // Empty message falls through to the error field.
        assert_eq!(
            backend_message(r#"{"message":"","error":"Conflict"}"#),
            "Conflict"
        );
    }

    #[test]
    fn test_html_detection() {
        assert!(looks_like_html("<!DOCTYPE html><html></html>"));
        assert!(looks_like_html("  \n<html lang=\"\"><body></body></html>"));
        assert!(!looks_like_html(r#"{"message":"<html>"}"#));
        assert!(!looks_like_html(""));
    }

    #[test]
    fn test_server_error_message() {
        let translator = ErrorTranslator::new("TaskDirectory");
        let err = translator
            .check(response(404, "Not Found", r#"{"message":"Task 5 not found"}"#))
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "[SERVER_ERROR - TaskDirectory] Code: 404. StatusText: Not Found. \
             URL: http://localhost:8080/gestao-tarefas/5. Backend: Task 5 not found"
        );
    }

    #[test]
    fn test_html_is_proxy_error_for_any_status() {
        let translator = ErrorTranslator::new("TaskDirectory");

        let err = translator
            .check(response(200, "OK", "<!doctype html><html></html>"))
            .unwrap_err();
        assert!(matches!(err, ApiError::ProxyMisconfiguration { status: 200, .. }));

        let err = translator
            .check(response(502, "Bad Gateway", "<html lang=\"\"></html>"))
            .unwrap_err();
        assert!(matches!(err, ApiError::ProxyMisconfiguration { status: 502, .. }));
        assert!(err.to_string().starts_with("[PROXY_ERROR - TaskDirectory]"));
    }

    #[test]
    fn test_transport_errors() {
        let translator = ErrorTranslator::new("TaskListDirectory");

        let err = translator.transport(GatewayError::Connect {
            url: "http://localhost:8080/gestao-tarefas/lists".to_string(),
            message: "connection refused".to_string(),
        });
        assert!(matches!(err, ApiError::Network { .. }));
        assert!(err
            .to_string()
            .starts_with("[NETWORK_ERROR - TaskListDirectory] Could not connect."));

        let err = translator.transport(GatewayError::Request {
            url: "bad".to_string(),
            message: "relative URL without a base".to_string(),
        });
        assert!(matches!(err, ApiError::Client { .. }));
    }

    #[test]
    fn test_decode_failures_are_server_errors() {
        let translator = ErrorTranslator::new("TaskDirectory");

        let err = translator
            .decode::<Task>(response(200, "OK", r#"{"unexpected":true}"#))
            .unwrap_err();
        match err {
            ApiError::Server { status, backend, .. } => {
                assert_eq!(status, 200);
                assert!(backend.starts_with("Unparseable response body"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = translator.decode::<Task>(response(201, "Created", "")).unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 201, .. }));
    }

    #[test]
    fn test_decode_success() {
        let translator = ErrorTranslator::new("TaskDirectory");
        let task: Task = translator
            .decode(response(
                200,
                "OK",
                r#"{"id":5,"description":"Buy milk","priority":1,
                    "status":"PENDENTE","responsible":"Alice"}"#,
            ))
            .unwrap();
        assert_eq!(task.id, Some(5));
    }
}
