pub mod http;
pub mod traits;

// Re-export
pub use http::ReqwestGateway;
pub use traits::{GatewayError, HttpGateway, HttpRequest, HttpResponse, Method};
