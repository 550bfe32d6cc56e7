pub mod auth;
pub mod logging;

pub use auth::access_gate;
pub use logging::simple_http_logging_middleware;
