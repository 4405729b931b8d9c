mod cors;

pub use cors::{CorsMiddlewareFactory, CorsMiddlewareService, CORS_ALLOWED_HEADERS};
