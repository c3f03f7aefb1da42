use std::env;

use actix_cors::Cors;
use actix_web::http::header;

/// Build CORS middleware.
/// - Origins come from CORS_ALLOWED_ORIGINS (comma-separated)
/// - With nothing valid configured any origin is accepted, the lobby has no credentials to protect
pub fn cors_middleware() -> Cors {
    let allowed_raw = env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default();
    let allowed_origins = parse_origins(&allowed_raw);

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if allowed_origins.is_empty() {
        cors = cors.allow_any_origin();
    } else {
        for origin in allowed_origins {
            cors = cors.allowed_origin(&origin);
        }
    }

    cors
}

/// Lightly validated origins; empty and "null" entries are ignored.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(|s| s.to_string())
        .collect()
}
