use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{web, Error as ActixError};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, error, info, warn};

use crate::ws::session::IdentityQuery;

/// Logs each HTTP request once, by kind:
/// - `/ws` upgrades as `ws_upgraded` / `ws_upgrade_rejected`, tagged with the
///   identity the client asked for
/// - `/health` probes at debug
/// - everything else as `request_completed`, levelled by status
pub struct StructuredLogger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestKind {
    Upgrade,
    Probe,
    Plain,
}

fn classify(path: &str) -> RequestKind {
    match path.trim_end_matches('/') {
        "/ws" => RequestKind::Upgrade,
        "/health" => RequestKind::Probe,
        _ => RequestKind::Plain,
    }
}

/// Identity from the upgrade query; `-` where the server will generate one.
fn requested_identity(query: &str) -> (String, String) {
    let identity = web::Query::<IdentityQuery>::from_query(query)
        .map(web::Query::into_inner)
        .unwrap_or_default();
    let pick = |v: Option<String>| {
        v.map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "-".to_string())
    };
    (pick(identity.user_id), pick(identity.session_id))
}

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let kind = classify(req.path());
        let method = req.method().to_string();
        let path = req.path().to_string();
        let identity = (kind == RequestKind::Upgrade).then(|| requested_identity(req.query_string()));

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            let duration_us = start.elapsed().as_micros() as u64;
            let status_code = status.as_u16();

            match (kind, identity) {
                (RequestKind::Upgrade, Some((user_id, session_id))) => {
                    if status == StatusCode::SWITCHING_PROTOCOLS {
                        info!(ws.user_id=%user_id, ws.session_id=%session_id, duration_us, "ws_upgraded");
                    } else {
                        warn!(ws.user_id=%user_id, ws.session_id=%session_id, http.status_code=%status_code, duration_us, "ws_upgrade_rejected");
                    }
                }
                (RequestKind::Probe, _) if status.is_success() => {
                    debug!(url.path=%path, http.status_code=%status_code, duration_us, "health_probe");
                }
                _ => {
                    if status.is_server_error() {
                        error!(http.method=%method, url.path=%path, http.status_code=%status_code, duration_us, "request_completed");
                    } else if status.is_client_error() {
                        warn!(http.method=%method, url.path=%path, http.status_code=%status_code, duration_us, "request_completed");
                    } else {
                        info!(http.method=%method, url.path=%path, http.status_code=%status_code, duration_us, "request_completed");
                    }
                }
            }

            result
        })
    }
}
