pub mod handlers;

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{from_fn, from_fn_with_state, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tracing::{info, warn};

use crate::auth::Authenticator;
use crate::config::Settings;
use crate::error::ApiError;
use crate::store::TenderStore;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub store: Arc<dyn TenderStore>,
    pub auth: Arc<dyn Authenticator>,
}

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/tenders", get(handlers::tenders))
        .route("/tender-text", get(handlers::tender_text))
        .route("/tender-emd", get(handlers::tender_emd))
        .route("/tender-extract-details", get(handlers::tender_extract_details))
        .route("/test-connection", get(handlers::test_connection))
        .route_layer(from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route("/", get(handlers::landing))
        .route("/health", get(handlers::health))
        .route("/public-test", get(handlers::public_test))
        .merge(protected)
        .layer(from_fn_with_state(state.clone(), cors_middleware))
        .layer(from_fn(access_log))
        .with_state(state)
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
}

async fn require_api_key(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    let presented = header_value(req.headers(), &state.settings.api_key_header);
    if !state.auth.authenticate(presented) {
        warn!(path = %req.uri().path(), key_present = presented.is_some(), "rejected api key");
        return ApiError::Unauthorized.into_response();
    }
    next.run(req).await
}

async fn cors_middleware(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    let mut resp = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };
    let headers = resp.headers_mut();
    if let Ok(origin) = HeaderValue::from_str(&state.settings.cors_origin) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    if let Ok(allowed) =
        HeaderValue::from_str(&format!("Content-Type, {}", state.settings.api_key_header))
    {
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, allowed);
    }
    resp
}

async fn access_log(req: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let resp = next.run(req).await;
    info!(
        method = %method,
        path = %path,
        status = resp.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    resp
}
