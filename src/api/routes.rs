use std::{path::Path, time::Duration};

use axum::{
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderValue, StatusCode,
    },
    middleware::from_fn_with_state,
    routing::{any, delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    services::ServeFile,
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;

use crate::state::AppState;

use super::{auth, handlers};

pub fn router(state: AppState, assets_dir: &Path) -> Router {
    let index = ServeFile::new(assets_dir.join("index.html"));

    Router::new()
        .route_service("/", index.clone())
        .route_service("/index.html", index)
        .route("/{*code}", any(handlers::handle_short_url))
        .merge(api_router(state.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .latency_unit(LatencyUnit::Millis)
                        .level(Level::DEBUG),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(CompressionLayer::new())
        .with_state(state)
}

fn api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            auth::LOGIN_PATH,
            post(handlers::login).fallback(handlers::unknown_route),
        )
        .route(
            "/api/links",
            get(handlers::list_links)
                .post(handlers::create_link)
                .fallback(handlers::unknown_route),
        )
        .route(
            "/api/links/",
            delete(handlers::delete_empty_code).fallback(handlers::unknown_route),
        )
        .route(
            "/api/links/{*code}",
            delete(handlers::delete_link).fallback(handlers::unknown_route),
        )
        .route("/api/", any(handlers::unknown_route))
        .route("/api/{*rest}", any(handlers::unknown_route))
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static("GET, POST, DELETE, OPTIONS"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static("Content-Type, Authorization"),
                ))
                .layer(from_fn_with_state(state, auth::api_gate)),
        )
}
