pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod state;

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

pub use api::create_router;
pub use error::ServerError;
pub use state::AppState;

/// Router with the transport layers applied: tracing, body limit and request timeout
pub fn create_app(state: Arc<AppState>) -> Router {
    let max_request_size = state.config.max_request_size;
    let timeout = state.config.request_timeout();

    create_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(timeout))
            .map_response(|res: http::Response<_>| res.map(axum::body::Body::new))
            .layer(RequestBodyLimitLayer::new(max_request_size)),
    )
}
