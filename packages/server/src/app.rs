use axum::http::{self, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([HeaderValue::from_static("http://localhost:3000")])
        .allow_methods([Method::GET])
        .allow_headers([http::header::CONTENT_TYPE]);

    routes::create_routes(state).layer(cors).layer(
        TraceLayer::new_for_http().make_span_with(|request: &http::Request<_>| {
            tracing::info_span!(
                "HTTP request",
                method = %request.method(),
                uri = %request.uri(),
            )
        }),
    )
}
