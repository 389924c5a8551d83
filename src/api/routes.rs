//! Shared state and router construction.
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::handlers;
use crate::catalog::PromptCatalog;
use crate::gemini::MockupGenerator;
use crate::prompt::constructor::PromptConstructor;

pub struct AppState {
    /// Loaded once at startup, read-only afterwards.
    pub catalog: Arc<PromptCatalog>,
    pub generator: MockupGenerator,
    pub prompt_constructor: PromptConstructor,
    /// `GET /prompts/` re-reads this file on every call.
    pub prompts_csv: PathBuf,
    pub strict_status: bool,
}

/// Every origin, method and header is allowed, with credentials. Origins and
/// headers are mirrored since a literal `*` cannot be combined with credentials.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn create_app(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/prompts", get(handlers::list_prompts))
        .route("/prompts/", get(handlers::list_prompts))
        .route("/generate_mockup/", post(handlers::create_mockup))
        .route("/customer_try_on/", post(handlers::create_customer_try_on))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer())
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(state)
}
