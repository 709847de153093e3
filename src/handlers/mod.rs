pub mod rest;

use axum::{Router, routing::get};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

use crate::service::NoteService;

/// Wildcards cannot be combined with credentials, so the request's own
/// origin, method and headers are echoed back instead.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn router(service: Arc<NoteService>) -> Router {
    Router::new()
        .route("/", get(rest::root))
        .route(
            "/notes",
            get(rest::get_all_notes).post(rest::create_note),
        )
        .route(
            "/notes/",
            get(rest::get_all_notes).post(rest::create_note),
        )
        .route(
            "/notes/{note_id}",
            get(rest::get_one_note)
                .put(rest::update_note)
                .delete(rest::delete_note),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", rest::ApiDoc::openapi()))
        .with_state(service)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}
