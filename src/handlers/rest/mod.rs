mod extract;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use utoipa::OpenApi;

use std::sync::Arc;

use extract::{JsonBody, PathParam};

use crate::{
    dto::{CreateNoteRequest, ErrorResponse, MessageResponse, NoteResponse, UpdateNoteRequest},
    repository::RepositoryError,
    service::NoteService,
};

const NOT_FOUND: &str = "Note not found";

#[derive(OpenApi)]
#[openapi(
    paths(
        root,
        get_all_notes,
        create_note,
        get_one_note,
        update_note,
        delete_note
    ),
    components(schemas(
        NoteResponse,
        CreateNoteRequest,
        UpdateNoteRequest,
        MessageResponse,
        ErrorResponse
    )),
    tags(
        (name = "notes", description = "Notes management API")
    )
)]
pub struct ApiDoc;

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new(NOT_FOUND))).into_response()
}

fn internal_error(err: &RepositoryError, context: &str) -> Response {
    tracing::error!("{context}: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Internal server error")),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is up", body = MessageResponse)
    )
)]
#[debug_handler]
pub async fn root() -> Response {
    (StatusCode::OK, Json(MessageResponse::new("Welcome to Notes++!"))).into_response()
}

#[utoipa::path(
    get,
    path = "/notes/",
    responses(
        (status = 200, description = "List of all notes", body = Vec<NoteResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(State(service): State<Arc<NoteService>>) -> Response {
    match service.get_all_notes().await {
        Ok(notes) => (StatusCode::OK, Json(notes)).into_response(),
        Err(e) => internal_error(&e, "failed to get note entries"),
    }
}

#[utoipa::path(
    post,
    path = "/notes/",
    request_body = CreateNoteRequest,
    responses(
        (status = 200, description = "Note created successfully", body = NoteResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    JsonBody(payload): JsonBody<CreateNoteRequest>,
) -> Response {
    match service.create_note(payload).await {
        Ok(note) => {
            tracing::debug!("created note {}", note.id);
            (StatusCode::OK, Json(note)).into_response()
        }
        Err(e) => internal_error(&e, "failed to create note entry"),
    }
}

#[utoipa::path(
    get,
    path = "/notes/{note_id}",
    params(
        ("note_id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_one_note(
    State(service): State<Arc<NoteService>>,
    PathParam(note_id): PathParam<i64>,
) -> Response {
    match service.get_one_note(note_id).await {
        Ok(Some(note)) => (StatusCode::OK, Json(note)).into_response(),
        Ok(None) => not_found(),
        Err(e) => internal_error(&e, "failed to get note entry"),
    }
}

#[utoipa::path(
    put,
    path = "/notes/{note_id}",
    params(
        ("note_id" = i64, Path, description = "Note ID")
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated successfully", body = NoteResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    PathParam(note_id): PathParam<i64>,
    JsonBody(payload): JsonBody<UpdateNoteRequest>,
) -> Response {
    match service.update_note(note_id, payload).await {
        Ok(Some(note)) => (StatusCode::OK, Json(note)).into_response(),
        Ok(None) => not_found(),
        Err(e) => internal_error(&e, "failed to update note entry"),
    }
}

#[utoipa::path(
    delete,
    path = "/notes/{note_id}",
    params(
        ("note_id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted successfully", body = MessageResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    PathParam(note_id): PathParam<i64>,
) -> Response {
    match service.delete_note(note_id).await {
        Ok(true) => (StatusCode::OK, Json(MessageResponse::new("Note deleted"))).into_response(),
        Ok(false) => not_found(),
        Err(e) => internal_error(&e, "failed to delete note entry"),
    }
}
