//! Axum request handlers for the HTTP API.
//!
//! No handler lets an error escape to the transport: failures become an
//! `{"error": "..."}` body. The status is 200 unless strict statuses are
//! enabled, since the existing frontend only inspects the body.
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{Instrument, Span};
use uuid::Uuid;

use crate::api::form::UploadForm;
use crate::api::routes::AppState;
use crate::catalog;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub async fn root() -> &'static str {
    "Fabric Mockup API"
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let available = state.catalog.is_available();
    Json(json!({
        "status": if available { "ok" } else { "degraded" },
        "catalog_available": available,
        "prompts_loaded": state.catalog.len(),
        "model": state.generator.model_name(),
    }))
}

/// `GET /prompts/`: `[{id, outfit}]` read fresh from disk.
pub async fn list_prompts(State(state): State<Arc<AppState>>) -> Response {
    match catalog::list_outfits(&state.prompts_csv).await {
        Ok(outfits) => Json(outfits).into_response(),
        Err(e) => {
            tracing::error!("Error reading prompts CSV for GET request: {}", e);
            error_response(&state, &e)
        }
    }
}

/// `POST /generate_mockup/`: `prompt_id` + `fabric_file` -> PNG.
pub async fn create_mockup(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let span = tracing::info_span!(
        "generate_mockup",
        request_id = %Uuid::new_v4(),
        prompt_id = tracing::field::Empty
    );
    async {
        match mockup(&state, multipart).await {
            Ok(png) => png_response(png),
            Err(e) => error_response(&state, &e),
        }
    }
    .instrument(span)
    .await
}

/// `POST /customer_try_on/`: `prompt_id` + `fabric_file` + `customer_file` -> PNG.
pub async fn create_customer_try_on(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let span = tracing::info_span!(
        "customer_try_on",
        request_id = %Uuid::new_v4(),
        prompt_id = tracing::field::Empty
    );
    async {
        match try_on(&state, multipart).await {
            Ok(png) => png_response(png),
            Err(e) => error_response(&state, &e),
        }
    }
    .instrument(span)
    .await
}

/// Read the form and tag the current span with its `prompt_id`.
async fn read_form(multipart: Result<Multipart, MultipartRejection>) -> AppResult<(UploadForm, String)> {
    let multipart = multipart.map_err(|rejection| AppError::InvalidForm(rejection.body_text()))?;
    let form = UploadForm::from_multipart(multipart).await?;
    let prompt_id = form.text("prompt_id")?;
    Span::current().record("prompt_id", tracing::field::display(&prompt_id));
    Ok((form, prompt_id))
}

async fn mockup(state: &AppState, multipart: Result<Multipart, MultipartRejection>) -> AppResult<Vec<u8>> {
    let (form, prompt_id) = read_form(multipart).await?;
    let fabric = form.file_any(&["fabric_file", "file"])?;
    tracing::info!("Received mockup request");

    let entry = state
        .catalog
        .lookup(&prompt_id)
        .ok_or_else(|| AppError::PromptNotFound(prompt_id.clone()))?;

    state.generator.generate_mockup(fabric, &entry.prompt).await
}

async fn try_on(state: &AppState, multipart: Result<Multipart, MultipartRejection>) -> AppResult<Vec<u8>> {
    let (form, prompt_id) = read_form(multipart).await?;
    let fabric = form.file("fabric_file")?;
    let customer = form.file("customer_file")?;
    tracing::info!("Received try-on request");

    let outfit_type = state
        .catalog
        .outfit_type(&prompt_id)
        .ok_or_else(|| AppError::PromptNotFound(prompt_id.clone()))?;
    let prompt = state.prompt_constructor.construct_prompt(outfit_type);

    state.generator.generate_try_on(fabric, customer, &prompt).await
}

fn png_response(png: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "image/png")], png).into_response()
}

/// Generic, client-facing message for an error. Details stay in the logs.
pub fn client_message(err: &AppError) -> String {
    match err {
        AppError::InvalidForm(msg) => msg.clone(),
        AppError::PromptNotFound(id) => format!("Prompt ID '{}' not found in prompts database.", id),
        AppError::SourceUnavailable(_) => "Could not load outfit list.".to_string(),
        _ => "Could not generate image".to_string(),
    }
}

pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::InvalidForm(_) => StatusCode::BAD_REQUEST,
        AppError::PromptNotFound(_) => StatusCode::NOT_FOUND,
        AppError::SourceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        e if e.is_generation_failure() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(state: &AppState, err: &AppError) -> Response {
    match err {
        AppError::InvalidForm(_) | AppError::PromptNotFound(_) => tracing::warn!("Rejected request: {}", err),
        _ => tracing::warn!("Request failed: {}", err),
    }
    let status = if state.strict_status { status_for(err) } else { StatusCode::OK };
    (status, Json(ErrorBody { error: client_message(err) })).into_response()
}
