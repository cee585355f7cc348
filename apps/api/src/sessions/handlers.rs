use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::selection::{Subject, UploadedFile};
use crate::sessions::models::{SessionView, TextRequest, UrlRequest, VariantRequest};
use crate::sessions::start_submission;
use crate::state::AppState;

/// File name offered for the tailored resume download.
pub const DOWNLOAD_FILE_NAME: &str = "Tailored_Resume.txt";
/// Multipart field carrying an uploaded resume or job description.
const FILE_FIELD: &str = "file";

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let view = state.sessions.create().await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state.sessions.view(id).await.ok_or_else(|| session_not_found(id))?;
    Ok(Json(view))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(id))
    }
}

/// PUT /api/v1/sessions/:id/inputs/:subject/variant
pub async fn handle_select_variant(
    State(state): State<AppState>,
    Path((id, subject)): Path<(Uuid, Subject)>,
    Json(req): Json<VariantRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .mutate(id, |c| c.form_mut().selection_mut(subject).select(req.variant))
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(view))
}

/// PUT /api/v1/sessions/:id/inputs/:subject/url
pub async fn handle_set_url(
    State(state): State<AppState>,
    Path((id, subject)): Path<(Uuid, Subject)>,
    Json(req): Json<UrlRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .mutate(id, |c| c.form_mut().selection_mut(subject).set_url(req.url))
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(view))
}

/// PUT /api/v1/sessions/:id/inputs/:subject/text
pub async fn handle_set_text(
    State(state): State<AppState>,
    Path((id, subject)): Path<(Uuid, Subject)>,
    Json(req): Json<TextRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .mutate(id, |c| c.form_mut().selection_mut(subject).set_text(req.text))
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/inputs/:subject/text/append
///
/// Clipboard paste: the browser reads the clipboard and sends the text here.
pub async fn handle_append_text(
    State(state): State<AppState>,
    Path((id, subject)): Path<(Uuid, Subject)>,
    Json(req): Json<TextRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .mutate(id, |c| c.form_mut().selection_mut(subject).append_text(&req.text))
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(view))
}

/// PUT /api/v1/sessions/:id/inputs/:subject/file
///
/// Multipart body with a single `file` field.
pub async fn handle_upload_file(
    State(state): State<AppState>,
    Path((id, subject)): Path<(Uuid, Subject)>,
    mut multipart: Multipart,
) -> Result<Json<SessionView>, AppError> {
    let file = read_file_field(&mut multipart).await?;
    tracing::debug!(
        "Session {id}: {} {} ({} bytes)",
        subject.field_prefix(),
        file.file_name,
        file.size_bytes()
    );
    let view = state
        .sessions
        .mutate(id, |c| c.form_mut().selection_mut(subject).attach_file(file))
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(view))
}

/// DELETE /api/v1/sessions/:id/inputs/:subject/file
pub async fn handle_remove_file(
    State(state): State<AppState>,
    Path((id, subject)): Path<(Uuid, Subject)>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .mutate(id, |c| c.form_mut().selection_mut(subject).remove_file())
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/submit
///
/// Starts tailoring in the background and answers immediately with the busy
/// session. Poll `GET /api/v1/sessions/:id` for the result.
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let (view, _task) = start_submission(&state.sessions, state.processor.clone(), id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok((StatusCode::ACCEPTED, Json(view)))
}

/// GET /api/v1/sessions/:id/download
pub async fn handle_download(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let view = state.sessions.view(id).await.ok_or_else(|| session_not_found(id))?;
    let text = view
        .result
        .ok_or_else(|| AppError::Conflict("No tailored resume to download yet".to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOWNLOAD_FILE_NAME}\""),
            ),
        ],
        text,
    ))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(String::from)
            .ok_or_else(|| AppError::Validation("Uploaded file has no file name".to_string()))?;
        let content_type = field.content_type().map(String::from);
        let bytes = field.bytes().await?;
        return Ok(UploadedFile::new(file_name, content_type, bytes)?);
    }
    Err(AppError::Validation(format!(
        "Multipart body has no '{FILE_FIELD}' field"
    )))
}
