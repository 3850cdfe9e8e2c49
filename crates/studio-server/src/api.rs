use axum::body::Body;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;

use studio_core::time::timestamp_now;
use studio_core::{ContactForm, Submission};

use crate::error::AppError;
use crate::state::AppState;

/// Acknowledgment returned for an accepted submission.
#[derive(Debug, Serialize)]
pub struct ContactAck {
    pub ok: bool,
}

/// POST /api/contact — validate a contact form and append it to the CSV file.
pub async fn submit_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Result<Json<ContactAck>, AppError> {
    let Json(form) = payload.inspect_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Rejected contact body");
    })?;

    let submission = Submission::from_form(form, timestamp_now()).inspect_err(|e| {
        tracing::debug!(reason = %e, "Contact submission failed validation");
    })?;

    state.store.append(&submission).await.map_err(|e| {
        tracing::error!(
            path = %state.store.path().display(),
            error = %e,
            "Failed to append contact submission"
        );
        AppError::Internal("Failed to write submission".to_string())
    })?;

    tracing::info!(
        name_len = submission.name.chars().count(),
        message_len = submission.message.chars().count(),
        "Recorded contact submission"
    );
    Ok(Json(ContactAck { ok: true }))
}

/// GET /api/contact/export — the submissions file as a CSV attachment.
pub async fn export_contact_csv(State(state): State<AppState>) -> Result<Response, AppError> {
    let (file, len) = state
        .store
        .open_export()
        .await
        .map_err(|e| {
            tracing::error!(
                path = %state.store.path().display(),
                error = %e,
                "Failed to open submissions file"
            );
            AppError::Internal("Failed to read submissions".to_string())
        })?
        .ok_or_else(|| AppError::NotFound("No submissions yet".to_string()))?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        state.config.storage.export_filename
    );
    let body = Body::from_stream(ReaderStream::new(file.take(len)));
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_LENGTH, len.to_string()),
        ],
        body,
    )
        .into_response())
}
