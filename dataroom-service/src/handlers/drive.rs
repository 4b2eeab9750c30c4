use crate::dtos::{DriveFileList, DriveListParams, FileResponse, ImportRequest, ImportResponse};
use crate::models::NewFile;
use crate::services::{record_import, storage_key_for};
use crate::startup::AppState;
use crate::utils::ValidatedJson;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use service_core::error::AppError;

pub async fn list_drive_files(
    State(state): State<AppState>,
    Query(params): Query<DriveListParams>,
) -> Result<Json<DriveFileList>, AppError> {
    let access_token = state.tokens.access_token().await?;

    let list = state
        .drive
        .list_files(
            &access_token,
            params.page_token.as_deref(),
            params.query.as_deref(),
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Error listing Drive files");
            AppError::from(e)
        })?;

    Ok(Json(list))
}

/// Copy one Drive file into the data room.
pub async fn import_file(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ImportRequest>,
) -> Result<Response, AppError> {
    let access_token = state.tokens.access_token().await?;

    if let Some(existing) = state.db.find_file_by_drive_id(&payload.file_id).await? {
        record_import("duplicate");
        return Ok(already_imported(existing.into()));
    }

    let downloaded = state
        .drive
        .download(
            &access_token,
            &payload.file_id,
            &payload.name,
            payload.mime_type.as_deref(),
        )
        .await
        .map_err(|e| {
            tracing::error!(file_id = %payload.file_id, error = %e, "Error downloading Drive file");
            record_import("failed");
            AppError::from(e)
        })?;

    let storage_key = storage_key_for(&payload.file_id, &downloaded.name);
    let byte_len = downloaded.bytes.len() as i64;
    state.storage.upload(&storage_key, downloaded.bytes).await?;

    let new_file = NewFile {
        name: downloaded.name,
        mime_type: downloaded.mime_type,
        size: payload.size.filter(|s| *s > 0).or(Some(byte_len)),
        google_drive_id: payload.file_id.clone(),
        storage_key,
    };

    let inserted = match state.db.insert_file(&new_file).await {
        Ok(inserted) => inserted,
        Err(e) => {
            record_import("failed");
            if let Err(cleanup) = state.storage.delete(&new_file.storage_key).await {
                tracing::warn!(
                    storage_key = %new_file.storage_key,
                    error = %cleanup,
                    "Failed to remove bytes of unrecorded import"
                );
            }
            return Err(e);
        }
    };

    // Lost a race with a concurrent import of the same file.
    let Some(stored) = inserted else {
        record_import("duplicate");
        let existing = state
            .db
            .find_file_by_drive_id(&payload.file_id)
            .await?
            .ok_or_else(|| AppError::Conflict(anyhow::anyhow!("File already imported")))?;
        if existing.storage_key != new_file.storage_key {
            state.storage.delete(&new_file.storage_key).await?;
        }
        return Ok(already_imported(existing.into()));
    };

    record_import("imported");
    tracing::info!(file_id = stored.id, name = %stored.name, "Imported file");

    Ok(Json(ImportResponse {
        success: true,
        file: stored.into(),
    })
    .into_response())
}

fn already_imported(file: FileResponse) -> Response {
    (
        StatusCode::CONFLICT,
        Json(json!({ "error": "File already imported", "file": file })),
    )
        .into_response()
}
