use crate::dtos::{FileListResponse, SearchParams, SuccessResponse};
use crate::startup::AppState;
use crate::utils::FileId;
use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

pub async fn list_files(State(state): State<AppState>) -> Result<Json<FileListResponse>, AppError> {
    let files = state.db.list_files().await?;
    Ok(Json(files.into()))
}

pub async fn search_files(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<FileListResponse>, AppError> {
    let files = state.db.search_files(&params.q).await?;
    Ok(Json(files.into()))
}

/// Serve the stored bytes for in-browser viewing.
pub async fn get_file(
    State(state): State<AppState>,
    FileId(id): FileId,
) -> Result<impl IntoResponse, AppError> {
    let file = state
        .db
        .find_file(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("File not found")))?;

    if !state.storage.exists(&file.storage_key).await {
        tracing::warn!(file_id = id, storage_key = %file.storage_key, "File bytes missing");
        return Err(AppError::NotFound(anyhow::anyhow!("File not found on disk")));
    }

    let data = state.storage.download(&file.storage_key).await?;
    let content_type = file
        .mime_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let disposition = format!(
        "inline; filename=\"{}\"",
        file.name.replace(['"', '\\', '\r', '\n'], "_")
    );

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    ))
}

/// Remove a file from the data room. Drive is never touched.
pub async fn delete_file(
    State(state): State<AppState>,
    FileId(id): FileId,
) -> Result<Json<SuccessResponse>, AppError> {
    let file = state
        .db
        .find_file(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("File not found")))?;

    state.storage.delete(&file.storage_key).await?;
    state.db.delete_file(file.id).await?;

    tracing::info!(file_id = id, name = %file.name, "Deleted file");
    Ok(Json(SuccessResponse::ok()))
}
