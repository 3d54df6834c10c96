//! Image API Handlers

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use shared::error::{AppError, ErrorCode};

use crate::core::{ServerState, ServiceResult};
use crate::services::StoredImage;
use crate::services::image_store::MAX_IMAGE_SIZE;

/// POST /api/images - 上传菜品图片
///
/// multipart 字段: `file` (必填), `category`, `item`
pub async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> ServiceResult<Json<StoredImage>> {
    let mut data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut category = String::new();
    let mut item = String::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        if e.status() == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
            AppError::with_message(
                ErrorCode::ImageTooLarge,
                format!("File too large. Maximum size is {}MB", MAX_IMAGE_SIZE / 1024 / 1024),
            )
        } else {
            AppError::validation(format!("Invalid multipart request: {e}"))
        }
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Failed to read file: {e}")))?;
                data = Some(bytes.to_vec());
            }
            "category" | "item" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Invalid field {name}: {e}")))?;
                if name == "category" {
                    category = text;
                } else {
                    item = text;
                }
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| {
        AppError::validation("No 'file' field found. Field name must be 'file'")
    })?;

    let stored = state
        .images
        .save(&category, &item, file_name.as_deref(), &data)
        .await?;
    Ok(Json(stored))
}

/// DELETE /api/images/{*path} - 删除图片
pub async fn delete(
    State(state): State<ServerState>,
    Path(path): Path<String>,
) -> ServiceResult<Json<bool>> {
    state.images.delete(path.trim_start_matches('/')).await?;
    Ok(Json(true))
}
