//! Image Store
//!
//! 菜品图片的本地文件存储。文件位于 `IMAGE_DIR/{category}/{item}-{millis}.{ext}`，
//! 通过 `/images/...` 静态路由对外提供。

use std::io::Cursor;
use std::path::{Component, Path, PathBuf};

use image::ImageFormat;
use serde::Serialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::util::now_millis;
use tokio::fs;

use crate::core::ServiceResult;

/// Maximum file size (5MB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Supported file extensions
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Public route prefix the store is served under
pub const PUBLIC_PREFIX: &str = "/images";

/// Upload result
#[derive(Debug, Clone, Serialize)]
pub struct StoredImage {
    /// Path relative to the store root, `/` separated
    pub path: String,
    pub url: String,
    pub size: usize,
    pub content_type: String,
}

/// 图片存储服务
#[derive(Clone)]
pub struct ImageStore {
    root: PathBuf,
    /// `{APP_URL}/images`
    public_base: String,
}

impl ImageStore {
    /// 创建存储服务并确保根目录存在
    pub async fn new(root: &Path, app_url: &str) -> ServiceResult<Self> {
        fs::create_dir_all(root).await?;
        Ok(Self {
            root: root.to_path_buf(),
            public_base: format!("{}{}", app_url.trim_end_matches('/'), PUBLIC_PREFIX),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base, path.trim_start_matches('/'))
    }

    /// Relative path for a URL this store produced, `None` for foreign URLs
    pub fn path_from_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.public_base.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| !rest.is_empty())
    }

    /// Validate and store an uploaded image
    ///
    /// `file_name` supplies the extension; when missing, the sniffed format
    /// decides it.
    pub async fn save(
        &self,
        category: &str,
        item: &str,
        file_name: Option<&str>,
        data: &[u8],
    ) -> AppResult<StoredImage> {
        let ext = validate_image(data, file_name)?;
        let rel = generate_image_path(category, item, &ext, now_millis());
        let target = self.resolve(&rel)?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::storage(format!("Failed to create image dir: {e}")))?;
        }
        fs::write(&target, data)
            .await
            .map_err(|e| AppError::storage(format!("Failed to save image: {e}")))?;

        tracing::info!(path = %rel, size = data.len(), "Image uploaded");

        Ok(StoredImage {
            url: self.public_url(&rel),
            content_type: mime_guess::from_ext(&ext).first_or_octet_stream().to_string(),
            size: data.len(),
            path: rel,
        })
    }

    /// Remove one stored image
    pub async fn delete(&self, path: &str) -> AppResult<()> {
        let target = self.resolve(path)?;
        match fs::remove_file(&target).await {
            Ok(()) => {
                tracing::info!(path = %path, "Image deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::not_found(format!("Image {path}")))
            }
            Err(e) => Err(AppError::storage(format!("Failed to delete image: {e}"))),
        }
    }

    /// 删除菜品时清理其图片，失败只记录日志
    pub async fn delete_by_url(&self, url: &str) {
        let Some(path) = self.path_from_url(url) else {
            return;
        };
        if let Err(e) = self.delete(path).await {
            tracing::warn!(path = %path, error = %e, "Failed to delete menu item image");
        }
    }

    /// Join a relative path onto the root, rejecting traversal
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let rel = Path::new(path);
        let clean = !path.is_empty()
            && rel
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !clean {
            return Err(AppError::validation(format!("Invalid image path: {path}")));
        }
        Ok(self.root.join(rel))
    }
}

/// Lowercase, collapse runs of non `[a-z0-9]` into `-`
pub fn sanitize_segment(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_dash = false;
    for c in value.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    out
}

/// `{category}/{item}-{millis}.{ext}`
///
/// Names with no ASCII alphanumerics (e.g. 日本語のみ) fall back to `menu` / `item`.
pub fn generate_image_path(category: &str, item: &str, ext: &str, millis: i64) -> String {
    let category = sanitize_segment(category);
    let item = sanitize_segment(item);
    let category = if category.is_empty() { "menu".to_string() } else { category };
    let item = if item.is_empty() { "item".to_string() } else { item };
    format!("{category}/{item}-{millis}.{}", ext.to_lowercase())
}

/// Check size, extension and content; returns the extension to store under
pub fn validate_image(data: &[u8], file_name: Option<&str>) -> AppResult<String> {
    if data.is_empty() {
        return Err(AppError::validation("Empty file provided"));
    }
    if data.len() > MAX_IMAGE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::ImageTooLarge,
            format!(
                "File too large. Maximum size is {}MB",
                MAX_IMAGE_SIZE / 1024 / 1024
            ),
        )
        .with_detail("size", data.len())
        .with_detail("max_size", MAX_IMAGE_SIZE));
    }

    let format = image::guess_format(data).map_err(|_| unsupported("unknown"))?;
    let sniffed = match format {
        ImageFormat::Png => "png",
        ImageFormat::Jpeg => "jpg",
        ImageFormat::WebP => "webp",
        other => return Err(unsupported(&format!("{other:?}").to_lowercase())),
    };

    let ext = match file_name.and_then(|n| Path::new(n).extension()).and_then(|e| e.to_str()) {
        Some(ext) => {
            let ext = ext.to_lowercase();
            if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
                return Err(unsupported(&ext));
            }
            if ImageFormat::from_extension(&ext) != Some(format) {
                return Err(AppError::validation(format!(
                    "File extension '{ext}' does not match content ({sniffed})"
                )));
            }
            ext
        }
        None => sniffed.to_string(),
    };

    image::ImageReader::with_format(Cursor::new(data), format)
        .decode()
        .map_err(|e| AppError::validation(format!("Invalid image file ({ext}): {e}")))?;

    Ok(ext)
}

fn unsupported(ext: &str) -> AppError {
    AppError::with_message(
        ErrorCode::UnsupportedImageFormat,
        format!(
            "Unsupported file format '{ext}'. Supported: {}",
            SUPPORTED_EXTENSIONS.join(", ")
        ),
    )
}
