use std::path::Path;

use reqwest::blocking::multipart::Form;
use tracing::info;

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::models::UploadResult;

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];
const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;

/// Local checks for a profile photo: exists, is an image, not too large.
pub fn check_photo(path: &Path) -> ClientResult<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ClientError::Upload(format!(
            "{} is not an image (allowed: {})",
            path.display(),
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }
    let meta = std::fs::metadata(path)
        .map_err(|e| ClientError::Upload(format!("cannot read {}: {e}", path.display())))?;
    if !meta.is_file() {
        return Err(ClientError::Upload(format!("{} is not a file", path.display())));
    }
    if meta.len() > MAX_PHOTO_BYTES {
        return Err(ClientError::Upload(format!(
            "{} is larger than {} MB",
            path.display(),
            MAX_PHOTO_BYTES / (1024 * 1024)
        )));
    }
    Ok(())
}

impl ApiClient {
    pub fn upload_profile_photo(&self, path: &Path) -> ClientResult<UploadResult> {
        check_photo(path)?;
        let form = Form::new()
            .file("photo", path)
            .map_err(|e| ClientError::Upload(format!("cannot attach {}: {e}", path.display())))?;
        let result: UploadResult = self
            .post_multipart("/api/upload/profile-photo", form)
            .map_err(|e| match e {
                ClientError::Http { .. } | ClientError::Network(_) => {
                    ClientError::Upload(e.user_message())
                }
                other => other,
            })?;
        info!("Uploaded {} -> {}", path.display(), result.url);
        Ok(result)
    }
}
