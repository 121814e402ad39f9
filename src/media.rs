//! Media upload to the backend's multipart endpoint.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use tracing::info;

use crate::backend::client::BackendClient;
use crate::{AppError, Result};

/// Upload local files and return their stored relative URLs.
///
/// The backend responds with one URL per file in upload order; that order
/// is preserved into the post's `media_urls`.
///
/// # Errors
///
/// Returns `AppError::Io` if a file cannot be read and `AppError::Api` if
/// the backend rejects the upload.
pub async fn upload_files(
    backend: &BackendClient,
    paths: &[impl AsRef<Path>],
) -> Result<Vec<String>> {
    let mut form = Form::new();
    for path in paths {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| AppError::Io(format!("cannot read {}: {err}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| AppError::Io(format!("no file name in {}", path.display())))?;
        form = form.part("media", Part::bytes(bytes).file_name(file_name));
    }

    let urls = backend.upload_media(form).await?;
    info!(count = urls.len(), "media uploaded");
    Ok(urls)
}
