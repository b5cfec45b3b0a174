use crate::error::UploadError;
use crate::models::Attachment;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::{Path, PathBuf};

/// Split the path entry field into individual paths.
pub fn parse_path_list(input: &str) -> Vec<PathBuf> {
    input.split_whitespace().map(PathBuf::from).collect()
}

/// Mime type from the file extension, the way a browser file picker reports it.
pub fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "py" => "text/x-python",
        "js" => "text/javascript",
        "rs" => "text/x-rust",
        "json" => "application/json",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

pub async fn read_attachment(path: &Path) -> Result<Attachment, UploadError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Attachment {
        mime_type: guess_mime(path).to_string(),
        data: STANDARD.encode(bytes),
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
    })
}

/// Read every file fully before returning; one failure fails the batch.
pub async fn read_attachments(paths: &[PathBuf]) -> Result<Vec<Attachment>, UploadError> {
    if paths.is_empty() {
        return Err(UploadError::NoFiles);
    }

    let mut attachments = Vec::with_capacity(paths.len());
    for path in paths {
        attachments.push(read_attachment(path).await?);
    }
    Ok(attachments)
}
