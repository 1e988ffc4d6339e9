//! Disk-backed avatar object store.
//!
//! Uploaded images land in the configured avatar directory under a
//! timestamp-derived file name; the profile row keeps only that file name
//! and the download route serves it back with the matching content type.

use crate::error::AppError;
use chrono::Utc;
use std::path::Path;

/// Map an upload content type to the stored file extension.
///
/// Only image types are accepted.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpeg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Content type served for a stored file, derived from its extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    match file_name.rsplit('.').next() {
        Some("jpeg") | Some("jpg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Reject file names that could escape the avatar directory.
///
/// Stored names are always `<millis>.<ext>`, so anything with path
/// separators or dot-dot segments is simply not one of ours.
fn validate_file_name(file_name: &str) -> Result<(), AppError> {
    let legal = !file_name.is_empty()
        && !file_name.contains(['/', '\\'])
        && !file_name.contains("..");

    if legal {
        Ok(())
    } else {
        Err(AppError::AvatarNotFound)
    }
}

/// Store an uploaded avatar image.
///
/// Returns the generated file name to record on the profile.
///
/// # Errors
///
/// - `InvalidRequest`: the content type is not a supported image type
/// - `Storage`: the directory or file could not be written
pub async fn save_avatar(
    avatar_dir: &str,
    content_type: &str,
    bytes: &[u8],
) -> Result<String, AppError> {
    let ext = extension_for(content_type).ok_or_else(|| {
        AppError::InvalidRequest(format!("Unsupported image content type: {content_type}"))
    })?;

    tokio::fs::create_dir_all(avatar_dir).await?;

    let file_name = format!("{}.{}", Utc::now().timestamp_millis(), ext);
    tokio::fs::write(Path::new(avatar_dir).join(&file_name), bytes).await?;

    Ok(file_name)
}

/// Load a stored avatar image.
///
/// # Errors
///
/// - `AvatarNotFound`: the name is invalid or no such file exists
/// - `Storage`: any other filesystem error
pub async fn load_avatar(
    avatar_dir: &str,
    file_name: &str,
) -> Result<(Vec<u8>, &'static str), AppError> {
    validate_file_name(file_name)?;

    let bytes = tokio::fs::read(Path::new(avatar_dir).join(file_name))
        .await
        .map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                AppError::AvatarNotFound
            } else {
                AppError::Storage(err)
            }
        })?;

    Ok((bytes, content_type_for(file_name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_image_types_get_extensions() {
        assert_eq!(extension_for("image/png"), Some("png"));
        assert_eq!(extension_for("image/jpeg"), Some("jpeg"));
        assert_eq!(extension_for("text/plain"), None);
        assert_eq!(extension_for("application/pdf"), None);
    }

    #[test]
    fn content_type_derives_from_extension() {
        assert_eq!(content_type_for("1717200000000.png"), "image/png");
        assert_eq!(content_type_for("1717200000000.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("weird"), "application/octet-stream");
    }

    #[test]
    fn traversal_names_are_rejected() {
        assert!(validate_file_name("../secret.png").is_err());
        assert!(validate_file_name("a/b.png").is_err());
        assert!(validate_file_name("a\\b.png").is_err());
        assert!(validate_file_name("").is_err());
        assert!(validate_file_name("1717200000000.png").is_ok());
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let dir = std::env::temp_dir().join("keyhub-avatar-test");
        let dir = dir.to_string_lossy();

        let name = save_avatar(&dir, "image/png", b"not-really-a-png")
            .await
            .unwrap();
        let (bytes, content_type) = load_avatar(&dir, &name).await.unwrap();

        assert_eq!(bytes, b"not-really-a-png");
        assert_eq!(content_type, "image/png");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = std::env::temp_dir().join("keyhub-avatar-test");
        let result = load_avatar(&dir.to_string_lossy(), "0.png").await;
        assert!(matches!(result, Err(AppError::AvatarNotFound)));
    }
}
