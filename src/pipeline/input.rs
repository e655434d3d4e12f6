//! Input resolution for path-based requests.
//!
//! Uploaded multipart bytes arrive already in memory; the JSON
//! `image_path` alternative is resolved here instead. Existence is checked
//! before reading so a bad path surfaces as the client error the API
//! promises (`400 Image file not found`) rather than a generic I/O failure.

use crate::error::ExtractError;
use std::path::PathBuf;
use tracing::debug;

/// Read image bytes from a caller-supplied filesystem path.
///
/// Fails with [`ExtractError::FileNotFound`] when the path does not resolve
/// to a readable file. The bytes are not sniffed here — the normalizer's
/// decoder is the authority on whether they are a real image.
pub async fn read_image_path(path_str: &str) -> Result<Vec<u8>, ExtractError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(ExtractError::FileNotFound { path });
    }

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| ExtractError::FileNotFound { path: path.clone() })?;

    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn missing_path_is_file_not_found() {
        let err = read_image_path("/definitely/not/here.png").await.unwrap_err();
        assert!(matches!(err, ExtractError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn existing_file_round_trips_bytes() {
        let mut tmp = tempfile::NamedTempFile::new().expect("tempfile");
        tmp.write_all(b"\x89PNG\r\n\x1a\n").expect("write");
        let bytes = read_image_path(tmp.path().to_str().unwrap())
            .await
            .expect("read");
        assert_eq!(&bytes[..4], b"\x89PNG");
    }
}
