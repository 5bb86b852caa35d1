//! Input resolution: turn a user-supplied path or URL into PDF bytes.
//!
//! pdfium loads documents straight from a byte slice, so local files are read
//! into memory and URLs are downloaded into memory; nothing touches a temp
//! directory. The `%PDF` magic is checked before returning so callers get a
//! meaningful error rather than a pdfium failure.

use crate::error::ExtractError;
use std::path::PathBuf;
use tracing::{debug, info};

/// A PDF loaded into memory, with a human-readable name for error messages.
#[derive(Debug, Clone)]
pub struct ResolvedInput {
    pub source_name: String,
    pub bytes: Vec<u8>,
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to PDF bytes.
///
/// URLs are downloaded; anything else is treated as a local path.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput, ExtractError> {
    if input.trim().is_empty() {
        return Err(ExtractError::InvalidInput {
            input: input.to_string(),
        });
    }
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input).await
    }
}

/// Verify that `bytes` start with the PDF magic.
pub fn check_pdf_magic(source_name: &str, bytes: &[u8]) -> Result<(), ExtractError> {
    if bytes.starts_with(b"%PDF") {
        return Ok(());
    }
    Err(ExtractError::NotAPdf {
        source_name: source_name.to_string(),
        magic: bytes.iter().take(4).copied().collect(),
    })
}

/// Read a local file, validating existence and PDF magic bytes.
async fn resolve_local(path_str: &str) -> Result<ResolvedInput, ExtractError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(ExtractError::FileNotFound { path });
    }

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ExtractError::PermissionDenied { path });
        }
        Err(_) => return Err(ExtractError::FileNotFound { path }),
    };

    let source_name = path.display().to_string();
    check_pdf_magic(&source_name, &bytes)?;

    debug!("Resolved local PDF: {} ({} bytes)", source_name, bytes.len());
    Ok(ResolvedInput { source_name, bytes })
}

/// Download a URL into memory.
async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, ExtractError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ExtractError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            ExtractError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            ExtractError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(ExtractError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ExtractError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?
        .to_vec();

    check_pdf_magic(url, &bytes)?;
    info!("Downloaded {} bytes", bytes.len());

    Ok(ResolvedInput {
        source_name: url.to_string(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/order.pdf"));
        assert!(is_url("http://example.com/order.pdf"));
        assert!(!is_url("/tmp/order.pdf"));
        assert!(!is_url("order.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_check_pdf_magic() {
        assert!(check_pdf_magic("a.pdf", b"%PDF-1.7\n").is_ok());
        match check_pdf_magic("a.pdf", b"PK\x03\x04rest") {
            Err(ExtractError::NotAPdf { magic, .. }) => assert_eq!(magic, b"PK\x03\x04"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(check_pdf_magic("empty.pdf", b"").is_err());
    }

    #[test]
    fn test_resolve_missing_file() {
        let result = tokio_test::block_on(resolve_input("/definitely/not/here.pdf", 5));
        assert!(matches!(result, Err(ExtractError::FileNotFound { .. })));
    }

    #[test]
    fn test_resolve_empty_input() {
        let result = tokio_test::block_on(resolve_input("  ", 5));
        assert!(matches!(result, Err(ExtractError::InvalidInput { .. })));
    }

    #[test]
    fn test_resolve_local_pdf_and_non_pdf() {
        let mut pdf = tempfile::NamedTempFile::new().unwrap();
        pdf.write_all(b"%PDF-1.4\n%fake body").unwrap();
        let resolved =
            tokio_test::block_on(resolve_input(pdf.path().to_str().unwrap(), 5)).unwrap();
        assert!(resolved.bytes.starts_with(b"%PDF"));

        let mut txt = tempfile::NamedTempFile::new().unwrap();
        txt.write_all(b"Door Order\n").unwrap();
        let result = tokio_test::block_on(resolve_input(txt.path().to_str().unwrap(), 5));
        assert!(matches!(result, Err(ExtractError::NotAPdf { .. })));
    }
}
