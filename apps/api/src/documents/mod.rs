//! Resume document intake: classify an upload, enforce the size limit, extract plain text.
//!
//! Extraction is CPU-bound (PDF parsing in particular) and runs inside
//! `tokio::task::spawn_blocking`. The size check happens before any parsing.

pub mod docx;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

use crate::config::{MIME_DOCX, MIME_PDF, MIME_TEXT};
use crate::errors::AppError;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("unsupported document type '{0}'")]
    UnsupportedType(String),

    #[error("document is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    #[error("document is empty")]
    Empty,

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("plain text is not valid UTF-8")]
    Encoding,
}

/// Document formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    pub fn mime(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => MIME_PDF,
            DocumentKind::Docx => MIME_DOCX,
            DocumentKind::PlainText => MIME_TEXT,
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        // "text/plain; charset=utf-8" → "text/plain"
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            MIME_PDF => Some(DocumentKind::Pdf),
            MIME_DOCX => Some(DocumentKind::Docx),
            MIME_TEXT => Some(DocumentKind::PlainText),
            _ => None,
        }
    }

    pub fn from_extension(file_name: &str) -> Option<Self> {
        let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" | "text" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }

    /// Resolves the kind from the declared content type. Browsers often send
    /// `application/octet-stream`, so the file extension is the fallback.
    pub fn detect(
        content_type: Option<&str>,
        file_name: Option<&str>,
    ) -> Result<Self, DocumentError> {
        content_type
            .and_then(Self::from_mime)
            .or_else(|| file_name.and_then(Self::from_extension))
            .ok_or_else(|| {
                DocumentError::UnsupportedType(
                    content_type
                        .or(file_name)
                        .unwrap_or("unknown")
                        .to_string(),
                )
            })
    }
}

/// A resume file received over multipart.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

pub fn check_size(size: usize, limit: usize) -> Result<(), DocumentError> {
    if size > limit {
        return Err(DocumentError::TooLarge { size, limit });
    }
    Ok(())
}

/// Extracts plain text from an upload off the async executor.
pub async fn extract_text(upload: ResumeUpload, kind: DocumentKind) -> Result<String, AppError> {
    let extracted = tokio::task::spawn_blocking(move || extract_text_sync(&upload.data, kind))
        .await
        .map_err(|e| {
            if e.is_panic() {
                // pdf-extract panics on some malformed files; treat that as a bad document.
                AppError::from(DocumentError::Pdf("document could not be parsed".to_string()))
            } else {
                AppError::Internal(anyhow::anyhow!(
                    "spawn_blocking failed in document extraction: {e}"
                ))
            }
        })?;

    extracted.map_err(AppError::from)
}

pub fn extract_text_sync(data: &[u8], kind: DocumentKind) -> Result<String, DocumentError> {
    if data.is_empty() {
        return Err(DocumentError::Empty);
    }

    match kind {
        DocumentKind::Pdf => {
            pdf_extract::extract_text_from_mem(data).map_err(|e| DocumentError::Pdf(e.to_string()))
        }
        DocumentKind::Docx => docx::extract_text(data),
        DocumentKind::PlainText => {
            String::from_utf8(data.to_vec()).map_err(|_| DocumentError::Encoding)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_prefers_content_type() {
        let kind = DocumentKind::detect(Some("application/pdf"), Some("resume.txt")).unwrap();
        assert_eq!(kind, DocumentKind::Pdf);
    }

    #[test]
    fn test_detect_strips_mime_parameters() {
        let kind = DocumentKind::detect(Some("text/plain; charset=utf-8"), None).unwrap();
        assert_eq!(kind, DocumentKind::PlainText);
    }

    #[test]
    fn test_detect_falls_back_to_extension() {
        let kind =
            DocumentKind::detect(Some("application/octet-stream"), Some("CV.DOCX")).unwrap();
        assert_eq!(kind, DocumentKind::Docx);
    }

    #[test]
    fn test_detect_rejects_unknown() {
        let err = DocumentKind::detect(Some("image/png"), Some("photo.png")).unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedType(t) if t == "image/png"));
    }

    #[test]
    fn test_check_size_boundary() {
        assert!(check_size(10, 10).is_ok());
        assert!(matches!(
            check_size(11, 10),
            Err(DocumentError::TooLarge { size: 11, limit: 10 })
        ));
    }

    #[test]
    fn test_plain_text_extraction() {
        let text = extract_text_sync(b"Experience\nJava developer", DocumentKind::PlainText)
            .unwrap();
        assert_eq!(text, "Experience\nJava developer");
    }

    #[test]
    fn test_invalid_utf8_is_encoding_error() {
        let err = extract_text_sync(&[0xff, 0xfe, 0x00], DocumentKind::PlainText).unwrap_err();
        assert!(matches!(err, DocumentError::Encoding));
    }

    #[test]
    fn test_empty_document_rejected() {
        assert!(matches!(
            extract_text_sync(b"", DocumentKind::Pdf),
            Err(DocumentError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_garbage_pdf_is_unprocessable() {
        let upload = ResumeUpload {
            file_name: Some("resume.pdf".to_string()),
            content_type: Some(MIME_PDF.to_string()),
            data: Bytes::from_static(b"definitely not a pdf"),
        };
        let err = extract_text(upload, DocumentKind::Pdf).await.unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }
}
