//! File attachments

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::EmailError;

/// A file attached to an email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// File name shown to the recipient
    pub filename: String,

    /// MIME content type, e.g. `application/pdf`
    pub content_type: String,

    /// Raw file contents
    pub data: Vec<u8>,
}

impl Attachment {
    /// Create an attachment from in-memory data
    ///
    /// # Examples
    ///
    /// ```rust
    /// use email_sender::email::Attachment;
    ///
    /// let attachment = Attachment::new("notes.txt", "text/plain", b"hello".to_vec());
    /// assert_eq!(attachment.data.len(), 5);
    /// ```
    #[must_use]
    pub fn new(filename: &str, content_type: &str, data: Vec<u8>) -> Self {
        Self {
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            data,
        }
    }

    /// Read an attachment from disk
    ///
    /// The file name is the last path component and the content type is
    /// guessed from the extension, falling back to `application/octet-stream`.
    ///
    /// # Errors
    ///
    /// Returns `EmailError::Io` if the file cannot be read
    pub async fn from_path(path: &Path) -> Result<Self, EmailError> {
        let data = tokio::fs::read(path).await?;

        let filename = path
            .file_name()
            .map_or_else(|| "attachment".to_string(), |name| name.to_string_lossy().into_owned());

        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();

        Ok(Self {
            filename,
            content_type,
            data,
        })
    }

    /// Whether `path` names an existing regular file
    pub async fn is_file(path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .is_ok_and(|metadata| metadata.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_from_path_guesses_content_type() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let attachment = Attachment::from_path(&path).await.unwrap();

        assert_eq!(attachment.filename, "report.pdf");
        assert_eq!(attachment.content_type, "application/pdf");
        assert_eq!(attachment.data, b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_from_path_unknown_extension_is_octet_stream() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("blob.zzqx");
        std::fs::write(&path, [0_u8, 1, 2]).unwrap();

        let attachment = Attachment::from_path(&path).await.unwrap();

        assert_eq!(attachment.content_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn test_from_path_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let result = Attachment::from_path(&temp.path().join("gone.txt")).await;

        assert!(matches!(result, Err(EmailError::Io(_))));
    }

    #[tokio::test]
    async fn test_is_file_rejects_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        std::fs::write(&path, "notes").unwrap();

        assert!(Attachment::is_file(&path).await);
        assert!(!Attachment::is_file(temp.path()).await);
        assert!(!Attachment::is_file(&temp.path().join("missing.txt")).await);
    }
}
