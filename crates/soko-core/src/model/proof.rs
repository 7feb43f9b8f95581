// ── Proof of payment ──

use std::path::Path;

use bytes::Bytes;
use serde::Serialize;

use soko_api::ProofUpload;

use crate::error::CoreError;

/// A user-selected proof-of-payment file (usually a screenshot).
///
/// Only "present and non-empty" is enforced. Size and MIME type are not
/// checked; the content type is inferred from the extension purely to
/// label the upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentProof {
    file_name: String,
    content_type: String,
    size_bytes: u64,
    #[serde(skip)]
    bytes: Bytes,
}

impl PaymentProof {
    /// Build a proof from in-memory bytes.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Result<Self, CoreError> {
        let file_name = file_name.into();
        let bytes = bytes.into();

        if file_name.trim().is_empty() {
            return Err(CoreError::Validation {
                message: "payment proof file has no name".into(),
            });
        }
        if bytes.is_empty() {
            return Err(CoreError::Validation {
                message: format!("payment proof '{file_name}' is empty"),
            });
        }

        Ok(Self {
            content_type: infer_content_type(&file_name).to_owned(),
            size_bytes: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            file_name,
            bytes,
        })
    }

    /// Read a proof from disk.
    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let bytes = std::fs::read(path).map_err(|e| CoreError::Validation {
            message: format!("cannot read payment proof {}: {e}", path.display()),
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(file_name, bytes)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub(crate) fn to_upload(&self) -> ProofUpload {
        ProofUpload {
            file_name: self.file_name.clone(),
            content_type: self.content_type.clone(),
            bytes: self.bytes.clone(),
        }
    }
}

fn infer_content_type(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_file_is_rejected() {
        let err = PaymentProof::new("receipt.png", Vec::new()).unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref message } if message.contains("empty")));
    }

    #[test]
    fn nameless_file_is_rejected() {
        let err = PaymentProof::new("  ", b"data".to_vec()).unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[test]
    fn content_type_from_extension() {
        let proof = PaymentProof::new("Receipt.JPG", b"jpeg".to_vec()).unwrap();
        assert_eq!(proof.content_type(), "image/jpeg");
        assert_eq!(proof.size_bytes(), 4);

        let other = PaymentProof::new("receipt", b"x".to_vec()).unwrap();
        assert_eq!(other.content_type(), "application/octet-stream");
    }

    #[test]
    fn reads_proof_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("momo.png");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"screenshot")
            .unwrap();

        let proof = PaymentProof::from_path(&path).unwrap();
        assert_eq!(proof.file_name(), "momo.png");
        assert_eq!(proof.to_upload().bytes.as_ref(), b"screenshot");

        let missing = PaymentProof::from_path(&dir.path().join("nope.png"));
        assert!(matches!(missing, Err(CoreError::Validation { .. })));
    }
}
