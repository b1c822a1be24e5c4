//! Bank-transfer receipt images, base64-encoded for the order payload.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;
use thiserror::Error;

/// Image types the backend accepts as proof of payment.
pub const ACCEPTED_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Shortest encoded proof that is taken seriously.
pub const MIN_ENCODED_LEN: usize = 10;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PaymentProofError {
    #[error("Unsupported image type {0}; use JPG, PNG or WEBP")]
    UnsupportedType(String),

    #[error("Payment proof image is empty or truncated")]
    TooShort,

    #[error("Payment proof is not valid base64: {0}")]
    NotBase64(String),

    #[error("Could not read payment proof: {0}")]
    Io(String),
}

#[derive(Clone, PartialEq)]
pub struct PaymentProof {
    mime: String,
    encoded: String,
}

impl PaymentProof {
    /// Encodes raw image bytes of type `mime`.
    pub fn from_bytes(bytes: &[u8], mime: &str) -> Result<Self, PaymentProofError> {
        let mime = accepted(mime)?;
        Self::checked(mime, STANDARD.encode(bytes))
    }

    /// Wraps an image that is already base64-encoded.
    pub fn from_base64(encoded: impl Into<String>, mime: &str) -> Result<Self, PaymentProofError> {
        let mime = accepted(mime)?;
        let encoded = encoded.into().trim().to_string();
        STANDARD
            .decode(&encoded)
            .map_err(|e| PaymentProofError::NotBase64(e.to_string()))?;
        Self::checked(mime, encoded)
    }

    /// Reads an image file; the type is guessed from its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, PaymentProofError> {
        let path = path.as_ref();
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| PaymentProofError::Io(format!("{}: {e}", path.display())))?;
        Self::from_bytes(&bytes, mime.essence_str())
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// The base64 text sent as `paymentProofBase64`.
    pub fn base64(&self) -> &str {
        &self.encoded
    }

    /// `data:` URL for previewing the image.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.encoded)
    }

    fn checked(mime: String, encoded: String) -> Result<Self, PaymentProofError> {
        if encoded.len() < MIN_ENCODED_LEN {
            return Err(PaymentProofError::TooShort);
        }
        Ok(Self { mime, encoded })
    }
}

impl std::fmt::Debug for PaymentProof {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentProof")
            .field("mime", &self.mime)
            .field("encoded_len", &self.encoded.len())
            .finish()
    }
}

fn accepted(mime: &str) -> Result<String, PaymentProofError> {
    let mime = mime.trim().to_ascii_lowercase();
    if ACCEPTED_TYPES.contains(&mime.as_str()) {
        Ok(mime)
    } else {
        Err(PaymentProofError::UnsupportedType(mime))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0x0d];

    #[test]
    fn test_encodes_accepted_images() {
        let proof = PaymentProof::from_bytes(PNG_HEADER, "image/png").unwrap();
        assert_eq!(proof.mime(), "image/png");
        assert_eq!(proof.base64(), STANDARD.encode(PNG_HEADER));
        assert!(proof.data_url().starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn test_rejects_other_types() {
        let err = PaymentProof::from_bytes(b"%PDF-1.7 receipt", "application/pdf").unwrap_err();
        assert_eq!(err, PaymentProofError::UnsupportedType("application/pdf".into()));

        assert!(PaymentProof::from_bytes(PNG_HEADER, "IMAGE/JPEG").is_ok());
    }

    #[test]
    fn test_rejects_tiny_or_garbled_input() {
        assert_eq!(
            PaymentProof::from_bytes(b"ab", "image/webp").unwrap_err(),
            PaymentProofError::TooShort
        );
        assert!(matches!(
            PaymentProof::from_base64("not base64 at all!", "image/png"),
            Err(PaymentProofError::NotBase64(_))
        ));
        assert!(PaymentProof::from_base64("aGVsbG8gd29ybGQ=", "image/png").is_ok());
    }

    #[tokio::test]
    async fn test_from_path_guesses_type() {
        let dir = std::env::temp_dir();
        let png = dir.join(format!("proof-{}.png", std::process::id()));
        let gif = dir.join(format!("proof-{}.gif", std::process::id()));
        tokio::fs::write(&png, PNG_HEADER).await.unwrap();
        tokio::fs::write(&gif, PNG_HEADER).await.unwrap();

        let proof = PaymentProof::from_path(&png).await.unwrap();
        assert_eq!(proof.mime(), "image/png");

        let err = PaymentProof::from_path(&gif).await.unwrap_err();
        assert_eq!(err, PaymentProofError::UnsupportedType("image/gif".into()));

        let missing = PaymentProof::from_path(dir.join("no-such-proof.jpg")).await;
        assert!(matches!(missing, Err(PaymentProofError::Io(_))));

        let _ = tokio::fs::remove_file(&png).await;
        let _ = tokio::fs::remove_file(&gif).await;
    }
}
