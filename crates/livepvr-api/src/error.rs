//! Error kinds raised by request signing and response classification.

/// Faults of the signing and classification steps.
///
/// A service-reported error is not one of these: it decodes into
/// [`crate::Response::Error`] and is returned as a normal result.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum LivePvrError {
    /// The signing primitive could not be used with the given secret.
    #[error("failed to compute request signature: {0}")]
    Crypto(String),

    /// The response body is not a well-formed response envelope.
    #[error("malformed response: {reason}")]
    MalformedResponse {
        /// What was wrong with the body.
        reason: String,
        /// Leading part of the offending body, for diagnostics.
        preview: String,
    },
}

/// Maximum number of bytes of a response body kept in error previews.
const PREVIEW_LEN: usize = 200;

impl LivePvrError {
    /// Builds a `MalformedResponse` error with a preview of `raw`.
    pub(crate) fn malformed(reason: impl Into<String>, raw: &str) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
            preview: String::from(&raw[..raw.floor_char_boundary(PREVIEW_LEN)]),
        }
    }

    /// Returns `true` for a malformed response envelope.
    #[must_use]
    pub const fn is_malformed_response(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]

    use super::*;

    #[test]
    fn test_malformed_preview_is_truncated() {
        // Arrange
        let raw = "x".repeat(1_000);

        // Act
        let err = LivePvrError::malformed("not valid JSON", &raw);

        // Assert
        match err {
            LivePvrError::MalformedResponse { reason, preview } => {
                assert_eq!(reason, "not valid JSON");
                assert_eq!(preview.len(), PREVIEW_LEN);
            }
            LivePvrError::Crypto(_) => panic!("unexpected variant"),
        }
    }

    #[test]
    fn test_malformed_preview_respects_char_boundary() {
        // Arrange: 3-byte characters so the byte limit falls mid-character
        let raw = "試".repeat(100);

        // Act
        let err = LivePvrError::malformed("bad", &raw);

        // Assert
        match err {
            LivePvrError::MalformedResponse { preview, .. } => {
                assert_eq!(preview.len(), 198);
                assert!(preview.chars().all(|c| c == '試'));
            }
            LivePvrError::Crypto(_) => panic!("unexpected variant"),
        }
    }

    #[test]
    fn test_display_messages() {
        // Arrange
        let crypto = LivePvrError::Crypto(String::from("invalid key length"));
        let malformed = LivePvrError::malformed("missing `isError`", "{}");

        // Act & Assert
        assert_eq!(
            crypto.to_string(),
            "failed to compute request signature: invalid key length"
        );
        assert_eq!(malformed.to_string(), "malformed response: missing `isError`");
        assert!(malformed.is_malformed_response());
        assert!(!crypto.is_malformed_response());
    }
}
