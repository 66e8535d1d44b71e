//! Request signing.
//!
//! A signed request carries the caller's e-mail address and a signature
//! over the exact JSON payload sent in the `q` query parameter. The
//! signature is `hex(MD5(HMAC-SHA256(secret, payload)))`, where MD5 runs
//! over the 32 raw MAC bytes, not over their hex text.

use std::fmt;

use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha2::Sha256;

use crate::error::LivePvrError;

/// Header carrying the caller's e-mail address.
pub const EMAIL_HEADER: &str = "livepvrdata-email";

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "livepvrdata-signature";

/// Computes the signature of `payload` with `secret`.
///
/// Returns 32 lowercase hexadecimal characters.
///
/// # Errors
///
/// Returns [`LivePvrError::Crypto`] if the MAC cannot be keyed with `secret`.
pub fn sign(secret: &str, payload: &str) -> Result<String, LivePvrError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|e| LivePvrError::Crypto(e.to_string()))?;
    mac.update(payload.as_bytes());
    let mac_bytes = mac.finalize().into_bytes();

    Ok(hex::encode(Md5::digest(mac_bytes)))
}

/// Signing headers for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningHeaders {
    /// Value of [`EMAIL_HEADER`].
    pub email: String,
    /// Value of [`SIGNATURE_HEADER`].
    pub signature: String,
}

impl SigningHeaders {
    /// Returns the headers as `(name, value)` pairs.
    #[must_use]
    pub fn pairs(&self) -> [(&'static str, &str); 2] {
        [
            (EMAIL_HEADER, self.email.as_str()),
            (SIGNATURE_HEADER, self.signature.as_str()),
        ]
    }
}

/// E-mail address and API secret used to sign requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    secret: String,
}

impl Credentials {
    /// Creates credentials from an e-mail address and its API secret.
    #[must_use]
    pub fn new(email: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            secret: secret.into(),
        }
    }

    /// Returns the e-mail address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns `true` when both the e-mail and the secret are non-empty.
    ///
    /// Requests are only signed with usable credentials.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.email.is_empty() && !self.secret.is_empty()
    }

    /// Builds the signing headers for `payload`.
    ///
    /// Returns `None` when the credentials are not usable, in which case
    /// the request goes out unsigned.
    ///
    /// # Errors
    ///
    /// Returns [`LivePvrError::Crypto`] if signing fails.
    pub fn signing_headers(&self, payload: &str) -> Result<Option<SigningHeaders>, LivePvrError> {
        if !self.is_usable() {
            return Ok(None);
        }
        let signature = sign(&self.secret, payload)?;
        Ok(Some(SigningHeaders {
            email: self.email.clone(),
            signature,
        }))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("secret", &"<redacted>")
            .finish()
    }
}
