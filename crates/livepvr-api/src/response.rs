//! Response envelopes.
//!
//! Every service response is a JSON object carrying a boolean `isError`
//! discriminator, or the literal text `null` for an empty success. The
//! discriminator is probed on a generic parse of the body first; the body
//! is then decoded a second time into either [`ErrorResponse`] or the
//! success shape the caller asked for.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::LivePvrError;

/// Key of the error discriminator in every response envelope.
pub const IS_ERROR_KEY: &str = "isError";

/// Body the service sends for an empty success.
const NULL_BODY: &str = "null";

/// A success shape a caller can expect from an endpoint.
///
/// `Default` provides the value for a `null` body.
pub trait SuccessShape: DeserializeOwned + Default {
    /// Shape name used in logs and error messages.
    const NAME: &'static str;
}

/// A classified service response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response<T> {
    /// The service answered with the expected success shape.
    Success(T),
    /// The service reported an error.
    Error(ErrorResponse),
}

impl<T> Response<T> {
    /// Returns `true` when the service reported an error.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns the success value, if any.
    #[must_use]
    pub const fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    /// Returns the service-reported error, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Success(_) => None,
            Self::Error(err) => Some(err),
        }
    }

    /// Converts into a `Result`, with the service-reported error as `Err`.
    ///
    /// # Errors
    ///
    /// Returns the [`ErrorResponse`] when the service reported an error.
    pub fn into_result(self) -> Result<T, ErrorResponse> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Error(err) => Err(err),
        }
    }
}

/// Deserializes an explicit `null` as the field type's default.
fn deserialize_null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let value: Option<T> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// Error description reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable description of the failure.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub message: String,
    /// Service-side error classification.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub code: i64,
}

/// Status of a single monitored event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Normalized event title (e.g. "NFL Football").
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub title: String,
    /// Raw status text from the monitored feed.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub status: String,
    /// Free-form status detail (e.g. the period or quarter).
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub desc: String,
    /// Whether the query matched an event; the other flags are only
    /// meaningful when this is `true`.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub is_valid: bool,
    /// Whether the event is still in progress.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub is_active: bool,
    /// Whether the event has finished.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub is_complete: bool,
}

impl SuccessShape for StatusResponse {
    const NAME: &'static str = "StatusResponse";
}

/// Events the service can monitor for a given type and date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventsResponse {
    /// Monitored events.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub events: Vec<Event>,
}

impl SuccessShape for EventsResponse {
    const NAME: &'static str = "EventsResponse";
}

/// A monitored event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Participants (teams).
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub participants: Vec<String>,
    /// Free-form status text, informational only.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub status: String,
    /// Whether the event has finished.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub is_complete: bool,
}

impl Event {
    /// Describes the event as `"A vs. B"`.
    #[must_use]
    pub fn description(&self) -> String {
        self.participants.join(" vs. ")
    }

    /// Returns `true` if `name` participates in this event.
    #[must_use]
    pub fn is_participating(&self, name: &str) -> bool {
        self.participants.iter().any(|p| p == name)
    }

    /// Returns `true` if every name in `names` participates in this event.
    #[must_use]
    pub fn are_participating<S: AsRef<str>>(&self, names: &[S]) -> bool {
        !names.is_empty() && names.iter().all(|n| self.is_participating(n.as_ref()))
    }
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimpleResponse {
    /// Optional informational message.
    #[serde(default)]
    pub message: Option<String>,
}

impl SuccessShape for SimpleResponse {
    const NAME: &'static str = "SimpleResponse";
}

/// Classifies a raw response body.
///
/// - `null` yields `Success(T::default())`.
/// - Otherwise the body must be a JSON object with a boolean `isError`;
///   `true` decodes it as [`ErrorResponse`], `false` as `T`.
///
/// # Errors
///
/// Returns [`LivePvrError::MalformedResponse`] if the body is not JSON,
/// is not an object, lacks a boolean `isError`, or does not decode into
/// the selected shape.
pub fn classify<T: SuccessShape>(raw: &str) -> Result<Response<T>, LivePvrError> {
    if raw == NULL_BODY {
        tracing::debug!(shape = T::NAME, "Empty response body, using default");
        return Ok(Response::Success(T::default()));
    }

    if is_error(raw)? {
        let decoded: Result<ErrorResponse, _> = serde_json::from_str(raw);
        let err = decoded.map_err(|e| {
            LivePvrError::malformed(format!("failed to decode ErrorResponse: {e}"), raw)
        })?;
        tracing::debug!(
            code = err.code,
            error_message = %err.message,
            "Service reported an error"
        );
        return Ok(Response::Error(err));
    }

    let decoded: Result<T, _> = serde_json::from_str(raw);
    let value = decoded
        .map_err(|e| LivePvrError::malformed(format!("failed to decode {}: {e}", T::NAME), raw))?;
    Ok(Response::Success(value))
}

/// Reads the `isError` discriminator from a generic parse of `raw`.
fn is_error(raw: &str) -> Result<bool, LivePvrError> {
    let parsed: Result<Value, _> = serde_json::from_str(raw);
    let value = parsed.map_err(|e| LivePvrError::malformed(format!("not valid JSON: {e}"), raw))?;

    let Some(object) = value.as_object() else {
        return Err(LivePvrError::malformed("response is not a JSON object", raw));
    };

    match object.get(IS_ERROR_KEY) {
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(_) => Err(LivePvrError::malformed(
            format!("`{IS_ERROR_KEY}` is not a boolean"),
            raw,
        )),
        None => Err(LivePvrError::malformed(
            format!("missing `{IS_ERROR_KEY}`"),
            raw,
        )),
    }
}
