//! Request payloads.
//!
//! Each request is serialized to JSON and sent as the `q` query parameter.
//! Absent optional fields are omitted from the payload.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Status query for a single event.
///
/// The event is identified either by its two teams (preferred) or by a
/// free-form description the service parses itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRequest {
    /// Event type, usually the program title (e.g. "NFL Football").
    #[serde(rename = "type")]
    pub event_type: String,
    /// Free-form event description (e.g. "Miami Dolphins at Buffalo Bills").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// The two teams of the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<String>>,
    /// Event start as a Unix timestamp (seconds).
    ///
    /// Repeated queries for the same event must send the same start time.
    pub start: i64,
}

impl StatusRequest {
    /// Creates a status query identified by the event's two teams.
    #[must_use]
    pub fn with_teams(
        event_type: impl Into<String>,
        home: impl Into<String>,
        away: impl Into<String>,
        start: DateTime<Utc>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            details: None,
            teams: Some(vec![home.into(), away.into()]),
            start: start.timestamp(),
        }
    }

    /// Creates a status query identified by a free-form description.
    #[must_use]
    pub fn with_details(
        event_type: impl Into<String>,
        details: impl Into<String>,
        start: DateTime<Utc>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            details: Some(details.into()),
            teams: None,
            start: start.timestamp(),
        }
    }
}

/// Query for the events of one type on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventsRequest {
    /// Event type (e.g. "NHL Hockey").
    #[serde(rename = "type")]
    pub event_type: String,
    /// Queried date as a Unix timestamp; the service ignores the time of day.
    pub start: i64,
}

impl EventsRequest {
    /// Creates an events query for `event_type` on the UTC date of `date`.
    #[must_use]
    pub fn new(event_type: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            event_type: event_type.into(),
            start: date.timestamp(),
        }
    }
}

/// Submission to the service's team-name override map.
///
/// Maps a team name as it appears in the EPG to the name used by the
/// monitored feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRequest {
    /// Team name as found in the EPG (e.g. "Michigan State").
    pub epg_name: String,
    /// Team name as found in the monitored feed (e.g. "Michigan St").
    pub feed_name: String,
    /// Address the confirmation link is sent to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl OverrideRequest {
    /// Creates an override submission.
    #[must_use]
    pub fn new(epg_name: impl Into<String>, feed_name: impl Into<String>) -> Self {
        Self {
            epg_name: epg_name.into(),
            feed_name: feed_name.into(),
            email: None,
        }
    }

    /// Requests a confirmation link at `email` before the override is committed.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
