//! Client library for the Live PVR Data service.
//!
//! Builds signed requests for event status, event listings and override
//! submissions, and classifies the JSON responses into typed success or
//! service-reported error results.

mod api;
mod client;
mod error;

/// Request parameter parsing helpers.
pub mod params;
/// Request payload types.
pub mod request;
/// Response envelope classification and response shapes.
pub mod response;
/// Request signing.
pub mod signer;

#[allow(clippy::module_name_repetitions)]
pub use api::{LivePvrApi, LocalLivePvrApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, Endpoint, LivePvrClient, LivePvrClientBuilder,
};
#[allow(clippy::module_name_repetitions)]
pub use error::LivePvrError;
pub use request::{EventsRequest, OverrideRequest, StatusRequest};
pub use response::{
    ErrorResponse, Event, EventsResponse, Response, SimpleResponse, StatusResponse, SuccessShape,
    classify,
};
pub use signer::{Credentials, sign};
