//! `LivePvrApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use crate::request::{EventsRequest, OverrideRequest, StatusRequest};
use crate::response::{EventsResponse, Response, SimpleResponse, StatusResponse};

/// Live PVR Data API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
///
/// A service-reported error is returned as `Ok(Response::Error(..))`;
/// `Err` is reserved for transport, signing and decoding faults.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(LivePvrApi: Send)]
pub trait LocalLivePvrApi {
    /// Queries the status of a single event.
    ///
    /// # Errors
    ///
    /// Returns an error if signing, the HTTP request or response
    /// classification fails.
    async fn get_status(&self, req: &StatusRequest) -> Result<Response<StatusResponse>>;

    /// Lists the events of one type the service can monitor on a date.
    ///
    /// # Errors
    ///
    /// Returns an error if signing, the HTTP request or response
    /// classification fails.
    async fn get_events(&self, req: &EventsRequest) -> Result<Response<EventsResponse>>;

    /// Submits a team-name override.
    ///
    /// # Errors
    ///
    /// Returns an error if signing, the HTTP request or response
    /// classification fails.
    async fn submit_override(&self, req: &OverrideRequest) -> Result<Response<SimpleResponse>>;
}
