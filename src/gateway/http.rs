//! HTTP gateway for the clinic REST API.
//!
//! Authenticated endpoints carry the configured bearer token. Non-success responses are
//! turned into [`Error::Api`] using the `message` field of the JSON body when the server
//! provides one; requests that never got a response become [`Error::Transport`].

use super::Gateway;
use crate::config::GatewayConfig;
use crate::errors::{Error, Result};
use crate::models::{
    Appointment, AppointmentFilter, AppointmentId, AppointmentPage, AppointmentPatch,
    DashboardPayload, Doctor, DoctorFilter, EarningsBucket, Profile, ProfileUpdate, Review,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Error body shape the API uses for failures.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// `reqwest` implementation of [`Gateway`].
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpGateway {
    /// Builds a gateway from configuration.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the HTTP client cannot be constructed.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Config {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|e| Error::Transport {
            message: e.to_string(),
        })?;
        decode(response).await
    }
}

/// Maps a response to either its decoded body or an [`Error::Api`].
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(|e| Error::Transport {
        message: e.to_string(),
    })?;

    if !status.is_success() {
        let message = api_message(&bytes)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
        warn!("API responded with {}: {}", status, message);
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&bytes).map_err(Error::from)
}

fn api_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    parsed.message.or(parsed.error).filter(|m| !m.is_empty())
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn fetch_dashboard(&self) -> Result<DashboardPayload> {
        debug!("GET /doctors/dashboard");
        self.send(self.authed(self.client.get(self.url("/doctors/dashboard"))))
            .await
    }

    async fn fetch_appointments(&self, filter: &AppointmentFilter) -> Result<AppointmentPage> {
        debug!("GET /doctors/appointments {:?}", filter);
        let request = self
            .client
            .get(self.url("/doctors/appointments"))
            .query(&filter.query_pairs());
        self.send(self.authed(request)).await
    }

    async fn fetch_appointment(&self, id: &AppointmentId) -> Result<Appointment> {
        debug!("GET /doctors/appointments/{}", id);
        let path = format!("/doctors/appointments/{id}");
        self.send(self.authed(self.client.get(self.url(&path))))
            .await
    }

    async fn update_appointment(
        &self,
        id: &AppointmentId,
        patch: &AppointmentPatch,
    ) -> Result<Appointment> {
        debug!("PUT /doctors/appointments/{} {:?}", id, patch);
        let path = format!("/doctors/appointments/{id}");
        let request = self.client.put(self.url(&path)).json(patch);
        self.send(self.authed(request)).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile> {
        debug!("PUT /doctors/profile");
        let request = self.client.put(self.url("/doctors/profile")).json(update);
        self.send(self.authed(request)).await
    }

    async fn fetch_earnings(&self) -> Result<Vec<EarningsBucket>> {
        debug!("GET /doctors/earnings");
        self.send(self.authed(self.client.get(self.url("/doctors/earnings"))))
            .await
    }

    async fn fetch_reviews(&self) -> Result<Vec<Review>> {
        debug!("GET /doctors/reviews");
        self.send(self.authed(self.client.get(self.url("/doctors/reviews"))))
            .await
    }

    async fn search_doctors(&self, filter: &DoctorFilter) -> Result<Vec<Doctor>> {
        debug!("GET /users/doctors {:?}", filter);
        let request = self
            .client
            .get(self.url("/users/doctors"))
            .query(&filter.query_pairs());
        self.send(request).await
    }
}
