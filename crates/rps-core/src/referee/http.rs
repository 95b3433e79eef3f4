//! HTTP client for the referee backend and leaderboard.

use super::traits::{RefereeClient, RefereeError};
use crate::protocol::{LeaderboardEntry, LeaderboardReport, PlayRequest, PlayResponse};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// reqwest-backed referee client
pub struct HttpRefereeClient {
    client: Client,
    backend_url: String,
    leaderboard_url: String,
}

impl HttpRefereeClient {
    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(
        backend_url: impl Into<String>,
        leaderboard_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RefereeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RefereeError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            backend_url: trim_base(backend_url.into()),
            leaderboard_url: trim_base(leaderboard_url.into()),
        })
    }

    fn play_url(&self) -> String {
        format!("{}/play", self.backend_url)
    }

    fn leaderboard_endpoint(&self) -> String {
        format!("{}/leaderboard", self.leaderboard_url)
    }

    async fn post<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<Response, RefereeError> {
        debug!(url, "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| RefereeError::NetworkError(e.to_string()))?;
        check_status(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RefereeError> {
        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RefereeError::NetworkError(e.to_string()))?;
        decode(check_status(response)?).await
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn check_status(response: Response) -> Result<Response, RefereeError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(RefereeError::Status(status.as_u16()))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RefereeError> {
    response
        .json()
        .await
        .map_err(|e| RefereeError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl RefereeClient for HttpRefereeClient {
    async fn play(&self, request: &PlayRequest) -> Result<PlayResponse, RefereeError> {
        let response = self.post(&self.play_url(), request).await?;
        decode(response).await
    }

    async fn notify_random_play(&self, request: &PlayRequest) -> Result<(), RefereeError> {
        self.post(&self.play_url(), request).await.map(|_| ())
    }

    async fn report_score(&self, report: &LeaderboardReport) -> Result<(), RefereeError> {
        self.post(&self.leaderboard_endpoint(), report).await.map(|_| ())
    }

    async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, RefereeError> {
        self.get_json(&self.leaderboard_endpoint()).await
    }
}
