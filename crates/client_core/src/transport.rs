use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{SolveOutcome, SolveRequest, SolveResponse};
use tracing::debug;
use url::Url;

use crate::{config::ClientSettings, error::SettingsError, error::TransportError};

/// The remote solve endpoint: one request in, one answer out.
#[async_trait]
pub trait SolveService: Send + Sync {
    async fn solve(&self, request: &SolveRequest) -> Result<SolveOutcome, TransportError>;
}

#[async_trait]
impl<T> SolveService for Arc<T>
where
    T: SolveService + ?Sized,
{
    async fn solve(&self, request: &SolveRequest) -> Result<SolveOutcome, TransportError> {
        (**self).solve(request).await
    }
}

pub struct MissingSolveService;

#[async_trait]
impl SolveService for MissingSolveService {
    async fn solve(&self, _request: &SolveRequest) -> Result<SolveOutcome, TransportError> {
        Err(TransportError::Unavailable(
            "no solve endpoint configured".to_string(),
        ))
    }
}

/// Posts the request as JSON to the configured endpoint. The status code is
/// not consulted: the body alone decides between answer shapes.
#[derive(Debug, Clone)]
pub struct HttpSolveClient {
    http: Client,
    endpoint: Url,
}

impl HttpSolveClient {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, SettingsError> {
        Ok(Self::new(settings.solve_endpoint()?))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SolveService for HttpSolveClient {
    async fn solve(&self, request: &SolveRequest) -> Result<SolveOutcome, TransportError> {
        let res = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;
        let status = res.status();
        let body = res.bytes().await?;
        debug!(
            endpoint = %self.endpoint,
            %status,
            bytes = body.len(),
            "received solve response"
        );
        let response: SolveResponse = serde_json::from_slice(&body)?;
        Ok(response.into_outcome()?)
    }
}
