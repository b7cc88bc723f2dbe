use crate::config::Config;
use crate::cpf::Cpf;
use crate::errors::AppError;
use reqwest::StatusCode;
use std::time::Duration;

/// What the consult API answered: its status and its body parsed as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

/// Client for the third-party CPF consult API.
///
/// Holds a single pooled `reqwest::Client`; cloning is cheap and shares the
/// pool. No state is mutated per request.
#[derive(Clone)]
pub struct ConsultClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    timeout: Duration,
}

impl ConsultClient {
    /// Creates a new `ConsultClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Scheme and host of the consult API, without trailing slash.
    /// * `token` - Bearer token for authentication.
    /// * `timeout` - Deadline for one whole consult exchange.
    pub fn new(base_url: String, token: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder().build().map_err(|e| {
            AppError::UpstreamTransport(format!("Failed to create consult client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url,
            token,
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.consult_base_url.clone(),
            config.api_token.clone(),
            config.consult_timeout(),
        )
    }

    /// Builds `{base_url}/api/v1/consult/{cpf}`.
    pub fn consult_url(&self, cpf: &Cpf) -> Result<url::Url, AppError> {
        let mut url = url::Url::parse(&self.base_url).map_err(|e| {
            AppError::UpstreamTransport(format!("Invalid consult API base URL: {}", e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                AppError::UpstreamTransport("Consult API base URL cannot be a base".to_string())
            })?
            .pop_if_empty()
            .extend(["api", "v1", "consult", cpf.as_str()]);

        Ok(url)
    }

    /// Looks up a CPF, making exactly one request.
    ///
    /// The deadline covers sending the request and reading the full body. The
    /// timer lives inside the `timeout` future and is dropped with it, whatever
    /// the outcome.
    ///
    /// # Returns
    ///
    /// * `Ok(UpstreamResponse)` - The upstream answered with JSON (any status).
    /// * `Err(AppError::UpstreamTimeout)` - The deadline elapsed.
    /// * `Err(AppError::UpstreamTransport)` - Connection or read failure.
    /// * `Err(AppError::UpstreamMalformedResponse)` - The body was not JSON.
    pub async fn consult(&self, cpf: &Cpf) -> Result<UpstreamResponse, AppError> {
        let url = self.consult_url(cpf)?;
        tracing::info!("Querying consult API for CPF {}", cpf.masked());

        let (status, body) = tokio::time::timeout(self.timeout, self.fetch(url)).await??;
        tracing::info!("Consult API status: {}", status);

        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(json) => {
                tracing::info!("Consult API response received successfully");
                Ok(UpstreamResponse { status, body: json })
            }
            Err(e) => {
                tracing::debug!("Consult API body is not JSON: {}", e);
                Err(AppError::malformed_response(&body))
            }
        }
    }

    async fn fetch(&self, url: url::Url) -> Result<(StatusCode, String), AppError> {
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        Ok((status, body))
    }
}
