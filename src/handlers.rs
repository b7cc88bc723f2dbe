use crate::config::Config;
use crate::consult_client::ConsultClient;
use crate::cpf::Cpf;
use crate::errors::AppError;
use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Client for the third-party consult API.
    pub consult_client: ConsultClient,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let consult_client = ConsultClient::from_config(&config)?;
        Ok(Self {
            config,
            consult_client,
        })
    }
}

/// Health check endpoint.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "cpf-consult-proxy",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Picks the raw CPF: the path segment when routed as `/api/consult/:cpf`,
/// otherwise the first `cpf` query parameter, otherwise an empty string.
pub fn extract_raw_cpf(path_cpf: Option<String>, query: &[(String, String)]) -> String {
    path_cpf
        .or_else(|| {
            query
                .iter()
                .find(|(key, _)| key == "cpf")
                .map(|(_, value)| value.clone())
        })
        .unwrap_or_default()
}

/// ANY /api/consult and ANY /api/consult/:cpf
///
/// Validates the CPF and relays the consult API's answer. OPTIONS is answered
/// with an empty 200, any method other than GET gets a 405, and every failure
/// becomes a JSON error body through `AppError`.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `method` - The request method.
/// * `path_cpf` - CPF from the path segment, when present.
/// * `query` - Query string as ordered key/value pairs; repeated keys are kept.
///
/// # Returns
///
/// * `Result<Response, AppError>` - The pass-through upstream response or an error.
pub async fn consult_cpf(
    State(state): State<Arc<AppState>>,
    method: Method,
    path_cpf: Option<Path<String>>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }

    if method != Method::GET {
        return Err(AppError::MethodNotAllowed);
    }

    let raw = extract_raw_cpf(path_cpf.map(|Path(cpf)| cpf), &query);
    let cpf = Cpf::parse(&raw)?;
    tracing::info!("CPF received: {}", cpf.masked());

    let upstream = state.consult_client.consult(&cpf).await?;

    Ok((upstream.status, Json(upstream.body)).into_response())
}
