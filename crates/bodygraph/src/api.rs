//! JSON request/response envelope shared by every front end.

use crate::blueprint::{build_blueprint, Blueprint, BlueprintRequest, BlueprintSettings};
use crate::ephemeris::EphemerisSource;
use crate::error::ChartError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RequestError {
    pub fn status(&self) -> u16 {
        match self {
            Self::InvalidJson(_) | Self::Chart(_) => 400,
            Self::Internal(_) => 500,
        }
    }
}

/// `{success, data?, error?}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Parse a request body and build the blueprint.
pub fn process_request(
    body: &str,
    settings: &BlueprintSettings,
    source: Option<&dyn EphemerisSource>,
) -> Result<Blueprint, RequestError> {
    let request: BlueprintRequest = serde_json::from_str(body)?;
    Ok(build_blueprint(&request, settings, source)?)
}

/// Status code plus envelope for a request body.
pub fn handle_request(
    body: &str,
    settings: &BlueprintSettings,
    source: Option<&dyn EphemerisSource>,
) -> (u16, ApiResponse<Blueprint>) {
    match process_request(body, settings, source) {
        Ok(blueprint) => (200, ApiResponse::ok(blueprint)),
        Err(e) => {
            log::warn!("Failed to generate blueprint: {}", e);
            (e.status(), ApiResponse::err(format!("Failed to generate blueprint: {e}")))
        }
    }
}

/// Like `handle_request`, with the envelope already serialized to JSON.
pub fn respond(
    body: &str,
    settings: &BlueprintSettings,
    source: Option<&dyn EphemerisSource>,
) -> (u16, String) {
    let (status, response) = handle_request(body, settings, source);
    match serde_json::to_string(&response) {
        Ok(json) => (status, json),
        Err(e) => {
            let error = RequestError::Internal(format!("failed to serialize response: {e}"));
            log::error!("{}", error);
            let fallback = ApiResponse::<()>::err(error.to_string());
            let json = serde_json::to_string(&fallback)
                .unwrap_or_else(|_| r#"{"success":false}"#.to_string());
            (error.status(), json)
        }
    }
}
