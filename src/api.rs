//! Blocking client for the model server.
//!
//! Every call blocks the calling thread, so the screen only invokes these
//! from worker threads (see `app::tasks`).

use crate::config::AppConfig;
use serde::{Deserialize, Serialize};
use std::io::Read;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(String),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Body of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadRequest {
    /// Base64 image payload, `null` when the image could not be read
    pub file: Option<String>,
    pub filename: String,
    pub height: f64,
}

#[derive(Debug, Default, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<String>,
}

/// Where mesh and image assets come from.
pub trait AssetSource: Send + Sync {
    fn fetch_text(&self, url: &str) -> Result<String, ApiError>;
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}

/// The server's action endpoints.
pub trait ServerApi: Send + Sync {
    /// Returns the server's `message` on success.
    fn upload(&self, request: &UploadRequest) -> Result<String, ApiError>;
    /// Returns the server's `message` on success.
    fn generate(&self) -> Result<String, ApiError>;
}

pub struct HttpClient {
    agent: ureq::Agent,
    upload_url: String,
    generate_url: String,
}

impl HttpClient {
    pub fn new(config: &AppConfig) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Self {
            agent: builder.build(),
            upload_url: config.upload_url(),
            generate_url: config.generate_url(),
        }
    }

    fn get(&self, url: &str) -> Result<ureq::Response, ApiError> {
        log::debug!("GET {}", url);
        self.agent.get(url).call().map_err(Self::convert_error)
    }

    /// Convert ureq error to ApiError, keeping the server's `error` field when present
    fn convert_error(e: ureq::Error) -> ApiError {
        match e {
            ureq::Error::Status(status, response) => {
                let body = response.into_string().unwrap_or_default();
                let message = serde_json::from_str::<ErrorResponse>(&body)
                    .ok()
                    .and_then(|r| r.error)
                    .unwrap_or_else(|| body.trim().to_string());
                ApiError::Status { status, message }
            }
            ureq::Error::Transport(transport) => ApiError::Transport(transport.to_string()),
        }
    }

    /// Like `convert_error`, but the status body must be the server's JSON
    /// error object. Anything else is a decode failure.
    fn convert_json_error(e: ureq::Error) -> ApiError {
        match e {
            ureq::Error::Status(status, response) => {
                let body = response.into_string().unwrap_or_default();
                Self::json_status_error(status, &body)
            }
            other => Self::convert_error(other),
        }
    }

    fn json_status_error(status: u16, body: &str) -> ApiError {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(response) => ApiError::Status {
                status,
                message: response.error.unwrap_or_default(),
            },
            Err(e) => ApiError::Decode(e.to_string()),
        }
    }

    fn read_message(response: ureq::Response) -> Result<String, ApiError> {
        let body: MessageResponse = response
            .into_json()
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(body.message.unwrap_or_default())
    }
}

impl AssetSource for HttpClient {
    fn fetch_text(&self, url: &str) -> Result<String, ApiError> {
        let mut body = String::new();
        self.get(url)?
            .into_reader()
            .read_to_string(&mut body)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(body)
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let mut body = Vec::new();
        self.get(url)?
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(body)
    }
}

impl ServerApi for HttpClient {
    fn upload(&self, request: &UploadRequest) -> Result<String, ApiError> {
        log::info!(
            "POST {} ({}, height {})",
            self.upload_url,
            request.filename,
            request.height
        );
        let response = self
            .agent
            .post(&self.upload_url)
            .set("Content-Type", "application/json")
            .send_json(request)
            .map_err(Self::convert_json_error)?;
        Self::read_message(response)
    }

    fn generate(&self) -> Result<String, ApiError> {
        log::info!("POST {}", self.generate_url);
        let response = self
            .agent
            .post(&self.generate_url)
            .call()
            .map_err(Self::convert_error)?;
        Self::read_message(response)
    }
}
