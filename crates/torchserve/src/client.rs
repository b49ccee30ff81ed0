//! HTTP client for the TorchServe prediction endpoint.
//!
//! Wraps the TorchServe inference API (raw prompt in, pixel array out)
//! using [`reqwest`]. The caller decides failure handling; this client
//! performs no retries.

use async_trait::async_trait;
use image::RgbImage;

use crate::pixels::{self, PixelError};

/// Errors from the inference layer.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("Inference request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// TorchServe returned a non-2xx status code.
    #[error("TorchServe error ({status}): {body}")]
    Endpoint {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body could not be decoded as an image.
    #[error(transparent)]
    Pixels(#[from] PixelError),
}

/// Produces a raster image for a text prompt.
///
/// The seam between the orchestrator and the inference engine; production
/// code uses [`TorchServeClient`], tests substitute stubs.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<RgbImage, InferenceError>;
}

/// HTTP client for a single TorchServe model endpoint.
pub struct TorchServeClient {
    client: reqwest::Client,
    prediction_url: String,
}

impl TorchServeClient {
    /// Create a new client for a prediction endpoint.
    ///
    /// * `prediction_url` - Full model URL, e.g.
    ///   `http://localhost:8080/predictions/sd3`.
    pub fn new(prediction_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            prediction_url,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling).
    pub fn with_client(client: reqwest::Client, prediction_url: String) -> Self {
        Self {
            client,
            prediction_url,
        }
    }

    /// Prediction endpoint URL this client targets.
    pub fn prediction_url(&self) -> &str {
        &self.prediction_url
    }
}

#[async_trait]
impl ImageGenerator for TorchServeClient {
    /// Run inference for a prompt.
    ///
    /// Sends the raw prompt text as the request body (TorchServe's text
    /// handler convention) and decodes the JSON pixel array response.
    async fn generate(&self, prompt: &str) -> Result<RgbImage, InferenceError> {
        tracing::debug!(url = %self.prediction_url, "Sending inference request");

        let response = self
            .client
            .post(&self.prediction_url)
            .body(prompt.to_owned())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(InferenceError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        Ok(pixels::decode_pixels(&body)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
