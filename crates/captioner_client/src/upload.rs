use std::time::Duration;

use client_logging::{client_debug, client_warn};
use reqwest::multipart::{Form, Part};
use thiserror::Error;
use url::Url;

use crate::{CaptionResponse, FailureKind, ImagePayload, RequestId, UploadError};

/// Multipart field name the captioning service expects.
const IMAGE_FIELD: &str = "image";

/// Fixed path the captioning service exposes.
const PREDICT_PATH: &str = "/predict";

const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Environment variable that overrides the service base URL.
pub const BASE_URL_ENV: &str = "CAPTIONER_BASE_URL";

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl UploadSettings {
    /// Default settings with the base URL taken from `CAPTIONER_BASE_URL`
    /// when the variable is set and non-empty.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(value) = std::env::var(BASE_URL_ENV) {
            let value = value.trim();
            if !value.is_empty() {
                settings.base_url = value.to_string();
            }
        }
        settings
    }
}

/// Fatal construction failure. Deliberately distinct from [`UploadError`]:
/// a malformed base URL is a configuration bug, not an upload outcome.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid base url {base_url:?}: {source}")]
    InvalidBaseUrl {
        base_url: String,
        source: url::ParseError,
    },
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    /// Issues exactly one multipart POST for `image`. At-most-once: no
    /// retries, no caching. Every expected failure mode comes back as an
    /// [`UploadError`]; this never panics past its boundary.
    async fn submit(
        &self,
        request: RequestId,
        image: ImagePayload,
    ) -> Result<CaptionResponse, UploadError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestUploader {
    client: reqwest::Client,
    endpoint: Url,
}

impl ReqwestUploader {
    pub fn new(settings: UploadSettings) -> Result<Self, BuildError> {
        let base = Url::parse(&settings.base_url).map_err(|source| BuildError::InvalidBaseUrl {
            base_url: settings.base_url.clone(),
            source,
        })?;
        let endpoint = base
            .join(PREDICT_PATH)
            .map_err(|source| BuildError::InvalidBaseUrl {
                base_url: settings.base_url.clone(),
                source,
            })?;

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()?;

        Ok(Self { client, endpoint })
    }

    /// Resolved `{base_url}/predict` endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn image_part(image: &ImagePayload) -> Part {
        let part = Part::stream(reqwest::Body::from(image.bytes.clone()))
            .file_name(image.file_name.clone());
        match part.mime_str(&image.mime_type) {
            Ok(part) => part,
            Err(_) => {
                client_warn!(
                    "unparseable mime type {:?} for {}; sending as octet-stream",
                    image.mime_type,
                    image.file_name
                );
                Part::stream(reqwest::Body::from(image.bytes.clone()))
                    .file_name(image.file_name.clone())
            }
        }
    }
}

#[async_trait::async_trait]
impl Uploader for ReqwestUploader {
    async fn submit(
        &self,
        request: RequestId,
        image: ImagePayload,
    ) -> Result<CaptionResponse, UploadError> {
        client_debug!(
            "request {}: uploading {} ({} bytes) to {}",
            request,
            image.file_name,
            image.bytes.len(),
            self.endpoint
        );

        let form = Form::new().part(IMAGE_FIELD, Self::image_part(&image));
        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::new(
                FailureKind::Network {
                    status: Some(status.as_u16()),
                },
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        parse_caption(&body)
    }
}

fn parse_caption(body: &[u8]) -> Result<CaptionResponse, UploadError> {
    serde_json::from_slice::<CaptionResponse>(body)
        .map_err(|err| UploadError::new(FailureKind::InvalidResponse, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> UploadError {
    if err.is_timeout() {
        return UploadError::new(FailureKind::Timeout, err.to_string());
    }
    let status = err.status().map(|code| code.as_u16());
    UploadError::new(FailureKind::Network { status }, err.to_string())
}
