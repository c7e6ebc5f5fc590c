use std::fmt;

use bytes::Bytes;
use serde::Deserialize;

/// Monotonic tag carried by every upload so the caller can match a
/// completion event to the selection that triggered it.
pub type RequestId = u64;

/// The image handed to one upload call: opaque bytes plus the metadata the
/// multipart part needs. `Bytes` keeps the payload cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

/// Success body returned by the captioning service. Extra fields are
/// tolerated; a missing or non-string `caption` makes the body invalid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaptionResponse {
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    UploadFinished {
        request: RequestId,
        result: Result<CaptionResponse, UploadError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadError {
    pub kind: FailureKind,
    pub message: String,
}

impl UploadError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Transport failure, or a non-success HTTP status when one was received.
    Network { status: Option<u16> },
    Timeout,
    /// The service answered 2xx but the body carried no usable caption.
    InvalidResponse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Network { status: Some(code) } => write!(f, "http status {code}"),
            FailureKind::Network { status: None } => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::InvalidResponse => write!(f, "invalid response"),
        }
    }
}
