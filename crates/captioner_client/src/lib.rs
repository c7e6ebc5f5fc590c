//! Captioner client: multipart upload IO against the captioning service.
mod handle;
mod types;
mod upload;

pub use handle::ClientHandle;
pub use types::{CaptionResponse, ClientEvent, FailureKind, ImagePayload, RequestId, UploadError};
pub use upload::{BuildError, ReqwestUploader, UploadSettings, Uploader, BASE_URL_ENV};
