use std::fmt;

use crate::view_model::AppViewModel;

/// Monotonically increasing tag for upload requests. Each selection gets a
/// fresh id so a stale resolution can be told apart from the current one.
pub type RequestId = u64;

/// An image chosen by the user: opaque bytes plus the metadata the upload
/// needs. Immutable once selected; consumed by a single upload call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadErrorKind {
    /// Transport failure or non-success HTTP status (carried when available).
    Network { status: Option<u16> },
    Timeout,
    /// A response arrived but had no string-valued `caption` field.
    InvalidResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadError {
    pub kind: UploadErrorKind,
    pub message: Option<String>,
}

impl UploadError {
    pub fn new(kind: UploadErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            UploadErrorKind::Network { status: Some(code) } => {
                write!(f, "upload failed (http {code})")?;
            }
            UploadErrorKind::Network { status: None } => write!(f, "upload failed")?,
            UploadErrorKind::Timeout => write!(f, "upload timed out")?,
            UploadErrorKind::InvalidResponse => write!(f, "service returned no caption")?,
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

/// The one UI-relevant state at any moment. Rendering derives entirely from
/// this; styling and animation live outside the core.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Uploading {
        request: RequestId,
        file_name: String,
    },
    Succeeded {
        caption: String,
    },
    Failed {
        error: UploadError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    view_state: ViewState,
    last_request: RequestId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn view(&self) -> AppViewModel {
        let (is_uploading, selected_file, caption, error_text) = match &self.view_state {
            ViewState::Idle => (false, None, None, None),
            ViewState::Uploading { file_name, .. } => {
                (true, Some(file_name.clone()), None, None)
            }
            ViewState::Succeeded { caption } => (false, None, Some(caption.clone()), None),
            ViewState::Failed { error } => (false, None, None, Some(error.to_string())),
        };
        AppViewModel {
            is_uploading,
            selected_file,
            caption,
            error_text,
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Start a new upload cycle, superseding whatever was active before.
    /// Allocates and returns the request id the upload must carry.
    pub(crate) fn begin_upload(&mut self, file_name: String) -> RequestId {
        self.last_request += 1;
        let request = self.last_request;
        self.view_state = ViewState::Uploading { request, file_name };
        self.dirty = true;
        request
    }

    /// Apply an upload resolution. A resolution whose id does not match the
    /// current `Uploading` generation is stale and must never overwrite state
    /// produced by a later selection; it is dropped without a state change.
    pub(crate) fn apply_upload_result(
        &mut self,
        request: RequestId,
        result: Result<String, UploadError>,
    ) {
        match &self.view_state {
            ViewState::Uploading { request: current, .. } if *current == request => {}
            _ => return,
        }
        self.view_state = match result {
            Ok(caption) => ViewState::Succeeded { caption },
            Err(error) => ViewState::Failed { error },
        };
        self.dirty = true;
    }
}
