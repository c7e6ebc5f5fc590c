use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use captioner_client::{BuildError, ClientEvent, ClientHandle, ImagePayload, UploadSettings};
use captioner_core::{Effect, Msg, UploadError, UploadErrorKind};
use client_logging::{client_info, client_warn};

/// Executes core effects against the upload client and feeds completions
/// back into the update loop as messages.
pub struct EffectRunner {
    client: Arc<ClientHandle>,
}

impl EffectRunner {
    pub fn new(settings: UploadSettings, msg_tx: mpsc::Sender<Msg>) -> Result<Self, BuildError> {
        let client = Arc::new(ClientHandle::new(settings)?);
        let runner = Self { client };
        runner.spawn_event_loop(msg_tx);
        Ok(runner)
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitImage { request, image } => {
                    client_info!(
                        "SubmitImage request={} file={} bytes={}",
                        request,
                        image.file_name,
                        image.bytes.len()
                    );
                    self.client.submit(request, to_payload(image));
                }
            }
        }
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let client = self.client.clone();
        thread::spawn(move || loop {
            if let Some(event) = client.try_recv() {
                let ClientEvent::UploadFinished { request, result } = event;
                let result = match result {
                    Ok(response) => Ok(response.caption),
                    Err(error) => {
                        client_warn!("upload {} failed: {}", request, error.kind);
                        Err(map_error(error))
                    }
                };
                if msg_tx.send(Msg::UploadFinished { request, result }).is_err() {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

fn to_payload(image: captioner_core::ImageFile) -> ImagePayload {
    ImagePayload {
        file_name: image.file_name,
        mime_type: image.mime_type,
        bytes: image.bytes.into(),
    }
}

/// Client errors and core errors are separate types on purpose; the core
/// stays free of IO dependencies. This is the one place they meet.
fn map_error(error: captioner_client::UploadError) -> UploadError {
    let kind = match error.kind {
        captioner_client::FailureKind::Network { status } => UploadErrorKind::Network { status },
        captioner_client::FailureKind::Timeout => UploadErrorKind::Timeout,
        captioner_client::FailureKind::InvalidResponse => UploadErrorKind::InvalidResponse,
    };
    UploadError::new(kind, error.message)
}
