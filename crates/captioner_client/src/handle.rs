use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use client_logging::client_error;

use crate::upload::{BuildError, ReqwestUploader, UploadSettings, Uploader};
use crate::{ClientEvent, ImagePayload, RequestId};

enum ClientCommand {
    Submit {
        request: RequestId,
        image: ImagePayload,
    },
}

/// Bridges the synchronous caller to a dedicated thread owning a tokio
/// runtime. Commands go in over a channel; completion events come back
/// tagged with the request id they were submitted under.
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    event_rx: Mutex<mpsc::Receiver<ClientEvent>>,
}

impl ClientHandle {
    pub fn new(settings: UploadSettings) -> Result<Self, BuildError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let uploader = Arc::new(ReqwestUploader::new(settings)?);

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    client_error!("failed to start upload runtime: {err}");
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let uploader = uploader.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(uploader.as_ref(), command, event_tx).await;
                });
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
        })
    }

    pub fn submit(&self, request: RequestId, image: ImagePayload) {
        let _ = self.cmd_tx.send(ClientCommand::Submit { request, image });
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }
}

async fn handle_command(
    uploader: &dyn Uploader,
    command: ClientCommand,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    match command {
        ClientCommand::Submit { request, image } => {
            let result = uploader.submit(request, image).await;
            let _ = event_tx.send(ClientEvent::UploadFinished { request, result });
        }
    }
}
