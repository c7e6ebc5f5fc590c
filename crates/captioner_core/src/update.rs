use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ImageSelected(image) => {
            // Supersede policy: a new selection always wins, even while an
            // earlier upload is in flight. The stale resolution is dropped
            // when it arrives because its request id no longer matches.
            let request = state.begin_upload(image.file_name.clone());
            vec![Effect::SubmitImage { request, image }]
        }
        Msg::UploadFinished { request, result } => {
            state.apply_upload_result(request, result);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
