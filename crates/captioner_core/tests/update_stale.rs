use captioner_core::{update, AppState, Effect, ImageFile, Msg, UploadError, UploadErrorKind};

fn image(name: &str, bytes: &[u8]) -> ImageFile {
    ImageFile {
        file_name: name.to_string(),
        mime_type: "image/jpeg".to_string(),
        bytes: bytes.to_vec(),
    }
}

fn request_of(effects: &[Effect]) -> u64 {
    match effects {
        [Effect::SubmitImage { request, .. }] => *request,
        other => panic!("expected exactly one SubmitImage effect, got {other:?}"),
    }
}

#[test]
fn second_selection_supersedes_in_flight_upload() {
    let state = AppState::new();
    let (state, effects_a) = update(state, Msg::ImageSelected(image("a.jpg", b"aaaa")));
    let request_a = request_of(&effects_a);

    // B is selected while A is still in flight.
    let (state, effects_b) = update(state, Msg::ImageSelected(image("b.jpg", b"bbbb")));
    let request_b = request_of(&effects_b);
    assert_ne!(request_a, request_b);

    // A's late resolution must not overwrite the state owned by B.
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            request: request_a,
            result: Ok("a dog".to_string()),
        },
    );
    let view = state.view();
    assert!(view.is_uploading);
    assert_eq!(view.selected_file.as_deref(), Some("b.jpg"));
    assert_eq!(view.caption, None);

    let (state, _) = update(
        state,
        Msg::UploadFinished {
            request: request_b,
            result: Ok("a cat".to_string()),
        },
    );
    assert_eq!(state.view().caption.as_deref(), Some("a cat"));
}

#[test]
fn resolutions_out_of_order_still_reflect_latest_selection() {
    let state = AppState::new();
    let (state, effects_a) = update(state, Msg::ImageSelected(image("a.jpg", b"aaaa")));
    let request_a = request_of(&effects_a);
    let (state, effects_b) = update(state, Msg::ImageSelected(image("b.jpg", b"bbbb")));
    let request_b = request_of(&effects_b);

    // B resolves first, then A trickles in.
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            request: request_b,
            result: Ok("a cat".to_string()),
        },
    );
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            request: request_a,
            result: Ok("a dog".to_string()),
        },
    );

    assert_eq!(state.view().caption.as_deref(), Some("a cat"));
}

#[test]
fn stale_error_does_not_overwrite_later_outcome() {
    let state = AppState::new();
    let (state, effects_a) = update(state, Msg::ImageSelected(image("a.jpg", b"aaaa")));
    let request_a = request_of(&effects_a);
    let (state, effects_b) = update(state, Msg::ImageSelected(image("b.jpg", b"bbbb")));
    let request_b = request_of(&effects_b);

    let (state, _) = update(
        state,
        Msg::UploadFinished {
            request: request_b,
            result: Ok("a cat".to_string()),
        },
    );
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            request: request_a,
            result: Err(UploadError::new(UploadErrorKind::Timeout, "no response")),
        },
    );

    let view = state.view();
    assert_eq!(view.caption.as_deref(), Some("a cat"));
    assert_eq!(view.error_text, None);
}

#[test]
fn repeated_identical_selections_are_independent_cycles() {
    let state = AppState::new();
    let (state, effects_first) = update(state, Msg::ImageSelected(image("cat.png", b"pngpng")));
    let first = request_of(&effects_first);
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            request: first,
            result: Ok("a cat".to_string()),
        },
    );

    // Same image again: fresh request id, no leaked caption while uploading.
    let (state, effects_second) = update(state, Msg::ImageSelected(image("cat.png", b"pngpng")));
    let second = request_of(&effects_second);
    assert_eq!(second, first + 1);
    let view = state.view();
    assert!(view.is_uploading);
    assert_eq!(view.caption, None);

    let (state, _) = update(
        state,
        Msg::UploadFinished {
            request: second,
            result: Ok("a cat".to_string()),
        },
    );
    assert_eq!(state.view().caption.as_deref(), Some("a cat"));
}

#[test]
fn resolution_with_unknown_request_is_ignored_in_idle() {
    let state = AppState::new();
    let (next, effects) = update(
        state.clone(),
        Msg::UploadFinished {
            request: 42,
            result: Ok("a ghost".to_string()),
        },
    );

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
