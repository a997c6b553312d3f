// src/tests/router_tests/upload_tests.rs

use crate::domain::PropertyStatus;
use crate::forms::tests::multipart_body;
use crate::router::handle;
use crate::routes::properties::STOP_POLLING;
use crate::state::AppState;
use crate::tests::utils::{body_string, get, header, make_state, post_multipart, FakeApi};
use crate::upload::progress::ProgressSnapshot;
use std::sync::Arc;
use std::time::{Duration, Instant};

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfloorplan";

fn wait_until_finished(state: &AppState, id: &str) -> ProgressSnapshot {
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Some(snapshot) = state.board.snapshot(id) {
            if snapshot.finished {
                return snapshot;
            }
        }
        assert!(Instant::now() < deadline, "watcher for {id} never finished");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn new_property_form_renders() {
    let state = make_state(Arc::new(FakeApi::new()));
    let mut resp = handle(get("/properties/new"), &state).unwrap();

    assert_eq!(resp.status(), 200);
    let body = body_string(&mut resp);
    assert!(body.contains("multipart/form-data"));
    assert!(body.contains("name=\"address\""));
}

#[test]
fn valid_upload_redirects_to_progress_and_tracks_to_completion() {
    let api = Arc::new(FakeApi::new());
    api.script_statuses("new-1", &["processing", "parsing_complete", "complete"]);
    let state = make_state(api.clone());

    let body = multipart_body(
        &[("address", "  500 Pine St, Seattle, WA 98101 ")],
        Some(("file", "plan.png", "image/png", PNG)),
    );
    let resp = handle(post_multipart("/properties/new", body), &state).unwrap();

    assert_eq!(resp.status(), 303);
    assert_eq!(header(&resp, "Location"), "/properties/new-1?showProgress=true");

    let uploads = api.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].address, "500 Pine St, Seattle, WA 98101");
    assert_eq!(uploads[0].bytes, PNG);

    let snapshot = wait_until_finished(&state, "new-1");
    assert_eq!(snapshot.status, PropertyStatus::Complete);

    let mut fragment = handle(get("/properties/new-1/progress"), &state).unwrap();
    assert_eq!(fragment.status(), STOP_POLLING);
    assert!(!body_string(&mut fragment).contains("hx-trigger"));
    assert!(state.board.snapshot("new-1").is_none());
}

#[test]
fn oversized_file_is_rejected_before_upload() {
    let api = Arc::new(FakeApi::new());
    let state = make_state(api.clone());

    let big = vec![0u8; 15 * 1024 * 1024];
    let body = multipart_body(
        &[("address", "1 Main St")],
        Some(("file", "plan.png", "image/png", &big)),
    );
    let mut resp = handle(post_multipart("/properties/new", body), &state).unwrap();

    assert_eq!(resp.status(), 422);
    assert!(body_string(&mut resp).contains("The limit is 10 MB"));
    assert!(api.uploads.lock().unwrap().is_empty());
}

#[test]
fn missing_address_keeps_the_form() {
    let api = Arc::new(FakeApi::new());
    let state = make_state(api.clone());

    let body = multipart_body(
        &[("address", "   ")],
        Some(("file", "plan.pdf", "application/pdf", b"%PDF-1.4")),
    );
    let mut resp = handle(post_multipart("/properties/new", body), &state).unwrap();

    assert_eq!(resp.status(), 422);
    assert!(body_string(&mut resp).contains("Please enter the property address"));
    assert!(api.uploads.lock().unwrap().is_empty());
}

#[test]
fn unsupported_type_is_rejected() {
    let api = Arc::new(FakeApi::new());
    let state = make_state(api.clone());

    let body = multipart_body(
        &[("address", "1 Main St")],
        Some(("file", "plan.gif", "image/gif", b"GIF89a")),
    );
    let mut resp = handle(post_multipart("/properties/new", body), &state).unwrap();

    assert_eq!(resp.status(), 422);
    assert!(body_string(&mut resp).contains("Upload a PNG, JPG or PDF"));
}

#[test]
fn backend_failure_re_renders_form_with_address() {
    let api = Arc::new(FakeApi::new());
    api.fail_with("upload", 500);
    let state = make_state(api);

    let body = multipart_body(
        &[("address", "1 Main St")],
        Some(("file", "plan.png", "image/png", PNG)),
    );
    let mut resp = handle(post_multipart("/properties/new", body), &state).unwrap();

    assert_eq!(resp.status(), 200);
    let body = body_string(&mut resp);
    assert!(body.contains("value=\"1 Main St\""));
    assert!(body.contains("banner"));
}
