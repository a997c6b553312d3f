// src/tests/router_tests/report_tests.rs

use crate::router::handle;
use crate::tests::utils::{body_string, get, make_state, post_form, sample_property, FakeApi};
use std::sync::Arc;

fn shared() -> Arc<FakeApi> {
    let api = Arc::new(FakeApi::new());
    api.insert_json(sample_property("p1", "123 Main St, Springfield, IL 62701"));
    api.share_report("abc", "p1");
    api
}

#[test]
fn public_report_renders_and_logs_the_view() {
    let api = shared();
    let state = make_state(api.clone());

    let mut resp = handle(get("/report/abc"), &state).unwrap();

    assert_eq!(resp.status(), 200);
    let body = body_string(&mut resp);
    assert!(body.contains("123 Main St, Springfield, IL 62701"));
    assert!(body.contains("$500,000"));
    assert!(body.contains("/report/abc/chat"));
    assert_eq!(*api.views.lock().unwrap(), vec!["abc".to_string()]);
}

#[test]
fn unknown_token_is_not_found() {
    let state = make_state(shared());
    let mut resp = handle(get("/report/nope"), &state).unwrap();

    assert_eq!(resp.status(), 404);
    assert!(body_string(&mut resp).contains("Report not found"));
}

#[test]
fn expired_token_is_gone() {
    let api = shared();
    api.fail_with("abc", 410);
    let state = make_state(api.clone());

    let mut resp = handle(get("/report/abc"), &state).unwrap();

    assert_eq!(resp.status(), 410);
    assert!(body_string(&mut resp).contains("This link has expired"));
    assert!(api.views.lock().unwrap().is_empty());
}

#[test]
fn chat_answers_from_the_property() {
    let state = make_state(shared());
    let mut resp = handle(
        post_form("/report/abc/chat", "question=How+much+does+it+cost%3F"),
        &state,
    )
    .unwrap();

    let body = body_string(&mut resp);
    assert!(body.contains("chat-visitor"));
    assert!(body.contains("How much does it cost?"));
    assert!(body.contains("The estimated market value is $500,000"));
}

#[test]
fn blank_chat_question_adds_nothing() {
    let state = make_state(shared());
    let mut resp = handle(post_form("/report/abc/chat", "question=++"), &state).unwrap();
    assert!(body_string(&mut resp).is_empty());
}
