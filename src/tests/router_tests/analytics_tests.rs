// src/tests/router_tests/analytics_tests.rs

use crate::router::handle;
use crate::tests::utils::{body_string, get, make_state, post_form, sample_property, FakeApi};
use std::sync::Arc;

fn seeded() -> Arc<FakeApi> {
    let api = Arc::new(FakeApi::new());
    api.insert_json(sample_property("a", "1 Alder Rd, Austin, TX 78701"));
    api.insert_json(sample_property("b", "2 Birch Rd, Austin, TX 78701"));
    api
}

#[test]
fn analytics_page_shows_portfolio_totals() {
    let state = make_state(seeded());
    let mut resp = handle(get("/analytics"), &state).unwrap();

    assert_eq!(resp.status(), 200);
    let body = body_string(&mut resp);
    assert!(body.contains("$1,000,000"));
    assert!(body.contains("/analytics/train"));
}

#[test]
fn training_sends_form_choices_and_renders_metrics() {
    let api = seeded();
    let state = make_state(api.clone());

    let mut resp = handle(
        post_form("/analytics/train", "model_type=random_forest&min_properties=5"),
        &state,
    )
    .unwrap();

    let body = body_string(&mut resp);
    assert!(body.contains("0.820"));
    assert!(body.contains("square footage"));

    let trained = api.trained.lock().unwrap().clone();
    assert_eq!(trained.len(), 1);
    assert_eq!(trained[0].model_type, "random_forest");
    assert_eq!(trained[0].min_properties, 5);
}

#[test]
fn training_falls_back_to_defaults() {
    let api = seeded();
    let state = make_state(api.clone());

    handle(post_form("/analytics/train", "model_type=magic&min_properties=x"), &state).unwrap();

    let trained = api.trained.lock().unwrap().clone();
    assert_eq!(trained[0].model_type, "ridge");
    assert_eq!(trained[0].min_properties, 10);
}

#[test]
fn training_failure_renders_banner() {
    let api = seeded();
    api.fail_with("train", 400);
    let state = make_state(api);

    let mut resp = handle(post_form("/analytics/train", ""), &state).unwrap();
    assert!(body_string(&mut resp).contains("banner"));
}

#[test]
fn sqft_impact_fragment() {
    let state = make_state(seeded());
    let mut resp = handle(get("/analytics/sqft-impact?train_model=true"), &state).unwrap();

    let body = body_string(&mut resp);
    assert!(body.contains("$450 per sq ft"));
    assert!(body.contains("$225,000"));
}

#[test]
fn agent_tools_shows_listing_and_social_copy() {
    let state = make_state(seeded());
    let mut resp = handle(get("/agent-tools?id=b"), &state).unwrap();

    assert_eq!(resp.status(), 200);
    let body = body_string(&mut resp);
    assert!(body.contains("2 Birch Rd"));
    assert!(body.contains("Just listed!"));
    assert!(body.contains("X / Twitter"));
    assert!(body.contains("Sunny two bedroom"));
}
