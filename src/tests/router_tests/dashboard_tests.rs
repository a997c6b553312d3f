// src/tests/router_tests/dashboard_tests.rs

use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, get, header, make_state, post_form, sample_property, FakeApi, LIST};
use std::sync::Arc;

fn seeded() -> Arc<FakeApi> {
    let api = Arc::new(FakeApi::new());
    api.insert_json(sample_property("a", "123 Main St, Unit 4A, Springfield, IL 62701"));
    api.insert_json(sample_property("b", "9 Oak Ave, Portland, OR 97201"));
    api
}

#[test]
fn dashboard_lists_properties() {
    let state = make_state(seeded());
    let mut resp = handle(get("/"), &state).unwrap();

    assert_eq!(resp.status(), 200);
    let body = body_string(&mut resp);
    assert!(body.contains("123 Main St, Unit 4A"));
    assert!(body.contains("9 Oak Ave"));
    assert!(body.contains("2 matching properties"));
}

#[test]
fn search_filters_by_address() {
    let state = make_state(seeded());
    let mut resp = handle(get("/?q=main"), &state).unwrap();
    let body = body_string(&mut resp);

    assert!(body.contains("123 Main St"));
    assert!(!body.contains("9 Oak Ave"));
    assert!(body.contains("1 matching property"));
}

#[test]
fn grouping_by_building_shows_group_headings() {
    let state = make_state(seeded());
    let mut resp = handle(get("/?group=building"), &state).unwrap();
    let body = body_string(&mut resp);
    assert!(body.contains("<h3>123 Main St, Springfield "));
}

#[test]
fn unauthorized_backend_is_a_soft_banner() {
    let api = Arc::new(FakeApi::new());
    api.fail_with(LIST, 401);
    let state = make_state(api);

    let mut resp = handle(get("/"), &state).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(&mut resp);
    assert!(body.contains("banner-warning"));
    assert!(body.contains("session may have expired"));
}

#[test]
fn bulk_delete_removes_selected() {
    let api = seeded();
    let state = make_state(api.clone());

    let resp = handle(post_form("/properties/bulk", "ids=a&ids=b&action=delete"), &state).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(header(&resp, "Location"), "/?notice=bulk&deleted=2&failed=0");
    assert!(api.ids().is_empty());
}

#[test]
fn bulk_delete_reports_failures() {
    let api = seeded();
    api.fail_with("b", 500);
    let state = make_state(api.clone());

    let resp = handle(post_form("/properties/bulk", "ids=a&ids=b&action=delete"), &state).unwrap();
    assert_eq!(header(&resp, "Location"), "/?notice=bulk&deleted=1&failed=1");

    let mut page = handle(get("/?notice=bulk&deleted=1&failed=1"), &state).unwrap();
    assert!(body_string(&mut page).contains("Deleted 1. 1 could not be deleted."));
}

#[test]
fn bulk_export_returns_selected_rows() {
    let state = make_state(seeded());
    let mut resp = handle(post_form("/properties/bulk", "ids=b&action=export"), &state).unwrap();

    assert_eq!(resp.status(), 200);
    assert!(header(&resp, "Content-Type").starts_with("text/csv"));
    let body = body_string(&mut resp);
    assert_eq!(body.lines().count(), 2);
    assert!(body.contains("9 Oak Ave"));
}

#[test]
fn health_does_not_touch_backend() {
    let api = Arc::new(FakeApi::new());
    api.fail_with(LIST, 500);
    let state = make_state(api);

    let mut resp = handle(get("/health"), &state).unwrap();
    assert_eq!(body_string(&mut resp), "ok");
}

#[test]
fn unknown_route_is_not_found() {
    let state = make_state(Arc::new(FakeApi::new()));
    assert!(matches!(handle(get("/nope"), &state), Err(ServerError::NotFound)));
    assert!(matches!(
        handle(get("/properties/a/unknown"), &state),
        Err(ServerError::NotFound)
    ));
}
