// src/tests/router_tests/property_tests.rs

use crate::api::models::ShareableLink;
use crate::router::handle;
use crate::routes::properties::STOP_POLLING;
use crate::tests::utils::{
    body_string, get, header, make_state, post_form, sample_property, FakeApi,
};
use std::sync::Arc;

fn seeded() -> Arc<FakeApi> {
    let api = Arc::new(FakeApi::new());
    api.insert_json(sample_property("p1", "123 Main St, Springfield, IL 62701"));
    api
}

#[test]
fn detail_page_shows_extracted_and_market_data() {
    let state = make_state(seeded());
    let mut resp = handle(get("/properties/p1"), &state).unwrap();

    assert_eq!(resp.status(), 200);
    let body = body_string(&mut resp);
    assert!(body.contains("123 Main St, Springfield, IL 62701"));
    assert!(body.contains("$500,000"));
    assert!(body.contains("Living Room"));
    assert!(body.contains("Balcony"));
    assert!(body.contains("125 Main St"));
    assert!(body.contains("Sunny two bedroom"));
    assert!(body.contains("Floor plan quality"));
    // Not requested, so no overlay.
    assert!(!body.contains("/properties/p1/progress"));
}

#[test]
fn model_prediction_appears_once_a_model_is_trained() {
    let state = make_state(seeded());

    let mut before = handle(get("/properties/p1"), &state).unwrap();
    assert_eq!(before.status(), 200);
    assert!(!body_string(&mut before).contains("Model prediction"));

    handle(post_form("/analytics/train", "model_type=ridge"), &state).unwrap();

    let mut after = handle(get("/properties/p1"), &state).unwrap();
    let body = body_string(&mut after);
    assert!(body.contains("Model prediction"));
    assert!(body.contains("$512,000"));
    assert!(body.contains("medium confidence"));
}

#[test]
fn failing_prediction_does_not_break_the_page() {
    let api = seeded();
    api.fail_with("predict:p1", 500);
    let state = make_state(api);
    handle(post_form("/analytics/train", ""), &state).unwrap();

    let mut resp = handle(get("/properties/p1"), &state).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(&mut resp);
    assert!(body.contains("Sunny two bedroom"));
    assert!(!body.contains("Model prediction"));
}

#[test]
fn unknown_property_is_a_404_page() {
    let state = make_state(Arc::new(FakeApi::new()));
    let resp = handle(get("/properties/ghost"), &state).unwrap();
    assert_eq!(resp.status(), 404);
}

#[test]
fn show_progress_retries_a_property_that_is_not_readable_yet() {
    let api = seeded();
    api.script_statuses("p1", &["missing", "missing", "complete"]);
    let state = make_state(api.clone());

    let mut resp = handle(get("/properties/p1?showProgress=true"), &state).unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(api.get_calls("p1"), 3);
    assert!(body_string(&mut resp).contains("Sunny two bedroom"));
}

#[test]
fn without_show_progress_a_404_is_not_retried() {
    let api = seeded();
    api.script_statuses("p1", &["missing", "complete"]);
    let state = make_state(api.clone());

    let resp = handle(get("/properties/p1"), &state).unwrap();

    assert_eq!(resp.status(), 404);
    assert_eq!(api.get_calls("p1"), 1);
}

#[test]
fn untracked_progress_stops_polling() {
    let state = make_state(seeded());
    let mut resp = handle(get("/properties/p1/progress"), &state).unwrap();

    assert_eq!(resp.status(), STOP_POLLING);
    assert!(body_string(&mut resp).trim().is_empty());
}

#[test]
fn saving_listing_copy_patches_the_property() {
    let api = seeded();
    let state = make_state(api.clone());

    let resp = handle(
        post_form(
            "/properties/p1/listing",
            "headline=Bright+loft&description=Top+floor&highlights=Views%0D%0ALight&seo_keywords=loft%2C+views",
        ),
        &state,
    )
    .unwrap();

    assert_eq!(resp.status(), 303);
    assert_eq!(header(&resp, "Location"), "/properties/p1?notice=saved");

    let patches = api.patches.lock().unwrap().clone();
    assert_eq!(patches.len(), 1);
    let copy = patches[0].1.listing_copy.clone().unwrap();
    assert_eq!(copy.headline.as_deref(), Some("Bright loft"));
    assert_eq!(copy.highlights, vec!["Views", "Light"]);

    let mut page = handle(get("/properties/p1?notice=saved"), &state).unwrap();
    let body = body_string(&mut page);
    assert!(body.contains("Listing copy saved."));
    assert!(body.contains("Bright loft"));
}

#[test]
fn share_generates_a_link_and_follows_return_to() {
    let api = seeded();
    let state = make_state(api.clone());

    let resp = handle(
        post_form("/properties/p1/share", "return_to=%2Fagent-tools%3Fid%3Dp1"),
        &state,
    )
    .unwrap();
    assert_eq!(header(&resp, "Location"), "/agent-tools?id=p1");

    let mut page = handle(get("/properties/p1"), &state).unwrap();
    assert!(body_string(&mut page).contains("http://localhost:3000/report/tok-p1"));
}

#[test]
fn share_reuses_an_active_link() {
    let api = seeded();
    api.set_link(
        "p1",
        ShareableLink {
            token: Some("existing".into()),
            share_url: Some("http://localhost:3000/report/existing".into()),
            expires_at: None,
            is_active: Some(true),
        },
    );
    let state = make_state(api.clone());

    let resp = handle(post_form("/properties/p1/share", ""), &state).unwrap();
    assert_eq!(header(&resp, "Location"), "/properties/p1?notice=shared");

    let mut page = handle(get("/properties/p1?notice=shared"), &state).unwrap();
    let body = body_string(&mut page);
    assert!(body.contains("report/existing"));
    assert!(!body.contains("tok-p1"));
}

#[test]
fn enrich_starts_tracking() {
    let api = seeded();
    let state = make_state(api.clone());

    let resp = handle(post_form("/properties/p1/enrich", ""), &state).unwrap();

    assert_eq!(header(&resp, "Location"), "/properties/p1?showProgress=true");
    assert_eq!(*api.enriched.lock().unwrap(), vec!["p1".to_string()]);
    assert!(state.board.snapshot("p1").is_some());
}

#[test]
fn dismissing_progress_over_htmx_returns_empty_fragment() {
    let api = seeded();
    let state = make_state(api);
    handle(post_form("/properties/p1/enrich", ""), &state).unwrap();

    let mut req = post_form("/properties/p1/progress", "");
    req.headers_mut()
        .insert("HX-Request", "true".parse().unwrap());
    let mut resp = handle(req, &state).unwrap();

    assert_eq!(resp.status(), 200);
    assert!(body_string(&mut resp).is_empty());
    assert!(state.board.snapshot("p1").is_none());
}

#[test]
fn delete_redirects_to_dashboard() {
    let api = seeded();
    let state = make_state(api.clone());

    let resp = handle(post_form("/properties/p1/delete", ""), &state).unwrap();

    assert_eq!(header(&resp, "Location"), "/?notice=deleted");
    assert!(api.ids().is_empty());
}

#[test]
fn failed_delete_stays_on_detail_with_banner() {
    let api = seeded();
    api.fail_with("p1", 500);
    let state = make_state(api.clone());

    let resp = handle(post_form("/properties/p1/delete", ""), &state).unwrap();
    // The detail fetch fails too, so the unavailable page is shown.
    assert_ne!(resp.status(), 303);
    assert_eq!(api.ids(), vec!["p1".to_string()]);
}
