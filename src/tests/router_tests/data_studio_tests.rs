// src/tests/router_tests/data_studio_tests.rs

use crate::router::handle;
use crate::tests::utils::{body_bytes, body_string, get, header, make_state, sample_property, FakeApi, LIST};
use std::sync::Arc;

fn seeded() -> Arc<FakeApi> {
    let api = Arc::new(FakeApi::new());
    api.insert_json(sample_property("a", "1 Alder Rd, Austin, TX 78701"));
    api.insert_json(sample_property("b", "2 Birch Rd, Austin, TX 78701"));
    api.insert_json(sample_property("c", "3 Cedar Ln, Boise, ID 83702"));
    api
}

#[test]
fn data_studio_links_exports_with_current_filters() {
    let state = make_state(seeded());
    let mut resp = handle(get("/data-studio?q=rd"), &state).unwrap();

    let body = body_string(&mut resp);
    assert!(body.contains("/data-studio/export.csv?"));
    assert!(body.contains("/data-studio/export.xlsx?"));
    assert!(body.contains("q=rd"));
    assert!(body.contains("2 matching properties"));
}

#[test]
fn csv_export_has_a_row_per_property_plus_header() {
    let state = make_state(seeded());
    let mut resp = handle(get("/data-studio/export.csv"), &state).unwrap();

    assert_eq!(resp.status(), 200);
    assert!(header(&resp, "Content-Type").starts_with("text/csv"));
    assert!(header(&resp, "Content-Disposition").contains("properties_"));
    let body = body_string(&mut resp);
    assert_eq!(body.lines().count(), 4);
    assert!(body.starts_with("Address,Bedrooms"));
}

#[test]
fn csv_export_follows_filters() {
    let state = make_state(seeded());
    let mut resp = handle(get("/data-studio/export.csv?q=austin"), &state).unwrap();

    let body = body_string(&mut resp);
    assert_eq!(body.lines().count(), 3);
    assert!(!body.contains("Cedar"));
}

#[test]
fn csv_export_ignores_load_more_paging() {
    let api = Arc::new(FakeApi::new());
    for i in 0..30 {
        api.insert_json(sample_property(&format!("p{i}"), &format!("{i} Elm St, Austin, TX 78701")));
    }
    let state = make_state(api);

    let mut resp = handle(get("/data-studio/export.csv?shown=5"), &state).unwrap();
    assert_eq!(body_string(&mut resp).lines().count(), 31);
}

#[test]
fn xlsx_export_is_a_workbook() {
    let state = make_state(seeded());
    let mut resp = handle(get("/data-studio/export.xlsx"), &state).unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(
        header(&resp, "Content-Type"),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert!(header(&resp, "Content-Disposition").contains(".xlsx"));
    assert!(body_bytes(&mut resp).starts_with(b"PK"));
}

#[test]
fn export_failure_shows_banner_instead_of_file() {
    let api = seeded();
    api.fail_with(LIST, 503);
    let state = make_state(api);

    let mut resp = handle(get("/data-studio/export.csv"), &state).unwrap();

    assert!(header(&resp, "Content-Type").starts_with("text/html"));
    assert!(body_string(&mut resp).contains("banner"));
}
