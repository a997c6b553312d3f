use super::{query_string, read_form, views};
use crate::api::ApiError;
use crate::browse::{self, ListPage, ListQuery};
use crate::domain::insights::portfolio_stats;
use crate::domain::PropertyView;
use crate::forms::parse_query;
use crate::responses::{csv_response, html_response, redirect, xlsx_response, ResultResp};
use crate::spreadsheets::{export_properties_csv, export_properties_xlsx};
use crate::state::AppState;
use crate::templates::pages::{dashboard_page, data_studio_page, ListVm};
use astra::Request;
use chrono::Utc;
use tracing::{info, warn};

/// Fetch, resolve and run the list query. A failed fetch yields an empty
/// list plus the error for the banner.
fn load(state: &AppState, query: &ListQuery) -> (ListVm, Vec<PropertyView>) {
    let (all, error) = match state.api.list_properties() {
        Ok(records) => (views(&records), None),
        Err(err) => (Vec::new(), Some(err)),
    };
    let neighborhoods = browse::neighborhoods(&all, state.neighborhoods.as_ref());
    let page = browse::run(all.clone(), query, state.neighborhoods.as_ref());
    let vm = ListVm {
        query: query.clone(),
        page,
        neighborhoods,
        stats: portfolio_stats(&all),
        error,
        notice: None,
    };
    (vm, all)
}

pub fn dashboard(req: &Request, state: &AppState) -> ResultResp {
    let query = ListQuery::from_query(query_string(req));
    let (mut vm, _) = load(state, &query);

    let params = parse_query(req.uri().query());
    vm.notice = match params.get("notice") {
        Some("deleted") => Some("Property deleted.".to_string()),
        Some("bulk") => {
            let deleted = params.get("deleted").unwrap_or("0");
            match params.get("failed").filter(|f| *f != "0") {
                Some(failed) => Some(format!("Deleted {deleted}. {failed} could not be deleted.")),
                None => Some(format!("Deleted {deleted}.")),
            }
        }
        _ => None,
    };
    html_response(dashboard_page(&vm))
}

pub fn data_studio(req: &Request, state: &AppState) -> ResultResp {
    let query = ListQuery::from_query(query_string(req));
    let (mut vm, all) = load(state, &query);
    // Stats follow the filters here, unlike the dashboard.
    let matched = browse::filter::apply(all, &query.filters, state.neighborhoods.as_ref());
    vm.stats = portfolio_stats(&matched);
    html_response(data_studio_page(&vm))
}

/// Every property matching the query, sorted, ignoring "load more" paging.
fn export_rows(req: &Request, state: &AppState) -> Result<Vec<PropertyView>, ApiError> {
    let mut query = ListQuery::from_query(query_string(req));
    query.shown = usize::MAX;
    query.group = browse::group::GroupBy::None;
    let records = state.api.list_properties()?;
    let page: ListPage = browse::run(views(&records), &query, state.neighborhoods.as_ref());
    Ok(page.visible)
}

fn export_name(ext: &str) -> String {
    format!("properties_{}.{ext}", Utc::now().format("%Y-%m-%d"))
}

pub fn export_csv(req: &Request, state: &AppState) -> ResultResp {
    match export_rows(req, state) {
        Ok(rows) => {
            info!(rows = rows.len(), "csv export");
            csv_response(export_properties_csv(&rows)?, &export_name("csv"))
        }
        Err(err) => export_failed(req, state, err),
    }
}

pub fn export_xlsx(req: &Request, state: &AppState) -> ResultResp {
    match export_rows(req, state) {
        Ok(rows) => {
            info!(rows = rows.len(), "xlsx export");
            let buffer = export_properties_xlsx(&rows)?;
            xlsx_response(buffer, &export_name("xlsx"))
        }
        Err(err) => export_failed(req, state, err),
    }
}

/// Show the Data Studio page again with the backend error.
fn export_failed(req: &Request, state: &AppState, err: ApiError) -> ResultResp {
    warn!(error = %err, "export failed");
    let query = ListQuery::from_query(query_string(req));
    let (mut vm, _) = load(state, &query);
    vm.error = Some(err);
    html_response(data_studio_page(&vm))
}

/// Bulk actions on the checked rows: `action=delete` or `action=export`.
pub fn bulk(mut req: Request, state: &AppState) -> ResultResp {
    let form = read_form(&mut req)?;
    let ids: Vec<&str> = form.get_all("ids");

    match form.get("action") {
        Some("delete") => {
            let mut deleted = 0;
            let mut failed = 0;
            for id in &ids {
                match state.api.delete_property(id) {
                    Ok(()) => {
                        state.board.cancel(id);
                        deleted += 1;
                    }
                    Err(err) => {
                        warn!(property_id = id, error = %err, "bulk delete failed");
                        failed += 1;
                    }
                }
            }
            info!(deleted, failed, "bulk delete");
            redirect(&format!("/?notice=bulk&deleted={deleted}&failed={failed}"))
        }
        Some("export") => match state.api.list_properties() {
            Ok(records) => {
                // Keep list order, not checkbox order.
                let selected: Vec<PropertyView> = views(&records)
                    .into_iter()
                    .filter(|p| ids.contains(&p.id.as_str()))
                    .collect();
                csv_response(export_properties_csv(&selected)?, &export_name("csv"))
            }
            Err(err) => {
                let (mut vm, _) = load(state, &ListQuery::default());
                vm.error = Some(err);
                html_response(dashboard_page(&vm))
            }
        },
        _ => redirect("/"),
    }
}
