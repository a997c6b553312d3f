use crate::api::ApiError;
use crate::browse::{ListPage, ListQuery};
use crate::domain::insights::{format_currency, PortfolioStats};
use crate::templates::components::property_table::{filter_form, property_list, BULK_FORM_ID};
use crate::templates::components::{api_error_banner, notice_banner, stat_card};
use crate::templates::desktop_layout;
use maud::{html, Markup};

/// Everything a property list page renders. `error` is set when the list
/// could not be fetched; the page then shows an empty list under a banner.
pub struct ListVm {
    pub query: ListQuery,
    pub page: ListPage,
    pub neighborhoods: Vec<String>,
    pub stats: PortfolioStats,
    pub error: Option<ApiError>,
    pub notice: Option<String>,
}

pub fn dashboard_page(vm: &ListVm) -> Markup {
    desktop_layout(
        "Dashboard",
        "/",
        html! {
            div class="page-header" {
                h1 { "Dashboard" }
                a href="/properties/new" class="btn btn-primary" { "+ New property" }
            }

            @if let Some(notice) = &vm.notice { (notice_banner(notice)) }
            @if let Some(err) = &vm.error { (api_error_banner(err)) }

            div class="stats-row" {
                (stat_card("Properties", &vm.stats.total.to_string()))
                (stat_card("Complete", &vm.stats.complete.to_string()))
                (stat_card("In progress", &vm.stats.in_progress.to_string()))
                (stat_card("Avg. price / sq ft", &vm.stats.average_ppsf.map(format_currency).unwrap_or_else(|| "—".into())))
            }

            (filter_form("/", &vm.query, &vm.neighborhoods))

            form id=(BULK_FORM_ID) class="bulk-actions" method="post" action="/properties/bulk" {
                span class="muted" { "With selected:" }
                button type="submit" name="action" value="export" class="btn btn-secondary" { "Export CSV" }
                button type="submit" name="action" value="delete" class="btn btn-danger"
                    onclick="return confirm('Delete the selected properties? This cannot be undone.')"
                { "Delete" }
            }

            (property_list("/", &vm.query, &vm.page, true))
        },
    )
}
