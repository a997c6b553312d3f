use crate::domain::insights::{format_count, format_currency};
use crate::templates::components::property_table::{filter_form, property_list};
use crate::templates::components::{api_error_banner, stat_card};
use crate::templates::desktop_layout;
use crate::templates::pages::dashboard::ListVm;
use maud::{html, Markup};

pub fn data_studio_page(vm: &ListVm) -> Markup {
    let export_query = vm.query.to_query();
    desktop_layout(
        "Data Studio",
        "/data-studio",
        html! {
            div class="page-header" {
                h1 { "Data Studio" }
                div class="actions" {
                    a class="btn btn-secondary" href=(format!("/data-studio/export.csv?{export_query}")) { "Export CSV" }
                    a class="btn btn-secondary" href=(format!("/data-studio/export.xlsx?{export_query}")) { "Export XLSX" }
                }
            }
            p class="muted" { "Exports contain every property matching the current filters, in the current order." }

            @if let Some(err) = &vm.error { (api_error_banner(err)) }

            div class="stats-row" {
                (stat_card("Matching", &format_count(vm.page.matched as f64)))
                (stat_card("Avg. price / sq ft", &vm.stats.average_ppsf.map(format_currency).unwrap_or_else(|| "—".into())))
                (stat_card("Total estimated value", &format_currency(vm.stats.total_estimated_value)))
                (stat_card("Avg. investment score", &vm.stats.average_investment_score.map(|s| format!("{s:.0}")).unwrap_or_else(|| "—".into())))
            }

            (filter_form("/data-studio", &vm.query, &vm.neighborhoods))
            (property_list("/data-studio", &vm.query, &vm.page, false))
        },
    )
}
