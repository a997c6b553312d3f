use crate::browse::filter::Filters;
use crate::browse::group::GroupBy;
use crate::browse::sort::{SortDirection, SortKey};
use crate::browse::{ListPage, ListQuery};
use crate::domain::insights::{format_count, format_currency};
use crate::domain::PropertyView;
use crate::templates::components::{empty_state, status_badge};
use maud::{html, Markup};

/// Id of the form that checkbox columns attach to.
pub const BULK_FORM_ID: &str = "bulk-form";

/// Sortable table of properties. Header links re-request `base` with the
/// toggled sort; checkboxes (when `selectable`) submit with the bulk form.
pub fn property_table(
    base: &str,
    query: &ListQuery,
    rows: &[PropertyView],
    selectable: bool,
) -> Markup {
    html! {
        table class="property-table" {
            thead {
                tr {
                    @if selectable { th { span class="sr-only" { "Select" } } }
                    @for key in SortKey::ALL {
                        th {
                            a href=(format!("{base}?{}", query.sorted_by(key).to_query())) {
                                (key.label())
                                @if query.sort == key {
                                    @match query.direction {
                                        SortDirection::Asc => " ▲",
                                        SortDirection::Desc => " ▼",
                                    }
                                }
                            }
                        }
                    }
                }
            }
            tbody {
                @for p in rows {
                    tr {
                        @if selectable {
                            td {
                                input type="checkbox" name="ids" value=(p.id) form=(BULK_FORM_ID)
                                    aria-label=(format!("Select {}", p.address));
                            }
                        }
                        td { a href=(format!("/properties/{}", p.id)) { (display_address(p)) } }
                        td { (format_count(p.bedrooms)) }
                        td { (format_count(p.bathrooms)) }
                        td { (p.layout_type) }
                        td {
                            @if p.square_footage > 0.0 { (format_count(p.square_footage)) " sq ft" } @else { "—" }
                        }
                        td {
                            @if p.price() > 0.0 { (format_currency(p.price())) } @else { "—" }
                        }
                        td {
                            @if let Some(created) = p.created_at { (created.format("%b %e, %Y").to_string()) }
                        }
                        td { (status_badge(&p.status)) }
                    }
                }
            }
        }
    }
}

fn display_address(p: &PropertyView) -> &str {
    if p.address.is_empty() {
        "Untitled property"
    } else {
        &p.address
    }
}

/// The list body: grouped sections, or one table with a "load more" link.
pub fn property_list(base: &str, query: &ListQuery, page: &ListPage, selectable: bool) -> Markup {
    html! {
        div id="property-list" {
            p class="muted" {
                (page.matched) " matching " (if page.matched == 1 { "property" } else { "properties" })
            }
            @if page.matched == 0 {
                (empty_state(if query.filters.is_active() {
                    "No properties match these filters."
                } else {
                    "No properties yet. Upload a floor plan to get started."
                }))
            } @else if let Some(groups) = &page.groups {
                @for (name, members) in groups {
                    section class="group" {
                        h3 { (name) " " span class="muted" { "(" (members.len()) ")" } }
                        (property_table(base, query, members, selectable))
                    }
                }
            } @else {
                (property_table(base, query, &page.visible, selectable))
                @if page.has_more {
                    a class="btn btn-secondary load-more"
                        href=(format!("{base}?{}", query.load_more().to_query()))
                        hx-get=(format!("{base}?{}", query.load_more().to_query()))
                        hx-target="#property-list"
                        hx-select="#property-list"
                        hx-swap="outerHTML"
                        hx-push-url="true"
                    { "Load more" }
                }
            }
        }
    }
}

/// Search, filter and grouping controls. Submitting keeps the sort.
pub fn filter_form(base: &str, query: &ListQuery, neighborhoods: &[String]) -> Markup {
    let f: &Filters = &query.filters;
    html! {
        form class="filters" method="get" action=(base)
            hx-get=(base) hx-target="#property-list" hx-select="#property-list"
            hx-swap="outerHTML" hx-push-url="true"
            hx-trigger="submit, input changed delay:300ms from:input[name='q']"
        {
            input type="hidden" name="sort" value=(query.sort.as_str());
            input type="hidden" name="dir" value=(query.direction.as_str());
            input type="search" name="q" placeholder="Search by address" value=(f.search);
            select name="neighborhood" {
                option value="" { "All neighborhoods" }
                @for n in neighborhoods {
                    option value=(n) selected[f.neighborhood.as_deref() == Some(n.as_str())] { (n) }
                }
            }
            select name="beds" {
                option value="" { "Any beds" }
                @for n in 0..=5u32 {
                    option value=(n) selected[f.bedrooms == Some(n)] { (n) " bd" }
                }
            }
            input type="number" name="min_sqft" min="0" placeholder="Min sq ft"
                value=[f.min_sqft.map(format_count)];
            input type="number" name="max_sqft" min="0" placeholder="Max sq ft"
                value=[f.max_sqft.map(format_count)];
            select name="group" {
                @for (g, label) in [(GroupBy::None, "No grouping"), (GroupBy::Building, "Group by building"), (GroupBy::Neighborhood, "Group by neighborhood")] {
                    option value=(g.as_str()) selected[query.group == g] { (label) }
                }
            }
            button type="submit" class="btn" { "Apply" }
            @if f.is_active() || query.group != GroupBy::None {
                a href=(base) class="btn btn-link" { "Clear" }
            }
        }
    }
}
