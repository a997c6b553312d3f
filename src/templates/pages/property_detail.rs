use crate::api::models::{PricePrediction, QualityScore, ShareableLink};
use crate::api::ApiError;
use crate::domain::insights::{comparable_ppsf, format_count, format_currency, property_ppsf, ScoreLevel};
use crate::domain::property::{InsightsView, InvestmentView, TrendView};
use crate::domain::{PropertyStatus, PropertyView};
use crate::templates::components::{
    api_error_banner, card, empty_state, notice_banner, score_badge, status_badge,
};
use crate::templates::desktop_layout;
use crate::upload::progress::ProgressSnapshot;
use maud::{html, Markup};
use std::time::Duration;

pub struct DetailVm {
    pub property: PropertyView,
    pub quality: Option<QualityScore>,
    pub prediction: Option<PricePrediction>,
    pub link: Option<ShareableLink>,
    /// Present while the processing overlay should be shown.
    pub overlay: Option<ProgressSnapshot>,
    pub poll_every: Duration,
    pub notice: Option<String>,
    pub error: Option<ApiError>,
}

pub fn property_detail_page(vm: &DetailVm) -> Markup {
    let p = &vm.property;
    let title = if p.address.is_empty() { "Property" } else { p.address.as_str() };
    desktop_layout(
        title,
        "",
        html! {
            @if let Some(snapshot) = &vm.overlay {
                (progress_overlay(&p.id, snapshot, vm.poll_every))
            }

            div class="page-header" {
                div {
                    h1 { (title) }
                    p class="muted" {
                        (status_badge(&p.status))
                        @if let Some(created) = p.created_at {
                            " Added " (created.format("%B %e, %Y").to_string())
                        }
                    }
                }
                (actions(vm))
            }

            @if let Some(notice) = &vm.notice { (notice_banner(notice)) }
            @if let Some(err) = &vm.error { (api_error_banner(err)) }
            @if let Some(message) = &p.error_message {
                @if p.status.is_failure() {
                    div class="banner banner-error" role="alert" { p { (message) } }
                }
            }

            div class="detail-grid" {
                @if let Some(url) = &p.image_url {
                    figure class="floor-plan" {
                        img src=(url) alt=(format!("Floor plan for {title}"));
                    }
                }
                (key_facts(p, vm.prediction.as_ref()))
            }

            @if !p.rooms.is_empty() || !p.features.is_empty() {
                (card("Layout", html! {
                    @if !p.rooms.is_empty() {
                        table {
                            thead { tr { th { "Room" } th { "Dimensions" } th { "Approx. size" } } }
                            tbody {
                                @for room in &p.rooms {
                                    tr {
                                        td { (room.name) }
                                        td { (room.dimensions) }
                                        td { @if room.approx_sqft > 0.0 { (format_count(room.approx_sqft)) " sq ft" } }
                                    }
                                }
                            }
                        }
                    }
                    @if !p.features.is_empty() {
                        ul class="tags" { @for f in &p.features { li { (f) } } }
                    }
                }))
            }

            (market_section(&p.insights))

            @if let Some(q) = &vm.quality { (quality_section(q)) }

            (listing_form(p))
        },
    )
}

fn actions(vm: &DetailVm) -> Markup {
    let p = &vm.property;
    let enrich_action = if p.insights.estimated_value > 0.0 || p.status == PropertyStatus::EnrichmentFailed {
        ("re-enrich", "Re-run enrichment")
    } else {
        ("enrich", "Enrich with market data")
    };
    html! {
        div class="actions" {
            @if p.status != PropertyStatus::Processing {
                form method="post" action=(format!("/properties/{}/{}", p.id, enrich_action.0)) {
                    button type="submit" class="btn btn-secondary" { (enrich_action.1) }
                }
            }
            form method="post" action=(format!("/properties/{}/share", p.id)) {
                button type="submit" class="btn btn-secondary" {
                    @if vm.link.is_some() { "Refresh share link" } @else { "Create share link" }
                }
            }
            form method="post" action=(format!("/properties/{}/delete", p.id))
                onsubmit="return confirm('Delete this property? This cannot be undone.')"
            {
                button type="submit" class="btn btn-danger" { "Delete" }
            }
        }
        @if let Some(link) = &vm.link {
            @if let Some(url) = &link.share_url {
                p class="share-link" {
                    "Public report: " a href=(url) target="_blank" { (url) }
                    @if let Some(expires) = &link.expires_at { " (expires " (expires) ")" }
                }
            }
        }
    }
}

fn key_facts(p: &PropertyView, prediction: Option<&PricePrediction>) -> Markup {
    let predicted = prediction
        .and_then(|m| m.predicted_price.map(|price| (price, m)))
        .filter(|(price, _)| *price > 0.0);
    html! {
        dl class="key-facts" {
            dt { "Bedrooms" } dd { (format_count(p.bedrooms)) }
            dt { "Bathrooms" } dd { (format_count(p.bathrooms)) }
            dt { "Size" } dd {
                @if p.square_footage > 0.0 { (format_count(p.square_footage)) " sq ft" } @else { "—" }
            }
            @if !p.layout_type.is_empty() {
                dt { "Layout" } dd { (p.layout_type) }
            }
            @if let Some(n) = &p.neighborhood {
                dt { "Neighborhood" } dd { (n) }
            }
            dt { "Estimated value" } dd {
                @if p.price() > 0.0 { (format_currency(p.price())) } @else { "—" }
            }
            @if let Some(v) = property_ppsf(p) {
                dt { "Price / sq ft" } dd { (format_currency(v)) }
            }
            @if let Some((price, m)) = predicted {
                dt { "Model prediction" } dd class="model-prediction" {
                    (format_currency(price))
                    @if let Some(conf) = &m.confidence { " " span class="muted" { "(" (conf) " confidence)" } }
                }
            }
        }
    }
}

fn market_section(insights: &InsightsView) -> Markup {
    if insights.estimated_value <= 0.0
        && insights.comparables.is_empty()
        && insights.investment.is_none()
        && insights.trend.is_none()
    {
        return card(
            "Market insights",
            empty_state("Market insights appear here once enrichment finishes."),
        );
    }
    html! {
        (card("Market insights", html! {
            @if insights.estimated_value > 0.0 {
                p class="big-number" { (format_currency(insights.estimated_value)) }
                p class="muted" {
                    @if let Some((lo, hi)) = insights.value_range {
                        "Range " (format_currency(lo)) " – " (format_currency(hi)) ". "
                    }
                    @if !insights.confidence.is_empty() { "Confidence: " (insights.confidence) }
                }
                @if let Some(reasoning) = &insights.reasoning { p { (reasoning) } }
            }
            @if let Some(summary) = &insights.neighborhood_summary {
                h3 { "Neighborhood" }
                p { (summary) }
            }
        }))
        @if !insights.comparables.is_empty() {
            (card("Comparable properties", html! {
                table {
                    thead { tr { th { "Address" } th { "Sale price" } th { "Size" } th { "Beds / baths" } th { "Price / sq ft" } th { "Distance" } } }
                    tbody {
                        @for c in &insights.comparables {
                            tr {
                                td { (c.address) @if let Some(d) = &c.sale_date { br; small class="muted" { (d) } } }
                                td { (format_currency(c.sale_price)) }
                                td { @if c.square_feet > 0.0 { (format_count(c.square_feet)) " sq ft" } }
                                td { (format_count(c.bedrooms)) " / " (format_count(c.bathrooms)) }
                                td { (comparable_ppsf(c).map(format_currency).unwrap_or_default()) }
                                td { @if let Some(mi) = c.distance_miles { (format!("{mi:.1} mi")) } }
                            }
                        }
                    }
                }
            }))
        }
        @if let Some(inv) = &insights.investment { (investment_card(inv)) }
        @if let Some(trend) = &insights.trend { (trend_card(trend)) }
    }
}

fn investment_card(inv: &InvestmentView) -> Markup {
    card(
        "Investment analysis",
        html! {
            p { (score_badge(inv.score)) }
            dl {
                @if !inv.rental_potential.is_empty() { dt { "Rental potential" } dd { (inv.rental_potential) } }
                @if let Some(rent) = inv.estimated_rental_income { dt { "Est. rent" } dd { (format_currency(rent)) " / month" } }
                @if let Some(cap) = inv.cap_rate { dt { "Cap rate" } dd { (format!("{cap:.1}%")) } }
            }
            div class="two-col" {
                @if !inv.opportunities.is_empty() {
                    div { h3 { "Opportunities" } ul { @for o in &inv.opportunities { li { (o) } } } }
                }
                @if !inv.risk_factors.is_empty() {
                    div { h3 { "Risks" } ul { @for r in &inv.risk_factors { li { (r) } } } }
                }
            }
        },
    )
}

fn trend_card(trend: &TrendView) -> Markup {
    card(
        "Market trend",
        html! {
            dl {
                @if !trend.direction.is_empty() { dt { "Direction" } dd { (trend.direction) } }
                @if let Some(rate) = trend.appreciation_rate { dt { "Appreciation" } dd { (format!("{rate:.1}% / yr")) } }
                @if let Some(days) = trend.days_on_market_avg { dt { "Avg. days on market" } dd { (format_count(days.round())) } }
                @if let Some(inv) = &trend.inventory_level { dt { "Inventory" } dd { (inv) } }
                @if let Some(demand) = &trend.buyer_demand { dt { "Buyer demand" } dd { (demand) } }
            }
            @if let Some(text) = &trend.insights { p { (text) } }
        },
    )
}

fn quality_section(q: &QualityScore) -> Markup {
    let score = q.quality_score.unwrap_or(0.0);
    let level = q
        .quality_level
        .clone()
        .unwrap_or_else(|| ScoreLevel::from_score(score).label().to_string());
    card(
        "Floor plan quality",
        html! {
            p class=(ScoreLevel::from_score(score).css_class()) {
                strong { (score.round()) } " / 100 · " (level)
            }
            @if !q.breakdown.is_empty() {
                dl {
                    @for (aspect, value) in &q.breakdown {
                        dt { (aspect.replace('_', " ")) } dd { (value.round()) }
                    }
                }
            }
            @if !q.recommendations.is_empty() {
                h3 { "Recommendations" }
                ul { @for r in &q.recommendations { li { (r) } } }
            }
        },
    )
}

fn listing_form(p: &PropertyView) -> Markup {
    let copy = &p.listing_copy;
    card(
        "Listing copy",
        html! {
            form method="post" action=(format!("/properties/{}/listing", p.id)) class="listing-form" {
                label { "Headline"
                    input type="text" name="headline" value=(copy.headline.as_deref().unwrap_or_default());
                }
                label { "Description"
                    textarea name="description" rows="6" { (copy.description.as_deref().unwrap_or_default()) }
                }
                label { "Highlights (one per line)"
                    textarea name="highlights" rows="4" { (copy.highlights.join("\n")) }
                }
                label { "Call to action"
                    input type="text" name="call_to_action" value=(copy.call_to_action.as_deref().unwrap_or_default());
                }
                label { "Social media caption"
                    textarea name="social_media_caption" rows="2" { (copy.social_media_caption.as_deref().unwrap_or_default()) }
                }
                label { "Email subject"
                    input type="text" name="email_subject" value=(copy.email_subject.as_deref().unwrap_or_default());
                }
                label { "SEO keywords (comma separated)"
                    input type="text" name="seo_keywords" value=(copy.seo_keywords.join(", "));
                }
                button type="submit" class="btn btn-primary" { "Save listing" }
            }
        },
    )
}

/// The processing overlay. While unfinished it re-requests itself every
/// `poll_every`; the finished version is answered with 286 so htmx stops.
pub fn progress_overlay(id: &str, snapshot: &ProgressSnapshot, poll_every: Duration) -> Markup {
    let url = format!("/properties/{id}/progress");
    let every = format!("every {}ms", poll_every.as_millis().max(1));
    html! {
        div id="progress-overlay" class="overlay" role="dialog" aria-live="polite"
            hx-get=[(!snapshot.finished).then_some(&url)]
            hx-trigger=[(!snapshot.finished).then_some(&every)]
            hx-swap="outerHTML"
        {
            div class="overlay-panel" {
                @if snapshot.finished {
                    @if snapshot.status.is_failure() {
                        h2 { "Processing failed" }
                        p { (snapshot.status.label()) }
                    } @else if snapshot.status == PropertyStatus::Complete {
                        h2 { "Your property is ready" }
                    } @else {
                        h2 { "Still working on it" }
                    }
                    @if let Some(note) = &snapshot.note { p class="muted" { (note) } }
                    a class="btn btn-primary" href=(format!("/properties/{id}")) { "View property" }
                } @else {
                    div class="spinner" {}
                    h2 { (snapshot.phase) "…" }
                    p class="muted" { (status_badge(&snapshot.status)) " " (snapshot.elapsed.as_secs()) "s elapsed" }
                    @if let Some(note) = &snapshot.note { p class="muted" { (note) } }
                    form method="post" action=(url) hx-post=(url) hx-target="#progress-overlay" hx-swap="outerHTML" {
                        button type="submit" class="btn btn-link" { "Hide" }
                    }
                }
            }
        }
    }
}

/// Shown when the property could not be loaded at all.
pub fn property_unavailable_page(id: &str, err: &ApiError) -> Markup {
    desktop_layout(
        "Property",
        "",
        html! {
            h1 { "Property " (id) }
            (api_error_banner(err))
            p { a href="/" { "← Back to dashboard" } }
        },
    )
}
