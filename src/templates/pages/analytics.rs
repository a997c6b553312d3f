use crate::api::models::{SqftImpact, TrainResult};
use crate::api::ApiError;
use crate::domain::insights::{format_currency, PortfolioStats};
use crate::domain::training::{ranked_features, DEFAULT_MIN_PROPERTIES, DEFAULT_MODEL_TYPE, MODEL_TYPES};
use crate::domain::PropertyStatus;
use crate::templates::components::{api_error_banner, card, score_badge, stat_card, status_badge};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct AnalyticsVm {
    pub stats: PortfolioStats,
    pub status_counts: Vec<(PropertyStatus, usize)>,
    pub error: Option<ApiError>,
}

pub fn analytics_page(vm: &AnalyticsVm) -> Markup {
    let s = &vm.stats;
    desktop_layout(
        "Analytics",
        "/analytics",
        html! {
            h1 { "Analytics" }
            @if let Some(err) = &vm.error { (api_error_banner(err)) }

            div class="stats-row" {
                (stat_card("Properties", &s.total.to_string()))
                (stat_card("Total estimated value", &format_currency(s.total_estimated_value)))
                (stat_card("Avg. price / sq ft", &s.average_ppsf.map(format_currency).unwrap_or_else(|| "—".into())))
            }

            (card("Portfolio", html! {
                @if let Some(score) = s.average_investment_score {
                    p { "Average investment score: " (score_badge(score)) }
                }
                @if vm.status_counts.is_empty() {
                    p class="muted" { "No properties yet." }
                } @else {
                    table {
                        thead { tr { th { "Status" } th { "Properties" } } }
                        tbody {
                            @for (status, count) in &vm.status_counts {
                                tr { td { (status_badge(status)) } td { (count) } }
                            }
                        }
                    }
                }
            }))

            (card("Price model", html! {
                p class="muted" { "Fit a regression model on your properties' measurements and prices." }
                form method="post" action="/analytics/train"
                    hx-post="/analytics/train" hx-target="#train-result" hx-swap="innerHTML"
                    hx-indicator="#train-spinner"
                {
                    label { "Model"
                        select name="model_type" {
                            @for (key, label) in MODEL_TYPES {
                                option value=(key) selected[key == DEFAULT_MODEL_TYPE] { (label) }
                            }
                        }
                    }
                    label { "Minimum properties"
                        input type="number" name="min_properties" min="1" value=(DEFAULT_MIN_PROPERTIES);
                    }
                    button type="submit" class="btn btn-primary" { "Train model" }
                    span id="train-spinner" class="htmx-indicator" { "Training…" }
                }
                div id="train-result" {}
            }))

            (card("Square footage impact", html! {
                p class="muted" { "How much each additional square foot adds to the estimated price." }
                div id="sqft-impact" hx-get="/analytics/sqft-impact" hx-trigger="load" hx-swap="innerHTML" {
                    p class="muted" { "Loading…" }
                }
                button class="btn btn-secondary" hx-get="/analytics/sqft-impact?train_model=true"
                    hx-target="#sqft-impact" hx-swap="innerHTML"
                { "Retrain and recalculate" }
            }))
        },
    )
}

/// Fragment for `POST /analytics/train`.
pub fn train_result_fragment(result: &Result<TrainResult, ApiError>) -> Markup {
    match result {
        Err(err) => api_error_banner(err),
        Ok(r) => html! {
            h3 { "Trained " (r.model_type.as_deref().unwrap_or("model")) " on " (r.num_properties) " properties" }
            dl class="metrics" {
                dt { "R²" } dd { (format!("{:.3}", r.performance.r2_score)) }
                dt { "Mean absolute error" } dd { (format_currency(r.performance.mae)) }
                dt { "RMSE" } dd { (format_currency(r.performance.rmse)) }
                dt { "Cross-validation score" } dd { (format!("{:.3}", r.performance.mean_cv_score)) }
            }
            @if !r.feature_importance.is_empty() {
                h4 { "Feature importance" }
                table {
                    tbody {
                        @for (feature, weight) in ranked_features(&r.feature_importance) {
                            tr {
                                td { (feature.replace('_', " ")) }
                                td { (format!("{:.1}%", weight * 100.0)) }
                            }
                        }
                    }
                }
            }
        },
    }
}

/// Fragment for `GET /analytics/sqft-impact`.
pub fn sqft_impact_fragment(result: &Result<SqftImpact, ApiError>) -> Markup {
    match result {
        Err(err) => api_error_banner(err),
        Ok(impact) => html! {
            p class="big-number" { (format_currency(impact.price_per_sqft)) " per sq ft" }
            @if !impact.examples.is_empty() {
                table {
                    thead { tr { th { "Added space" } th { "Value added" } } }
                    tbody {
                        @for (label, value) in &impact.examples {
                            tr { td { (label.replace("_sqft", " sq ft")) } td { (format_currency(*value)) } }
                        }
                    }
                }
            }
            @if let Some(note) = &impact.fallback {
                p class="muted" { (note) }
            } @else if !impact.model_trained {
                p class="muted" { "Based on the last trained model." }
            }
        },
    }
}
