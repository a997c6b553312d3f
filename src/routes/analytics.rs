use super::{read_form, views};
use crate::domain::insights::{portfolio_stats, status_counts};
use crate::domain::training::train_request;
use crate::forms::parse_query;
use crate::responses::{html_response, ResultResp};
use crate::state::AppState;
use crate::templates::pages::{analytics_page, sqft_impact_fragment, train_result_fragment, AnalyticsVm};
use astra::Request;
use tracing::info;

pub fn page(state: &AppState) -> ResultResp {
    let (properties, error) = match state.api.list_properties() {
        Ok(records) => (views(&records), None),
        Err(err) => (Vec::new(), Some(err)),
    };
    html_response(analytics_page(&AnalyticsVm {
        stats: portfolio_stats(&properties),
        status_counts: status_counts(&properties),
        error,
    }))
}

pub fn train(mut req: Request, state: &AppState) -> ResultResp {
    let form = read_form(&mut req)?;
    let request = train_request(form.get("model_type"), form.get("min_properties"));
    info!(model_type = %request.model_type, min_properties = request.min_properties, "training model");

    let result = state.api.train_model(&request);
    if let Ok(r) = &result {
        info!(
            r2 = r.performance.r2_score,
            properties = r.num_properties,
            "model trained"
        );
    }
    html_response(train_result_fragment(&result))
}

pub fn sqft_impact(req: &Request, state: &AppState) -> ResultResp {
    let params = parse_query(req.uri().query());
    let train_first = params.get("train_model") == Some("true");
    html_response(sqft_impact_fragment(&state.api.sqft_impact(train_first)))
}
