use crate::api::models::TrainRequest;

/// Regression models the backend knows how to fit.
pub const MODEL_TYPES: [(&str, &str); 3] = [
    ("ridge", "Ridge regression"),
    ("linear", "Linear regression"),
    ("random_forest", "Random forest"),
];
pub const DEFAULT_MODEL_TYPE: &str = "ridge";
pub const DEFAULT_MIN_PROPERTIES: u32 = 10;

/// Build a training request from form input. Unknown model types and
/// unparseable counts fall back to the defaults.
pub fn train_request(model_type: Option<&str>, min_properties: Option<&str>) -> TrainRequest {
    let model_type = model_type
        .map(str::trim)
        .filter(|m| MODEL_TYPES.iter().any(|(key, _)| key == m))
        .unwrap_or(DEFAULT_MODEL_TYPE);
    let min_properties = min_properties
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_MIN_PROPERTIES);

    TrainRequest {
        model_type: model_type.to_string(),
        min_properties,
    }
}

/// Feature importances, largest first.
pub fn ranked_features(importance: &std::collections::BTreeMap<String, f64>) -> Vec<(&str, f64)> {
    let mut ranked: Vec<(&str, f64)> = importance.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}
