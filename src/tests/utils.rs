use crate::api::models::{
    FloorPlanUpload, ModelPerformance, PricePrediction, Property, PropertyPatch, PublicReport,
    QualityScore, ShareableLink, SqftImpact, TokenInfo, TrainRequest, TrainResult, ViewLog,
};
use crate::api::{ApiError, PropertyApi};
use crate::state::AppState;
use crate::upload::WatchConfig;
use astra::{Body, Request, Response};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::io::Read;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory backend. Records keep insertion order like the real list endpoint.
#[derive(Default)]
pub struct FakeApi {
    records: Mutex<Vec<Property>>,
    scripts: Mutex<HashMap<String, VecDeque<String>>>,
    failures: Mutex<HashMap<String, u16>>,
    get_calls: Mutex<HashMap<String, usize>>,
    links: Mutex<HashMap<String, ShareableLink>>,
    reports: Mutex<HashMap<String, String>>,
    pub uploads: Mutex<Vec<FloorPlanUpload>>,
    pub patches: Mutex<Vec<(String, PropertyPatch)>>,
    pub deleted: Mutex<Vec<String>>,
    pub enriched: Mutex<Vec<String>>,
    pub trained: Mutex<Vec<TrainRequest>>,
    pub views: Mutex<Vec<String>>,
}

/// Key used by `fail_with` for the list endpoint.
pub const LIST: &str = "*list*";

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_json(&self, value: serde_json::Value) {
        let record: Property = serde_json::from_value(value).expect("valid property json");
        let mut records = self.records.lock().unwrap();
        records.retain(|r| r.id != record.id);
        records.push(record);
    }

    /// Statuses returned by successive `get_property` calls; `"missing"` answers 404.
    pub fn script_statuses(&self, id: &str, statuses: &[&str]) {
        self.scripts.lock().unwrap().insert(
            id.to_string(),
            statuses.iter().map(|s| s.to_string()).collect(),
        );
    }

    /// Every call touching `key` fails with `status`. Keys are a property id, a
    /// token, [`LIST`], `"upload"`, `"train"`, `"sqft"`, `"quality:{id}"` or
    /// `"predict:{id}"`.
    pub fn fail_with(&self, key: &str, status: u16) {
        self.failures.lock().unwrap().insert(key.to_string(), status);
    }

    pub fn get_calls(&self, id: &str) -> usize {
        self.get_calls.lock().unwrap().get(id).copied().unwrap_or(0)
    }

    pub fn set_link(&self, id: &str, link: ShareableLink) {
        self.links.lock().unwrap().insert(id.to_string(), link);
    }

    /// Make `token` resolve to the stored property `id`.
    pub fn share_report(&self, token: &str, id: &str) {
        self.reports
            .lock()
            .unwrap()
            .insert(token.to_string(), id.to_string());
    }

    pub fn ids(&self) -> Vec<String> {
        self.records.lock().unwrap().iter().map(|r| r.id.clone()).collect()
    }

    fn check(&self, key: &str) -> Result<(), ApiError> {
        match self.failures.lock().unwrap().get(key) {
            Some(status) => Err(ApiError::from_status(*status, "")),
            None => Ok(()),
        }
    }

    fn find(&self, id: &str) -> Result<Property, ApiError> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("property {id}")))
    }
}

impl PropertyApi for FakeApi {
    fn list_properties(&self) -> Result<Vec<Property>, ApiError> {
        self.check(LIST)?;
        Ok(self.records.lock().unwrap().clone())
    }

    fn get_property(&self, id: &str) -> Result<Property, ApiError> {
        *self.get_calls.lock().unwrap().entry(id.to_string()).or_default() += 1;
        self.check(id)?;

        let scripted = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(id)
            .and_then(|queue| queue.pop_front());
        match scripted.as_deref() {
            Some("missing") => Err(ApiError::NotFound(format!("property {id}"))),
            Some(status) => {
                let mut records = self.records.lock().unwrap();
                let record = records
                    .iter_mut()
                    .find(|r| r.id == id)
                    .ok_or_else(|| ApiError::NotFound(format!("property {id}")))?;
                record.status = Some(status.to_string());
                Ok(record.clone())
            }
            None => self.find(id),
        }
    }

    fn update_property(&self, id: &str, patch: &PropertyPatch) -> Result<Property, ApiError> {
        self.check(id)?;
        self.patches
            .lock()
            .unwrap()
            .push((id.to_string(), patch.clone()));
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("property {id}")))?;
        if let Some(copy) = &patch.listing_copy {
            record.extracted_data.get_or_insert_with(Default::default).listing_copy =
                Some(copy.clone());
        }
        if let Some(address) = &patch.address {
            record.address = Some(address.clone());
        }
        Ok(record.clone())
    }

    fn delete_property(&self, id: &str) -> Result<(), ApiError> {
        self.check(id)?;
        self.find(id)?;
        self.records.lock().unwrap().retain(|r| r.id != id);
        self.deleted.lock().unwrap().push(id.to_string());
        Ok(())
    }

    fn upload_floor_plan(&self, upload: &FloorPlanUpload) -> Result<Property, ApiError> {
        self.check("upload")?;
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(upload.clone());
        let record = Property {
            id: format!("new-{}", uploads.len()),
            address: Some(upload.address.clone()),
            status: Some("processing".into()),
            ..Default::default()
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    fn enrich(&self, id: &str) -> Result<(), ApiError> {
        self.check(id)?;
        self.find(id)?;
        self.enriched.lock().unwrap().push(id.to_string());
        Ok(())
    }

    fn re_enrich(&self, id: &str) -> Result<(), ApiError> {
        self.enrich(id)
    }

    fn shareable_link(&self, id: &str) -> Result<Option<ShareableLink>, ApiError> {
        self.check(id)?;
        Ok(self.links.lock().unwrap().get(id).cloned())
    }

    fn generate_link(&self, id: &str) -> Result<ShareableLink, ApiError> {
        self.check(id)?;
        self.find(id)?;
        let token = format!("tok-{id}");
        let link = ShareableLink {
            token: Some(token.clone()),
            share_url: Some(format!("http://localhost:3000/report/{token}")),
            expires_at: Some("2030-01-01T00:00:00Z".into()),
            is_active: Some(true),
        };
        self.links.lock().unwrap().insert(id.to_string(), link.clone());
        self.share_report(&token, id);
        Ok(link)
    }

    fn public_report(&self, token: &str) -> Result<PublicReport, ApiError> {
        self.check(token)?;
        let id = self
            .reports
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("report {token}")))?;
        Ok(PublicReport {
            property: self.find(&id)?,
            token_info: Some(TokenInfo {
                expires_at: Some("2030-01-01T00:00:00Z".into()),
                is_active: Some(true),
            }),
        })
    }

    fn log_view(&self, token: &str, _view: &ViewLog) -> Result<(), ApiError> {
        self.views.lock().unwrap().push(token.to_string());
        Ok(())
    }

    fn train_model(&self, request: &TrainRequest) -> Result<TrainResult, ApiError> {
        self.check("train")?;
        self.trained.lock().unwrap().push(request.clone());
        let count = self.records.lock().unwrap().len() as u32;
        Ok(TrainResult {
            model_type: Some(request.model_type.clone()),
            performance: ModelPerformance {
                r2_score: 0.82,
                mae: 21000.0,
                rmse: 30500.0,
                mean_cv_score: 0.78,
            },
            feature_importance: BTreeMap::from([
                ("square_footage".to_string(), 0.61),
                ("bedrooms".to_string(), 0.22),
            ]),
            num_properties: count,
            num_predictions: count,
        })
    }

    fn sqft_impact(&self, train_first: bool) -> Result<SqftImpact, ApiError> {
        self.check("sqft")?;
        Ok(SqftImpact {
            price_per_sqft: 450.0,
            examples: BTreeMap::from([
                ("100_sqft".to_string(), 45000.0),
                ("500_sqft".to_string(), 225000.0),
                ("1000_sqft".to_string(), 450000.0),
            ]),
            model_trained: train_first,
            fallback: None,
        })
    }

    fn quality_score(&self, id: &str) -> Result<QualityScore, ApiError> {
        self.check(&format!("quality:{id}"))?;
        Ok(QualityScore {
            quality_score: Some(84.0),
            quality_level: Some("excellent".into()),
            breakdown: BTreeMap::from([
                ("clarity".to_string(), 90.0),
                ("completeness".to_string(), 80.0),
            ]),
            recommendations: vec!["Label the balcony".into()],
        })
    }

    fn predict_price(&self, id: &str) -> Result<PricePrediction, ApiError> {
        self.check(&format!("predict:{id}"))?;
        self.find(id)?;
        if self.trained.lock().unwrap().is_empty() {
            return Err(ApiError::from_status(400, ""));
        }
        Ok(PricePrediction {
            predicted_price: Some(512000.0),
            price_per_sqft: Some(512.0),
            confidence: Some("medium".into()),
        })
    }
}

pub fn fast_watch() -> WatchConfig {
    WatchConfig {
        interval: Duration::from_millis(5),
        timeout: Duration::from_secs(5),
    }
}

/// State wired to `api` with no retry delay and fast polling.
pub fn make_state(api: Arc<FakeApi>) -> AppState {
    let mut state = AppState::with_api(api);
    state.retry_delay = Duration::ZERO;
    state.watch = fast_watch();
    state
}

pub fn get(uri: &str) -> Request {
    http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, form: &str) -> Request {
    http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

pub fn post_multipart(uri: &str, body: Vec<u8>) -> Request {
    http::Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "Content-Type",
            format!(
                "multipart/form-data; boundary={}",
                crate::forms::tests::BOUNDARY
            ),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn body_bytes(resp: &mut Response) -> Vec<u8> {
    let mut bytes = Vec::new();
    resp.body_mut().reader().read_to_end(&mut bytes).unwrap();
    bytes
}

pub fn body_string(resp: &mut Response) -> String {
    String::from_utf8(body_bytes(resp)).unwrap()
}

pub fn header(resp: &Response, name: &str) -> String {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// A completed, enriched property with the fields every page reads.
pub fn sample_property(id: &str, address: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "address": address,
        "status": "complete",
        "created_at": "2024-03-01T10:00:00Z",
        "image_url": format!("https://cdn.example.com/{id}.png"),
        "extracted_data": {
            "bedrooms": 2,
            "bathrooms": "1.5",
            "square_footage": "1,000 sq ft",
            "layout_type": "Open Concept",
            "features": ["Balcony", "In-unit laundry"],
            "rooms": [{ "name": "Living Room", "dimensions": "15x20", "approx_sqft": 300 }],
            "market_insights": {
                "price_estimate": {
                    "estimated_value": 500000,
                    "confidence": "high",
                    "value_range_low": 480000,
                    "value_range_high": 520000
                },
                "comparable_properties": [
                    { "address": "125 Main St", "sale_price": 490000, "sqft": 980, "bedrooms": 2, "bathrooms": 1 }
                ],
                "investment_analysis": {
                    "investment_score": 72,
                    "estimated_rental_income": 3200,
                    "cap_rate": 5.4,
                    "risk_factors": ["Older building"],
                    "opportunities": ["Strong rental demand"]
                },
                "neighborhood_analysis": { "name": "Mission", "summary": "Walkable and lively." }
            },
            "listing_copy": {
                "headline": "Sunny two bedroom",
                "description": "Bright corner unit.",
                "highlights": ["Corner unit"]
            },
            "social_variants": { "instagram": "Just listed!", "twitter": "New on the market" }
        }
    })
}
