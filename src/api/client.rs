// client.rs
use crate::api::models::{
    FloorPlanUpload, LinkEnvelope, PricePrediction, Property, PropertyEnvelope, PropertyList,
    PropertyPatch, PublicReport, QualityScore, ShareableLink, SqftImpact, TrainRequest,
    TrainResult, ViewLog,
};
use crate::api::ApiError;
use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = concat!("flooriq-web/", env!("CARGO_PKG_VERSION"));

/// Everything the pages need from the backend. Routes only see this trait, so
/// tests can swap in an in-memory backend.
pub trait PropertyApi: Send + Sync {
    fn list_properties(&self) -> Result<Vec<Property>, ApiError>;
    fn get_property(&self, id: &str) -> Result<Property, ApiError>;
    fn update_property(&self, id: &str, patch: &PropertyPatch) -> Result<Property, ApiError>;
    fn delete_property(&self, id: &str) -> Result<(), ApiError>;
    fn upload_floor_plan(&self, upload: &FloorPlanUpload) -> Result<Property, ApiError>;
    fn enrich(&self, id: &str) -> Result<(), ApiError>;
    fn re_enrich(&self, id: &str) -> Result<(), ApiError>;

    /// The current link, or `None` when the property has never been shared.
    fn shareable_link(&self, id: &str) -> Result<Option<ShareableLink>, ApiError>;
    fn generate_link(&self, id: &str) -> Result<ShareableLink, ApiError>;

    fn public_report(&self, token: &str) -> Result<PublicReport, ApiError>;
    fn log_view(&self, token: &str, view: &ViewLog) -> Result<(), ApiError>;

    fn train_model(&self, request: &TrainRequest) -> Result<TrainResult, ApiError>;
    fn sqft_impact(&self, train_first: bool) -> Result<SqftImpact, ApiError>;
    fn quality_score(&self, id: &str) -> Result<QualityScore, ApiError>;
    /// Fails with a 400 until a model has been trained.
    fn predict_price(&self, id: &str) -> Result<PricePrediction, ApiError>;
}

/// Blocking HTTP client for the FloorIQ REST API.
pub struct ApiClient {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base: Url, token: Option<String>, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base,
            token,
        })
    }

    /// Build `<base>/<segments...>`; each segment is percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Network(format!("API base URL cannot be a base: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }

    fn send(&self, label: &str, builder: RequestBuilder) -> Result<Response, ApiError> {
        let start = Instant::now();
        let resp = builder.send().map_err(|e| {
            warn!(call = label, error = %e, "backend call failed");
            ApiError::from(e)
        })?;

        let status = resp.status();
        debug!(call = label, status = status.as_u16(), elapsed = ?start.elapsed(), "backend call");

        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().unwrap_or_default();
        let err = ApiError::from_status(status.as_u16(), &body);
        if !err.is_not_found() {
            warn!(call = label, status = status.as_u16(), "backend rejected request: {err}");
        }
        Err(err)
    }

    fn json<T: DeserializeOwned>(&self, label: &str, builder: RequestBuilder) -> Result<T, ApiError> {
        let resp = self.send(label, builder)?;
        let text = resp.text()?;
        serde_json::from_str(&text).map_err(|e| {
            warn!(call = label, error = %e, "could not decode backend response");
            ApiError::Decode(format!("{label}: {e}"))
        })
    }
}

impl PropertyApi for ApiClient {
    fn list_properties(&self) -> Result<Vec<Property>, ApiError> {
        let url = self.endpoint(&["api", "properties"])?;
        let list: PropertyList = self.json("list_properties", self.authed(self.client.get(url)))?;
        Ok(list.into_vec())
    }

    fn get_property(&self, id: &str) -> Result<Property, ApiError> {
        let url = self.endpoint(&["api", "properties", id])?;
        let env: PropertyEnvelope = self.json("get_property", self.authed(self.client.get(url)))?;
        Ok(env.into_property())
    }

    fn update_property(&self, id: &str, patch: &PropertyPatch) -> Result<Property, ApiError> {
        let url = self.endpoint(&["api", "properties", id])?;
        let env: PropertyEnvelope = self.json(
            "update_property",
            self.authed(self.client.patch(url).json(patch)),
        )?;
        Ok(env.into_property())
    }

    fn delete_property(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "properties", id])?;
        self.send("delete_property", self.authed(self.client.delete(url)))?;
        Ok(())
    }

    fn upload_floor_plan(&self, upload: &FloorPlanUpload) -> Result<Property, ApiError> {
        let url = self.endpoint(&["api", "properties", "upload"])?;
        let part = multipart::Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)
            .map_err(|e| ApiError::Network(format!("invalid content type: {e}")))?;
        let form = multipart::Form::new()
            .text("address", upload.address.clone())
            .part("file", part);

        let env: PropertyEnvelope = self.json(
            "upload_floor_plan",
            self.authed(self.client.post(url).multipart(form)),
        )?;
        Ok(env.into_property())
    }

    fn enrich(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "properties", id, "enrich"])?;
        self.send("enrich", self.authed(self.client.post(url)))?;
        Ok(())
    }

    fn re_enrich(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "properties", id, "re-enrich"])?;
        self.send("re_enrich", self.authed(self.client.post(url)))?;
        Ok(())
    }

    fn shareable_link(&self, id: &str) -> Result<Option<ShareableLink>, ApiError> {
        let url = self.endpoint(&["api", "properties", id, "shareable-link"])?;
        match self.json::<LinkEnvelope>("shareable_link", self.authed(self.client.get(url))) {
            Ok(env) => Ok(Some(env.into_link())),
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn generate_link(&self, id: &str) -> Result<ShareableLink, ApiError> {
        let url = self.endpoint(&["api", "properties", id, "generate-link"])?;
        let env: LinkEnvelope = self.json("generate_link", self.authed(self.client.post(url)))?;
        Ok(env.into_link())
    }

    fn public_report(&self, token: &str) -> Result<PublicReport, ApiError> {
        let url = self.endpoint(&["api", "public", "report", token])?;
        self.json("public_report", self.client.get(url))
    }

    fn log_view(&self, token: &str, view: &ViewLog) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "public", "report", token, "log_view"])?;
        self.send("log_view", self.client.post(url).json(view))?;
        Ok(())
    }

    fn train_model(&self, request: &TrainRequest) -> Result<TrainResult, ApiError> {
        let url = self.endpoint(&["api", "analytics", "model", "train"])?;
        self.json("train_model", self.authed(self.client.post(url).json(request)))
    }

    fn sqft_impact(&self, train_first: bool) -> Result<SqftImpact, ApiError> {
        let mut url = self.endpoint(&["api", "analytics", "sqft-impact"])?;
        url.query_pairs_mut()
            .append_pair("train_model", if train_first { "true" } else { "false" });
        self.json("sqft_impact", self.authed(self.client.get(url)))
    }

    fn quality_score(&self, id: &str) -> Result<QualityScore, ApiError> {
        let url = self.endpoint(&["api", "analytics", "quality-score", id])?;
        self.json("quality_score", self.authed(self.client.get(url)))
    }

    fn predict_price(&self, id: &str) -> Result<PricePrediction, ApiError> {
        let url = self.endpoint(&["api", "analytics", "predict", id])?;
        self.json("predict_price", self.authed(self.client.get(url)))
    }
}
