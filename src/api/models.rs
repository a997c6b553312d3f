use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// property
//  ├── id, address, image_url (floor_plan_url), status, created_at
//  └── extracted_data
//       ├── address, bedrooms, bathrooms, square_footage, layout_type
//       ├── features[], rooms[]
//       ├── market_insights
//       │    ├── price_estimate
//       │    ├── comparable_properties[]
//       │    ├── investment_analysis
//       │    ├── market_trend
//       │    └── neighborhood_analysis
//       ├── listing_copy
//       ├── social_variants
//       └── data_sources
//
// Everything below `id` is optional on the wire. Numbers arrive either as JSON
// numbers or as display strings ("1,250 sq ft", "$850,000").

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Property {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, alias = "floor_plan_url")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub extracted_data: Option<ExtractedData>,

    // Older records carry these at the top level instead of inside extracted_data.
    #[serde(default)]
    pub market_insights: Option<MarketInsights>,
    #[serde(default)]
    pub listing_copy: Option<ListingCopy>,

    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExtractedData {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bedrooms: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bathrooms: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub square_footage: Option<f64>,
    #[serde(default)]
    pub layout_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub features: Vec<String>,
    #[serde(default)]
    pub rooms: Option<Vec<Room>>,
    #[serde(default)]
    pub market_insights: Option<MarketInsights>,
    #[serde(default)]
    pub listing_copy: Option<ListingCopy>,
    #[serde(default)]
    pub social_variants: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub data_sources: Option<Value>,
    #[serde(default)]
    pub neighborhood: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Room {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub room_type: Option<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub approx_sqft: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MarketInsights {
    #[serde(default)]
    pub price_estimate: Option<PriceEstimate>,
    #[serde(default)]
    pub comparable_properties: Option<Vec<Comparable>>,
    #[serde(default)]
    pub investment_analysis: Option<InvestmentAnalysis>,
    #[serde(default)]
    pub market_trend: Option<MarketTrend>,
    #[serde(default)]
    pub neighborhood_analysis: Option<NeighborhoodAnalysis>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PriceEstimate {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub estimated_value: Option<f64>,
    #[serde(default)]
    pub confidence: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub value_range_low: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub value_range_high: Option<f64>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Comparable {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(
        default,
        alias = "last_sale_price",
        alias = "price",
        deserialize_with = "lenient_f64"
    )]
    pub sale_price: Option<f64>,
    #[serde(default, alias = "sqft", deserialize_with = "lenient_f64")]
    pub square_feet: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bedrooms: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub sale_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub distance_miles: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InvestmentAnalysis {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub investment_score: Option<f64>,
    #[serde(default)]
    pub rental_potential: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub estimated_rental_income: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cap_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub risk_factors: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub opportunities: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MarketTrend {
    #[serde(default)]
    pub trend_direction: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub appreciation_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub days_on_market_avg: Option<f64>,
    #[serde(default)]
    pub inventory_level: Option<String>,
    #[serde(default)]
    pub buyer_demand: Option<String>,
    #[serde(default)]
    pub insights: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NeighborhoodAnalysis {
    #[serde(default, alias = "area_name")]
    pub name: Option<String>,
    #[serde(default, alias = "description")]
    pub summary: Option<String>,
}

/// Listing copy as produced by the copywriter; also the PATCH payload for edits.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ListingCopy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_to_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_media_caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_subject: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub seo_keywords: Vec<String>,
}

/// Body of `PATCH /api/properties/:id`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PropertyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_copy: Option<ListingCopy>,
}

/// `GET /api/properties` answers either a bare array or `{ "properties": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PropertyList {
    Bare(Vec<Property>),
    Wrapped { properties: Vec<Property> },
}

impl PropertyList {
    pub fn into_vec(self) -> Vec<Property> {
        match self {
            PropertyList::Bare(v) => v,
            PropertyList::Wrapped { properties } => properties,
        }
    }
}

/// Single-property responses: `{ "property": {...} }` or the record itself.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PropertyEnvelope {
    Wrapped { property: Property },
    Bare(Property),
}

impl PropertyEnvelope {
    pub fn into_property(self) -> Property {
        match self {
            PropertyEnvelope::Wrapped { property } => property,
            PropertyEnvelope::Bare(p) => p,
        }
    }
}

/// A floor plan submitted through the New Property form.
#[derive(Debug, Clone)]
pub struct FloorPlanUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ShareableLink {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, alias = "url")]
    pub share_url: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Link responses may nest the link under `link`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LinkEnvelope {
    Wrapped { link: ShareableLink },
    Bare(ShareableLink),
}

impl LinkEnvelope {
    pub fn into_link(self) -> ShareableLink {
        match self {
            LinkEnvelope::Wrapped { link } => link,
            LinkEnvelope::Bare(l) => l,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicReport {
    pub property: Property,
    #[serde(default)]
    pub token_info: Option<TokenInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenInfo {
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Optional metadata sent with `POST /api/public/report/:token/log_view`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewLog {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainRequest {
    pub model_type: String,
    pub min_properties: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrainResult {
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub performance: ModelPerformance,
    #[serde(default)]
    pub feature_importance: BTreeMap<String, f64>,
    #[serde(default)]
    pub num_properties: u32,
    #[serde(default)]
    pub num_predictions: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelPerformance {
    #[serde(default)]
    pub r2_score: f64,
    #[serde(default)]
    pub mae: f64,
    #[serde(default)]
    pub rmse: f64,
    #[serde(default)]
    pub mean_cv_score: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SqftImpact {
    #[serde(default)]
    pub price_per_sqft: f64,
    #[serde(default)]
    pub examples: BTreeMap<String, f64>,
    #[serde(default)]
    pub model_trained: bool,
    #[serde(default)]
    pub fallback: Option<String>,
}

/// Price from the trained regression model, as opposed to the enrichment estimate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricePrediction {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub predicted_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price_per_sqft: Option<f64>,
    #[serde(default)]
    pub confidence: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QualityScore {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub quality_level: Option<String>,
    #[serde(default)]
    pub breakdown: BTreeMap<String, f64>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Error payload the backend sends with non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Parse a display number such as `"$1,250,000"` or `"950 sq ft"`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_number(&s),
        _ => None,
    })
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "property id must be a string or number, got {other}"
        ))),
    }
}

// Lists of strings; object entries contribute their `name`/`text` field and
// anything else is dropped.
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            Value::Object(map) => map
                .get("name")
                .or_else(|| map.get("text"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
        .collect())
}
