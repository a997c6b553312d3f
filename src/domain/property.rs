// src/domain/property.rs

use crate::api::models::{
    Comparable, InvestmentAnalysis, ListingCopy, MarketInsights, MarketTrend,
    Property as ApiProperty, Room,
};
use crate::domain::status::PropertyStatus;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::BTreeMap;

/// A property with every optional backend field resolved to a concrete value.
/// This is the only shape pages, sorting and exports work with; the raw wire
/// model never leaves the data-access boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyView {
    pub id: String,
    /// Top-level address, falling back to the address read off the floor plan.
    pub address: String,
    pub image_url: Option<String>,
    pub status: PropertyStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,

    // Floor plan extraction (missing numbers are 0, missing lists empty)
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub square_footage: f64,
    pub layout_type: String,
    pub features: Vec<String>,
    pub rooms: Vec<RoomView>,
    /// Neighborhood the backend attached, if any.
    pub neighborhood: Option<String>,

    pub insights: InsightsView,
    pub listing_copy: ListingCopy,
    pub social_variants: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomView {
    pub name: String,
    pub dimensions: String,
    pub approx_sqft: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightsView {
    pub estimated_value: f64,
    pub confidence: String,
    pub value_range: Option<(f64, f64)>,
    pub reasoning: Option<String>,
    pub comparables: Vec<ComparableView>,
    pub investment: Option<InvestmentView>,
    pub trend: Option<TrendView>,
    pub neighborhood_summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparableView {
    pub address: String,
    pub sale_price: f64,
    pub square_feet: f64,
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub sale_date: Option<String>,
    pub distance_miles: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentView {
    pub score: f64,
    pub rental_potential: String,
    pub estimated_rental_income: Option<f64>,
    pub cap_rate: Option<f64>,
    pub risk_factors: Vec<String>,
    pub opportunities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendView {
    pub direction: String,
    pub appreciation_rate: Option<f64>,
    pub days_on_market_avg: Option<f64>,
    pub inventory_level: Option<String>,
    pub buyer_demand: Option<String>,
    pub insights: Option<String>,
}

impl PropertyView {
    pub fn from_record(record: &ApiProperty) -> Self {
        let extracted = record.extracted_data.clone().unwrap_or_default();

        let address = non_empty(record.address.as_deref())
            .or_else(|| non_empty(extracted.address.as_deref()))
            .unwrap_or_default();

        // Prefer the nested copies; older records keep them at the top level.
        let insights = extracted
            .market_insights
            .as_ref()
            .or(record.market_insights.as_ref());
        let listing_copy = extracted
            .listing_copy
            .clone()
            .or_else(|| record.listing_copy.clone())
            .unwrap_or_default();

        let neighborhood = non_empty(extracted.neighborhood.as_deref()).or_else(|| {
            insights
                .and_then(|mi| mi.neighborhood_analysis.as_ref())
                .and_then(|na| non_empty(na.name.as_deref()))
        });

        PropertyView {
            id: record.id.clone(),
            address,
            image_url: non_empty(record.image_url.as_deref()),
            status: PropertyStatus::parse(record.status.as_deref()),
            created_at: parse_timestamp(record.created_at.as_deref()),
            error_message: non_empty(record.error_message.as_deref()),
            bedrooms: extracted.bedrooms.unwrap_or(0.0),
            bathrooms: extracted.bathrooms.unwrap_or(0.0),
            square_footage: extracted.square_footage.unwrap_or(0.0),
            layout_type: extracted.layout_type.clone().unwrap_or_default(),
            features: extracted.features.clone(),
            rooms: extracted
                .rooms
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(RoomView::from_record)
                .collect(),
            neighborhood,
            insights: insights.map(InsightsView::from_record).unwrap_or_default(),
            listing_copy,
            social_variants: extracted.social_variants.clone().unwrap_or_default(),
        }
    }

    /// Estimated market value, 0 when no estimate exists.
    pub fn price(&self) -> f64 {
        self.insights.estimated_value
    }

    pub fn has_extraction(&self) -> bool {
        self.bedrooms > 0.0 || self.bathrooms > 0.0 || self.square_footage > 0.0
    }
}

impl RoomView {
    fn from_record(room: &Room) -> Self {
        RoomView {
            name: non_empty(room.name.as_deref())
                .or_else(|| non_empty(room.room_type.as_deref()))
                .unwrap_or_else(|| "Room".to_string()),
            dimensions: room.dimensions.clone().unwrap_or_default(),
            approx_sqft: room.approx_sqft.unwrap_or(0.0),
        }
    }
}

impl InsightsView {
    fn from_record(mi: &MarketInsights) -> Self {
        let pe = mi.price_estimate.clone().unwrap_or_default();
        let value_range = match (pe.value_range_low, pe.value_range_high) {
            (Some(lo), Some(hi)) if lo > 0.0 && hi > 0.0 => Some((lo, hi)),
            _ => None,
        };

        InsightsView {
            estimated_value: pe.estimated_value.unwrap_or(0.0),
            confidence: pe.confidence.unwrap_or_default(),
            value_range,
            reasoning: non_empty(pe.reasoning.as_deref()),
            comparables: mi
                .comparable_properties
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(ComparableView::from_record)
                .collect(),
            investment: mi.investment_analysis.as_ref().map(InvestmentView::from_record),
            trend: mi.market_trend.as_ref().map(TrendView::from_record),
            neighborhood_summary: mi
                .neighborhood_analysis
                .as_ref()
                .and_then(|na| non_empty(na.summary.as_deref())),
        }
    }
}

impl ComparableView {
    fn from_record(c: &Comparable) -> Self {
        ComparableView {
            address: c.address.clone().unwrap_or_default(),
            sale_price: c.sale_price.unwrap_or(0.0),
            square_feet: c.square_feet.unwrap_or(0.0),
            bedrooms: c.bedrooms.unwrap_or(0.0),
            bathrooms: c.bathrooms.unwrap_or(0.0),
            sale_date: non_empty(c.sale_date.as_deref()),
            distance_miles: c.distance_miles,
        }
    }
}

impl InvestmentView {
    fn from_record(ia: &InvestmentAnalysis) -> Self {
        InvestmentView {
            score: ia.investment_score.unwrap_or(0.0).clamp(0.0, 100.0),
            rental_potential: ia.rental_potential.clone().unwrap_or_default(),
            estimated_rental_income: ia.estimated_rental_income,
            cap_rate: ia.cap_rate,
            risk_factors: ia.risk_factors.clone(),
            opportunities: ia.opportunities.clone(),
        }
    }
}

impl TrendView {
    fn from_record(t: &MarketTrend) -> Self {
        TrendView {
            direction: t.trend_direction.clone().unwrap_or_else(|| "stable".into()),
            appreciation_rate: t.appreciation_rate,
            days_on_market_avg: t.days_on_market_avg,
            inventory_level: t.inventory_level.clone(),
            buyer_demand: t.buyer_demand.clone(),
            insights: non_empty(t.insights.as_deref()),
        }
    }
}

/// Parse backend timestamps: RFC 3339, or naive ISO which is taken as UTC.
pub fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}
