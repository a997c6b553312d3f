use crate::domain::PropertyView;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const UNKNOWN_NEIGHBORHOOD: &str = "Unknown";

/// `Unit 4A`, `Apt. 12`, `Apartment B-2`
static UNIT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*,?\s*\b(?:apartment|unit|apt)\b\.?\s*[a-z0-9-]+").unwrap()
});

/// `#12B`
static HASH_UNIT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*,?\s*#\s*[a-z0-9-]+").unwrap());

/// `Floor 3`
static FLOOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*,?\s*\bfloor\s+\d+\b").unwrap());

/// `street, city, ST 12345`
static CITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?),\s*([^,]+),\s*([A-Z]{2})(?:\s+(\d{5}))?$").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupBy {
    #[default]
    None,
    Building,
    Neighborhood,
}

impl GroupBy {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "building" => GroupBy::Building,
            "neighborhood" => GroupBy::Neighborhood,
            _ => GroupBy::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GroupBy::None => "none",
            GroupBy::Building => "building",
            GroupBy::Neighborhood => "neighborhood",
        }
    }
}

/// Resolves the neighborhood a property belongs to.
pub trait NeighborhoodLookup: Send + Sync {
    fn neighborhood(&self, property: &PropertyView) -> String;
}

/// Uses whatever neighborhood the backend attached during enrichment, then
/// the city segment of a `street, city, ST zip` address.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtractedNeighborhoods;

impl NeighborhoodLookup for ExtractedNeighborhoods {
    fn neighborhood(&self, property: &PropertyView) -> String {
        property
            .neighborhood
            .clone()
            .or_else(|| city_from_address(&property.address))
            .unwrap_or_else(|| UNKNOWN_NEIGHBORHOOD.to_string())
    }
}

pub fn city_from_address(address: &str) -> Option<String> {
    CITY_PATTERN
        .captures(address.trim())
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Address of the building. Every unit and floor designator is removed, not
/// just the last one, so `Apt 3, Floor 2` units share their building.
pub fn building_key(address: &str) -> String {
    let stripped = UNIT_PATTERN.replace_all(address, "");
    let stripped = HASH_UNIT_PATTERN.replace_all(&stripped, "");
    let stripped = FLOOR_PATTERN.replace_all(&stripped, "");

    let segments: Vec<&str> = stripped
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let kept = if segments.len() > 2 {
        &segments[..segments.len() - 1]
    } else {
        &segments[..]
    };

    kept.join(", ")
}

/// Partition an already filtered and sorted list. Members keep their order;
/// keys come out sorted.
pub fn group_by<F>(properties: &[PropertyView], key: F) -> BTreeMap<String, Vec<PropertyView>>
where
    F: Fn(&PropertyView) -> String,
{
    let mut groups: BTreeMap<String, Vec<PropertyView>> = BTreeMap::new();
    for p in properties {
        groups.entry(key(p)).or_default().push(p.clone());
    }
    groups
}

pub fn group_by_building(properties: &[PropertyView]) -> BTreeMap<String, Vec<PropertyView>> {
    group_by(properties, |p| {
        let key = building_key(&p.address);
        if key.is_empty() {
            "Unknown address".to_string()
        } else {
            key
        }
    })
}

pub fn group_by_neighborhood(
    properties: &[PropertyView],
    lookup: &dyn NeighborhoodLookup,
) -> BTreeMap<String, Vec<PropertyView>> {
    group_by(properties, |p| lookup.neighborhood(p))
}
