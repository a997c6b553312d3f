use crate::browse::group::NeighborhoodLookup;
use crate::domain::PropertyView;

/// Active list predicates. Every `None`/empty field is inactive; the rest are
/// combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub search: String,
    pub neighborhood: Option<String>,
    pub bedrooms: Option<u32>,
    pub min_sqft: Option<f64>,
    pub max_sqft: Option<f64>,
}

impl Filters {
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty()
            || self.neighborhood.is_some()
            || self.bedrooms.is_some()
            || self.min_sqft.is_some()
            || self.max_sqft.is_some()
    }

    pub fn matches(&self, p: &PropertyView, lookup: &dyn NeighborhoodLookup) -> bool {
        matches_search(&p.address, &self.search)
            && self
                .neighborhood
                .as_deref()
                .map_or(true, |n| lookup.neighborhood(p).eq_ignore_ascii_case(n.trim()))
            && self
                .bedrooms
                .map_or(true, |beds| p.bedrooms.round() as i64 == i64::from(beds))
            && self.min_sqft.map_or(true, |min| p.square_footage >= min)
            && self.max_sqft.map_or(true, |max| p.square_footage <= max)
    }
}

/// Case-insensitive substring match; a blank query matches everything.
pub fn matches_search(address: &str, query: &str) -> bool {
    let query = query.trim();
    query.is_empty() || address.to_lowercase().contains(&query.to_lowercase())
}

/// Keep the properties matching every active predicate, in input order.
pub fn apply(
    properties: Vec<PropertyView>,
    filters: &Filters,
    lookup: &dyn NeighborhoodLookup,
) -> Vec<PropertyView> {
    properties
        .into_iter()
        .filter(|p| filters.matches(p, lookup))
        .collect()
}
