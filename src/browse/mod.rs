//! In-memory search, sort, grouping and "load more" paging over the property list.

pub mod filter;
pub mod group;
pub mod sort;

use crate::domain::PropertyView;
use filter::Filters;
use group::{GroupBy, NeighborhoodLookup};
use sort::{SortDirection, SortKey};
use std::collections::BTreeMap;
use url::form_urlencoded;

/// Rows revealed per "load more".
pub const PAGE_SIZE: usize = 10;

/// Everything a list view is parameterised by; round-trips through the query string.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub filters: Filters,
    pub sort: SortKey,
    pub direction: SortDirection,
    pub group: GroupBy,
    pub shown: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filters: Filters::default(),
            sort: SortKey::default(),
            direction: SortDirection::default(),
            group: GroupBy::default(),
            shown: PAGE_SIZE,
        }
    }
}

impl ListQuery {
    /// Parse from a raw query string. Unknown or malformed values fall back to
    /// defaults instead of failing the page.
    pub fn from_query(query: &str) -> Self {
        let mut q = ListQuery::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            match key.as_ref() {
                "q" => q.filters.search = value.to_string(),
                "neighborhood" if !value.is_empty() => {
                    q.filters.neighborhood = Some(value.to_string())
                }
                "beds" => q.filters.bedrooms = value.parse().ok(),
                "min_sqft" => q.filters.min_sqft = value.parse().ok().filter(|v: &f64| *v >= 0.0),
                "max_sqft" => q.filters.max_sqft = value.parse().ok().filter(|v: &f64| *v >= 0.0),
                "sort" => q.sort = SortKey::parse(value).unwrap_or_default(),
                "dir" => q.direction = SortDirection::parse(value).unwrap_or_default(),
                "group" => q.group = GroupBy::parse(value),
                "shown" => {
                    q.shown = value
                        .parse::<usize>()
                        .ok()
                        .filter(|n| *n > 0)
                        .unwrap_or(PAGE_SIZE)
                }
                _ => {}
            }
        }
        q
    }

    pub fn to_query(&self) -> String {
        let mut s = form_urlencoded::Serializer::new(String::new());
        if !self.filters.search.trim().is_empty() {
            s.append_pair("q", self.filters.search.trim());
        }
        if let Some(n) = &self.filters.neighborhood {
            s.append_pair("neighborhood", n);
        }
        if let Some(b) = self.filters.bedrooms {
            s.append_pair("beds", &b.to_string());
        }
        if let Some(v) = self.filters.min_sqft {
            s.append_pair("min_sqft", &v.to_string());
        }
        if let Some(v) = self.filters.max_sqft {
            s.append_pair("max_sqft", &v.to_string());
        }
        s.append_pair("sort", self.sort.as_str());
        s.append_pair("dir", self.direction.as_str());
        if self.group != GroupBy::None {
            s.append_pair("group", self.group.as_str());
        }
        if self.shown != PAGE_SIZE {
            s.append_pair("shown", &self.shown.to_string());
        }
        s.finish()
    }

    /// Query for the next "load more" click.
    pub fn load_more(&self) -> ListQuery {
        ListQuery {
            shown: self.shown + PAGE_SIZE,
            ..self.clone()
        }
    }

    /// Query used by a sortable column header: same key flips direction,
    /// a new key starts ascending. Paging resets.
    pub fn sorted_by(&self, key: SortKey) -> ListQuery {
        let direction = if self.sort == key {
            self.direction.toggled()
        } else {
            SortDirection::Asc
        };
        ListQuery {
            sort: key,
            direction,
            shown: PAGE_SIZE,
            ..self.clone()
        }
    }
}

/// Result of running a [`ListQuery`] over fetched properties.
#[derive(Debug, Clone)]
pub struct ListPage {
    /// Properties matching the filters, before paging.
    pub matched: usize,
    /// First `shown` matches in sorted order.
    pub visible: Vec<PropertyView>,
    /// Present when grouping is on; covers every match.
    pub groups: Option<BTreeMap<String, Vec<PropertyView>>>,
    pub has_more: bool,
}

/// Filter, then sort, then group or page.
pub fn run(
    properties: Vec<PropertyView>,
    query: &ListQuery,
    lookup: &dyn NeighborhoodLookup,
) -> ListPage {
    let mut matched = filter::apply(properties, &query.filters, lookup);
    sort::sort(&mut matched, query.sort, query.direction);

    let groups = match query.group {
        GroupBy::None => None,
        GroupBy::Building => Some(group::group_by_building(&matched)),
        GroupBy::Neighborhood => Some(group::group_by_neighborhood(&matched, lookup)),
    };

    let total = matched.len();
    let has_more = groups.is_none() && total > query.shown;
    matched.truncate(query.shown);

    ListPage {
        matched: total,
        visible: matched,
        groups,
        has_more,
    }
}

/// Distinct neighborhoods across a list, for the filter dropdown.
pub fn neighborhoods(properties: &[PropertyView], lookup: &dyn NeighborhoodLookup) -> Vec<String> {
    let mut names: Vec<String> = properties.iter().map(|p| lookup.neighborhood(p)).collect();
    names.sort();
    names.dedup();
    names
}
