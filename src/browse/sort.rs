use crate::domain::PropertyView;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Address,
    Bedrooms,
    Bathrooms,
    Layout,
    Size,
    Price,
    #[default]
    Date,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::Address,
        SortKey::Bedrooms,
        SortKey::Bathrooms,
        SortKey::Layout,
        SortKey::Size,
        SortKey::Price,
        SortKey::Date,
        SortKey::Status,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "address" => Some(SortKey::Address),
            "bedrooms" => Some(SortKey::Bedrooms),
            "bathrooms" => Some(SortKey::Bathrooms),
            "layout" => Some(SortKey::Layout),
            "size" => Some(SortKey::Size),
            "price" => Some(SortKey::Price),
            "date" => Some(SortKey::Date),
            "status" => Some(SortKey::Status),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Address => "address",
            SortKey::Bedrooms => "bedrooms",
            SortKey::Bathrooms => "bathrooms",
            SortKey::Layout => "layout",
            SortKey::Size => "size",
            SortKey::Price => "price",
            SortKey::Date => "date",
            SortKey::Status => "status",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Address => "Address",
            SortKey::Bedrooms => "Beds",
            SortKey::Bathrooms => "Baths",
            SortKey::Layout => "Layout",
            SortKey::Size => "Size",
            SortKey::Price => "Price",
            SortKey::Date => "Date added",
            SortKey::Status => "Status",
        }
    }

    /// Compare two properties on this key alone, ascending.
    pub fn compare(self, a: &PropertyView, b: &PropertyView) -> Ordering {
        match self {
            SortKey::Address => a.address.to_lowercase().cmp(&b.address.to_lowercase()),
            SortKey::Layout => a.layout_type.to_lowercase().cmp(&b.layout_type.to_lowercase()),
            SortKey::Bedrooms => a.bedrooms.total_cmp(&b.bedrooms),
            SortKey::Bathrooms => a.bathrooms.total_cmp(&b.bathrooms),
            SortKey::Size => a.square_footage.total_cmp(&b.square_footage),
            SortKey::Price => a.price().total_cmp(&b.price()),
            SortKey::Date => timestamp(a).cmp(&timestamp(b)),
            SortKey::Status => a.status.rank().cmp(&b.status.rank()),
        }
    }
}

impl SortDirection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

// Missing dates sort as the epoch.
fn timestamp(p: &PropertyView) -> i64 {
    p.created_at.map(|dt| dt.timestamp_millis()).unwrap_or(0)
}

/// Stable sort: equal keys keep their input order in both directions.
pub fn sort(properties: &mut [PropertyView], key: SortKey, direction: SortDirection) {
    properties.sort_by(|a, b| {
        let ord = key.compare(a, b);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}
