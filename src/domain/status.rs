// src/domain/status.rs

use std::fmt;

/// Processing state of a property. Driven entirely by the backend pipeline:
/// processing -> parsing_complete -> enrichment_complete -> complete, with a
/// failure status possible at each stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyStatus {
    Processing,
    ParsingComplete,
    EnrichmentComplete,
    Complete,
    Failed,
    EnrichmentFailed,
    ListingFailed,
    Unknown(String),
}

impl PropertyStatus {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("processing") => Self::Processing,
            Some("parsing_complete") => Self::ParsingComplete,
            Some("enrichment_complete") => Self::EnrichmentComplete,
            Some("complete") | Some("completed") => Self::Complete,
            Some("failed") => Self::Failed,
            Some("enrichment_failed") => Self::EnrichmentFailed,
            Some("listing_failed") => Self::ListingFailed,
            Some(other) => Self::Unknown(other.to_string()),
            None => Self::Unknown(String::new()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Processing => "processing",
            Self::ParsingComplete => "parsing_complete",
            Self::EnrichmentComplete => "enrichment_complete",
            Self::Complete => "complete",
            Self::Failed => "failed",
            Self::EnrichmentFailed => "enrichment_failed",
            Self::ListingFailed => "listing_failed",
            Self::Unknown(s) => s,
        }
    }

    /// Sort rank used by the status column. Statuses outside the pipeline's
    /// main path rank with `failed`.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Processing => 1,
            Self::ParsingComplete => 2,
            Self::EnrichmentComplete => 3,
            Self::Complete => 4,
            _ => 0,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::Failed | Self::EnrichmentFailed | Self::ListingFailed
        )
    }

    /// No further transitions will happen without user action.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete) || self.is_failure()
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Processing => "Processing",
            Self::ParsingComplete => "Floor plan parsed",
            Self::EnrichmentComplete => "Market data ready",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
            Self::EnrichmentFailed => "Enrichment failed",
            Self::ListingFailed => "Listing failed",
            Self::Unknown(s) if s.is_empty() => "Unknown",
            Self::Unknown(s) => s,
        }
    }

    /// CSS modifier for the status badge.
    pub fn badge_class(&self) -> &'static str {
        if self.is_failure() {
            "badge badge-error"
        } else if matches!(self, Self::Complete) {
            "badge badge-success"
        } else {
            "badge badge-pending"
        }
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
