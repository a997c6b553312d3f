pub mod export_csv;
pub mod export_xlsx;

pub use export_csv::export_properties_csv;
pub use export_xlsx::export_properties_xlsx;

/// Columns shared by both export formats, mirroring the list table.
pub const EXPORT_HEADERS: [&str; 9] = [
    "Address",
    "Bedrooms",
    "Bathrooms",
    "Square Footage",
    "Layout",
    "Estimated Price",
    "Price / Sq Ft",
    "Status",
    "Created",
];
