use super::EXPORT_HEADERS;
use crate::domain::insights::property_ppsf;
use crate::domain::PropertyView;
use crate::errors::ServerError;
use csv::{Terminator, WriterBuilder};

/// One header record plus one record per property, in the given order.
pub fn export_properties_csv(properties: &[PropertyView]) -> Result<Vec<u8>, ServerError> {
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());
    wtr.write_record(EXPORT_HEADERS)?;

    for p in properties {
        wtr.write_record([
            p.address.clone(),
            number(p.bedrooms),
            number(p.bathrooms),
            number(p.square_footage),
            p.layout_type.clone(),
            number(p.price()),
            property_ppsf(p).map(|v| format!("{v:.2}")).unwrap_or_default(),
            p.status.as_str().to_string(),
            p.created_at.map(|d| d.to_rfc3339()).unwrap_or_default(),
        ])?;
    }

    wtr.into_inner()
        .map_err(|e| ServerError::Csv(csv::Error::from(e.into_error())))
}

fn number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}
