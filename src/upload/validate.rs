use crate::api::models::FloorPlanUpload;

/// 10 MB.
pub const MAX_FLOOR_PLAN_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please choose a floor plan file")]
    MissingFile,

    #[error("Unsupported file type '{0}'. Upload a PNG, JPG or PDF")]
    UnsupportedType(String),

    #[error("File is too large ({size_mb:.1} MB). The limit is 10 MB")]
    TooLarge { size_mb: f64 },

    #[error("Please enter the property address")]
    MissingAddress,
}

/// Accepts PNG, JPEG and PDF. `image/jpg` is non-standard but browsers send it.
pub fn is_allowed_type(content_type: &str) -> bool {
    let Ok(parsed) = content_type.trim().to_ascii_lowercase().parse::<mime::Mime>() else {
        return false;
    };
    let (ty, sub) = (parsed.type_(), parsed.subtype());
    if ty == mime::IMAGE {
        sub == mime::PNG || sub == mime::JPEG || sub.as_str() == "jpg"
    } else {
        ty == mime::APPLICATION && sub == mime::PDF
    }
}

pub fn validate_file(content_type: &str, size: usize) -> Result<(), ValidationError> {
    if size == 0 {
        return Err(ValidationError::MissingFile);
    }
    if !is_allowed_type(content_type) {
        return Err(ValidationError::UnsupportedType(content_type.to_string()));
    }
    if size > MAX_FLOOR_PLAN_BYTES {
        return Err(ValidationError::TooLarge {
            size_mb: size as f64 / (1024.0 * 1024.0),
        });
    }
    Ok(())
}

/// Check a complete submission; the address is trimmed in place.
pub fn validate_upload(upload: &mut FloorPlanUpload) -> Result<(), ValidationError> {
    validate_file(&upload.content_type, upload.bytes.len())?;
    let trimmed = upload.address.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingAddress);
    }
    upload.address = trimmed.to_string();
    Ok(())
}
