// forms.rs
//
// Decoding of browser form submissions: urlencoded bodies, query strings and
// multipart/form-data (the New Property upload).

use futures::executor::block_on;
use futures::stream;
use multer::Multipart;
use std::collections::HashMap;
use std::convert::Infallible;
use url::form_urlencoded;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("missing multipart boundary")]
    MissingBoundary,

    #[error("malformed multipart body: {0}")]
    Malformed(String),
}

impl From<multer::Error> for FormError {
    fn from(e: multer::Error) -> Self {
        FormError::Malformed(e.to_string())
    }
}

/// Decoded `application/x-www-form-urlencoded` data. Repeated keys are kept.
#[derive(Debug, Default, Clone)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    pub fn parse(raw: &[u8]) -> Self {
        Self {
            pairs: form_urlencoded::parse(raw).into_owned().collect(),
        }
    }

    /// First value for `key`, trimmed.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
    }

    /// All values for `key`, e.g. checked checkboxes.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

pub fn parse_query(query: Option<&str>) -> FormData {
    FormData::parse(query.unwrap_or_default().as_bytes())
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub files: Vec<FilePart>,
}

impl MultipartForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn file(&self, name: &str) -> Option<&FilePart> {
        self.files.iter().find(|f| f.field == name)
    }
}

/// Boundary parameter of a `multipart/form-data` content type.
pub fn multipart_boundary(content_type: &str) -> Option<String> {
    let parsed: mime::Mime = content_type.parse().ok()?;
    if parsed.type_() != mime::MULTIPART || parsed.subtype() != mime::FORM_DATA {
        return None;
    }
    parsed
        .get_param(mime::BOUNDARY)
        .map(|b| b.as_str().to_string())
}

/// Decode a complete multipart body. The body is already in memory, so the
/// async parser is driven to completion on the current thread.
pub fn parse_multipart(body: Vec<u8>, boundary: &str) -> Result<MultipartForm, FormError> {
    if boundary.is_empty() {
        return Err(FormError::MissingBoundary);
    }
    if body.is_empty() {
        return Err(FormError::Malformed("empty body".into()));
    }
    let stream = stream::iter([Ok::<_, Infallible>(body)]);
    let mut multipart = Multipart::new(stream, boundary);

    block_on(async move {
        let mut form = MultipartForm::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field
                .name()
                .map(str::to_string)
                .ok_or_else(|| FormError::Malformed("part without a name".into()))?;
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .map(|m| m.essence_str().to_string())
                        .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());
                    let bytes = field.bytes().await?;
                    form.files.push(FilePart {
                        field: name,
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                None => {
                    let value = field.text().await?;
                    form.fields.insert(name, value);
                }
            }
        }
        Ok::<_, FormError>(form)
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const BOUNDARY: &str = "----flooriqboundary";

    /// Encode a form the way a browser would.
    pub(crate) fn multipart_body(
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &str, &[u8])>,
    ) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((name, file_name, content_type, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    #[test]
    fn parses_fields_and_files() {
        let png = b"\x89PNG\r\n\x1a\nrest";
        let body = multipart_body(
            &[("address", "123 Main St, Unit 4A")],
            Some(("file", "plan.png", "image/png", png)),
        );
        let form = parse_multipart(body, BOUNDARY).unwrap();

        assert_eq!(form.field("address"), Some("123 Main St, Unit 4A"));
        let file = form.file("file").unwrap();
        assert_eq!(file.file_name, "plan.png");
        assert_eq!(file.content_type, "image/png");
        assert_eq!(file.bytes, png);
    }

    #[test]
    fn boundary_from_content_type() {
        assert_eq!(
            multipart_boundary("multipart/form-data; boundary=abc123").as_deref(),
            Some("abc123")
        );
        assert_eq!(multipart_boundary("application/json"), None);
    }

    #[test]
    fn truncated_body_is_rejected() {
        let mut body = multipart_body(&[("address", "x")], None);
        body.truncate(body.len() - 12);
        assert!(parse_multipart(body, BOUNDARY).is_err());
        assert_eq!(
            parse_multipart(Vec::new(), BOUNDARY).unwrap_err(),
            FormError::Malformed("empty body".into())
        );
    }

    #[test]
    fn quoted_file_name_keeps_semicolons() {
        let body = multipart_body(
            &[("address", "9 Oak Ave")],
            Some(("file", "plan;v2.png", "image/png", b"png")),
        );
        let form = parse_multipart(body, BOUNDARY).unwrap();

        assert_eq!(form.file("file").unwrap().file_name, "plan;v2.png");
        assert_eq!(form.field("address"), Some("9 Oak Ave"));
    }

    #[test]
    fn file_without_content_type_is_octet_stream() {
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.bin\"\r\n\r\nxyz\r\n--{BOUNDARY}--\r\n"
        );
        let form = parse_multipart(body.into_bytes(), BOUNDARY).unwrap();
        assert_eq!(form.file("file").unwrap().content_type, "application/octet-stream");
    }

    #[test]
    fn urlencoded_repeated_keys() {
        let form = FormData::parse(b"ids=a&ids=b&action=delete&note=+hi+");
        assert_eq!(form.get_all("ids"), vec!["a", "b"]);
        assert_eq!(form.get("action"), Some("delete"));
        assert_eq!(form.get("note"), Some("hi"));
        assert_eq!(form.get("missing"), None);
    }
}
