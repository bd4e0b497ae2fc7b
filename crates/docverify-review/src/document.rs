//! Document references handed to the reviewer by its host.

use crate::ReviewError;

/// Normalise a served document path so it can be joined to the api url.
///
/// `./uploads/a.pdf` → `/uploads/a.pdf`, `uploads/a.pdf` → `/uploads/a.pdf`.
/// A missing, blank, or control-character path is [`ReviewError::InvalidInput`].
pub fn normalize_document_path(path: Option<&str>) -> Result<String, ReviewError> {
    let Some(raw) = path else {
        return Err(ReviewError::InvalidInput("document path is missing".into()));
    };
    let path = raw.trim();
    if path.is_empty() {
        return Err(ReviewError::InvalidInput("document path is empty".into()));
    }
    if path.chars().any(char::is_control) {
        return Err(ReviewError::InvalidInput(format!(
            "document path contains control characters: {path:?}"
        )));
    }

    if let Some(rest) = path.strip_prefix("./") {
        Ok(format!("/{rest}"))
    } else if path.starts_with('/') {
        Ok(path.to_string())
    } else {
        Ok(format!("/{path}"))
    }
}

/// Absolute url of a normalised document path.
pub fn document_url(api_url: &str, normalized_path: &str) -> String {
    format!("{}{}", api_url.trim_end_matches('/'), normalized_path)
}
