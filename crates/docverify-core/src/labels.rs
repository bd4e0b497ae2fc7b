//! Display labels for extracted entity types.
//!
//! The extraction service usually sends `entity_label` alongside
//! `entity_type`; this table fills the gap when it doesn't.

use std::borrow::Cow;

/// Known entity type keys and their display labels.
pub const ENTITY_LABELS: &[(&str, &str)] = &[
    ("legal_name", "Client Name"),
    ("jurisdiction", "Jurisdiction"),
    ("entity_type", "Entity Type"),
    ("registration_date", "Registration Date"),
    ("expiry_date", "Expiry Date"),
    ("registration_number", "Registration Number"),
    ("registered_address", "Registered Address"),
    ("issue_date", "Issue Date"),
    ("issuing_authority", "Issuing Authority"),
    ("authorized_capital", "Authorized Capital"),
];

/// Label for an entity type key.
///
/// Unknown keys are title-cased word by word: `"tax_id"` → `"Tax Id"`.
pub fn entity_label(entity_type: &str) -> Cow<'static, str> {
    if let Some((_, label)) = ENTITY_LABELS.iter().find(|(key, _)| *key == entity_type) {
        return Cow::Borrowed(label);
    }
    Cow::Owned(title_case(entity_type))
}

fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Label to show for an annotation: the supplied one, else the table lookup.
pub fn display_label<'a>(entity_type: &str, supplied: &'a str) -> Cow<'a, str> {
    if supplied.trim().is_empty() {
        entity_label(entity_type)
    } else {
        Cow::Borrowed(supplied)
    }
}
