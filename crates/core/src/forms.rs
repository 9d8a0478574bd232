//! Serde helpers for normalizing HTML form input.
//!
//! Browsers submit every field of a form, so an optional field the user left
//! blank arrives as an empty string rather than being absent. The helpers
//! here normalize that once, at deserialization, so the rest of the system
//! only ever sees `Option<String>` with `None` meaning "not provided".

use serde::{Deserialize, Deserializer};

/// Deserialize an optional string field, mapping empty or whitespace-only
/// input to `None`.
///
/// Usage:
///
/// ```rust
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct PersonForm {
///     first_name: String,
///     #[serde(default, deserialize_with = "motorpool_core::forms::empty_as_none")]
///     phone: Option<String>,
/// }
/// ```
///
/// # Errors
///
/// Propagates the underlying deserializer error.
pub fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    }))
}

/// Normalize an already-deserialized optional string the same way
/// [`empty_as_none`] does.
#[must_use]
pub fn normalize(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "super::empty_as_none")]
        phone: Option<String>,
    }

    #[test]
    fn test_empty_string_becomes_none() {
        let form: Form = serde_json::from_str(r#"{"phone": ""}"#).unwrap();
        assert_eq!(form.phone, None);
    }

    #[test]
    fn test_whitespace_becomes_none() {
        let form: Form = serde_json::from_str(r#"{"phone": "   "}"#).unwrap();
        assert_eq!(form.phone, None);
    }

    #[test]
    fn test_missing_field_becomes_none() {
        let form: Form = serde_json::from_str("{}").unwrap();
        assert_eq!(form.phone, None);
    }

    #[test]
    fn test_value_is_kept_and_trimmed() {
        let form: Form = serde_json::from_str(r#"{"phone": " 555-0100 "}"#).unwrap();
        assert_eq!(form.phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(super::normalize(None), None);
        assert_eq!(super::normalize(Some(String::new())), None);
        assert_eq!(super::normalize(Some(" x ".into())), Some("x".into()));
    }
}
