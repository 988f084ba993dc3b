//! Contributor identity field parsing
//!
//! The identity column arrives in several shapes: a bare integer, a JSON
//! array, or text holding a list literal such as `"[9110, 122697]"`. Parsing
//! never fails; anything unusable degrades to [`IdentityField::Malformed`].

use crate::types::ContributorId;
use serde_json::Value;

/// Outcome of parsing one identity field
#[derive(Debug, Clone, PartialEq)]
pub enum IdentityField {
    /// A single contributor
    Scalar(ContributorId),
    /// Several co-authors, deduplicated in first-seen order
    List(Vec<ContributorId>),
    /// Null, zero, or empty text
    Empty,
    /// Present but unusable
    Malformed { reason: String },
}

impl IdentityField {
    /// Parse the raw identity value of a record
    pub fn parse(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => IdentityField::Empty,
            Some(Value::String(text)) => Self::parse_text(text),
            Some(other) => Self::parse_structured(other),
        }
    }

    fn parse_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return IdentityField::Empty;
        }

        match serde_json::from_str::<Value>(trimmed) {
            // Nested text is not decoded a second time
            Ok(Value::String(_)) => IdentityField::Malformed {
                reason: format!("quoted identity text: {}", trimmed),
            },
            Ok(decoded) => Self::parse_structured(&decoded),
            Err(e) => IdentityField::Malformed {
                reason: format!("undecodable identity text {:?}: {}", trimmed, e),
            },
        }
    }

    fn parse_structured(value: &Value) -> Self {
        match value {
            Value::Null | Value::Bool(false) => IdentityField::Empty,
            Value::Number(_) => match identity_from_element(value) {
                Element::Valid(id) => IdentityField::Scalar(id),
                Element::Falsy => IdentityField::Empty,
                Element::Invalid => IdentityField::Malformed {
                    reason: format!("identity is not a positive integer: {}", value),
                },
            },
            Value::Array(items) => {
                let mut identities: Vec<ContributorId> = Vec::with_capacity(items.len());
                let mut invalid = 0usize;

                for item in items {
                    match identity_from_element(item) {
                        Element::Valid(id) => {
                            if !identities.contains(&id) {
                                identities.push(id);
                            }
                        }
                        Element::Falsy => {}
                        Element::Invalid => invalid += 1,
                    }
                }

                if identities.is_empty() && invalid > 0 {
                    IdentityField::Malformed {
                        reason: format!("no usable identity among {} list entries", items.len()),
                    }
                } else if identities.is_empty() {
                    IdentityField::Empty
                } else {
                    IdentityField::List(identities)
                }
            }
            other => IdentityField::Malformed {
                reason: format!("unsupported identity value: {}", other),
            },
        }
    }

    /// Identities credited by this field, empty when nothing usable was found
    pub fn into_identities(self) -> Vec<ContributorId> {
        match self {
            IdentityField::Scalar(id) => vec![id],
            IdentityField::List(ids) => ids,
            IdentityField::Empty | IdentityField::Malformed { .. } => Vec::new(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, IdentityField::Malformed { .. })
    }
}

enum Element {
    Valid(ContributorId),
    Falsy,
    Invalid,
}

fn identity_from_element(value: &Value) -> Element {
    match value {
        Value::Null | Value::Bool(false) => Element::Falsy,
        Value::Number(number) => {
            if let Some(id) = number.as_u64() {
                return if id == 0 {
                    Element::Falsy
                } else {
                    Element::Valid(ContributorId(id))
                };
            }
            match number.as_f64() {
                Some(f) if f == 0.0 => Element::Falsy,
                Some(f) if f.is_finite() && f > 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
                    Element::Valid(ContributorId(f as u64))
                }
                _ => Element::Invalid,
            }
        }
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Element::Falsy;
            }
            match trimmed.parse::<u64>() {
                Ok(0) => Element::Falsy,
                Ok(id) => Element::Valid(ContributorId(id)),
                Err(_) => Element::Invalid,
            }
        }
        _ => Element::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> IdentityField {
        IdentityField::parse(Some(&value))
    }

    #[test]
    fn test_scalar_integer() {
        assert_eq!(parse(json!(9110)), IdentityField::Scalar(ContributorId(9110)));
        assert_eq!(parse(json!(9110.0)), IdentityField::Scalar(ContributorId(9110)));
    }

    #[test]
    fn test_list_literal_text() {
        assert_eq!(
            parse(json!("[9110, 122697]")),
            IdentityField::List(vec![ContributorId(9110), ContributorId(122697)])
        );
        assert_eq!(parse(json!(" 42 ")), IdentityField::Scalar(ContributorId(42)));
    }

    #[test]
    fn test_structured_array() {
        assert_eq!(
            parse(json!([7, 9, 7])),
            IdentityField::List(vec![ContributorId(7), ContributorId(9)])
        );
    }

    #[test]
    fn test_falsy_values_are_empty() {
        assert_eq!(IdentityField::parse(None), IdentityField::Empty);
        assert_eq!(parse(Value::Null), IdentityField::Empty);
        assert_eq!(parse(json!(0)), IdentityField::Empty);
        assert_eq!(parse(json!("")), IdentityField::Empty);
        assert_eq!(parse(json!("[]")), IdentityField::Empty);
        assert_eq!(parse(json!([0, null])), IdentityField::Empty);
    }

    #[test]
    fn test_list_skips_falsy_and_invalid_elements() {
        assert_eq!(
            parse(json!([0, "12", "bob", 5])),
            IdentityField::List(vec![ContributorId(12), ContributorId(5)])
        );
    }

    #[test]
    fn test_malformed_inputs() {
        assert!(parse(json!("[9110, ")).is_malformed());
        assert!(parse(json!("not an id")).is_malformed());
        assert!(parse(json!("\"9110\"")).is_malformed());
        assert!(parse(json!(-3)).is_malformed());
        assert!(parse(json!(1.5)).is_malformed());
        assert!(parse(json!({"id": 1})).is_malformed());
        assert!(parse(json!(["bob"])).is_malformed());
    }

    #[test]
    fn test_malformed_yields_no_identities() {
        assert!(parse(json!("[oops")).into_identities().is_empty());
        assert_eq!(
            parse(json!("[3, 4]")).into_identities(),
            vec![ContributorId(3), ContributorId(4)]
        );
    }
}
