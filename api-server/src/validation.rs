//! Declarative request validation
//!
//! Each operation declares an ordered list of [`FieldRules`]. [`validate`]
//! checks every field and reports the first failing rule per field, so a
//! single response carries every problem with the request.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// One rejected input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Present, not null, and not a blank string
    Required,
    /// If present: not null and not a blank string
    NotBlank,
    /// If present and a string: at most this many characters
    MaxLength(usize),
    /// If present: a string equal to one of the values
    OneOf(&'static [&'static str]),
    /// If present: a string or null
    Text,
    /// If present: an RFC 3339 date-time string or null
    Timestamp,
    /// If present: an integer >= 0, either as a number or a decimal string
    NonNegativeInteger,
}

impl Rule {
    fn check(&self, field: &str, value: Option<&Value>) -> Result<(), String> {
        let value = match (self, value) {
            (Rule::Required, None | Some(Value::Null)) => {
                return Err(format!("{field} is required"));
            }
            (Rule::Required, Some(Value::String(s))) if s.trim().is_empty() => {
                return Err(format!("{field} is required"));
            }
            (Rule::Required, Some(_)) | (_, None) => return Ok(()),
            (_, Some(value)) => value,
        };

        match (self, value) {
            (Rule::NotBlank, Value::Null) => Err(format!("{field} must not be empty")),
            (Rule::NotBlank, Value::String(s)) if s.trim().is_empty() => {
                Err(format!("{field} must not be empty"))
            }
            (Rule::MaxLength(max), Value::String(s)) if s.chars().count() > *max => {
                Err(format!("{field} must be at most {max} characters"))
            }
            (Rule::MaxLength(_), Value::String(_) | Value::Null) => Ok(()),
            (Rule::MaxLength(_), _) => Err(format!("{field} must be a string")),
            (Rule::OneOf(values), Value::String(s)) if values.iter().any(|v| *v == s.as_str()) => {
                Ok(())
            }
            (Rule::OneOf(values), _) => {
                Err(format!("{field} must be one of: {}", values.join(", ")))
            }
            (Rule::Text, Value::String(_) | Value::Null) => Ok(()),
            (Rule::Text, _) => Err(format!("{field} must be a string")),
            (Rule::Timestamp, Value::Null) => Ok(()),
            (Rule::Timestamp, Value::String(s)) if s.parse::<DateTime<Utc>>().is_ok() => Ok(()),
            (Rule::Timestamp, _) => Err(format!("{field} must be an RFC 3339 date-time")),
            (Rule::NonNegativeInteger, Value::Number(n)) if n.is_u64() => Ok(()),
            (Rule::NonNegativeInteger, Value::String(s)) if s.parse::<usize>().is_ok() => Ok(()),
            (Rule::NonNegativeInteger, _) => {
                Err(format!("{field} must be a non-negative integer"))
            }
            _ => Ok(()),
        }
    }
}

/// Rules attached to one named field
#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

impl FieldRules {
    pub const fn new(field: &'static str, rules: &'static [Rule]) -> Self {
        Self { field, rules }
    }
}

/// Check `fields` against `rules`, collecting every violation in rule order.
pub fn validate(rules: &[FieldRules], fields: &Map<String, Value>) -> Result<(), Vec<Violation>> {
    let violations: Vec<Violation> = rules
        .iter()
        .filter_map(|field_rules| {
            let value = fields.get(field_rules.field);
            field_rules
                .rules
                .iter()
                .find_map(|rule| rule.check(field_rules.field, value).err())
                .map(|message| Violation::new(field_rules.field, message))
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Parse a path identifier, rejecting anything that is not a UUID.
pub fn validate_id(raw: &str) -> Result<Uuid, Violation> {
    Uuid::parse_str(raw).map_err(|_| Violation::new("id", "invalid identifier format"))
}

/// Present decoded query parameters as a field set of string values.
pub fn query_fields(params: &HashMap<String, String>) -> Map<String, Value> {
    params
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RULES: &[FieldRules] = &[
        FieldRules::new("title", &[Rule::Required, Rule::MaxLength(5)]),
        FieldRules::new("priority", &[Rule::Required, Rule::OneOf(&["LOW", "HIGH"])]),
        FieldRules::new("dueDate", &[Rule::Timestamp]),
        FieldRules::new("limit", &[Rule::NonNegativeInteger]),
    ];

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn accepts_valid_fields() {
        let input = fields(json!({
            "title": "Milk",
            "priority": "LOW",
            "dueDate": "2030-01-01T09:00:00Z",
            "limit": "10"
        }));
        assert!(validate(RULES, &input).is_ok());
    }

    #[test]
    fn absent_optional_fields_pass() {
        let input = fields(json!({ "title": "Milk", "priority": "HIGH" }));
        assert!(validate(RULES, &input).is_ok());
    }

    #[test]
    fn collects_every_violation_in_rule_order() {
        let input = fields(json!({ "dueDate": "tomorrow", "limit": "-1" }));
        let violations = validate(RULES, &input).unwrap_err();

        let names: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(names, vec!["title", "priority", "dueDate", "limit"]);
        assert_eq!(violations[0].message, "title is required");
        assert_eq!(violations[3].message, "limit must be a non-negative integer");
    }

    #[test]
    fn reports_first_failing_rule_per_field() {
        let input = fields(json!({ "title": "   ", "priority": "LOW" }));
        let violations = validate(RULES, &input).unwrap_err();
        assert_eq!(violations, vec![Violation::new("title", "title is required")]);
    }

    #[test]
    fn max_length_counts_characters() {
        let ok = fields(json!({ "title": "ééééé", "priority": "LOW" }));
        assert!(validate(RULES, &ok).is_ok());

        let too_long = fields(json!({ "title": "abcdef", "priority": "LOW" }));
        let violations = validate(RULES, &too_long).unwrap_err();
        assert_eq!(violations[0].message, "title must be at most 5 characters");
    }

    #[test]
    fn one_of_rejects_wrong_case_and_types() {
        for priority in [json!("low"), json!(1), json!(null)] {
            let input = fields(json!({ "title": "Milk", "priority": priority }));
            let violations = validate(RULES, &input).unwrap_err();
            assert_eq!(violations[0].field, "priority");
        }
    }

    #[test]
    fn not_blank_and_text_rules() {
        const UPDATE: &[FieldRules] = &[
            FieldRules::new("title", &[Rule::NotBlank, Rule::MaxLength(5)]),
            FieldRules::new("description", &[Rule::Text]),
        ];

        let input = fields(json!({ "title": "", "description": 7 }));
        let violations = validate(UPDATE, &input).unwrap_err();
        assert_eq!(
            violations,
            vec![
                Violation::new("title", "title must not be empty"),
                Violation::new("description", "description must be a string"),
            ]
        );

        let cleared = fields(json!({ "description": null }));
        assert!(validate(UPDATE, &cleared).is_ok());

        let blank = fields(json!({ "title": " \t " }));
        let violations = validate(UPDATE, &blank).unwrap_err();
        assert_eq!(violations, vec![Violation::new("title", "title must not be empty")]);
    }

    #[test]
    fn validate_id_accepts_uuid_only() {
        let id = Uuid::new_v4();
        assert_eq!(validate_id(&id.to_string()).unwrap(), id);

        let violation = validate_id("507f1f77bcf86cd79943901").unwrap_err();
        assert_eq!(violation, Violation::new("id", "invalid identifier format"));
    }

    #[test]
    fn query_fields_become_strings() {
        let mut params = HashMap::new();
        params.insert("limit".to_string(), "5".to_string());
        let map = query_fields(&params);
        assert_eq!(map.get("limit"), Some(&json!("5")));
    }
}
