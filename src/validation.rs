// ABOUTME: Payload validation rules for coupon create and update requests
// ABOUTME: One canonical field-constraint table with per-operation required/allowed sets
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Request payload validation
//!
//! Both operations validate against the same canonical field-constraint
//! table; they differ only in which fields are required and which are
//! allowed. All violations are collected and reported together, and no
//! store call happens for a payload that fails here.

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::config::environment::CodePolicy;
use crate::models::{CODE_MAX, CODE_MIN};

static DATE_PATTERN: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[0-9]{2}/[0-9]{2}/[0-9]{4}$").expect("date pattern is a valid regex")
});

/// A single schema violation, reported to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Offending field, or `payload` for whole-body problems
    pub field: String,
    /// What the constraint expected
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

/// One entry in the canonical constraint table
struct FieldConstraint {
    name: &'static str,
    check: fn(&serde_json::Value) -> Option<&'static str>,
}

fn check_code(value: &serde_json::Value) -> Option<&'static str> {
    match value.as_i64() {
        Some(n) if (CODE_MIN..=CODE_MAX).contains(&n) => None,
        _ => Some("must be an integer between 10000 and 9999999"),
    }
}

fn check_date(value: &serde_json::Value) -> Option<&'static str> {
    match value.as_str() {
        Some(s) if DATE_PATTERN.is_match(s) => None,
        _ => Some("must be a string matching DD/MM/YYYY"),
    }
}

fn check_is_redeem(value: &serde_json::Value) -> Option<&'static str> {
    if value.is_boolean() {
        None
    } else {
        Some("must be a boolean")
    }
}

fn check_updated_at(value: &serde_json::Value) -> Option<&'static str> {
    if value.is_string() {
        None
    } else {
        Some("must be a string")
    }
}

/// The canonical field-constraint table shared by every rule set
const CONSTRAINTS: [FieldConstraint; 4] = [
    FieldConstraint {
        name: "code",
        check: check_code,
    },
    FieldConstraint {
        name: "date",
        check: check_date,
    },
    FieldConstraint {
        name: "isRedeem",
        check: check_is_redeem,
    },
    FieldConstraint {
        name: "updatedAt",
        check: check_updated_at,
    },
];

/// A per-operation rule set derived from the canonical constraint table
#[derive(Debug, Clone, Copy)]
pub struct ValidationRules {
    /// Fields that must be present
    pub required: &'static [&'static str],
    /// Fields that may be present; anything else is an unknown property
    pub allowed: &'static [&'static str],
}

/// Create rules when clients supply numeric codes
pub const CREATE_RULES_CLIENT_CODE: ValidationRules = ValidationRules {
    required: &["code", "date", "isRedeem"],
    allowed: &["code", "date", "isRedeem", "updatedAt"],
};

/// Create rules when the server generates token codes; `code` is forbidden
pub const CREATE_RULES_SERVER_CODE: ValidationRules = ValidationRules {
    required: &["date", "isRedeem"],
    allowed: &["date", "isRedeem", "updatedAt"],
};

/// Update rules when clients supply numeric codes: only the concurrency
/// token is required
pub const UPDATE_RULES_CLIENT_CODE: ValidationRules = ValidationRules {
    required: &["updatedAt"],
    allowed: &["code", "date", "isRedeem", "updatedAt"],
};

/// Update rules when the server generates token codes; `code` stays
/// server-owned on every operation
pub const UPDATE_RULES_SERVER_CODE: ValidationRules = ValidationRules {
    required: &["updatedAt"],
    allowed: &["date", "isRedeem", "updatedAt"],
};

/// Select the create rule set for the configured code policy
#[must_use]
pub const fn create_rules(policy: CodePolicy) -> ValidationRules {
    match policy {
        CodePolicy::ClientSupplied => CREATE_RULES_CLIENT_CODE,
        CodePolicy::ServerGenerated => CREATE_RULES_SERVER_CODE,
    }
}

/// Select the update rule set for the configured code policy
#[must_use]
pub const fn update_rules(policy: CodePolicy) -> ValidationRules {
    match policy {
        CodePolicy::ClientSupplied => UPDATE_RULES_CLIENT_CODE,
        CodePolicy::ServerGenerated => UPDATE_RULES_SERVER_CODE,
    }
}

/// Validate a payload against a rule set, collecting every violation
///
/// # Errors
///
/// Returns the full list of schema violations when any constraint fails.
pub fn validate(payload: &serde_json::Value, rules: &ValidationRules) -> Result<(), Vec<Violation>> {
    let Some(object) = payload.as_object() else {
        return Err(vec![Violation::new("payload", "must be a JSON object")]);
    };

    let mut violations = Vec::new();

    for key in object.keys() {
        if !rules.allowed.contains(&key.as_str()) {
            violations.push(Violation::new(key, "unknown property"));
        }
    }

    for required in rules.required {
        if !object.contains_key(*required) {
            violations.push(Violation::new(*required, "required field is missing"));
        }
    }

    for constraint in &CONSTRAINTS {
        if !rules.allowed.contains(&constraint.name) {
            continue;
        }
        if let Some(value) = object.get(constraint.name) {
            if let Some(message) = (constraint.check)(value) {
                violations.push(Violation::new(constraint.name, message));
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(violations: &[Violation]) -> Vec<&str> {
        violations.iter().map(|v| v.field.as_str()).collect()
    }

    #[test]
    fn test_valid_create_payload() {
        let payload = json!({"code": 54321, "date": "01/01/2030", "isRedeem": false});
        assert!(validate(&payload, &CREATE_RULES_CLIENT_CODE).is_ok());
    }

    #[test]
    fn test_create_missing_required_fields() {
        let payload = json!({"date": "01/01/2030"});
        let violations = validate(&payload, &CREATE_RULES_CLIENT_CODE).unwrap_err();
        assert_eq!(fields(&violations), vec!["code", "isRedeem"]);
    }

    #[test]
    fn test_code_out_of_range() {
        for code in [9999, 10_000_000] {
            let payload = json!({"code": code, "date": "01/01/2030", "isRedeem": false});
            let violations = validate(&payload, &CREATE_RULES_CLIENT_CODE).unwrap_err();
            assert_eq!(fields(&violations), vec!["code"]);
        }
    }

    #[test]
    fn test_code_boundaries_accepted() {
        for code in [10_000, 9_999_999] {
            let payload = json!({"code": code, "date": "01/01/2030", "isRedeem": false});
            assert!(validate(&payload, &CREATE_RULES_CLIENT_CODE).is_ok());
        }
    }

    #[test]
    fn test_code_must_be_integer() {
        let payload = json!({"code": 54321.5, "date": "01/01/2030", "isRedeem": false});
        let violations = validate(&payload, &CREATE_RULES_CLIENT_CODE).unwrap_err();
        assert_eq!(fields(&violations), vec!["code"]);
    }

    #[test]
    fn test_malformed_date() {
        for date in ["2030-01-01", "1/1/2030", "01/01/30", "aa/bb/cccc"] {
            let payload = json!({"code": 54321, "date": date, "isRedeem": false});
            let violations = validate(&payload, &CREATE_RULES_CLIENT_CODE).unwrap_err();
            assert_eq!(fields(&violations), vec!["date"], "date {date} should fail");
        }
    }

    #[test]
    fn test_is_redeem_wrong_type() {
        let payload = json!({"code": 54321, "date": "01/01/2030", "isRedeem": "false"});
        let violations = validate(&payload, &CREATE_RULES_CLIENT_CODE).unwrap_err();
        assert_eq!(fields(&violations), vec!["isRedeem"]);
    }

    #[test]
    fn test_unknown_property_rejected() {
        let payload = json!({
            "code": 54321,
            "date": "01/01/2030",
            "isRedeem": false,
            "owner": "mallory"
        });
        let violations = validate(&payload, &CREATE_RULES_CLIENT_CODE).unwrap_err();
        assert_eq!(fields(&violations), vec!["owner"]);
    }

    #[test]
    fn test_all_violations_collected() {
        let payload = json!({"code": 1, "date": "bad", "isRedeem": 7, "extra": true});
        let violations = validate(&payload, &CREATE_RULES_CLIENT_CODE).unwrap_err();
        assert_eq!(violations.len(), 4);
    }

    #[test]
    fn test_payload_must_be_object() {
        let violations = validate(&json!([1, 2, 3]), &CREATE_RULES_CLIENT_CODE).unwrap_err();
        assert_eq!(fields(&violations), vec!["payload"]);
    }

    #[test]
    fn test_server_code_policy_forbids_code() {
        let payload = json!({"code": 54321, "date": "01/01/2030", "isRedeem": false});
        let violations = validate(&payload, &CREATE_RULES_SERVER_CODE).unwrap_err();
        assert_eq!(fields(&violations), vec!["code"]);

        let payload = json!({"date": "01/01/2030", "isRedeem": false});
        assert!(validate(&payload, &CREATE_RULES_SERVER_CODE).is_ok());
    }

    #[test]
    fn test_update_requires_only_token() {
        let payload = json!({"updatedAt": "2030-01-01T00:00:00Z"});
        assert!(validate(&payload, &UPDATE_RULES_CLIENT_CODE).is_ok());

        let violations = validate(&json!({}), &UPDATE_RULES_CLIENT_CODE).unwrap_err();
        assert_eq!(fields(&violations), vec!["updatedAt"]);
    }

    #[test]
    fn test_update_optional_fields_still_checked() {
        let payload = json!({"updatedAt": "2030-01-01T00:00:00Z", "code": 1});
        let violations = validate(&payload, &UPDATE_RULES_CLIENT_CODE).unwrap_err();
        assert_eq!(fields(&violations), vec!["code"]);
    }

    #[test]
    fn test_server_code_policy_forbids_code_on_update() {
        let payload = json!({"updatedAt": "2030-01-01T00:00:00Z", "code": 54321});
        let violations = validate(&payload, &UPDATE_RULES_SERVER_CODE).unwrap_err();
        assert_eq!(fields(&violations), vec!["code"]);

        let payload = json!({"updatedAt": "2030-01-01T00:00:00Z", "date": "01/01/2030"});
        assert!(validate(&payload, &UPDATE_RULES_SERVER_CODE).is_ok());
    }
}
