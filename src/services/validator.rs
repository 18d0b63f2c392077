//! Declarative checks on decoded JSON responses.
//!
//! A [`Validator`] names a JMESPath expression, an assertion and an expected
//! value. Validators run in order and stop at the first failure.

use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Validator {
    pub check: String,
    pub assert: String,
    pub expect: Value,
    pub message: String,
}

impl Validator {
    pub fn new(check: &str, assert: &str, expect: impl Into<Value>, message: &str) -> Self {
        Self {
            check: check.to_string(),
            assert: assert.to_string(),
            expect: expect.into(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("response body is empty, but check field is: {0}")]
    EmptyBody(String),

    #[error("failed to parse response JSON: {0}")]
    InvalidJson(String),

    #[error("jmespath execution failed: {0}")]
    Expression(String),

    #[error("field not found: {0}")]
    FieldNotFound(String),

    #[error("unsupported assertion: {0}")]
    UnsupportedAssertion(String),

    #[error("assertion failed: {0}")]
    AssertionFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assertion {
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    Contains,
    NotContains,
}

impl FromStr for Assertion {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" | "equals" | "equal" => Ok(Self::Equal),
            "ne" | "not_equal" => Ok(Self::NotEqual),
            "lt" | "less_than" => Ok(Self::LessThan),
            "le" | "less_or_equals" => Ok(Self::LessOrEqual),
            "gt" | "greater_than" => Ok(Self::GreaterThan),
            "ge" | "greater_or_equals" => Ok(Self::GreaterOrEqual),
            "contains" => Ok(Self::Contains),
            "not_contains" => Ok(Self::NotContains),
            other => Err(ValidationError::UnsupportedAssertion(other.to_string())),
        }
    }
}

impl Assertion {
    /// Ok when the assertion holds, otherwise a description of the mismatch
    pub fn check(&self, actual: &Value, expect: &Value) -> Result<(), String> {
        let (a, e) = (to_text(actual), to_text(expect));
        let (af, ef) = (to_float(actual), to_float(expect));

        let (holds, description) = match self {
            Self::Equal => (a == e, format!("expected {}, got {}", e, a)),
            Self::NotEqual => (a != e, format!("expected != {}, got {}", e, a)),
            Self::LessThan => (af < ef, format!("expected less than {}, got {}", e, a)),
            Self::LessOrEqual => (af <= ef, format!("expected <= {}, got {}", e, a)),
            Self::GreaterThan => (af > ef, format!("expected > {}, got {}", e, a)),
            Self::GreaterOrEqual => (af >= ef, format!("expected >= {}, got {}", e, a)),
            Self::Contains => (a.contains(&e), format!("expected to contain {}, got {}", e, a)),
            Self::NotContains => (
                !a.contains(&e),
                format!("actual value contains {}; actual: {}", e, a),
            ),
        };

        if holds {
            Ok(())
        } else {
            Err(description)
        }
    }
}

/// Evaluate a JMESPath expression against a raw JSON body
pub fn get_check_value(body: &str, check: &str) -> Result<Value, ValidationError> {
    if body.trim().is_empty() {
        if check.is_empty() {
            return Ok(Value::Null);
        }
        return Err(ValidationError::EmptyBody(check.to_string()));
    }

    let data = jmespath::Variable::from_json(body).map_err(ValidationError::InvalidJson)?;
    let expr =
        jmespath::compile(check).map_err(|e| ValidationError::Expression(e.to_string()))?;
    let result = expr
        .search(data)
        .map_err(|e| ValidationError::Expression(e.to_string()))?;

    if result.is_null() {
        return Err(ValidationError::FieldNotFound(check.to_string()));
    }

    serde_json::to_value(&*result).map_err(|e| ValidationError::Expression(e.to_string()))
}

/// Run one assertion by name
pub fn validate(actual: &Value, assertion: &str, expect: &Value) -> Result<(), ValidationError> {
    let assertion: Assertion = assertion.parse()?;
    assertion
        .check(actual, expect)
        .map_err(ValidationError::AssertionFailed)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub validator: Validator,
    pub check_value: Option<Value>,
    pub check_result: String,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub passed: bool,
    pub results: Vec<ValidationResult>,
}

impl ValidationReport {
    /// JSON rendering stored as the error message of a failed call
    pub fn summary(&self) -> String {
        serde_json::to_string(&self.results).unwrap_or_default()
    }
}

/// Run validators in order, stopping after the first failure
pub fn run_validators(body: &str, validators: &[Validator]) -> ValidationReport {
    let mut results = Vec::with_capacity(validators.len());

    for validator in validators {
        let check_value = match get_check_value(body, &validator.check) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(check = %validator.check, error = %e, "Failed to read check value");
                results.push(ValidationResult {
                    validator: validator.clone(),
                    check_value: None,
                    check_result: e.to_string(),
                    passed: false,
                });
                return ValidationReport {
                    passed: false,
                    results,
                };
            }
        };

        match validate(&check_value, &validator.assert, &validator.expect) {
            Ok(()) => {
                tracing::debug!(check = %validator.check, "Assertion succeeded");
                results.push(ValidationResult {
                    validator: validator.clone(),
                    check_value: Some(check_value),
                    check_result: "assertion succeeded".to_string(),
                    passed: true,
                });
            }
            Err(e) => {
                tracing::warn!(
                    check = %validator.check,
                    assertion = %validator.assert,
                    error = %e,
                    "Assertion failed"
                );
                results.push(ValidationResult {
                    validator: validator.clone(),
                    check_value: Some(check_value),
                    check_result: e.to_string(),
                    passed: false,
                });
                return ValidationReport {
                    passed: false,
                    results,
                };
            }
        }
    }

    ValidationReport {
        passed: true,
        results,
    }
}

/// String form used by the equality and substring assertions
fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Best-effort numeric coercion, unparsable values compare as zero
fn to_float(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => 0.0,
    }
}
