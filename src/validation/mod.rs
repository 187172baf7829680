//! Request payload validation.
//!
//! Bodies arrive as raw JSON and are checked field by field so every problem
//! is reported at once, each under the path of the offending field.

mod client;
mod review_request;
mod testimonial;

pub use client::{client_patch, new_client};
pub use review_request::{invalid_status, new_review_request, status_update};
pub use testimonial::new_testimonial;

use serde::Serialize;
use serde_json::{Map, Value};
use std::str::FromStr;

/// One failed check, addressed by its path in the request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: Vec<String>,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            path: vec![field.to_string()],
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            message: message.into(),
            errors,
        }
    }

    pub fn single(message: impl Into<String>, field: &str, detail: impl Into<String>) -> Self {
        Self::new(message, vec![FieldError::new(field, detail)])
    }
}

/// Field-by-field reader over a JSON object that collects errors
pub(crate) struct Fields<'a> {
    body: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(body: &'a Value, message: &str) -> Result<Self, ValidationError> {
        match body {
            Value::Object(body) => Ok(Self {
                body,
                errors: Vec::new(),
            }),
            _ => Err(ValidationError::new(
                message,
                vec![FieldError {
                    path: Vec::new(),
                    message: "Expected a JSON object".to_string(),
                }],
            )),
        }
    }

    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Absent and `null` are both "not provided"
    fn present(&self, field: &str) -> Option<&'a Value> {
        self.body.get(field).filter(|v| !v.is_null())
    }

    pub(crate) fn required_string(&mut self, field: &str) -> Option<String> {
        match self.present(field) {
            None => {
                self.fail(field, "Required");
                None
            }
            Some(value) => self.non_empty_string(field, value),
        }
    }

    /// Patch semantics: `None` when absent, the new value otherwise
    pub(crate) fn optional_string(&mut self, field: &str) -> Option<String> {
        let value = self.present(field)?;
        self.non_empty_string(field, value)
    }

    /// Absent → `None`, `null` or blank → `Some(None)`, text → `Some(Some(_))`
    pub(crate) fn nullable_string(&mut self, field: &str) -> Option<Option<String>> {
        match self.body.get(field)? {
            Value::Null => Some(None),
            Value::String(s) if s.trim().is_empty() => Some(None),
            Value::String(s) => Some(Some(s.trim().to_string())),
            _ => {
                self.fail(field, "Expected string");
                None
            }
        }
    }

    fn non_empty_string(&mut self, field: &str, value: &Value) -> Option<String> {
        match value {
            Value::String(s) if s.trim().is_empty() => {
                self.fail(field, "Must not be empty");
                None
            }
            Value::String(s) => Some(s.trim().to_string()),
            _ => {
                self.fail(field, "Expected string");
                None
            }
        }
    }

    pub(crate) fn required_email(&mut self, field: &str) -> Option<String> {
        let email = self.required_string(field)?;
        self.check_email(field, email)
    }

    pub(crate) fn optional_email(&mut self, field: &str) -> Option<String> {
        let email = self.optional_string(field)?;
        self.check_email(field, email)
    }

    fn check_email(&mut self, field: &str, email: String) -> Option<String> {
        if is_plausible_email(&email) {
            Some(email)
        } else {
            self.fail(field, "Invalid email");
            None
        }
    }

    pub(crate) fn required_enum<T: FromStr>(&mut self, field: &str, allowed: &str) -> Option<T> {
        if self.present(field).is_none() {
            self.fail(field, "Required");
            return None;
        }
        self.optional_enum(field, allowed)
    }

    pub(crate) fn optional_enum<T: FromStr>(&mut self, field: &str, allowed: &str) -> Option<T> {
        let value = self.present(field)?;
        match value.as_str().map(str::parse::<T>) {
            Some(Ok(parsed)) => Some(parsed),
            _ => {
                self.fail(field, format!("Expected one of: {}", allowed));
                None
            }
        }
    }

    /// Accepts booleans and the strings "true"/"false"
    pub(crate) fn optional_bool(&mut self, field: &str) -> Option<bool> {
        match self.present(field)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) if s == "true" => Some(true),
            Value::String(s) if s == "false" => Some(false),
            _ => {
                self.fail(field, "Expected boolean");
                None
            }
        }
    }

    /// Integer in `min..=max`; integral floats and numeric strings coerce
    pub(crate) fn required_int_in(&mut self, field: &str, min: i64, max: i64) -> Option<i64> {
        let value = match self.present(field) {
            Some(value) => value,
            None => {
                self.fail(field, "Required");
                return None;
            }
        };

        let parsed = match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < 1e15).map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };

        match parsed {
            Some(n) if (min..=max).contains(&n) => Some(n),
            Some(_) => {
                self.fail(field, format!("Must be between {} and {}", min, max));
                None
            }
            None => {
                self.fail(field, "Expected integer");
                None
            }
        }
    }

    pub(crate) fn finish(self, message: &str) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(message, self.errors))
        }
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn email_plausibility() {
        assert!(is_plausible_email("jane@x.com"));
        assert!(is_plausible_email("first.last+tag@sub.example.org"));
        assert!(!is_plausible_email("jane"));
        assert!(!is_plausible_email("@x.com"));
        assert!(!is_plausible_email("jane@x"));
        assert!(!is_plausible_email("jane@@x.com"));
        assert!(!is_plausible_email("ja ne@x.com"));
    }

    #[test]
    fn integer_coercion() {
        let body = json!({"a": 5, "b": 4.0, "c": "3", "d": 4.5, "e": 9, "f": true});
        let mut fields = Fields::new(&body, "bad").unwrap();
        assert_eq!(fields.required_int_in("a", 1, 5), Some(5));
        assert_eq!(fields.required_int_in("b", 1, 5), Some(4));
        assert_eq!(fields.required_int_in("c", 1, 5), Some(3));
        assert_eq!(fields.required_int_in("d", 1, 5), None);
        assert_eq!(fields.required_int_in("e", 1, 5), None);
        assert_eq!(fields.required_int_in("f", 1, 5), None);
        assert_eq!(fields.required_int_in("missing", 1, 5), None);

        let err = fields.finish("bad").unwrap_err();
        let paths: Vec<&str> = err.errors.iter().map(|e| e.path[0].as_str()).collect();
        assert_eq!(paths, vec!["d", "e", "f", "missing"]);
    }

    #[test]
    fn rejects_non_object_bodies() {
        let err = Fields::new(&json!([1, 2]), "Invalid client data").err().unwrap();
        assert_eq!(err.message, "Invalid client data");
        assert!(err.errors[0].path.is_empty());
    }
}
