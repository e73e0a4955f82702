//! Permissive response shape
//!
//! The remote API is loosely typed: any body may carry `message`, `id`,
//! `code` or `petId`, with string or numeric values. Absent, null, empty or
//! otherwise falsy values are treated as missing.

use serde::Deserialize;
use std::num::FpCategory;
use serde_json::{json, Value};

/// Text used when a request fails without a usable body
pub const FALLBACK_MESSAGE: &str = "Error";

/// Optional-field view over a response body
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResponseFields {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default, rename = "petId")]
    pub pet_id: Option<Value>,
}

/// A parsed response body, successful or not
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status, `None` when the request never got a response
    pub status: Option<u16>,
    body: Value,
    fields: ResponseFields,
}

impl ApiResponse {
    /// Wrap a body received from the server
    pub fn new(status: Option<u16>, body: Value) -> Self {
        // Non-object bodies (strings, arrays) carry no known fields
        let fields = if body.is_object() {
            serde_json::from_value(body.clone()).unwrap_or_default()
        } else {
            ResponseFields::default()
        };
        Self {
            status,
            body,
            fields,
        }
    }

    /// Build a response from a JSON body with no associated status
    pub fn from_json(body: Value) -> Self {
        Self::new(None, body)
    }

    /// The `{"message": "Error"}` placeholder used for transport failures
    pub fn fallback() -> Self {
        Self::new(None, json!({ "message": FALLBACK_MESSAGE }))
    }

    /// Raw response body
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Whether the server answered with a 2xx status
    pub fn is_success(&self) -> bool {
        self.status.is_some_and(|s| (200..300).contains(&s))
    }

    pub fn message(&self) -> Option<String> {
        self.fields.message.as_ref().and_then(field_text)
    }

    /// Server-issued user id
    pub fn id(&self) -> Option<String> {
        self.fields.id.as_ref().and_then(field_text)
    }

    /// Server-issued auth key
    pub fn code(&self) -> Option<String> {
        self.fields.code.as_ref().and_then(field_text)
    }

    pub fn pet_id(&self) -> Option<String> {
        self.fields.pet_id.as_ref().and_then(field_text)
    }

    /// Compact JSON serialization of the whole body
    pub fn serialized_body(&self) -> String {
        serde_json::to_string(&self.body).unwrap_or_else(|_| FALLBACK_MESSAGE.to_string())
    }

    /// The `message` field if present, otherwise the serialized body
    pub fn display_text(&self) -> String {
        self.message().unwrap_or_else(|| self.serialized_body())
    }
}

/// JavaScript-style falsiness: null, false, "" and zero
pub(crate) fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f.classify() == FpCategory::Zero),
        _ => false,
    }
}

/// Render a field value as text, treating falsy values as missing
fn field_text(value: &Value) -> Option<String> {
    if is_falsy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        other => Some(other.to_string()),
    }
}

/// Whole-number floats print without a fractional part, as `1` not `1.0`
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract().classify() == FpCategory::Zero => {
            format!("{f:.0}")
        }
        _ => n.to_string(),
    }
}
