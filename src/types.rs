//! Common types used throughout the connector
//!
//! Shared type aliases plus the small enums that cross module boundaries.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type (insertion ordered)
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Query string parameters, in the order they are sent.
///
/// A list rather than a map because Strapi filters repeat bracketed keys
/// (`filters[id][$in][0]`, `filters[id][$in][1]`, ...).
pub type QueryParams = Vec<(String, String)>;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP verbs the Strapi API accepts from this connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    DELETE,
}

impl Method {
    /// Whether requests with this verb carry a body
    pub fn sends_body(self) -> bool {
        !matches!(self, Method::GET)
    }

    /// Canonical upper-case name
    pub fn as_str(self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            _ => Err(Error::UnsupportedMethod {
                method: s.to_string(),
            }),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::DELETE => reqwest::Method::DELETE,
        }
    }
}

// ============================================================================
// Property Type (for connection spec)
// ============================================================================

/// Type of a connection argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[default]
    String,
    /// Secret string, masked in UIs
    Password,
    Url,
    Integer,
    Array,
}

// ============================================================================
// Utilities
// ============================================================================

/// Render a JSON scalar the way it should appear in a URL
///
/// Strings are used verbatim (no surrounding quotes); everything else uses
/// its JSON text.
pub fn param_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_conversion() {
        let get: reqwest::Method = Method::GET.into();
        assert_eq!(reqwest::Method::GET, get);
        let delete: reqwest::Method = Method::DELETE.into();
        assert_eq!(reqwest::Method::DELETE, delete);
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::GET);
        assert_eq!("Put".parse::<Method>().unwrap(), Method::PUT);
        assert_eq!("DELETE".parse::<Method>().unwrap(), Method::DELETE);

        let err = "PATCH".parse::<Method>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedMethod { ref method } if method == "PATCH"));
    }

    #[test]
    fn test_method_sends_body() {
        assert!(!Method::GET.sends_body());
        assert!(Method::POST.sends_body());
        assert!(Method::PUT.sends_body());
        assert!(Method::DELETE.sends_body());
    }

    #[test]
    fn test_param_value() {
        assert_eq!(param_value(&json!("hello")), "hello");
        assert_eq!(param_value(&json!(42)), "42");
        assert_eq!(param_value(&json!(true)), "true");
        assert_eq!(param_value(&json!(null)), "null");
    }
}
