//! Connection configuration
//!
//! The connector is configured with four connection arguments:
//!
//! | Argument       | Type           | Description                              |
//! |----------------|----------------|------------------------------------------|
//! | `api_token`    | secret string  | Strapi API token, sent as a bearer token |
//! | `host`         | string         | Strapi host                              |
//! | `port`         | integer        | Strapi port                              |
//! | `pluralApiIds` | list of string | Collections to expose, one table each    |
//!
//! Configuration may be supplied as JSON or YAML.

use crate::error::{Error, Result};
use crate::types::PropertyType;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Arguments that must be present in every connection config
const REQUIRED_FIELDS: [&str; 4] = ["api_token", "host", "port", "pluralApiIds"];

// ============================================================================
// Connection Config
// ============================================================================

/// Validated connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct StrapiConfig {
    /// API token used as the bearer credential
    pub api_token: String,

    /// Host name, optionally with an `http://` or `https://` scheme
    pub host: String,

    /// Port the Strapi server listens on
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,

    /// Plural API ids of the collections to register as tables
    #[serde(rename = "pluralApiIds")]
    pub plural_api_ids: Vec<String>,

    /// Optional request timeout in seconds (none by default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl StrapiConfig {
    /// Build a config from a JSON value, checking required fields first
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::config("connection data must be an object"))?;

        for field in REQUIRED_FIELDS {
            if obj.get(field).map_or(true, Value::is_null) {
                return Err(Error::missing_field(field));
            }
        }

        let config: Self = serde_json::from_value(value.clone())
            .map_err(|e| Error::config(format!("Invalid connection data: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Parse a YAML (or JSON) document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(yaml)?;
        Self::from_value(&value)
    }

    /// Load a config file (YAML or JSON)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.api_token.trim().is_empty() {
            return Err(Error::invalid_value("api_token", "must not be empty"));
        }
        if self.host.trim().is_empty() {
            return Err(Error::invalid_value("host", "must not be empty"));
        }
        if self.port == 0 {
            return Err(Error::invalid_value("port", "must be between 1 and 65535"));
        }
        if self.plural_api_ids.is_empty() {
            return Err(Error::invalid_value(
                "pluralApiIds",
                "at least one collection is required",
            ));
        }

        for (i, name) in self.plural_api_ids.iter().enumerate() {
            if !is_valid_collection_name(name) {
                return Err(Error::invalid_value(
                    "pluralApiIds",
                    format!("'{name}' is not a valid plural API id"),
                ));
            }
            if self.plural_api_ids[..i].contains(name) {
                return Err(Error::invalid_value(
                    "pluralApiIds",
                    format!("'{name}' is listed more than once"),
                ));
            }
        }

        self.base_url()?;
        Ok(())
    }

    /// Root URL of the Strapi server: `http://{host}:{port}`
    pub fn base_url(&self) -> Result<Url> {
        let host = self.host.trim().trim_end_matches('/');
        let raw = if host.starts_with("http://") || host.starts_with("https://") {
            format!("{host}:{}", self.port)
        } else {
            format!("http://{host}:{}", self.port)
        };
        Ok(Url::parse(&raw)?)
    }

    /// Request timeout, if one was configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// One descriptor per configured collection, in configured order
    pub fn collections(&self) -> Vec<CollectionConfig> {
        self.plural_api_ids
            .iter()
            .map(|name| CollectionConfig::new(name.clone()))
            .collect()
    }
}

impl fmt::Debug for StrapiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrapiConfig")
            .field("api_token", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("plural_api_ids", &self.plural_api_ids)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Ports arrive as numbers from JSON and sometimes as strings from forms
fn deserialize_port<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortValue {
        Number(u64),
        Text(String),
    }

    let port = match PortValue::deserialize(deserializer)? {
        PortValue::Number(n) => n,
        PortValue::Text(s) => s.trim().parse::<u64>().map_err(serde::de::Error::custom)?,
    };
    u16::try_from(port).map_err(|_| serde::de::Error::custom(format!("port {port} out of range")))
}

/// Plural API ids end up in URL paths, so keep them to path-safe characters
fn is_valid_collection_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// ============================================================================
// Collection Descriptor
// ============================================================================

/// A registered collection and the REST path it lives under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Table name (the plural API id)
    pub name: String,

    /// Collection endpoint, e.g. `/api/posts`
    pub path: String,
}

impl CollectionConfig {
    /// Descriptor for a plural API id
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let path = format!("/api/{name}");
        Self { name, path }
    }

    /// Endpoint of a single record
    ///
    /// The id is percent-encoded as one path segment, so it can never leave
    /// the collection. Empty and dot-only ids are rejected.
    pub fn record_path(&self, id: &str) -> Result<String> {
        if id.is_empty() || id.chars().all(|c| c == '.') {
            return Err(Error::query(format!("invalid record id: '{id}'")));
        }

        let mut url = Url::parse("http://localhost")?;
        url.set_path(&self.path);
        url.path_segments_mut()
            .map_err(|()| Error::query(format!("invalid collection path: {}", self.path)))?
            .push(id);
        Ok(url.path().to_string())
    }
}

// ============================================================================
// Connection Spec (for UI)
// ============================================================================

/// Description of one connection argument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyConfig {
    /// Argument name as it appears in the config
    pub name: String,

    /// Argument type
    #[serde(rename = "type")]
    pub property_type: PropertyType,

    /// Human-readable label
    pub label: String,

    /// Argument description
    pub description: String,

    /// Whether the argument is required
    pub required: bool,

    /// Whether the value should be masked
    #[serde(default)]
    pub secret: bool,
}

/// Schema of the connection arguments plus an example config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSpec {
    /// Arguments, in display order
    pub properties: Vec<PropertyConfig>,

    /// Example connection data
    pub example: Value,
}

impl ConnectionSpec {
    /// Look up an argument by name
    pub fn property(&self, name: &str) -> Option<&PropertyConfig> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// The connection arguments accepted by [`StrapiConfig`]
pub fn connection_spec() -> ConnectionSpec {
    let property = |name: &str,
                    property_type: PropertyType,
                    label: &str,
                    description: &str| PropertyConfig {
        name: name.to_string(),
        property_type,
        label: label.to_string(),
        description: description.to_string(),
        required: true,
        secret: property_type == PropertyType::Password,
    };

    ConnectionSpec {
        properties: vec![
            property(
                "api_token",
                PropertyType::Password,
                "Api token",
                "Strapi API key to use for authentication.",
            ),
            property(
                "host",
                PropertyType::Url,
                "Host",
                "Strapi API host to connect to.",
            ),
            property(
                "port",
                PropertyType::Integer,
                "Port",
                "Strapi API port to connect to.",
            ),
            property(
                "pluralApiIds",
                PropertyType::Array,
                "Plural API id",
                "Plural API id to use for querying.",
            ),
        ],
        example: json!({
            "host": "localhost",
            "port": 1337,
            "api_token": "<strapi api token>",
            "pluralApiIds": ["posts", "portfolios"]
        }),
    }
}
