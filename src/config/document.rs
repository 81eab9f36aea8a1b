//! Dashboard configuration document
//!
//! One schema covers every field the front-end reads. Fields a deployment
//! does not use keep their `null`/`false` defaults, so a single template
//! serves every variant.

use std::collections::BTreeMap;
use tracing::debug;

use crate::config::{Value, ValueMap};
use crate::constants::{endpoint, keys};
use crate::error::ConfigError;

/// Typed view of the values rendered into `config.js`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    /// Legacy controller address
    ///
    /// The front-end replaces `controllerAPIEndpoint` with
    /// `ws(s)://<page host>/api` whenever this renders as `null`.
    pub base_controller_url: Option<String>,
    pub controller_api_endpoint: Option<String>,
    /// URL path prefix the dashboard is served under
    pub base_app_url: String,
    pub identity_provider_available: bool,
    pub identity_provider_url: Option<String>,
    pub is_juju: bool,
    pub analytics_enabled: bool,
    /// Values for placeholders outside the known schema (custom templates)
    pub extra: BTreeMap<String, Value>,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self {
            base_controller_url: None,
            controller_api_endpoint: None,
            base_app_url: crate::constants::defaults::BASE_APP_URL.to_string(),
            identity_provider_available: false,
            identity_provider_url: None,
            is_juju: false,
            analytics_enabled: false,
            extra: BTreeMap::new(),
        }
    }
}

impl ConfigDocument {
    /// Assign a value by its template key
    /// Known keys are type-checked; anything else lands in `extra`
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        debug!(key = %key, kind = value.kind(), "Setting config value");
        match key {
            keys::BASE_CONTROLLER_URL => self.base_controller_url = nullable_string(key, value)?,
            keys::CONTROLLER_API_ENDPOINT => {
                self.controller_api_endpoint = nullable_string(key, value)?;
            }
            keys::BASE_APP_URL => self.base_app_url = string(key, value)?,
            keys::IDENTITY_PROVIDER_AVAILABLE => {
                self.identity_provider_available = boolean(key, value)?;
            }
            keys::IDENTITY_PROVIDER_URL => {
                self.identity_provider_url = nullable_string(key, value)?;
            }
            keys::IS_JUJU => self.is_juju = boolean(key, value)?,
            keys::ANALYTICS_ENABLED => self.analytics_enabled = boolean(key, value)?,
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
        Ok(())
    }

    /// Apply every entry of `values` in key order
    pub fn extend(&mut self, values: ValueMap) -> Result<(), ConfigError> {
        for (key, value) in values {
            self.set(&key, value)?;
        }
        Ok(())
    }

    /// Check field invariants, collecting every problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if let Some(url) = &self.base_controller_url {
            if let Some(problem) = base_controller_url_error(url) {
                problems.push(problem);
            }
        }
        if let Some(endpoint_url) = &self.controller_api_endpoint {
            if let Some(problem) = controller_endpoint_error(endpoint_url) {
                problems.push(problem);
            } else if self.base_controller_url.is_none()
                && endpoint_url.starts_with('/')
                && endpoint_url != endpoint::API_SUFFIX
            {
                problems.push(format!(
                    "{} ({endpoint_url}) would be replaced by {} on the page host; set {} as well",
                    keys::CONTROLLER_API_ENDPOINT,
                    endpoint::API_SUFFIX,
                    keys::BASE_CONTROLLER_URL
                ));
            }
        }
        if self.base_app_url.is_empty() {
            problems.push(format!("{} must not be empty", keys::BASE_APP_URL));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }

    /// `baseControllerURL` as rendered
    ///
    /// An explicit value wins. Otherwise an absolute `ws://`/`wss://`
    /// endpoint is mirrored here so the front-end keeps it. A relative
    /// endpoint leaves it `null`, which resolves to `/api` on the page host.
    pub fn effective_base_controller_url(&self) -> Option<String> {
        self.base_controller_url.clone().or_else(|| {
            self.controller_api_endpoint
                .as_deref()
                .filter(|url| has_ws_scheme(url))
                .map(str::to_string)
        })
    }

    /// Flatten into the mapping consumed by the renderer
    pub fn to_values(&self) -> ValueMap {
        let mut values = self.extra.clone();
        values.insert(
            keys::BASE_CONTROLLER_URL.to_string(),
            self.effective_base_controller_url().into(),
        );
        values.insert(
            keys::CONTROLLER_API_ENDPOINT.to_string(),
            self.controller_api_endpoint.clone().into(),
        );
        values.insert(
            keys::BASE_APP_URL.to_string(),
            self.base_app_url.clone().into(),
        );
        values.insert(
            keys::IDENTITY_PROVIDER_AVAILABLE.to_string(),
            self.identity_provider_available.into(),
        );
        values.insert(
            keys::IDENTITY_PROVIDER_URL.to_string(),
            self.identity_provider_url.clone().into(),
        );
        values.insert(keys::IS_JUJU.to_string(), self.is_juju.into());
        values.insert(
            keys::ANALYTICS_ENABLED.to_string(),
            self.analytics_enabled.into(),
        );
        values
    }
}

fn mismatch(key: &str, expected: &'static str, value: &Value) -> ConfigError {
    ConfigError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: value.kind(),
    }
}

fn nullable_string(key: &str, value: Value) -> Result<Option<String>, ConfigError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(mismatch(key, "a string or null", &other)),
    }
}

fn string(key: &str, value: Value) -> Result<String, ConfigError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(mismatch(key, "a string", &other)),
    }
}

fn boolean(key: &str, value: Value) -> Result<bool, ConfigError> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(mismatch(key, "a boolean", &other)),
    }
}

fn has_ws_scheme(url: &str) -> bool {
    url.starts_with(endpoint::WS_SCHEME) || url.starts_with(endpoint::WSS_SCHEME)
}

fn base_controller_url_error(url: &str) -> Option<String> {
    if !has_ws_scheme(url) {
        return Some(format!(
            "{} ({url}) must begin with ws:// or wss://",
            keys::BASE_CONTROLLER_URL
        ));
    }
    if !url.ends_with(endpoint::API_SUFFIX) {
        return Some(format!(
            "{} ({url}) must end with {}",
            keys::BASE_CONTROLLER_URL,
            endpoint::API_SUFFIX
        ));
    }
    None
}

/// Mirrors the checks the front-end applies before connecting
fn controller_endpoint_error(endpoint_url: &str) -> Option<String> {
    let key = keys::CONTROLLER_API_ENDPOINT;
    if !endpoint_url.ends_with(endpoint::API_SUFFIX) {
        return Some(format!(
            "{key} ({endpoint_url}) must end with {}",
            endpoint::API_SUFFIX
        ));
    }
    if endpoint_url.starts_with('/') {
        return None;
    }
    if !has_ws_scheme(endpoint_url) {
        return Some(format!(
            "{key} ({endpoint_url}) must be an absolute path or begin with ws:// or wss://"
        ));
    }
    if !has_host(endpoint_url) {
        return Some(format!(
            "{key} ({endpoint_url}) must be an absolute path or contain a hostname or IP"
        ));
    }
    None
}

/// `ws[s]://` followed by at least one non-whitespace character and a `/`
fn has_host(url: &str) -> bool {
    let rest = url
        .strip_prefix(endpoint::WSS_SCHEME)
        .or_else(|| url.strip_prefix(endpoint::WS_SCHEME))
        .unwrap_or_default();
    let head = rest.split(char::is_whitespace).next().unwrap_or_default();
    head.chars().skip(1).any(|c| c == '/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let doc = ConfigDocument::default();
        assert_eq!(doc.base_controller_url, None);
        assert_eq!(doc.base_app_url, "/");
        assert!(!doc.is_juju);
        assert!(!doc.analytics_enabled);
        assert!(!doc.identity_provider_available);
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_set_known_and_extra_keys() {
        let mut doc = ConfigDocument::default();
        doc.set("isJuju", Value::Bool(true)).unwrap();
        doc.set("baseAppURL", Value::from("/dashboard/")).unwrap();
        doc.set("identityProviderURL", Value::Null).unwrap();
        doc.set("theme", Value::from("dark")).unwrap();

        assert!(doc.is_juju);
        assert_eq!(doc.base_app_url, "/dashboard/");
        assert_eq!(doc.extra.get("theme"), Some(&Value::from("dark")));
    }

    #[test]
    fn test_set_type_mismatch() {
        let mut doc = ConfigDocument::default();
        let err = doc.set("isJuju", Value::from("yes")).unwrap_err();
        assert_eq!(
            err,
            ConfigError::TypeMismatch {
                key: "isJuju".to_string(),
                expected: "a boolean",
                found: "string",
            }
        );
        assert!(doc.set("baseAppURL", Value::Null).is_err());
        assert!(doc.set("baseControllerURL", Value::Bool(true)).is_err());
    }

    #[test]
    fn test_base_controller_url_validation() {
        let mut doc = ConfigDocument::default();

        doc.base_controller_url = Some("wss://10.0.0.1:17070/api".to_string());
        assert!(doc.validate().is_ok());

        doc.base_controller_url = Some("ws://controller/api".to_string());
        assert!(doc.validate().is_ok());

        doc.base_controller_url = Some("http://controller/api".to_string());
        assert!(doc.validate().is_err());

        doc.base_controller_url = Some("wss://controller/model".to_string());
        assert!(doc.validate().is_err());
    }

    #[test]
    fn test_controller_endpoint_validation() {
        let valid = ["/api", "wss://1.2.3.4:17070/api", "ws://controller.example/api"];
        for endpoint_url in valid {
            let doc = ConfigDocument {
                controller_api_endpoint: Some(endpoint_url.to_string()),
                ..Default::default()
            };
            assert!(doc.validate().is_ok(), "{endpoint_url} should be valid");
        }

        let invalid = [
            "wss://host",
            "https://host/api",
            "host/api",
            "wss:///api",
            "wss://bad host/api",
        ];
        for endpoint_url in invalid {
            let doc = ConfigDocument {
                controller_api_endpoint: Some(endpoint_url.to_string()),
                ..Default::default()
            };
            assert!(doc.validate().is_err(), "{endpoint_url} should be invalid");
        }
    }

    #[test]
    fn test_validate_collects_all_problems() {
        let doc = ConfigDocument {
            base_controller_url: Some("http://x".to_string()),
            controller_api_endpoint: Some("wss://host".to_string()),
            base_app_url: String::new(),
            ..Default::default()
        };
        match doc.validate() {
            Err(ConfigError::Invalid(problems)) => assert_eq!(problems.len(), 3),
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn test_to_values_covers_every_key() {
        let mut doc = ConfigDocument::default();
        doc.extra.insert("theme".to_string(), Value::from("dark"));
        let values = doc.to_values();

        assert_eq!(values.len(), 8);
        assert_eq!(values["baseControllerURL"], Value::Null);
        assert_eq!(values["baseAppURL"], Value::from("/"));
        assert_eq!(values["isJuju"], Value::Bool(false));
        assert_eq!(values["theme"], Value::from("dark"));
    }

    #[test]
    fn test_known_fields_win_over_extra() {
        let mut doc = ConfigDocument::default();
        doc.extra.insert("isJuju".to_string(), Value::from("shadowed"));
        doc.is_juju = true;
        assert_eq!(doc.to_values()["isJuju"], Value::Bool(true));
    }

    #[test]
    fn test_absolute_endpoint_becomes_base_controller_url() {
        let doc = ConfigDocument {
            controller_api_endpoint: Some("wss://jimm.example/api".to_string()),
            ..Default::default()
        };
        assert_eq!(
            doc.to_values()["baseControllerURL"],
            Value::from("wss://jimm.example/api")
        );
        assert!(doc.validate().is_ok());

        let doc = ConfigDocument {
            controller_api_endpoint: Some("/api".to_string()),
            ..Default::default()
        };
        assert_eq!(doc.to_values()["baseControllerURL"], Value::Null);
    }

    #[test]
    fn test_explicit_base_controller_url_is_kept() {
        let doc = ConfigDocument {
            base_controller_url: Some("wss://legacy.example/api".to_string()),
            controller_api_endpoint: Some("wss://jimm.example/api".to_string()),
            ..Default::default()
        };
        assert_eq!(
            doc.to_values()["baseControllerURL"],
            Value::from("wss://legacy.example/api")
        );
    }

    #[test]
    fn test_relative_endpoint_needs_base_controller_url() {
        let mut doc = ConfigDocument {
            controller_api_endpoint: Some("/juju/api".to_string()),
            ..Default::default()
        };
        match doc.validate() {
            Err(ConfigError::Invalid(problems)) => {
                assert_eq!(problems.len(), 1);
                assert!(problems[0].contains("/juju/api"));
            }
            other => panic!("expected invalid config, got {other:?}"),
        }

        doc.base_controller_url = Some("wss://controller.example/api".to_string());
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_to_values_serializes_with_template_keys() {
        let json = serde_json::to_value(ConfigDocument::default().to_values()).unwrap();
        assert_eq!(json["baseControllerURL"], serde_json::Value::Null);
        assert_eq!(json["baseAppURL"], "/");
        assert_eq!(json["analyticsEnabled"], false);
    }
}
