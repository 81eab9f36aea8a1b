//! Deployment settings
//!
//! Collects values from the environment and the optional JSON values file,
//! and decides where the template comes from and where the output goes.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::document::ConfigDocument;
use crate::config::value::{self, Value};
use crate::constants::{endpoint, env, paths};

/// Environment lookup, injected so tests don't touch the process environment
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads from the real process environment
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<F> EnvSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Environment flags are true only for a case-insensitive `true`, untrimmed
pub fn to_bool(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}

/// Where the template is read from and the rendered file written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Controller address used to derive `controllerAPIEndpoint`
    pub controller_url: Option<String>,
    pub has_external_controller_url: bool,
    pub dashboard_root: PathBuf,
    pub config_file_name: String,
    /// Directory holding a custom template, if any
    pub config_dir: Option<PathBuf>,
}

impl Settings {
    pub fn from_env(source: &impl EnvSource) -> Self {
        let non_empty = |name: &str| source.var(name).filter(|v| !v.trim().is_empty());

        Self {
            controller_url: non_empty(env::CONTROLLER_URL),
            has_external_controller_url: source
                .var(env::HAS_EXTERNAL_CONTROLLER_URL)
                .is_some_and(|v| to_bool(&v)),
            dashboard_root: non_empty(env::ROOT)
                .map_or_else(|| PathBuf::from(paths::DASHBOARD_ROOT), PathBuf::from),
            config_file_name: non_empty(env::CONFIG_NAME)
                .unwrap_or_else(|| paths::CONFIG_NAME.to_string()),
            config_dir: non_empty(env::CONFIG_DIR).map(PathBuf::from),
        }
    }

    /// Default destination of the rendered config
    pub fn output_path(&self) -> PathBuf {
        self.dashboard_root.join(&self.config_file_name)
    }

    /// Custom template location, when a config dir is configured
    pub fn template_path(&self) -> Option<PathBuf> {
        self.config_dir
            .as_ref()
            .map(|dir| dir.join(paths::TEMPLATE_NAME))
    }

    /// Endpoint the front-end should connect to
    ///
    /// A dashboard served by the controller itself talks to `/api` on its own
    /// host; otherwise the controller address is used.
    pub fn controller_api_endpoint(&self, is_juju: bool) -> Option<String> {
        let url = self.controller_url.as_deref()?;
        if is_juju && !self.has_external_controller_url {
            return Some(endpoint::API_SUFFIX.to_string());
        }
        let base = url.trim_end_matches('/');
        if base.ends_with(endpoint::API_SUFFIX) {
            Some(base.to_string())
        } else {
            Some(format!("{base}{}", endpoint::API_SUFFIX))
        }
    }

    /// Starting document before the values file and environment are applied
    ///
    /// A deployment that names a controller is assumed to be served by Juju
    /// with analytics on, unless a later layer says otherwise.
    pub fn base_document(&self) -> ConfigDocument {
        let mut doc = ConfigDocument::default();
        if self.controller_url.is_some() {
            doc.is_juju = true;
            doc.analytics_enabled = true;
        }
        doc
    }

    /// Fill in `controllerAPIEndpoint` from the final `isJuju` value
    /// An endpoint set by any layer is left alone
    pub fn derive_endpoint(&self, doc: &mut ConfigDocument) {
        if doc.controller_api_endpoint.is_some() {
            return;
        }
        if let Some(endpoint_url) = self.controller_api_endpoint(doc.is_juju) {
            debug!(endpoint = %endpoint_url, "Derived controller API endpoint");
            doc.controller_api_endpoint = Some(endpoint_url);
        }
    }

    /// Overlay environment-provided values onto `doc`
    pub fn apply_env(&self, doc: &mut ConfigDocument, source: &impl EnvSource) {
        if let Some(raw) = source.var(env::IS_JUJU) {
            doc.is_juju = to_bool(&raw);
        }
        if let Some(raw) = source.var(env::ANALYTICS_ENABLED) {
            doc.analytics_enabled = to_bool(&raw);
        }
        if let Some(url) = source.var(env::IDENTITY_PROVIDER_URL) {
            doc.identity_provider_url = Some(url).filter(|u| !u.trim().is_empty());
            doc.identity_provider_available = doc.identity_provider_url.is_some();
        }
        if let Some(raw) = source.var(env::IDENTITY_PROVIDER_AVAILABLE) {
            doc.identity_provider_available = to_bool(&raw);
        }
        if let Some(url) = source.var(env::BASE_APP_URL) {
            doc.base_app_url = url;
        }
        if let Some(url) = source.var(env::BASE_CONTROLLER_URL) {
            doc.base_controller_url = Some(url).filter(|u| !u.trim().is_empty());
        }
    }
}

/// Default values file under the user's config directory
pub fn default_values_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(paths::APP_DIR);
    path.push(paths::VALUES_FILENAME);
    path
}

/// Load a JSON values file and apply it to `doc`
pub fn apply_values_file(doc: &mut ConfigDocument, path: &Path) -> Result<()> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read values from {:?}", path))?;
    let json: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse JSON from {:?}", path))?;
    let values = value::values_from_json(json)
        .with_context(|| format!("Invalid values in {:?}", path))?;

    info!(count = values.len(), path = ?path, "Loaded values file");
    doc.extend(values)
        .with_context(|| format!("Invalid values in {:?}", path))
}

/// Apply `KEY=VALUE` overrides in order
pub fn apply_overrides(doc: &mut ConfigDocument, overrides: &[String]) -> Result<()> {
    for raw in overrides {
        let (key, value): (String, Value) = value::parse_override(raw)?;
        doc.set(&key, value)
            .with_context(|| format!("Invalid override {raw:?}"))?;
    }
    Ok(())
}
