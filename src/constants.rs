//! Application-wide constants
//!
//! Environment variable names, default paths and the built-in template.

/// Environment variables read by the deployment settings
pub mod env {
    /// Controller address used to derive `controllerAPIEndpoint`
    pub const CONTROLLER_URL: &str = "DASHBOARD_CONTROLLER_URL";

    /// Set when the controller is not served from the dashboard's own host
    pub const HAS_EXTERNAL_CONTROLLER_URL: &str = "HAS_EXTERNAL_CONTROLLER_URL";

    pub const IS_JUJU: &str = "DASHBOARD_IS_JUJU";
    pub const ANALYTICS_ENABLED: &str = "DASHBOARD_ANALYTICS_ENABLED";
    pub const IDENTITY_PROVIDER_URL: &str = "DASHBOARD_IDENTITY_PROVIDER_URL";
    pub const IDENTITY_PROVIDER_AVAILABLE: &str = "DASHBOARD_IDENTITY_PROVIDER_AVAILABLE";
    pub const BASE_APP_URL: &str = "DASHBOARD_BASE_APP_URL";
    pub const BASE_CONTROLLER_URL: &str = "DASHBOARD_BASE_CONTROLLER_URL";

    /// Directory the rendered file is written into
    pub const ROOT: &str = "DASHBOARD_ROOT";

    /// File name of the rendered config
    pub const CONFIG_NAME: &str = "DASHBOARD_CONFIG_NAME";

    /// Directory holding a custom `config.js.template`
    pub const CONFIG_DIR: &str = "DASHBOARD_CONFIG_DIR";
}

/// Configuration document keys, as they appear in templates and values files
pub mod keys {
    pub const BASE_CONTROLLER_URL: &str = "baseControllerURL";
    pub const CONTROLLER_API_ENDPOINT: &str = "controllerAPIEndpoint";
    pub const BASE_APP_URL: &str = "baseAppURL";
    pub const IDENTITY_PROVIDER_AVAILABLE: &str = "identityProviderAvailable";
    pub const IDENTITY_PROVIDER_URL: &str = "identityProviderURL";
    pub const IS_JUJU: &str = "isJuju";
    pub const ANALYTICS_ENABLED: &str = "analyticsEnabled";
}

/// Paths and filenames
pub mod paths {
    /// Default dashboard root the config file is written into
    pub const DASHBOARD_ROOT: &str = "/srv";

    /// Default rendered config filename
    pub const CONFIG_NAME: &str = "config.js";

    /// Template filename looked up inside `DASHBOARD_CONFIG_DIR`
    pub const TEMPLATE_NAME: &str = "config.js.template";

    /// Application directory name under XDG config
    pub const APP_DIR: &str = "dashboard-config";

    /// Values filename under the application directory
    pub const VALUES_FILENAME: &str = "values.json";
}

/// Websocket/API endpoint conventions
pub mod endpoint {
    /// Suffix every controller endpoint must carry
    pub const API_SUFFIX: &str = "/api";

    pub const WS_SCHEME: &str = "ws://";
    pub const WSS_SCHEME: &str = "wss://";
}

/// Default configuration values
pub mod defaults {
    /// Path prefix the dashboard is served under
    pub const BASE_APP_URL: &str = "/";
}

/// Built-in template covering every known configuration key
pub const DEFAULT_TEMPLATE: &str = r#"// This file is generated at deploy time. Changes will be overwritten.
var jujuDashboardConfig = {
  // API host to allow the app to connect and retrieve models. When null the
  // dashboard derives the address from the page location.
  baseControllerURL: {{.baseControllerURL}},
  // Websocket endpoint of the controller API, absolute path or ws(s):// URL.
  controllerAPIEndpoint: {{.controllerAPIEndpoint}},
  // Configurable base url to allow the dashboard to be served elsewhere.
  baseAppURL: "{{.baseAppURL}}",
  // Whether the controller provides an external identity provider.
  identityProviderAvailable: {{.identityProviderAvailable}},
  identityProviderURL: {{.identityProviderURL}},
  // Is this application being rendered in Juju and not JAAS.
  isJuju: {{.isJuju}},
  analyticsEnabled: {{.analyticsEnabled}},
};
"#;
