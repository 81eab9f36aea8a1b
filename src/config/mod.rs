//! Configuration management
//!
//! Builds the dashboard configuration document from layered sources:
//! built-in defaults, a JSON values file, the environment, then
//! command-line overrides. `controllerAPIEndpoint` is derived last, from
//! the final `isJuju`, unless one of the layers set it.

pub mod document;
pub mod settings;
pub mod value;

pub use document::ConfigDocument;
pub use settings::{EnvSource, ProcessEnv, Settings};
pub use value::{Value, ValueMap};

use anyhow::Result;
use std::path::Path;

/// Merge every source into a document; validation is left to the caller
pub fn load_document(
    source: &impl EnvSource,
    values_file: Option<&Path>,
    overrides: &[String],
) -> Result<(Settings, ConfigDocument)> {
    let settings = Settings::from_env(source);
    let mut doc = settings.base_document();

    if let Some(path) = values_file {
        settings::apply_values_file(&mut doc, path)?;
    }
    settings.apply_env(&mut doc, source);
    settings::apply_overrides(&mut doc, overrides)?;
    settings.derive_endpoint(&mut doc);

    Ok((settings, doc))
}
