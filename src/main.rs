#![deny(unsafe_code)]

mod common;
mod config;
mod constants;
mod error;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::{ConfigDocument, ProcessEnv, Settings};

#[derive(Parser)]
#[command(name = "dashboard-config")]
#[command(version)]
#[command(about = "Render the dashboard's config.js from deployment settings", long_about = None)]
struct Cli {
    /// Template to render (defaults to $DASHBOARD_CONFIG_DIR/config.js.template or the built-in template)
    #[arg(long, short)]
    template: Option<PathBuf>,

    /// JSON object of configuration values
    #[arg(long)]
    values: Option<PathBuf>,

    /// Override a single value; `true`, `false` and `null` are literals
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Destination file (defaults to $DASHBOARD_ROOT/$DASHBOARD_CONFIG_NAME)
    #[arg(long, short, conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Print the rendered config instead of writing it
    #[arg(long)]
    stdout: bool,

    /// Parse, validate and render without writing anything
    #[arg(long)]
    check: bool,

    /// Print the effective values as JSON and exit
    #[arg(long)]
    print_values: bool,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so --stdout output stays clean
    let default_level = if cli.verbose { "debug" } else { "info" };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let values_file = cli.values.clone().or_else(|| {
        let path = config::settings::default_values_path();
        path.exists().then_some(path)
    });
    let (settings, doc) =
        config::load_document(&ProcessEnv, values_file.as_deref(), &cli.overrides)?;

    if doc.controller_api_endpoint.is_none() && doc.effective_base_controller_url().is_none() {
        info!("No controller endpoint configured; the dashboard will derive it from its own address");
    }
    doc.validate()?;

    if cli.print_values {
        let json =
            serde_json::to_string_pretty(&doc.to_values()).context("Failed to serialize values")?;
        println!("{json}");
        return Ok(());
    }

    let rendered = render_document(cli, &settings, &doc)?;

    if cli.check {
        info!("Configuration is valid");
        return Ok(());
    }

    if cli.stdout {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(rendered.as_bytes())
            .context("Failed to write rendered config to stdout")?;
        return Ok(());
    }

    let output = cli.output.clone().unwrap_or_else(|| settings.output_path());
    render::output::write_atomic(&output, &rendered)
}

fn render_document(cli: &Cli, settings: &Settings, doc: &ConfigDocument) -> Result<String> {
    let template_path = cli.template.clone().or_else(|| settings.template_path());
    let source: Cow<'static, str> = match &template_path {
        Some(path) => {
            debug!(path = ?path, "Reading template");
            Cow::Owned(
                fs::read_to_string(path)
                    .with_context(|| format!("Failed to read template from {:?}", path))?,
            )
        }
        None => Cow::Borrowed(constants::DEFAULT_TEMPLATE),
    };

    render::render(&source, &doc.to_values()).with_context(|| match &template_path {
        Some(path) => format!("Failed to render template {:?}", path),
        None => "Failed to render built-in template".to_string(),
    })
}
