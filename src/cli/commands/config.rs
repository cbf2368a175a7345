//! Config command - show the effective configuration

use crate::cli::output::{colors, print_header, print_json};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::services::Services;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Only list the pipeline components
    #[arg(long, short = 'c')]
    pub components: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: String,
    pub config_file_exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Config>,
    pub components: Vec<String>,
}

/// Execute the config command
pub fn execute(
    args: ConfigArgs,
    services: &Arc<Services>,
    xdg: &XdgDirs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = services.create_pipeline()?;
    let config_file = xdg.config_file();

    let response = ConfigResponse {
        config_file: config_file.to_string_lossy().into_owned(),
        config_file_exists: config_file.exists(),
        config: (!args.components).then(|| services.config.as_ref().clone()),
        components: pipeline.component_representations(),
    };

    match format {
        OutputFormat::Human => {
            if let Some(config) = &response.config {
                print_header("Configuration:");
                let status = if response.config_file_exists {
                    colors::success("found")
                } else {
                    colors::dim("not found")
                };
                println!(
                    "  config_file: {} ({})",
                    colors::file_path(&response.config_file),
                    status
                );
                println!();
                let rendered = toml::to_string_pretty(config)
                    .map_err(|e| format!("Failed to render configuration: {e}"))?;
                println!("{rendered}");
            }

            print_header("Components:");
            for (idx, component) in response.components.iter().enumerate() {
                println!(
                    "  {} {}",
                    colors::number(&format!("{}.", idx + 1)),
                    component
                );
            }
        }
        OutputFormat::Json => print_json(&response)?,
    }

    Ok(())
}
