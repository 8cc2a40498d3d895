// SPDX-License-Identifier: MIT OR Apache-2.0
//! `OrdoPlay` script exporter.
//!
//! Builds a script graph, prunes it toward the configured root kinds, lays
//! it out and writes the runtime document.
//!
//! Usage: `ordoplay_script_export [settings.ron]`

mod demo;
mod export;
mod output;
mod settings;

use settings::{ExportSettings, SETTINGS_FILE_NAME};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ordoplay_script_export=info,ordoplay_script_graph=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() {
    init_logging();

    tracing::info!("Starting OrdoPlay script export v{}", env!("CARGO_PKG_VERSION"));

    let settings_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(SETTINGS_FILE_NAME), PathBuf::from);

    let first_run = !settings_path.exists();
    let result = ExportSettings::load_or_default(&settings_path)
        .map_err(export::ExportError::Settings)
        .and_then(|settings| {
            if first_run {
                // Leave an editable copy of the defaults behind
                if let Err(e) = settings.save(&settings_path) {
                    tracing::warn!("Could not write default settings to {:?}: {e}", settings_path);
                }
            }
            export::run(&settings)
        });

    match result {
        Ok(path) => tracing::info!("Exported script to {:?}", path),
        Err(e) => {
            tracing::error!("Export failed: {e}");
            std::process::exit(1);
        }
    }
}
