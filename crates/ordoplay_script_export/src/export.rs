// SPDX-License-Identifier: MIT OR Apache-2.0
//! Export pipeline: build, prune, serialize, write.

use crate::demo;
use crate::output;
use crate::settings::ExportSettings;
use chrono::Local;
use ordoplay_script_graph::{BuildError, Graph, SerializeError};
use std::path::PathBuf;
use thiserror::Error;

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// Settings could not be read
    #[error("Failed to load settings: {0}")]
    Settings(#[source] std::io::Error),

    /// Script could not be built
    #[error("Failed to build script: {0}")]
    Build(#[from] BuildError),

    /// Script could not be encoded
    #[error("Failed to serialize script: {0}")]
    Serialize(#[from] SerializeError),

    /// Script could not be written
    #[error("Failed to write script: {0}")]
    Write(#[source] std::io::Error),
}

/// Prune and serialize a graph according to the settings
pub fn encode(mut graph: Graph, settings: &ExportSettings) -> Result<Vec<u8>, ExportError> {
    graph.layout = settings.layout;

    let summary = graph.prune_unused_nodes(&settings.roots);
    if summary.removed_nodes > 0 {
        tracing::info!(
            "Pruned {} node(s) and {} connection(s) not feeding {:?}",
            summary.removed_nodes,
            summary.removed_connections,
            settings.roots
        );
    }

    let bytes = if settings.pretty {
        graph.serialize_pretty()?
    } else {
        graph.serialize()?
    };
    tracing::info!(
        "Encoded '{}': {} node(s), {} connection(s)",
        graph.name,
        graph.node_count(),
        graph.connection_count()
    );
    Ok(bytes)
}

/// Build the sample script and write it where the settings say
pub fn run(settings: &ExportSettings) -> Result<PathBuf, ExportError> {
    let graph = demo::build_kart_script()?;
    let bytes = encode(graph, settings)?;

    let path = output::output_path(
        &settings.output_dir,
        settings.file_name.as_deref(),
        Local::now().naive_local(),
    );
    output::write_script(&path, &bytes).map_err(ExportError::Write)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordoplay_script_graph::GraphDocument;

    #[test]
    fn test_encode_prunes_and_serializes() {
        let settings = ExportSettings::default();
        let bytes = encode(demo::build_kart_script().unwrap(), &settings).unwrap();
        let document = GraphDocument::from_slice(&bytes).unwrap();

        assert_eq!(document.nodes.len(), 11);
        assert!(document.nodes.iter().all(|n| n.id != "Memory"));
        for connection in &document.connections {
            assert!(document.find_port(&connection.port0_sid).is_some());
            assert!(document.find_port(&connection.port1_sid).is_some());
        }
    }

    #[test]
    fn test_encode_without_roots_keeps_everything() {
        let settings = ExportSettings {
            roots: Vec::new(),
            pretty: true,
            ..ExportSettings::default()
        };
        let bytes = encode(demo::build_kart_script().unwrap(), &settings).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["serializableNodes"].as_array().unwrap().len(), 13);
        assert!(std::str::from_utf8(&bytes).unwrap().contains('\n'));
    }

    #[test]
    fn test_run_writes_file() {
        let dir = std::env::temp_dir().join(format!("ordoplay_script_run_{}", std::process::id()));
        let settings = ExportSettings {
            output_dir: dir.clone(),
            file_name: Some("kart".to_string()),
            ..ExportSettings::default()
        };
        let path = run(&settings).unwrap();
        assert_eq!(path, dir.join("kart.txt"));
        let document = GraphDocument::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert!(!document.nodes.is_empty());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
