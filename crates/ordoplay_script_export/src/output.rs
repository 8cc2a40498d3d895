// SPDX-License-Identifier: MIT OR Apache-2.0
//! Output file naming and writing.

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Extension the runtime expects on script files
const SCRIPT_EXTENSION: &str = ".txt";

/// Ensure a file name ends in `.txt`
pub fn normalize_file_name(name: &str) -> String {
    let name = name.trim();
    if name.to_ascii_lowercase().ends_with(SCRIPT_EXTENSION) {
        name.to_string()
    } else {
        format!("{name}{SCRIPT_EXTENSION}")
    }
}

/// Timestamped file name used when none is configured
pub fn default_file_name(now: NaiveDateTime) -> String {
    format!("script_{}{SCRIPT_EXTENSION}", now.format("%Y%m%d_%H%M%S"))
}

/// Resolve the output path from an optional configured name
pub fn output_path(dir: &Path, file_name: Option<&str>, now: NaiveDateTime) -> PathBuf {
    let name = match file_name {
        Some(name) if !name.trim().is_empty() => normalize_file_name(name),
        _ => default_file_name(now),
    };
    dir.join(name)
}

/// Write the script, creating the directory if needed
pub fn write_script(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)?;
    tracing::info!("Wrote {} bytes to {:?}", bytes.len(), path);
    Ok(())
}
