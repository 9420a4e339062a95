use crate::api::NetworkNode;
use crate::config::default_data_dir;
use crate::error::Result;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// `~`-expanded custom directory, or the platform data directory.
pub fn resolve_export_dir(base_dir: Option<&str>) -> PathBuf {
    match base_dir {
        Some(custom_dir) => PathBuf::from(shellexpand::tilde(custom_dir).to_string()),
        None => default_data_dir(),
    }
}

pub fn network_export_file_name(date: NaiveDate) -> String {
    format!("rete-network-{}.json", date.format("%Y-%m-%d"))
}

/// Writes the node list as pretty JSON. Exporting twice on the same day
/// overwrites the earlier file.
pub fn export_network(nodes: &[NetworkNode], dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let filepath = dir.join(network_export_file_name(date));
    let json = serde_json::to_string_pretty(nodes)?;
    std::fs::write(&filepath, json)?;

    Ok(filepath)
}
