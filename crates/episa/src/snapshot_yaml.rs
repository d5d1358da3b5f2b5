//! YAML persistence of service snapshots

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{WrapErr, eyre};
use episa_core::snapshot::snapshot_path;
use episa_core::{ServiceSnapshot, SnapshotWriter};

use crate::util::io::atomic_write;

/// Writes snapshots as YAML files, creating the folder when needed
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlSnapshotWriter;

impl SnapshotWriter for YamlSnapshotWriter {
    type Error = color_eyre::Report;

    fn write_snapshot(
        &self,
        snapshot: &ServiceSnapshot,
        folder: &Path,
        filename: Option<&str>,
    ) -> Result<PathBuf, Self::Error> {
        fs::create_dir_all(folder)
            .wrap_err_with(|| format!("failed to create {}", folder.display()))?;
        let path = snapshot_path(folder, filename);

        let yaml = serde_saphyr::to_string(snapshot)
            .map_err(|e| eyre!("failed to serialize snapshot: {e}"))?;
        atomic_write(&path, &yaml)
            .wrap_err_with(|| format!("failed to write snapshot {}", path.display()))?;

        tracing::info!(path = %path.display(), "service snapshot written");
        Ok(path)
    }
}

/// Read a snapshot written by [`YamlSnapshotWriter`]
pub fn load_snapshot(path: &Path) -> color_eyre::Result<ServiceSnapshot> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read snapshot {}", path.display()))?;
    serde_saphyr::from_str(&content).map_err(|e| eyre!("failed to parse snapshot: {e}"))
}
