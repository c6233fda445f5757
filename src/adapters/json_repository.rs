//! JSON file implementation of the snapshot repository.
//!
//! Each agent kind persists to its own file inside a data directory,
//! using the documented JSON record format. Writes go to a temporary
//! sibling file first and are renamed into place, so a crash mid-write
//! leaves the previous snapshot intact.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    Result,
    error::Error,
    ports::SnapshotRepository,
    snapshot::{AgentKind, AgentSnapshot},
};

/// File-backed snapshot repository.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    directory: PathBuf,
}

impl JsonFileRepository {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Full path for an agent kind's snapshot file.
    pub fn path_for(&self, kind: AgentKind) -> PathBuf {
        self.directory.join(kind.file_name())
    }

    /// Whether any snapshot exists for any agent kind.
    pub fn has_any_saved_data(&self) -> bool {
        [AgentKind::Sarsa, AgentKind::MonteCarlo]
            .iter()
            .any(|&kind| self.path_for(kind).exists())
    }

    /// Delete the persisted snapshot for one agent kind, if present.
    pub fn clear(&self, kind: AgentKind) -> Result<()> {
        let path = self.path_for(kind);
        if path.exists() {
            fs::remove_file(&path).map_err(|source| Error::Io {
                operation: format!("remove snapshot file {path:?}"),
                source,
            })?;
        }
        Ok(())
    }
}

impl SnapshotRepository for JsonFileRepository {
    fn save(&self, kind: AgentKind, snapshot: &AgentSnapshot) -> Result<()> {
        fs::create_dir_all(&self.directory).map_err(|source| Error::Io {
            operation: format!("create snapshot directory {:?}", self.directory),
            source,
        })?;

        let path = self.path_for(kind);
        let tmp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&tmp_path, json).map_err(|source| Error::Io {
            operation: format!("write snapshot file {tmp_path:?}"),
            source,
        })?;

        // Atomic on the platforms we care about; the previous snapshot
        // survives any crash before this point.
        fs::rename(&tmp_path, &path).map_err(|source| Error::Io {
            operation: format!("rename snapshot file into place at {path:?}"),
            source,
        })?;

        tracing::debug!(
            kind = kind.label(),
            entries = snapshot.entries.len(),
            epsilon = snapshot.epsilon,
            "saved agent snapshot"
        );
        Ok(())
    }

    fn load(&self, kind: AgentKind) -> Option<AgentSnapshot> {
        let path = self.path_for(kind);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::debug!(kind = kind.label(), %err, "no saved snapshot, starting fresh");
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::warn!(
                    kind = kind.label(),
                    path = %path.display(),
                    %err,
                    "corrupt snapshot file ignored, starting fresh"
                );
                None
            }
        }
    }
}

/// Load a snapshot directly from a path, outside any repository.
pub fn load_snapshot_file(path: &Path) -> Result<AgentSnapshot> {
    let contents = fs::read_to_string(path).map_err(|source| Error::Io {
        operation: format!("read snapshot file {path:?}"),
        source,
    })?;
    Ok(serde_json::from_str(&contents)?)
}
