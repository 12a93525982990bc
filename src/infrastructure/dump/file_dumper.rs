//! Writes raw encounter snapshots to disk.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::domain::errors::DumpError;
use crate::domain::models::{EncounterEntity, EncounterKind};
use crate::domain::ports::EncounterDumper;

/// Dumps each encounter as
/// `<root>/<kind folder>/<species>-<ivs>-<timestamp>-<sequence>.bin`.
///
/// The sequence is shared by clones, so identical snapshots dumped within
/// the same millisecond still land in distinct files.
#[derive(Debug, Clone)]
pub struct FileDumper {
    root: PathBuf,
    sequence: Arc<AtomicU64>,
}

impl FileDumper {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_name(&self, entity: &EncounterEntity) -> String {
        format!(
            "{:04}-{}-{}-{:06}.bin",
            entity.species,
            entity.ivs_label().replace('/', "-"),
            Utc::now().format("%Y%m%dT%H%M%S%.3f"),
            self.sequence.fetch_add(1, Ordering::Relaxed),
        )
    }
}

#[async_trait]
impl EncounterDumper for FileDumper {
    async fn dump(&self, kind: EncounterKind, entity: &EncounterEntity) -> Result<PathBuf, DumpError> {
        if self.root.as_os_str().is_empty() {
            return Err(DumpError::MissingFolder);
        }

        let dir = self.root.join(kind.folder());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| DumpError::Write {
                path: dir.display().to_string(),
                source,
            })?;

        let path = dir.join(self.file_name(entity));
        tokio::fs::write(&path, &entity.raw)
            .await
            .map_err(|source| DumpError::Write {
                path: path.display().to_string(),
                source,
            })?;

        debug!(path = %path.display(), "encounter dumped");
        Ok(path)
    }
}
