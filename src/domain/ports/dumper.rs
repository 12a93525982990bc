use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::errors::DumpError;
use crate::domain::models::{EncounterEntity, EncounterKind};

/// Port for persisting evaluated encounters.
#[async_trait]
pub trait EncounterDumper: Send + Sync {
    /// Persist `entity` under the folder for `kind`.
    ///
    /// # Returns
    /// * `Ok(path)` of the written file
    async fn dump(&self, kind: EncounterKind, entity: &EncounterEntity) -> Result<PathBuf, DumpError>;
}
