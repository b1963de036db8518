use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use studyquest_core::core_api::{CharacterState, load_or_default};

/// The JSON file holding the one character record.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// A missing or unparseable file yields `fallback`; only I/O failures
    /// other than "not found" are errors.
    pub fn load(&self, fallback: CharacterState) -> Result<CharacterState> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => Some(raw),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read state file {}", self.path.display()));
            }
        };
        Ok(load_or_default(raw.as_deref(), fallback))
    }

    /// Writes next to the target and renames over it, so a crash mid-write
    /// leaves the previous record intact.
    pub fn save(&self, state: &CharacterState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, state.to_json())
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        log::debug!("saved state to {}", self.path.display());
        Ok(())
    }
}
