//! Client-local state directory (`<data_dir>/whereabouts/`).

use std::path::PathBuf;

use crate::error::{WhereaboutsError, WhereaboutsResult};

#[derive(Debug, Clone)]
pub struct StateDir {
    dir: PathBuf,
}

impl StateDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        StateDir { dir: dir.into() }
    }

    pub fn open_default() -> WhereaboutsResult<Self> {
        let dir = dirs::data_dir()
            .ok_or_else(|| WhereaboutsError::Config("Could not determine data directory".into()))?
            .join("whereabouts");

        Ok(StateDir { dir })
    }

    pub fn path(&self) -> &PathBuf {
        &self.dir
    }

    /// Contents of a state file, or `None` if it does not exist or is unreadable.
    pub fn read(&self, name: &str) -> Option<String> {
        std::fs::read_to_string(self.dir.join(name)).ok()
    }

    /// Replace a state file through a temp file and rename.
    pub fn write(&self, name: &str, content: &str) -> WhereaboutsResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            WhereaboutsError::Config(format!("Could not create state directory: {e}"))
        })?;

        let path = self.dir.join(name);
        let temp = self.dir.join(format!("{name}.tmp"));

        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }
}
