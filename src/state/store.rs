//! State file I/O

use log::debug;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::GiteaError;

use super::models::{StateFile, STATE_VERSION};

/// Handles reading and writing the state file
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

    /// Load the state from disk.
    /// Returns an empty state if the file doesn't exist, errors on corrupt JSON.
    pub fn load(&self) -> Result<StateFile, GiteaError> {
        if !self.path.exists() {
            debug!("No state file at {}, starting empty", self.path.display());
            return Ok(StateFile::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            GiteaError::State(format!(
                "Failed to read state file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let state: StateFile = serde_json::from_str(&content).map_err(|e| {
            GiteaError::State(format!(
                "Failed to parse state file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        if state.version > STATE_VERSION {
            return Err(GiteaError::State(format!(
                "State file {} has version {}, this build understands up to {}",
                self.path.display(),
                state.version,
                STATE_VERSION
            )));
        }
        Ok(state)
    }

    /// Save the state to disk, bumping its serial.
    /// Uses atomic write (tmp file + rename) and creates parent dir if needed.
    pub fn save(&self, state: &mut StateFile) -> Result<(), GiteaError> {
        state.serial += 1;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                GiteaError::State(format!(
                    "Failed to create state directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let json = serde_json::to_string_pretty(state)
            .map_err(|e| GiteaError::State(format!("Failed to serialize state: {}", e)))?;

        // Atomic write: write to tmp file, then rename
        let tmp_path = self.path.with_extension("json.tmp");
        write_private(&tmp_path, &json).map_err(|e| {
            GiteaError::State(format!(
                "Failed to write temp state file {}: {}",
                tmp_path.display(),
                e
            ))
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            GiteaError::State(format!(
                "Failed to rename temp state file to {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!(
            "Saved state serial {} to {}",
            state.serial,
            self.path.display()
        );
        Ok(())
    }
}

/// Write `contents` to a freshly created file, mode 0600 on Unix
fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => debug!("Removed stale temp file {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}
