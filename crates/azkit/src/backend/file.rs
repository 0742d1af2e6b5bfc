//! JSON-file backend.
//!
//! Persists the simulated cloud as a single pretty-printed JSON document so
//! that separate CLI invocations observe each other's changes. A missing file
//! is an empty cloud.

use super::{Backend, CloudState};
use crate::error::Result;
use crate::types::{Disk, ResourceGroup};
use tempfile::NamedTempFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Cloud simulator backed by a JSON file.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    subscription_id: String,
    lock: Mutex<()>,
}

impl FileBackend {
    /// Open (or lazily create) the simulator file at `path`.
    pub fn new(path: impl Into<PathBuf>, subscription_id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            subscription_id: subscription_id.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<CloudState> {
        if !self.path.exists() {
            log::debug!(
                "Cloud state {} does not exist, starting empty",
                self.path.display()
            );
            return Ok(CloudState::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Replace the file atomically through a sibling temp file.
    fn save(&self, state: &CloudState) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, state)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        log::debug!("Saved cloud state to {}", self.path.display());
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&CloudState) -> Result<T>) -> Result<T> {
        let _guard = match self.lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&self.load()?)
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut CloudState) -> Result<T>) -> Result<T> {
        let _guard = match self.lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut state = self.load()?;
        let out = f(&mut state)?;
        self.save(&state)?;
        Ok(out)
    }
}

impl Backend for FileBackend {
    fn get_disk(&self, resource_group: &str, name: &str) -> Result<Disk> {
        self.read(|state| state.get_disk(resource_group, name))
    }

    fn list_disks(&self, resource_group: &str) -> Result<Vec<Disk>> {
        self.read(|state| Ok(state.list_disks(resource_group)))
    }

    fn create_or_update_disk(
        &self,
        resource_group: &str,
        name: &str,
        disk: Disk,
    ) -> Result<Disk> {
        self.mutate(|state| state.upsert_disk(&self.subscription_id, resource_group, name, disk))
    }

    fn delete_disk(&self, resource_group: &str, name: &str) -> Result<()> {
        self.mutate(|state| state.delete_disk(resource_group, name))
    }

    fn get_resource_group(&self, name: &str) -> Result<ResourceGroup> {
        self.read(|state| state.get_resource_group(name))
    }

    fn create_or_update_resource_group(
        &self,
        name: &str,
        group: ResourceGroup,
    ) -> Result<ResourceGroup> {
        self.mutate(|state| state.upsert_resource_group(&self.subscription_id, name, group))
    }
}
