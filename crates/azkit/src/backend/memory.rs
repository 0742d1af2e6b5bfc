//! In-memory backend.
//!
//! Behaves like the Resource Manager for the operations the reconciler uses
//! but keeps everything in process. Intended for tests.

use super::{Backend, CloudState};
use crate::error::Result;
use crate::types::{Disk, ResourceGroup};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory cloud.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    subscription_id: String,
    state: RwLock<CloudState>,
}

impl MemoryBackend {
    /// Create an empty cloud for a subscription.
    pub fn new(subscription_id: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            state: RwLock::new(CloudState::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CloudState> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, CloudState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Backend for MemoryBackend {
    fn get_disk(&self, resource_group: &str, name: &str) -> Result<Disk> {
        self.read().get_disk(resource_group, name)
    }

    fn list_disks(&self, resource_group: &str) -> Result<Vec<Disk>> {
        Ok(self.read().list_disks(resource_group))
    }

    fn create_or_update_disk(
        &self,
        resource_group: &str,
        name: &str,
        disk: Disk,
    ) -> Result<Disk> {
        log::debug!("memory: create_or_update disk {resource_group}/{name}");
        self.write()
            .upsert_disk(&self.subscription_id, resource_group, name, disk)
    }

    fn delete_disk(&self, resource_group: &str, name: &str) -> Result<()> {
        log::debug!("memory: delete disk {resource_group}/{name}");
        self.write().delete_disk(resource_group, name)
    }

    fn get_resource_group(&self, name: &str) -> Result<ResourceGroup> {
        self.read().get_resource_group(name)
    }

    fn create_or_update_resource_group(
        &self,
        name: &str,
        group: ResourceGroup,
    ) -> Result<ResourceGroup> {
        log::debug!("memory: create_or_update resource group {name}");
        self.write()
            .upsert_resource_group(&self.subscription_id, name, group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DiskProperties;

    #[test]
    fn test_get_missing_disk_is_not_found() {
        let backend = MemoryBackend::new("sub");
        let err = backend.get_disk("rg", "disk").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_list_disks_by_group() {
        let backend = MemoryBackend::new("sub");
        for rg in ["rg", "other"] {
            backend
                .create_or_update_resource_group(
                    rg,
                    ResourceGroup {
                        location: Some("eastus".to_string()),
                        ..Default::default()
                    },
                )
                .unwrap();
        }
        for (rg, name) in [("rg", "a"), ("rg", "b"), ("other", "c")] {
            backend
                .create_or_update_disk(
                    rg,
                    name,
                    Disk {
                        location: Some("eastus".to_string()),
                        properties: Some(DiskProperties {
                            disk_size_gb: Some(8),
                            ..Default::default()
                        }),
                        ..Default::default()
                    },
                )
                .unwrap();
        }

        let names: Vec<_> = backend
            .list_disks("rg")
            .unwrap()
            .into_iter()
            .filter_map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
        assert!(backend.list_disks("missing").unwrap().is_empty());
    }

    #[test]
    fn test_resource_group_roundtrip() {
        let backend = MemoryBackend::new("sub");
        let created = backend
            .create_or_update_resource_group(
                "rg",
                ResourceGroup {
                    location: Some("eastus".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(created.id.as_deref(), Some("/subscriptions/sub/resourceGroups/rg"));
        assert_eq!(backend.get_resource_group("RG").unwrap(), created);
    }
}
