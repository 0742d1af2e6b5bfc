//! Backend abstraction for cloud operations.
//!
//! The [`Backend`] trait is the seam between the reconciler and whatever
//! actually holds the resources: an in-memory store for tests, a JSON file
//! for local simulation, or a real control-plane client.

pub mod file;
pub mod memory;

use crate::error::{Error, Result};
use crate::types::{CreationData, Disk, ResourceGroup, ResourceGroupProperties};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const PROVISIONING_SUCCEEDED: &str = "Succeeded";

/// Backend trait for cloud operations.
///
/// `get_*` calls report a missing resource as [`Error::NotFound`]. The
/// `create_or_update_*` calls return the record as the server stores it,
/// including read-only fields the caller never sent.
pub trait Backend: Send + Sync {
    /// Fetch a disk.
    fn get_disk(&self, resource_group: &str, name: &str) -> Result<Disk>;

    /// List every disk in a resource group.
    fn list_disks(&self, resource_group: &str) -> Result<Vec<Disk>>;

    /// Create a disk, or update it in place if it exists.
    fn create_or_update_disk(&self, resource_group: &str, name: &str, disk: Disk)
    -> Result<Disk>;

    /// Delete a disk.
    fn delete_disk(&self, resource_group: &str, name: &str) -> Result<()>;

    /// Fetch a resource group.
    fn get_resource_group(&self, name: &str) -> Result<ResourceGroup>;

    /// Create a resource group, or update its tags if it exists.
    fn create_or_update_resource_group(
        &self,
        name: &str,
        group: ResourceGroup,
    ) -> Result<ResourceGroup>;
}

/// Resource store shared by the in-process backends.
///
/// Keys are lowercased because ARM names are case-insensitive; records keep
/// the casing they were created with.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CloudState {
    #[serde(default)]
    resource_groups: BTreeMap<String, ResourceGroup>,
    #[serde(default)]
    disks: BTreeMap<String, BTreeMap<String, Disk>>,
}

fn key(name: &str) -> String {
    name.to_lowercase()
}

impl CloudState {
    pub(crate) fn get_disk(&self, resource_group: &str, name: &str) -> Result<Disk> {
        self.disks
            .get(&key(resource_group))
            .and_then(|group| group.get(&key(name)))
            .cloned()
            .ok_or_else(|| Error::not_found("disk", name))
    }

    pub(crate) fn list_disks(&self, resource_group: &str) -> Vec<Disk> {
        self.disks
            .get(&key(resource_group))
            .map(|group| group.values().cloned().collect())
            .unwrap_or_default()
    }

    pub(crate) fn upsert_disk(
        &mut self,
        subscription_id: &str,
        resource_group: &str,
        name: &str,
        mut disk: Disk,
    ) -> Result<Disk> {
        if !self.resource_groups.contains_key(&key(resource_group)) {
            return Err(Error::not_found("resource group", resource_group));
        }
        let existing = self.get_disk(resource_group, name).ok();

        let location = disk
            .location
            .clone()
            .ok_or_else(|| Error::invalid_request("location is required"))?;

        let mut properties = disk.properties.take().unwrap_or_default();
        match &existing {
            None => {
                if properties.disk_size_gb.is_none() {
                    return Err(Error::invalid_request(format!(
                        "diskSizeGB is required to create disk {name}"
                    )));
                }
                if properties.creation_data.is_none() {
                    properties.creation_data = Some(CreationData::default());
                }
                properties.time_created = Some(Utc::now());
            }
            Some(current) => {
                if current.location.as_deref() != Some(location.as_str()) {
                    return Err(Error::Conflict {
                        message: format!(
                            "disk {name} lives in {}, cannot move to {location}",
                            current.location.as_deref().unwrap_or("<unknown>")
                        ),
                    });
                }
                let current_size = current.disk_size_gb();
                if let (Some(from), Some(to)) = (current_size, properties.disk_size_gb)
                    && to < from
                {
                    return Err(Error::invalid_request(format!(
                        "disk {name} cannot shrink from {from} GB to {to} GB"
                    )));
                }
                let current_props = current.properties.clone().unwrap_or_default();
                properties.disk_size_gb = properties.disk_size_gb.or(current_size);
                properties.creation_data = current_props.creation_data;
                properties.time_created = current_props.time_created;
                if disk.sku.is_none() {
                    disk.sku = current.sku.clone();
                }
                if disk.zones.is_none() {
                    disk.zones = current.zones.clone();
                }
            }
        }
        properties.provisioning_state = Some(PROVISIONING_SUCCEEDED.to_string());

        let stored_name = existing
            .as_ref()
            .and_then(|d| d.name.clone())
            .unwrap_or_else(|| name.to_string());
        let stored = Disk {
            id: Some(format!(
                "/subscriptions/{subscription_id}/resourceGroups/{resource_group}/providers/Microsoft.Compute/disks/{stored_name}"
            )),
            name: Some(stored_name),
            location: Some(location),
            properties: Some(properties),
            ..disk
        };

        self.disks
            .entry(key(resource_group))
            .or_default()
            .insert(key(name), stored.clone());
        Ok(stored)
    }

    pub(crate) fn delete_disk(&mut self, resource_group: &str, name: &str) -> Result<()> {
        self.disks
            .get_mut(&key(resource_group))
            .and_then(|group| group.remove(&key(name)))
            .map(|_| ())
            .ok_or_else(|| Error::not_found("disk", name))
    }

    pub(crate) fn get_resource_group(&self, name: &str) -> Result<ResourceGroup> {
        self.resource_groups
            .get(&key(name))
            .cloned()
            .ok_or_else(|| Error::not_found("resource group", name))
    }

    pub(crate) fn upsert_resource_group(
        &mut self,
        subscription_id: &str,
        name: &str,
        group: ResourceGroup,
    ) -> Result<ResourceGroup> {
        let location = group
            .location
            .clone()
            .ok_or_else(|| Error::invalid_request("location is required"))?;

        let existing = self.get_resource_group(name).ok();
        if let Some(current) = &existing
            && current.location.as_deref() != Some(location.as_str())
        {
            return Err(Error::Conflict {
                message: format!(
                    "resource group {name} already exists in {}",
                    current.location.as_deref().unwrap_or("<unknown>")
                ),
            });
        }

        let stored_name = existing
            .and_then(|g| g.name)
            .unwrap_or_else(|| name.to_string());
        let stored = ResourceGroup {
            id: Some(format!(
                "/subscriptions/{subscription_id}/resourceGroups/{stored_name}"
            )),
            name: Some(stored_name),
            location: Some(location),
            properties: Some(ResourceGroupProperties {
                provisioning_state: Some(PROVISIONING_SUCCEEDED.to_string()),
            }),
            tags: group.tags,
        };

        self.resource_groups.insert(key(name), stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DiskProperties;

    fn sized_disk(size: i32) -> Disk {
        Disk {
            location: Some("eastus".to_string()),
            properties: Some(DiskProperties {
                disk_size_gb: Some(size),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn with_group(name: &str) -> CloudState {
        let mut state = CloudState::default();
        state
            .upsert_resource_group(
                "sub",
                name,
                ResourceGroup {
                    location: Some("eastus".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        state
    }

    #[test]
    fn test_upsert_fills_server_fields() {
        let mut state = with_group("rg");
        let disk = state
            .upsert_disk("sub", "rg", "disk", sized_disk(32))
            .unwrap();

        assert_eq!(disk.name.as_deref(), Some("disk"));
        assert_eq!(
            disk.id.as_deref(),
            Some("/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Compute/disks/disk")
        );
        assert_eq!(disk.provisioning_state(), Some("Succeeded"));
        assert!(disk.properties.unwrap().time_created.is_some());
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let mut state = with_group("rg");
        state
            .upsert_disk("sub", "RG", "Disk", sized_disk(32))
            .unwrap();

        let found = state.get_disk("rg", "disk").unwrap();
        assert_eq!(found.name.as_deref(), Some("Disk"));
    }

    #[test]
    fn test_create_requires_size_and_location() {
        let mut state = with_group("rg");
        let no_size = Disk {
            location: Some("eastus".to_string()),
            ..Default::default()
        };
        assert!(state.upsert_disk("sub", "rg", "disk", no_size).is_err());

        let no_location = Disk {
            location: None,
            ..sized_disk(32)
        };
        assert!(state.upsert_disk("sub", "rg", "disk", no_location).is_err());
    }

    #[test]
    fn test_update_cannot_shrink_or_move() {
        let mut state = with_group("rg");
        state
            .upsert_disk("sub", "rg", "disk", sized_disk(64))
            .unwrap();

        let err = state
            .upsert_disk("sub", "rg", "disk", sized_disk(32))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest { .. }));

        let moved = Disk {
            location: Some("westeurope".to_string()),
            ..sized_disk(64)
        };
        let err = state.upsert_disk("sub", "rg", "disk", moved).unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));

        let grown = state
            .upsert_disk("sub", "rg", "disk", sized_disk(128))
            .unwrap();
        assert_eq!(grown.disk_size_gb(), Some(128));
    }

    #[test]
    fn test_disk_needs_existing_resource_group() {
        let mut state = CloudState::default();
        let err = state
            .upsert_disk("sub", "rg", "disk", sized_disk(32))
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("rg"));
        assert!(state.get_disk("rg", "disk").unwrap_err().is_not_found());

        let mut state = with_group("other");
        assert!(
            state
                .upsert_disk("sub", "rg", "disk", sized_disk(32))
                .unwrap_err()
                .is_not_found()
        );
        assert!(state.list_disks("rg").is_empty());
    }

    #[test]
    fn test_delete_missing_disk_is_not_found() {
        let mut state = CloudState::default();
        assert!(state.delete_disk("rg", "disk").unwrap_err().is_not_found());
    }
}
