//! # azkit
//!
//! Gateway to the Azure compute resources a cluster provisioner manages:
//! managed disks and the resource groups holding them.
//!
//! The crate deliberately knows nothing about reconciliation. It exposes
//! typed records, a [`Backend`] trait that performs the actual calls, and a
//! [`Client`] that binds a backend to a subscription, a target region and an
//! optional default resource group.
//!
//! ## Example
//!
//! ```
//! use azkit::{Client, Disk, DiskProperties, ResourceGroup};
//!
//! let client = Client::in_memory("eastus");
//! assert!(client.find_disk("rg", "etcd").unwrap().is_none());
//!
//! let group = ResourceGroup {
//!     location: Some(client.location().to_string()),
//!     ..Default::default()
//! };
//! client.create_or_update_resource_group("rg", group).unwrap();
//!
//! let disk = Disk {
//!     location: Some(client.location().to_string()),
//!     properties: Some(DiskProperties {
//!         disk_size_gb: Some(32),
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//! client.create_or_update_disk("rg", "etcd", disk).unwrap();
//! assert_eq!(client.get_disk("rg", "etcd").unwrap().disk_size_gb(), Some(32));
//! ```
//!
//! ## Backends
//!
//! - [`MemoryBackend`]: in-process store, used by tests
//! - [`FileBackend`]: JSON file on disk, used as a local simulator

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod naming;
pub mod types;

pub use backend::Backend;
pub use backend::file::FileBackend;
pub use backend::memory::MemoryBackend;
pub use error::{Error, ErrorCategory, Result};
pub use naming::{validate_disk_name, validate_resource_group_name};
pub use types::{
    CreationData, Disk, DiskCreateOption, DiskProperties, DiskSku, DiskStorageAccountType,
    ResourceGroup, ResourceGroupProperties, Tags,
};

/// Tag key identifying the cluster that owns a resource.
pub const TAG_CLUSTER_NAME: &str = "KubernetesCluster";

/// Subscription id used when none is configured.
pub const DEFAULT_SUBSCRIPTION_ID: &str = "00000000-0000-0000-0000-000000000000";

/// High-level client bound to a subscription and region.
pub struct Client {
    backend: Box<dyn Backend>,
    subscription_id: String,
    location: String,
    resource_group: Option<String>,
}

impl Client {
    /// Create a client over an arbitrary backend.
    pub fn new(
        backend: Box<dyn Backend>,
        subscription_id: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            subscription_id: subscription_id.into(),
            location: location.into(),
            resource_group: None,
        }
    }

    /// Create a client over a fresh in-memory cloud.
    pub fn in_memory(location: impl Into<String>) -> Self {
        Self::new(
            Box::new(MemoryBackend::new(DEFAULT_SUBSCRIPTION_ID)),
            DEFAULT_SUBSCRIPTION_ID,
            location,
        )
    }

    /// Set the resource group used when a resource does not name one.
    pub fn with_resource_group(mut self, resource_group: impl Into<String>) -> Self {
        self.resource_group = Some(resource_group.into());
        self
    }

    /// Region new resources are created in.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Subscription the client operates on.
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// Default resource group, if configured.
    pub fn resource_group(&self) -> Option<&str> {
        self.resource_group.as_deref()
    }

    /// Fetch a disk; a missing disk is [`Error::NotFound`].
    pub fn get_disk(&self, resource_group: &str, name: &str) -> Result<Disk> {
        log::debug!("GET disk {resource_group}/{name}");
        self.backend.get_disk(resource_group, name)
    }

    /// Fetch a disk; a missing disk is `Ok(None)`.
    pub fn find_disk(&self, resource_group: &str, name: &str) -> Result<Option<Disk>> {
        match self.get_disk(resource_group, name) {
            Ok(disk) => Ok(Some(disk)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// List the disks of a resource group.
    pub fn list_disks(&self, resource_group: &str) -> Result<Vec<Disk>> {
        log::debug!("LIST disks in {resource_group}");
        self.backend.list_disks(resource_group)
    }

    /// Create or update a disk and return the stored record.
    pub fn create_or_update_disk(
        &self,
        resource_group: &str,
        name: &str,
        disk: Disk,
    ) -> Result<Disk> {
        log::debug!("PUT disk {resource_group}/{name}");
        self.backend.create_or_update_disk(resource_group, name, disk)
    }

    /// Delete a disk.
    pub fn delete_disk(&self, resource_group: &str, name: &str) -> Result<()> {
        log::debug!("DELETE disk {resource_group}/{name}");
        self.backend.delete_disk(resource_group, name)
    }

    /// Fetch a resource group; a missing group is [`Error::NotFound`].
    pub fn get_resource_group(&self, name: &str) -> Result<ResourceGroup> {
        log::debug!("GET resource group {name}");
        self.backend.get_resource_group(name)
    }

    /// Fetch a resource group; a missing group is `Ok(None)`.
    pub fn find_resource_group(&self, name: &str) -> Result<Option<ResourceGroup>> {
        match self.get_resource_group(name) {
            Ok(group) => Ok(Some(group)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create or update a resource group and return the stored record.
    pub fn create_or_update_resource_group(
        &self,
        name: &str,
        group: ResourceGroup,
    ) -> Result<ResourceGroup> {
        log::debug!("PUT resource group {name}");
        self.backend.create_or_update_resource_group(name, group)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("subscription_id", &self.subscription_id)
            .field("location", &self.location)
            .field("resource_group", &self.resource_group)
            .finish_non_exhaustive()
    }
}
