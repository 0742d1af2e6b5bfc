//! Cluster configuration file
//!
//! ```toml
//! [cluster]
//! name = "prod"
//! location = "eastus"
//! resource_group = "prod-rg"
//!
//! [[resource_groups]]
//! name = "prod-rg"
//!
//! [[disks]]
//! name = "etcd-main"
//! size_gb = 32
//! volume_type = "StandardSSD_LRS"
//! tags = { role = "etcd" }
//! ```

use anyhow::{Context, Result, bail};
use azkit::{DiskStorageAccountType, Tags};
use declarative::Lifecycle;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Whole cluster file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfig {
    pub cluster: ClusterSection,
    #[serde(default)]
    pub resource_groups: Vec<ResourceGroupConfig>,
    #[serde(default)]
    pub disks: Vec<DiskConfig>,
}

/// Identity and placement of the cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterSection {
    /// Value of the cluster identity tag
    pub name: String,
    /// Region new resources are created in
    pub location: String,
    #[serde(default = "default_subscription_id")]
    pub subscription_id: String,
    /// Group used by disks that don't name one
    #[serde(default)]
    pub resource_group: Option<String>,
}

fn default_subscription_id() -> String {
    azkit::DEFAULT_SUBSCRIPTION_ID.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceGroupConfig {
    pub name: String,
    /// Owned by someone else: must exist, never modified
    #[serde(default)]
    pub shared: bool,
    #[serde(default)]
    pub lifecycle: Lifecycle,
    #[serde(default)]
    pub tags: Tags,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiskConfig {
    pub name: String,
    #[serde(default)]
    pub resource_group: Option<String>,
    #[serde(default)]
    pub size_gb: Option<i32>,
    /// Storage account type, e.g. "StandardSSD_LRS"
    #[serde(default)]
    pub volume_type: Option<String>,
    #[serde(default)]
    pub zones: Option<Vec<String>>,
    #[serde(default)]
    pub lifecycle: Lifecycle,
    #[serde(default)]
    pub tags: Tags,
}

impl DiskConfig {
    /// Parsed storage account type; validated on load
    pub fn storage_type(&self) -> Result<Option<DiskStorageAccountType>> {
        self.volume_type
            .as_deref()
            .map(|t| t.parse::<DiskStorageAccountType>())
            .transpose()
            .with_context(|| format!("Disk {}: invalid volume_type", self.name))
    }
}

impl ClusterConfig {
    /// Load and validate a cluster file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Invalid cluster file {}", path.display()))?;
        log::debug!(
            "Loaded cluster {} from {} ({} resource group(s), {} disk(s))",
            config.cluster.name,
            path.display(),
            config.resource_groups.len(),
            config.disks.len()
        );
        Ok(config)
    }

    /// Parse and validate TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Invalid TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Resource group a disk lives in
    pub fn disk_resource_group<'a>(&'a self, disk: &'a DiskConfig) -> Option<&'a str> {
        disk.resource_group
            .as_deref()
            .or(self.cluster.resource_group.as_deref())
    }

    /// Check names, references and values
    pub fn validate(&self) -> Result<()> {
        if self.cluster.name.trim().is_empty() {
            bail!("cluster.name must not be empty");
        }
        if self.cluster.location.trim().is_empty() {
            bail!("cluster.location must not be empty");
        }
        if let Some(rg) = &self.cluster.resource_group {
            azkit::validate_resource_group_name(rg).context("cluster.resource_group")?;
        }

        let mut groups = HashSet::new();
        for group in &self.resource_groups {
            azkit::validate_resource_group_name(&group.name)?;
            if !groups.insert(group.name.to_lowercase()) {
                bail!("Duplicate resource group: {}", group.name);
            }
        }

        let mut disks = HashSet::new();
        for disk in &self.disks {
            azkit::validate_disk_name(&disk.name)?;
            let Some(rg) = self.disk_resource_group(disk) else {
                bail!(
                    "Disk {} has no resource_group and cluster.resource_group is not set",
                    disk.name
                );
            };
            azkit::validate_resource_group_name(rg)
                .with_context(|| format!("Disk {}", disk.name))?;
            if !disks.insert((rg.to_lowercase(), disk.name.to_lowercase())) {
                bail!("Duplicate disk: {}/{}", rg, disk.name);
            }
            if let Some(size) = disk.size_gb
                && size <= 0
            {
                bail!("Disk {}: size_gb must be positive, got {}", disk.name, size);
            }
            disk.storage_type()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[cluster]
name = "testCluster"
location = "eastus"
resource_group = "rg"

[[resource_groups]]
name = "rg"

[[resource_groups]]
name = "network-rg"
shared = true
lifecycle = "ExistsAndValidates"

[[disks]]
name = "etcd-main"
size_gb = 32
volume_type = "standardssd_lrs"
tags = { key = "value" }

[[disks]]
name = "etcd-events"
resource_group = "other-rg"
size_gb = 16
zones = ["1"]
lifecycle = "Ignore"
"#;

    fn with_disk(extra: &str) -> String {
        format!("{SAMPLE}\n[[disks]]\n{extra}\n")
    }

    #[test]
    fn test_parse_sample() {
        let config = ClusterConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.cluster.name, "testCluster");
        assert_eq!(config.cluster.subscription_id, azkit::DEFAULT_SUBSCRIPTION_ID);
        assert_eq!(config.resource_groups.len(), 2);
        assert!(config.resource_groups[1].shared);
        assert_eq!(config.resource_groups[1].lifecycle, Lifecycle::ExistsAndValidates);
        assert_eq!(config.resource_groups[0].lifecycle, Lifecycle::Sync);

        let main = &config.disks[0];
        assert_eq!(config.disk_resource_group(main), Some("rg"));
        assert_eq!(
            main.storage_type().unwrap(),
            Some(DiskStorageAccountType::StandardSsdLrs)
        );
        assert_eq!(main.tags.get("key").map(String::as_str), Some("value"));

        let events = &config.disks[1];
        assert_eq!(config.disk_resource_group(events), Some("other-rg"));
        assert_eq!(events.lifecycle, Lifecycle::Ignore);
        assert_eq!(events.zones.as_deref(), Some(&["1".to_string()][..]));
    }

    #[test]
    fn test_rejects_duplicate_disk() {
        let err = ClusterConfig::parse(&with_disk("name = \"ETCD-MAIN\"")).unwrap_err();
        assert!(err.to_string().contains("Duplicate disk"));
    }

    #[test]
    fn test_same_disk_name_in_other_group_is_fine() {
        let config =
            ClusterConfig::parse(&with_disk("name = \"etcd-main\"\nresource_group = \"other-rg\""))
                .unwrap();
        assert_eq!(config.disks.len(), 3);
    }

    #[test]
    fn test_lifecycle_is_case_insensitive() {
        for raw in ["sync", "SYNC", "existsandvalidates", "existsAndWarnIfChanges", "ignore"] {
            let config =
                ClusterConfig::parse(&with_disk(&format!("name = \"d\"\nlifecycle = \"{raw}\"")))
                    .unwrap();
            assert_eq!(Ok(config.disks[2].lifecycle), raw.parse::<Lifecycle>());
        }
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(ClusterConfig::parse(&with_disk("name = \"d\"\nsize_gb = 0")).is_err());
        assert!(ClusterConfig::parse(&with_disk("name = \"d\"\nvolume_type = \"Floppy\"")).is_err());
        assert!(ClusterConfig::parse(&with_disk("name = \"-bad\"")).is_err());
        assert!(ClusterConfig::parse(&with_disk("name = \"d\"\nlifecycle = \"Delete\"")).is_err());
        assert!(ClusterConfig::parse(&with_disk("name = \"d\"\ncolor = \"red\"")).is_err());
    }

    #[test]
    fn test_disk_needs_a_resource_group() {
        let content = r#"
[cluster]
name = "c"
location = "eastus"

[[disks]]
name = "data"
"#;
        let err = ClusterConfig::parse(content).unwrap_err();
        assert!(err.to_string().contains("no resource_group"));
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cluster.toml");
        fs::write(&path, SAMPLE).unwrap();

        let config = ClusterConfig::load(&path).unwrap();
        assert_eq!(config.disks.len(), 2);

        let missing = ClusterConfig::load(&tmp.path().join("missing.toml")).unwrap_err();
        assert!(missing.to_string().contains("Could not read"));
    }
}
