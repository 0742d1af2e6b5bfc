//! ARM-style records for managed disks and resource groups.
//!
//! Field names serialize in the camelCase shape the Azure Resource Manager
//! uses, so a record can be stored and read back by any backend unchanged.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Tags attached to a resource.
pub type Tags = BTreeMap<String, String>;

/// Storage account type backing a managed disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiskStorageAccountType {
    /// Standard HDD, locally redundant
    #[serde(rename = "Standard_LRS")]
    StandardLrs,
    /// Premium SSD, locally redundant
    #[serde(rename = "Premium_LRS")]
    PremiumLrs,
    /// Standard SSD, locally redundant
    #[serde(rename = "StandardSSD_LRS")]
    StandardSsdLrs,
    /// Ultra SSD, locally redundant
    #[serde(rename = "UltraSSD_LRS")]
    UltraSsdLrs,
    /// Premium SSD, zone redundant
    #[serde(rename = "Premium_ZRS")]
    PremiumZrs,
    /// Standard SSD, zone redundant
    #[serde(rename = "StandardSSD_ZRS")]
    StandardSsdZrs,
    /// Premium SSD v2, locally redundant
    #[serde(rename = "PremiumV2_LRS")]
    PremiumV2Lrs,
}

impl DiskStorageAccountType {
    /// Every storage account type, in ARM order.
    pub const ALL: [Self; 7] = [
        Self::StandardLrs,
        Self::PremiumLrs,
        Self::StandardSsdLrs,
        Self::UltraSsdLrs,
        Self::PremiumZrs,
        Self::StandardSsdZrs,
        Self::PremiumV2Lrs,
    ];

    /// The ARM wire name, e.g. `StandardSSD_LRS`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StandardLrs => "Standard_LRS",
            Self::PremiumLrs => "Premium_LRS",
            Self::StandardSsdLrs => "StandardSSD_LRS",
            Self::UltraSsdLrs => "UltraSSD_LRS",
            Self::PremiumZrs => "Premium_ZRS",
            Self::StandardSsdZrs => "StandardSSD_ZRS",
            Self::PremiumV2Lrs => "PremiumV2_LRS",
        }
    }
}

impl fmt::Display for DiskStorageAccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiskStorageAccountType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::invalid_request(format!("unknown disk storage type: {s}")))
    }
}

/// How a managed disk is populated when it is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiskCreateOption {
    /// Blank disk of the requested size
    #[default]
    Empty,
    /// Attach an existing disk
    Attach,
    /// Create from a platform or gallery image
    FromImage,
    /// Import a VHD from a storage account
    Import,
    /// Copy another disk or snapshot
    Copy,
    /// Restore from a recovery point
    Restore,
    /// Prepare for a direct upload
    Upload,
}

/// Source information for a disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationData {
    /// How the disk is populated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_option: Option<DiskCreateOption>,
}

/// Properties of a managed disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskProperties {
    /// Source information, immutable after creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_data: Option<CreationData>,
    /// Size in GiB
    #[serde(
        rename = "diskSizeGB",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub disk_size_gb: Option<i32>,
    /// Server-reported provisioning state (read-only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
    /// When the disk was created (read-only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_created: Option<DateTime<Utc>>,
}

/// SKU of a managed disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskSku {
    /// Storage account type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<DiskStorageAccountType>,
}

/// A managed disk as stored by the cloud.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disk {
    /// Fully qualified ARM id (read-only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Resource name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Region the disk lives in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Disk properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<DiskProperties>,
    /// Disk SKU
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<DiskSku>,
    /// Availability zones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<String>>,
    /// Resource tags
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
}

impl Disk {
    /// Size in GiB, if reported.
    pub fn disk_size_gb(&self) -> Option<i32> {
        self.properties.as_ref().and_then(|p| p.disk_size_gb)
    }

    /// Storage account type, if reported.
    pub fn storage_type(&self) -> Option<DiskStorageAccountType> {
        self.sku.as_ref().and_then(|s| s.name)
    }

    /// Provisioning state, if reported.
    pub fn provisioning_state(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|p| p.provisioning_state.as_deref())
    }
}

/// Properties of a resource group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroupProperties {
    /// Server-reported provisioning state (read-only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

/// A resource group as stored by the cloud.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroup {
    /// Fully qualified ARM id (read-only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Resource group name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Region holding the group's metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Group properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ResourceGroupProperties>,
    /// Resource tags
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_parse_is_case_insensitive() {
        assert_eq!(
            "standardssd_lrs".parse::<DiskStorageAccountType>().unwrap(),
            DiskStorageAccountType::StandardSsdLrs
        );
        assert!("SuperFast_LRS".parse::<DiskStorageAccountType>().is_err());
    }

    #[test]
    fn test_disk_serializes_arm_field_names() {
        let disk = Disk {
            name: Some("disk".to_string()),
            location: Some("eastus".to_string()),
            properties: Some(DiskProperties {
                creation_data: Some(CreationData {
                    create_option: Some(DiskCreateOption::Empty),
                }),
                disk_size_gb: Some(32),
                ..Default::default()
            }),
            sku: Some(DiskSku {
                name: Some(DiskStorageAccountType::StandardSsdLrs),
            }),
            ..Default::default()
        };

        let json = serde_json::to_value(&disk).unwrap();
        assert_eq!(json["properties"]["diskSizeGB"], 32);
        assert_eq!(json["properties"]["creationData"]["createOption"], "Empty");
        assert_eq!(json["sku"]["name"], "StandardSSD_LRS");
        assert!(json.get("tags").is_none());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_disk_accessors() {
        let disk = Disk::default();
        assert_eq!(disk.disk_size_gb(), None);
        assert_eq!(disk.storage_type(), None);
        assert_eq!(disk.provisioning_state(), None);
    }
}
