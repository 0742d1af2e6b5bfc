//! Resource group task
//!
//! A resource group owned by the cluster is created and tagged like any
//! other resource. A shared group belongs to someone else: it must already
//! exist and is never written to.

use azkit::{Client, TAG_CLUSTER_NAME, Tags};
use declarative::{Context, Error, Lifecycle, Result, Task, changed_map};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name-based link from a resource to the group holding it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceGroupRef {
    pub name: String,
}

impl ResourceGroupRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// ARM names are case-insensitive
    pub fn is(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl fmt::Display for ResourceGroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Desired or observed state of a resource group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip)]
    pub lifecycle: Lifecycle,
    #[serde(skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
    #[serde(skip)]
    pub shared: bool,
}

impl ResourceGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    fn from_record(name: &str, record: azkit::ResourceGroup, like: &Self) -> Self {
        Self {
            name: Some(record.name.unwrap_or_else(|| name.to_string())),
            lifecycle: like.lifecycle,
            tags: record.tags,
            shared: like.shared,
        }
    }
}

impl Task for ResourceGroup {
    type Cloud = Client;
    const KIND: &'static str = "ResourceGroup";

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn find(&self, ctx: &Context<'_, Client>) -> Result<Option<Self>> {
        let Some(name) = self.name.as_deref() else {
            return Ok(None);
        };
        let found = ctx
            .cloud
            .find_resource_group(name)
            .map_err(Error::transport)?;
        Ok(found.map(|record| Self::from_record(name, record, self)))
    }

    fn normalize(&mut self, ctx: &Context<'_, Client>) -> Result<()> {
        if !self.shared {
            self.tags
                .insert(TAG_CLUSTER_NAME.to_string(), ctx.cluster_name.clone());
        }
        Ok(())
    }

    fn changes(actual: &Self, expected: &Self) -> Option<Self> {
        if expected.shared {
            return None;
        }
        let name = match (&actual.name, &expected.name) {
            (Some(a), Some(e)) if a.eq_ignore_ascii_case(e) => None,
            (_, e) => e.clone(),
        };
        let tags = changed_map(&actual.tags, &expected.tags);
        if name.is_none() && tags.is_empty() {
            return None;
        }
        Some(Self {
            name,
            lifecycle: expected.lifecycle,
            tags,
            shared: expected.shared,
        })
    }

    fn check_changes(actual: Option<&Self>, expected: &Self, changes: Option<&Self>) -> Result<()> {
        match actual {
            None => {
                if expected.name.is_none() {
                    return Err(Error::required_field(Self::KIND, "Name"));
                }
                if expected.shared {
                    return Err(Error::Invalid {
                        kind: Self::KIND,
                        id: Task::id(expected),
                        message: "shared resource group does not exist".to_string(),
                    });
                }
            }
            Some(_) => {
                if changes.is_some_and(|c| c.name.is_some()) {
                    return Err(Error::cannot_change_field(Self::KIND, "Name"));
                }
            }
        }
        Ok(())
    }

    fn render(
        ctx: &Context<'_, Client>,
        _actual: Option<&Self>,
        expected: &Self,
        _changes: &Self,
    ) -> Result<Self> {
        let name = expected
            .name
            .as_deref()
            .ok_or_else(|| Error::required_field(Self::KIND, "Name"))?;
        let record = azkit::ResourceGroup {
            location: Some(ctx.cloud.location().to_string()),
            tags: expected.tags.clone(),
            ..Default::default()
        };
        let stored = ctx
            .cloud
            .create_or_update_resource_group(name, record)
            .map_err(Error::transport)?;
        Ok(Self::from_record(name, stored, expected))
    }
}
