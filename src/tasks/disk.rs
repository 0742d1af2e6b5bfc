//! Managed disk task

use super::resource_group::ResourceGroupRef;
use azkit::{
    Client, CreationData, DiskCreateOption, DiskProperties, DiskSku, DiskStorageAccountType,
    TAG_CLUSTER_NAME, Tags,
};
use declarative::{Context, Error, Lifecycle, Result, Task, changed, changed_map};
use serde::Serialize;

/// Desired or observed state of a managed disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Disk {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip)]
    pub lifecycle: Lifecycle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<ResourceGroupRef>,
    #[serde(rename = "sizeGB", skip_serializing_if = "Option::is_none")]
    pub size_gb: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_type: Option<DiskStorageAccountType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
}

impl Disk {
    pub fn new(name: impl Into<String>, resource_group: impl Into<String>, size_gb: i32) -> Self {
        Self {
            name: Some(name.into()),
            resource_group: Some(ResourceGroupRef::new(resource_group)),
            size_gb: Some(size_gb),
            ..Default::default()
        }
    }

    /// Resource group this disk lives in, falling back to the client default
    fn resource_group_name(&self, client: &Client) -> Option<String> {
        self.resource_group
            .as_ref()
            .map(|rg| rg.name.clone())
            .or_else(|| client.resource_group().map(str::to_string))
    }

    fn require_resource_group(&self, client: &Client) -> Result<String> {
        self.resource_group_name(client).ok_or_else(|| Error::Invalid {
            kind: Self::KIND,
            id: Task::id(self),
            message: "no resource group set and the client has no default".to_string(),
        })
    }

    fn from_record(resource_group: &str, name: &str, record: azkit::Disk, lifecycle: Lifecycle) -> Self {
        Self {
            size_gb: record.disk_size_gb(),
            volume_type: record.storage_type(),
            name: Some(record.name.unwrap_or_else(|| name.to_string())),
            lifecycle,
            resource_group: Some(ResourceGroupRef::new(resource_group)),
            zones: record.zones,
            tags: record.tags,
        }
    }

    fn is_empty_change(&self) -> bool {
        self.name.is_none()
            && self.resource_group.is_none()
            && self.size_gb.is_none()
            && self.volume_type.is_none()
            && self.zones.is_none()
            && self.tags.is_empty()
    }
}

impl Task for Disk {
    type Cloud = Client;
    const KIND: &'static str = "Disk";

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
        let resource_group = self.require_resource_group(ctx.cloud)?;
        let found = ctx
            .cloud
            .find_disk(&resource_group, name)
            .map_err(Error::transport)?;
        Ok(found.map(|record| Self::from_record(&resource_group, name, record, self.lifecycle)))
    }

    fn normalize(&mut self, ctx: &Context<'_, Client>) -> Result<()> {
        self.tags
            .insert(TAG_CLUSTER_NAME.to_string(), ctx.cluster_name.clone());
        if self.resource_group.is_none()
            && let Some(rg) = ctx.cloud.resource_group()
        {
            self.resource_group = Some(ResourceGroupRef::new(rg));
        }
        Ok(())
    }

    fn changes(actual: &Self, expected: &Self) -> Option<Self> {
        let name = match (&actual.name, &expected.name) {
            (Some(a), Some(e)) if a.eq_ignore_ascii_case(e) => None,
            (_, e) => e.clone(),
        };
        let resource_group = match (&actual.resource_group, &expected.resource_group) {
            (Some(a), Some(e)) if a.is(e) => None,
            (_, e) => e.clone(),
        };
        let changes = Self {
            name,
            lifecycle: expected.lifecycle,
            resource_group,
            size_gb: changed(&actual.size_gb, &expected.size_gb),
            volume_type: changed(&actual.volume_type, &expected.volume_type),
            zones: changed(&actual.zones, &expected.zones),
            tags: changed_map(&actual.tags, &expected.tags),
        };
        (!changes.is_empty_change()).then_some(changes)
    }

    fn check_changes(actual: Option<&Self>, expected: &Self, changes: Option<&Self>) -> Result<()> {
        match actual {
            None if expected.name.is_none() => Err(Error::required_field(Self::KIND, "Name")),
            Some(_) if changes.is_some_and(|c| c.name.is_some()) => {
                Err(Error::cannot_change_field(Self::KIND, "Name"))
            }
            _ => Ok(()),
        }
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
        let resource_group = expected.require_resource_group(ctx.cloud)?;

        let record = azkit::Disk {
            location: Some(ctx.cloud.location().to_string()),
            properties: Some(DiskProperties {
                creation_data: Some(CreationData {
                    create_option: Some(DiskCreateOption::Empty),
                }),
                disk_size_gb: expected.size_gb,
                ..Default::default()
            }),
            sku: expected.volume_type.map(|t| DiskSku { name: Some(t) }),
            zones: expected.zones.clone(),
            tags: expected.tags.clone(),
            ..Default::default()
        };

        let stored = ctx
            .cloud
            .create_or_update_disk(&resource_group, name, record)
            .map_err(Error::transport)?;
        Ok(Self::from_record(&resource_group, name, stored, expected.lifecycle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use azkit::{Backend, ResourceGroup as GroupRecord};
    use declarative::{ApplyResult, PassPhase, PlannedAction, run};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const CLUSTER: &str = "testCluster";
    const TAG_KEY: &str = "key";
    const TAG_VALUE: &str = "value";

    fn new_test_disk() -> Disk {
        Disk {
            volume_type: Some(DiskStorageAccountType::StandardSsdLrs),
            tags: Tags::from([(TAG_KEY.to_string(), TAG_VALUE.to_string())]),
            ..Disk::new("disk", "rg", 32)
        }
    }

    /// Backend that fails every call and counts them
    #[derive(Default)]
    struct Failing {
        calls: Arc<AtomicUsize>,
    }

    impl Failing {
        fn fail<T>(&self) -> azkit::Result<T> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(azkit::Error::Network {
                message: "connection reset".to_string(),
            })
        }
    }

    impl Backend for Failing {
        fn get_disk(&self, _: &str, _: &str) -> azkit::Result<azkit::Disk> {
            self.fail()
        }
        fn list_disks(&self, _: &str) -> azkit::Result<Vec<azkit::Disk>> {
            self.fail()
        }
        fn create_or_update_disk(&self, _: &str, _: &str, _: azkit::Disk) -> azkit::Result<azkit::Disk> {
            self.fail()
        }
        fn delete_disk(&self, _: &str, _: &str) -> azkit::Result<()> {
            self.fail()
        }
        fn get_resource_group(&self, _: &str) -> azkit::Result<GroupRecord> {
            self.fail()
        }
        fn create_or_update_resource_group(&self, _: &str, _: GroupRecord) -> azkit::Result<GroupRecord> {
            self.fail()
        }
    }

    fn failing_client() -> (Client, Arc<AtomicUsize>) {
        let backend = Failing::default();
        let calls = Arc::clone(&backend.calls);
        (Client::new(Box::new(backend), "sub", "eastus"), calls)
    }

    fn client_with_group() -> Client {
        let client = Client::in_memory("eastus");
        client
            .create_or_update_resource_group(
                "rg",
                GroupRecord {
                    location: Some(client.location().to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        client
    }

    #[test]
    fn test_render_azure() {
        let client = client_with_group();
        let ctx = Context::new(&client, CLUSTER);
        let expected = new_test_disk();

        Disk::render(&ctx, None, &expected, &expected).unwrap();

        let actual = client.get_disk("rg", "disk").unwrap();
        assert_eq!(actual.location.as_deref(), Some(client.location()));
        assert_eq!(actual.name, expected.name);
        assert_eq!(actual.disk_size_gb(), expected.size_gb);
        assert_eq!(actual.storage_type(), expected.volume_type);
        assert_eq!(actual.tags, expected.tags);
        assert_eq!(
            actual
                .properties
                .and_then(|p| p.creation_data)
                .and_then(|c| c.create_option),
            Some(DiskCreateOption::Empty)
        );
    }

    #[test]
    fn test_find() {
        let client = client_with_group();
        let ctx = Context::new(&client, CLUSTER);
        let disk = Disk {
            name: Some("disk".to_string()),
            resource_group: Some(ResourceGroupRef::new("rg")),
            ..Default::default()
        };

        // Nothing is found before the disk exists
        assert!(disk.find(&ctx).unwrap().is_none());

        let tags = Tags::from([("key".to_string(), "value".to_string())]);
        client
            .create_or_update_disk(
                "rg",
                "disk",
                azkit::Disk {
                    location: Some(client.location().to_string()),
                    properties: Some(DiskProperties {
                        creation_data: Some(CreationData {
                            create_option: Some(DiskCreateOption::Empty),
                        }),
                        disk_size_gb: Some(32),
                        ..Default::default()
                    }),
                    tags: tags.clone(),
                    ..Default::default()
                },
            )
            .unwrap();

        let actual = disk.find(&ctx).unwrap().unwrap();
        assert_eq!(actual.name, disk.name);
        assert_eq!(actual.resource_group, Some(ResourceGroupRef::new("rg")));
        assert_eq!(actual.size_gb, Some(32));
        assert_eq!(actual.tags, tags);
        assert_eq!(actual.lifecycle, disk.lifecycle);
    }

    #[test]
    fn test_run() {
        let client = client_with_group();
        let ctx = Context::new(&client, CLUSTER);
        let mut disk = new_test_disk();

        disk.normalize(&ctx).unwrap();
        let report = run(&mut disk, &ctx).unwrap();

        assert_eq!(report.result, ApplyResult::Created);
        let expected_tags = Tags::from([
            (TAG_CLUSTER_NAME.to_string(), CLUSTER.to_string()),
            (TAG_KEY.to_string(), TAG_VALUE.to_string()),
        ]);
        assert_eq!(disk.tags, expected_tags);
        assert_eq!(client.get_disk("rg", "disk").unwrap().tags, expected_tags);
    }

    #[test]
    fn test_check_changes() {
        let named = |name: &str| Disk {
            name: Some(name.to_string()),
            ..Default::default()
        };
        let unnamed = Disk::default();

        let cases: [(Option<&Disk>, &Disk, Option<&Disk>, bool); 4] = [
            (None, &named("name"), None, true),
            (None, &unnamed, None, false),
            (Some(&named("name")), &unnamed, Some(&unnamed), true),
            (Some(&named("name")), &unnamed, Some(&named("newName")), false),
        ];

        for (i, (actual, expected, changes, success)) in cases.into_iter().enumerate() {
            let result = Disk::check_changes(actual, expected, changes);
            assert_eq!(result.is_ok(), success, "case {i}: {result:?}");
        }

        let err = Disk::check_changes(None, &unnamed, None).unwrap_err();
        assert_eq!(err.to_string(), "Disk: field Name is required");
        let err = Disk::check_changes(Some(&named("a")), &unnamed, Some(&named("b"))).unwrap_err();
        assert_eq!(err.to_string(), "Disk: field Name cannot be changed");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let client = Client::in_memory("eastus").with_resource_group("default-rg");
        let ctx = Context::new(&client, CLUSTER);
        let mut disk = Disk {
            resource_group: None,
            ..new_test_disk()
        };

        disk.normalize(&ctx).unwrap();
        let once = disk.clone();
        disk.normalize(&ctx).unwrap();

        assert_eq!(disk, once);
        assert_eq!(disk.tags.len(), 2);
        assert_eq!(disk.tags.get(TAG_KEY).map(String::as_str), Some(TAG_VALUE));
        assert_eq!(disk.resource_group, Some(ResourceGroupRef::new("default-rg")));
    }

    #[test]
    fn test_unnamed_disk_never_reaches_gateway() {
        let (client, calls) = failing_client();
        let ctx = Context::new(&client, CLUSTER);
        let mut disk = Disk {
            name: None,
            ..new_test_disk()
        };

        assert!(disk.find(&ctx).unwrap().is_none());
        let err = run(&mut disk, &ctx).unwrap_err();
        assert!(matches!(err, Error::RequiredField { field: "Name", .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_gateway_error_is_not_swallowed() {
        let (client, calls) = failing_client();
        let ctx = Context::new(&client, CLUSTER);

        let err = run(&mut new_test_disk(), &ctx).unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "network error: connection reset");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_second_run_is_no_change() {
        let client = client_with_group();
        let ctx = Context::new(&client, CLUSTER);
        run(&mut new_test_disk(), &ctx).unwrap();

        let report = run(&mut new_test_disk(), &ctx).unwrap();
        assert_eq!(report.result, ApplyResult::NoChange);
        assert_eq!(report.phase, PassPhase::Applied);
    }

    #[test]
    fn test_resize_updates_disk() {
        let client = client_with_group();
        let ctx = Context::new(&client, CLUSTER);
        run(&mut new_test_disk(), &ctx).unwrap();

        let mut bigger = Disk {
            size_gb: Some(64),
            ..new_test_disk()
        };
        let report = run(&mut bigger, &ctx).unwrap();
        assert_eq!(report.result, ApplyResult::Modified);
        assert_eq!(report.changes.len(), 1);
        assert_eq!(report.changes[0].to_string(), "sizeGB: 32 -> 64");
        assert_eq!(client.get_disk("rg", "disk").unwrap().disk_size_gb(), Some(64));
        assert_eq!(bigger.size_gb, Some(64));
    }

    #[test]
    fn test_shrink_is_rejected_by_gateway() {
        let client = client_with_group();
        let ctx = Context::new(&client, CLUSTER);
        run(&mut new_test_disk(), &ctx).unwrap();

        let mut smaller = Disk {
            size_gb: Some(16),
            ..new_test_disk()
        };
        let err = run(&mut smaller, &ctx).unwrap_err();
        assert!(err.is_transport());
        assert_eq!(client.get_disk("rg", "disk").unwrap().disk_size_gb(), Some(32));
    }

    #[test]
    fn test_dry_run_does_not_create() {
        let client = client_with_group();
        let ctx = Context::new(&client, CLUSTER).with_dry_run(true);

        let report = run(&mut new_test_disk(), &ctx).unwrap();
        assert_eq!(report.action, PlannedAction::Create);
        assert!(matches!(report.result, ApplyResult::Skipped { .. }));
        assert!(client.find_disk("rg", "disk").unwrap().is_none());
    }

    #[test]
    fn test_exists_and_validates_missing_disk() {
        let client = client_with_group();
        let ctx = Context::new(&client, CLUSTER);
        let mut disk = Disk {
            lifecycle: Lifecycle::ExistsAndValidates,
            ..new_test_disk()
        };

        let err = run(&mut disk, &ctx).unwrap_err();
        assert!(matches!(err, Error::Lifecycle { .. }));
        assert!(client.find_disk("rg", "disk").unwrap().is_none());
    }

    #[test]
    fn test_create_in_absent_group_fails() {
        let client = Client::in_memory("eastus");
        let ctx = Context::new(&client, CLUSTER);

        let err = run(&mut new_test_disk(), &ctx).unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "resource group not found: rg");
        assert!(client.list_disks("rg").unwrap().is_empty());
    }

    #[test]
    fn test_missing_resource_group_is_invalid() {
        let client = client_with_group();
        let ctx = Context::new(&client, CLUSTER);
        let disk = Disk {
            resource_group: None,
            ..new_test_disk()
        };

        let err = disk.find(&ctx).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("no resource group"));
    }
}
