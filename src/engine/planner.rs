//! Execution planner - turns the cluster file into staged tasks

use anyhow::Result;
use azkit::Client;
use declarative::ExecutionPlan;

use crate::config::{ClusterConfig, DiskConfig, ResourceGroupConfig};
use crate::tasks::{Disk, ResourceGroup, ResourceGroupRef};

/// Stage holding resource groups; runs first so disks have a home
pub const STAGE_RESOURCE_GROUPS: &str = "resource-groups";

/// Stage holding managed disks
pub const STAGE_DISKS: &str = "disks";

/// Build the plan for a cluster file
pub fn build_plan(config: &ClusterConfig) -> Result<ExecutionPlan<Client>> {
    let mut plan = ExecutionPlan::new();

    for group in &config.resource_groups {
        plan.add_task(STAGE_RESOURCE_GROUPS, Box::new(resource_group_task(group)));
    }

    for disk in &config.disks {
        let task = disk_task(config, disk)?;
        plan.add_task(STAGE_DISKS, Box::new(task));
    }

    log::debug!(
        "Planned {} task(s) in {} stage(s)",
        plan.total_tasks(),
        plan.stages.len()
    );
    Ok(plan)
}

fn resource_group_task(group: &ResourceGroupConfig) -> ResourceGroup {
    ResourceGroup {
        name: Some(group.name.clone()),
        lifecycle: group.lifecycle,
        tags: group.tags.clone(),
        shared: group.shared,
    }
}

fn disk_task(config: &ClusterConfig, disk: &DiskConfig) -> Result<Disk> {
    Ok(Disk {
        name: Some(disk.name.clone()),
        lifecycle: disk.lifecycle,
        resource_group: config.disk_resource_group(disk).map(ResourceGroupRef::new),
        size_gb: disk.size_gb,
        volume_type: disk.storage_type()?,
        zones: disk.zones.clone(),
        tags: disk.tags.clone(),
    })
}
