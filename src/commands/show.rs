//! `clusterup show` - look up one disk

use anyhow::{Context as _, Result};
use declarative::Task;

use super::Session;
use crate::Context;
use crate::tasks::{Disk, ResourceGroupRef};
use crate::ui;

pub fn run(
    ctx: &Context,
    name: &str,
    resource_group: Option<&str>,
    json: bool,
) -> Result<Option<Disk>> {
    let session = Session::open(ctx)?;
    let query = Disk {
        name: Some(name.to_string()),
        resource_group: resource_group.map(ResourceGroupRef::new),
        ..Default::default()
    };

    let found = query
        .find(&session.reconcile_context())
        .with_context(|| format!("Could not look up disk {name}"))?;

    match &found {
        None => ui::warn(&format!("Disk {name} does not exist")),
        Some(disk) if json => println!("{}", serde_json::to_string_pretty(disk)?),
        Some(disk) => {
            ui::header(&format!("Disk {name}"));
            ui::kv("Resource group", &ui::or_dash(disk.resource_group.as_ref()));
            ui::kv("Size (GB)", &ui::or_dash(disk.size_gb));
            ui::kv("Volume type", &ui::or_dash(disk.volume_type));
            ui::kv(
                "Zones",
                &ui::or_dash(disk.zones.as_ref().map(|z| z.join(", "))),
            );
            ui::kv("Tags", &ui::format_tags(&disk.tags));
        }
    }
    Ok(found)
}
