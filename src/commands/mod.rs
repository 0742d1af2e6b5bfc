//! Command implementations

pub mod apply;
pub mod plan;
pub mod show;

use anyhow::Result;
use azkit::{Client, FileBackend};

use crate::Context;
use crate::config::ClusterConfig;
use crate::paths;

/// Loaded cluster file and a client over the simulated cloud
pub struct Session {
    pub config: ClusterConfig,
    pub client: Client,
}

impl Session {
    /// Load the cluster file and open the cloud it targets
    pub fn open(ctx: &Context) -> Result<Self> {
        let config_path = paths::config_file(ctx.config.as_deref())?;
        let config = ClusterConfig::load(&config_path)?;

        let state_path = paths::state_file(ctx.state.as_deref())?;
        log::info!("Using cloud state {}", state_path.display());
        let backend = FileBackend::new(state_path, config.cluster.subscription_id.clone());

        let mut client = Client::new(
            Box::new(backend),
            config.cluster.subscription_id.clone(),
            config.cluster.location.clone(),
        );
        if let Some(rg) = &config.cluster.resource_group {
            client = client.with_resource_group(rg.clone());
        }

        Ok(Self { config, client })
    }

    /// Reconciliation context for this cluster
    pub fn reconcile_context(&self) -> declarative::Context<'_, Client> {
        declarative::Context::new(&self.client, self.config.cluster.name.clone())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::Context;
    use std::fs;
    use tempfile::TempDir;

    pub const CLUSTER_FILE: &str = r#"
[cluster]
name = "testCluster"
location = "eastus"
resource_group = "rg"

[[resource_groups]]
name = "rg"

[[disks]]
name = "etcd-main"
size_gb = 32
volume_type = "StandardSSD_LRS"
tags = { key = "value" }
"#;

    /// A temp dir holding a cluster file and an empty simulated cloud
    pub fn workspace(cluster_file: &str) -> (TempDir, Context) {
        let tmp = TempDir::new().unwrap();
        let config = tmp.path().join("cluster.toml");
        fs::write(&config, cluster_file).unwrap();
        let ctx = Context {
            quiet: true,
            config: Some(config.display().to_string()),
            state: Some(tmp.path().join("cloud.json").display().to_string()),
        };
        (tmp, ctx)
    }
}
