//! Reconcilable Azure resources

pub mod disk;
pub mod resource_group;

pub use disk::Disk;
pub use resource_group::{ResourceGroup, ResourceGroupRef};
