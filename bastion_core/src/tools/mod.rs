//! The administration tool catalog.
//!
//! Each module declares its tools' schemas, formats their commands and
//! words their reports.

pub mod ad_groups;
pub mod ad_users;
pub mod delegation;
pub mod firewall;
pub mod job_descriptions;

use crate::registry::{RegistryError, ToolRegistry};

/// Registers every tool, in the order they are listed to clients.
pub fn register_all(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    firewall::register(registry)?;
    delegation::register(registry)?;
    ad_groups::register_membership(registry)?;
    ad_users::register(registry)?;
    ad_groups::register(registry)?;
    job_descriptions::register(registry)?;
    Ok(())
}
