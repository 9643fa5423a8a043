//! Device role classification by naming convention.

use crate::config::RoleMarkers;
use crate::models::Role;

impl RoleMarkers {
    /// Role of a device, checking core, then spine, then leaf. First match wins.
    pub fn classify(&self, name: &str) -> Role {
        [Role::Core, Role::Spine, Role::Leaf]
            .into_iter()
            .find(|role| self.marks(name, *role))
            .unwrap_or(Role::Unknown)
    }

    /// Whether `name` carries the marker for `role`, independent of other markers
    pub fn marks(&self, name: &str, role: Role) -> bool {
        let marker = match role {
            Role::Core => &self.core,
            Role::Spine => &self.spine,
            Role::Leaf => &self.leaf,
            Role::Unknown => return false,
        };
        !marker.is_empty() && name.contains(marker.as_str())
    }

    /// True when `name` carries any of the three markers
    pub fn is_fabric_device(&self, name: &str) -> bool {
        self.classify(name).is_recognized()
    }
}
