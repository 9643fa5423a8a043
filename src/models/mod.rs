mod layout;
mod topology;

pub use layout::*;
pub use topology::*;

use serde::{Deserialize, Serialize};

/// Canonical CLOS topology role values
pub mod topology_role {
    pub const CORE: &str = "core";
    pub const SPINE: &str = "spine";
    pub const LEAF: &str = "leaf";
    pub const UNKNOWN: &str = "unknown";

    pub const ALL: &[&str] = &[CORE, SPINE, LEAF, UNKNOWN];
}

/// Synthetic pod token that stands for the union of every real pod
pub const AGGREGATE_POD: &str = "ALL";

/// Role of a device in the three-tier fabric, derived from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Core,
    Spine,
    Leaf,
    Unknown,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Core => topology_role::CORE,
            Role::Spine => topology_role::SPINE,
            Role::Leaf => topology_role::LEAF,
            Role::Unknown => topology_role::UNKNOWN,
        }
    }

    /// True for core, spine and leaf
    pub fn is_recognized(self) -> bool {
        self != Role::Unknown
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_strings_match_constants() {
        let roles = [Role::Core, Role::Spine, Role::Leaf, Role::Unknown];
        let names: Vec<&str> = roles.iter().map(|r| r.as_str()).collect();
        assert_eq!(names, topology_role::ALL);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Spine).unwrap(), "\"spine\"");
        assert!(!Role::Unknown.is_recognized());
        assert!(Role::Leaf.is_recognized());
    }
}
