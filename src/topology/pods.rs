//! Pod extraction and partitioning of spine/leaf devices.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use regex_lite::Regex;

use crate::models::AGGREGATE_POD;

pub const POD_PATTERN: &str = r"POD\d+";

/// Matches the pod token (`POD` followed by digits) inside a device name
#[derive(Debug, Clone)]
pub struct PodPattern {
    re: Regex,
}

impl PodPattern {
    pub fn new() -> Result<Self> {
        let re = Regex::new(POD_PATTERN).context("Invalid pod token pattern")?;
        Ok(Self { re })
    }

    /// The first pod token in `name`, if any
    pub fn token<'a>(&self, name: &'a str) -> Option<&'a str> {
        self.re.find(name).map(|m| m.as_str())
    }
}

/// Spine and leaf devices of one pod, sorted by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodMembers {
    pub spines: Vec<String>,
    pub leaves: Vec<String>,
}

impl PodMembers {
    pub fn contains(&self, device: &str) -> bool {
        self.spines.iter().any(|d| d == device) || self.leaves.iter().any(|d| d == device)
    }
}

/// Pod list (aggregate first) and each real pod's members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodPartition {
    pods: Vec<String>,
    members: BTreeMap<String, PodMembers>,
}

impl PodPartition {
    /// `spines` and `leaves` are expected sorted; member lists keep that order.
    pub fn build(pattern: &PodPattern, spines: &[String], leaves: &[String]) -> Self {
        // Tokens sort as strings, so POD10 precedes POD2
        let tokens: BTreeSet<&str> = spines
            .iter()
            .chain(leaves)
            .filter_map(|device| pattern.token(device))
            .collect();

        let mut pods = Vec::with_capacity(tokens.len() + 1);
        pods.push(AGGREGATE_POD.to_string());
        pods.extend(tokens.iter().map(|t| t.to_string()));

        let members = tokens
            .iter()
            .map(|token| {
                let of = |devices: &[String]| -> Vec<String> {
                    devices.iter().filter(|d| d.contains(token)).cloned().collect()
                };
                (
                    token.to_string(),
                    PodMembers {
                        spines: of(spines),
                        leaves: of(leaves),
                    },
                )
            })
            .collect();

        Self { pods, members }
    }

    /// Every pod token, `ALL` first
    pub fn pods(&self) -> &[String] {
        &self.pods
    }

    /// Real pods only, in sorted order
    pub fn real_pods(&self) -> &[String] {
        &self.pods[1..]
    }

    pub fn members(&self, pod: &str) -> Option<&PodMembers> {
        self.members.get(pod)
    }

    /// Pod a device is grouped under: the first pod, in sorted order, whose token it contains
    pub fn pod_of(&self, device: &str) -> Option<&str> {
        self.real_pods()
            .iter()
            .find(|pod| device.contains(pod.as_str()))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_token_extraction() {
        let pattern = PodPattern::new().unwrap();
        assert_eq!(pattern.token("POD3-IBSP-01"), Some("POD3"));
        assert_eq!(pattern.token("DC1-POD12-IBLF-7"), Some("POD12"));
        assert_eq!(pattern.token("IBCR-01"), None);
        assert_eq!(pattern.token("POD-IBLF"), None);
    }

    #[test]
    fn test_partition_groups_devices_by_token() {
        let pattern = PodPattern::new().unwrap();
        let spines = names(&["POD3-IBSP-01"]);
        let leaves = names(&["POD3-IBLF-02"]);
        let partition = PodPartition::build(&pattern, &spines, &leaves);

        assert_eq!(partition.pods(), &["ALL", "POD3"]);
        let pod3 = partition.members("POD3").unwrap();
        assert_eq!(pod3.spines, vec!["POD3-IBSP-01"]);
        assert_eq!(pod3.leaves, vec!["POD3-IBLF-02"]);
        assert_eq!(partition.pod_of("IBCR-01"), None);
        assert!(partition.members(AGGREGATE_POD).is_none());
    }

    #[test]
    fn test_pod_order_is_lexicographic() {
        let pattern = PodPattern::new().unwrap();
        let spines = names(&["POD10-IBSP-01", "POD2-IBSP-01", "POD1-IBSP-01"]);
        let partition = PodPartition::build(&pattern, &spines, &[]);
        assert_eq!(partition.pods(), &["ALL", "POD1", "POD10", "POD2"]);
        assert_eq!(partition.real_pods(), &["POD1", "POD10", "POD2"]);
    }

    #[test]
    fn test_substring_membership_can_overlap() {
        let pattern = PodPattern::new().unwrap();
        let spines = names(&["POD1-IBSP-01", "POD10-IBSP-01"]);
        let partition = PodPartition::build(&pattern, &spines, &[]);

        // POD1 is a substring of POD10, so the POD10 spine is in both subsets
        assert_eq!(
            partition.members("POD1").unwrap().spines,
            vec!["POD1-IBSP-01", "POD10-IBSP-01"]
        );
        assert_eq!(partition.members("POD10").unwrap().spines, vec!["POD10-IBSP-01"]);
        assert_eq!(partition.pod_of("POD10-IBSP-01"), Some("POD1"));
    }

    #[test]
    fn test_no_devices_leaves_only_aggregate() {
        let pattern = PodPattern::new().unwrap();
        let partition = PodPartition::build(&pattern, &[], &[]);
        assert_eq!(partition.pods(), &["ALL"]);
        assert!(partition.real_pods().is_empty());
    }
}
