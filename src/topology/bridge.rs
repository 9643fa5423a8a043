//! Core-to-spine links indexed by pod and spine, revealed on demand by the page.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::config::RoleMarkers;
use crate::models::{EdgeRecord, PortEdge, PortKey, Role, AGGREGATE_POD};
use crate::registry::PortRegistry;

/// spine device id -> bridge edges with the core as source
pub type SpineBridges = BTreeMap<String, Vec<EdgeRecord>>;

/// pod -> spine -> edges; always holds an `ALL` entry
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BridgeIndex {
    by_pod: BTreeMap<String, SpineBridges>,
}

impl BridgeIndex {
    pub fn build(registry: &PortRegistry, markers: &RoleMarkers, real_pods: &[String]) -> Self {
        let mut by_pod: BTreeMap<String, SpineBridges> = real_pods
            .iter()
            .map(|pod| (pod.clone(), pod_bridges(registry, markers, pod)))
            .collect();

        let mut aggregate = SpineBridges::new();
        let mut seen = HashSet::new();
        for pod in real_pods {
            let Some(spines) = by_pod.get(pod) else {
                continue;
            };
            for (spine, edges) in spines {
                let merged = aggregate.entry(spine.clone()).or_default();
                merged.extend(edges.iter().filter(|e| seen.insert(e.id.clone())).cloned());
            }
        }
        by_pod.insert(AGGREGATE_POD.to_string(), aggregate);

        Self { by_pod }
    }

    pub fn pod(&self, pod: &str) -> Option<&SpineBridges> {
        self.by_pod.get(pod)
    }

    /// Bridge edges of one spine within one pod
    pub fn edges_for(&self, pod: &str, spine: &str) -> &[EdgeRecord] {
        self.by_pod
            .get(pod)
            .and_then(|spines| spines.get(spine))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Bridge edges touching a core device within one pod, across all spines
    pub fn edges_for_core(&self, pod: &str, core: &str) -> Vec<&EdgeRecord> {
        self.by_pod
            .get(pod)
            .into_iter()
            .flat_map(|spines| spines.values().flatten())
            .filter(|e| e.source == core)
            .collect()
    }

    pub fn edge_count(&self, pod: &str) -> usize {
        self.by_pod
            .get(pod)
            .map(|spines| spines.values().map(Vec::len).sum())
            .unwrap_or(0)
    }
}

/// Orient a raw link as (core side, spine side) if it joins a core and a spine
pub(super) fn core_spine<'a>(markers: &RoleMarkers, local: &'a PortKey, peer: &'a PortKey) -> Option<(&'a PortKey, &'a PortKey)> {
    let core_to_spine =
        markers.marks(&local.device, Role::Core) && markers.marks(&peer.device, Role::Spine);
    let spine_to_core =
        markers.marks(&local.device, Role::Spine) && markers.marks(&peer.device, Role::Core);
    if !core_to_spine && !spine_to_core {
        return None;
    }
    if markers.marks(&local.device, Role::Spine) {
        Some((peer, local))
    } else {
        Some((local, peer))
    }
}

fn pod_bridges(registry: &PortRegistry, markers: &RoleMarkers, pod: &str) -> SpineBridges {
    let mut seen = HashSet::new();
    let mut spines = SpineBridges::new();

    for (local, peer) in registry.iter() {
        if !local.device.contains(pod) && !peer.device.contains(pod) {
            continue;
        }
        let Some((core, spine)) = core_spine(markers, local, peer) else {
            continue;
        };
        if !seen.insert(PortEdge::canonical(core.clone(), spine.clone())) {
            continue;
        }
        spines
            .entry(spine.device.clone())
            .or_default()
            .push(EdgeRecord::new(core, spine));
    }

    spines
}
