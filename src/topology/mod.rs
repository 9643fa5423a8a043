pub mod bridge;
pub mod chains;
pub mod edges;
pub mod layout;
pub mod pods;
pub mod roles;

use std::collections::{BTreeMap, BTreeSet, HashSet};

use anyhow::Result;

use crate::config::{LayoutConfig, RoleMarkers};
use crate::models::{DeviceEdge, EdgeRecord, PortEdge, Role, AGGREGATE_POD};
use crate::registry::PortRegistry;

pub use bridge::BridgeIndex;
pub use chains::ChainTrace;
pub use layout::FabricLayout;
pub use pods::{PodPartition, PodPattern};

/// Role-tagged device lists, each sorted by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    pub core: Vec<String>,
    pub spine: Vec<String>,
    pub leaf: Vec<String>,
    pub unknown: Vec<String>,
}

impl Roster {
    fn collect<'a>(devices: impl Iterator<Item = &'a str>, markers: &RoleMarkers) -> Self {
        let unique: BTreeSet<&str> = devices.collect();
        let mut roster = Self::default();
        for device in unique {
            let list = match markers.classify(device) {
                Role::Core => &mut roster.core,
                Role::Spine => &mut roster.spine,
                Role::Leaf => &mut roster.leaf,
                Role::Unknown => &mut roster.unknown,
            };
            list.push(device.to_string());
        }
        roster
    }

    pub fn fabric_device_count(&self) -> usize {
        self.core.len() + self.spine.len() + self.leaf.len()
    }
}

/// The reconstructed fabric: every stage's output, built once per run
#[derive(Debug, Clone)]
pub struct Fabric {
    pub trace: ChainTrace,
    pub device_edges: Vec<DeviceEdge>,
    pub port_edges: Vec<PortEdge>,
    pub roster: Roster,
    pub partition: PodPartition,
    pub layout: FabricLayout,
    pub pod_edges: BTreeMap<String, Vec<EdgeRecord>>,
    pub bridges: BridgeIndex,
}

impl Fabric {
    pub fn build(registry: &PortRegistry, markers: &RoleMarkers, cfg: &LayoutConfig) -> Result<Self> {
        let trace = chains::trace_chains(registry, markers);
        let device_edges = edges::device_edges(&trace.chains);
        let port_edges = edges::leaf_spine_edges(registry, markers);

        // Chain participants plus leaf/spine and core/spine endpoints whose chain never closed
        let bridge_ends = registry
            .iter()
            .filter_map(|(local, peer)| bridge::core_spine(markers, local, peer))
            .flat_map(|(core, spine)| [core.device.as_str(), spine.device.as_str()]);
        let roster = Roster::collect(
            trace
                .participation
                .keys()
                .map(String::as_str)
                .chain(port_edges.iter().flat_map(|e| [e.source.device.as_str(), e.target.device.as_str()]))
                .chain(bridge_ends),
            markers,
        );
        if roster.fabric_device_count() == 0 {
            tracing::warn!("No device name carries a core, spine or leaf marker; topology will be empty");
        }

        let pattern = PodPattern::new()?;
        let partition = PodPartition::build(&pattern, &roster.spine, &roster.leaf);
        let layout = layout::layout(&partition, &roster.core, cfg);
        let pod_edges = pod_edges(&partition, &port_edges);
        let bridges = BridgeIndex::build(registry, markers, partition.real_pods());

        tracing::info!(
            "Fabric: {} core, {} spine, {} leaf, {} unknown; {} chains, {} device edges, {} port edges, {} bridge edges",
            roster.core.len(),
            roster.spine.len(),
            roster.leaf.len(),
            roster.unknown.len(),
            trace.chains.len(),
            device_edges.len(),
            port_edges.len(),
            bridges.edge_count(AGGREGATE_POD)
        );
        tracing::info!("Pods: {} (spacing {})", partition.pods().join(", "), layout.pod_spacing);

        Ok(Self {
            trace,
            device_edges,
            port_edges,
            roster,
            partition,
            layout,
            pod_edges,
            bridges,
        })
    }

    /// Primary edges of one pod (`ALL` included)
    pub fn edges_of(&self, pod: &str) -> &[EdgeRecord] {
        self.pod_edges.get(pod).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Log chains and participation counts at debug level
    pub fn log_chains(&self, limit: usize) {
        for line in self.trace.summary(limit) {
            tracing::debug!("{}", line);
        }
        for (device, count) in self.trace.busiest(limit) {
            tracing::debug!("{} appears in {} chains", device, count);
        }
    }

    /// Log every raw link and every derived edge touching `device`
    pub fn log_device_report(&self, registry: &PortRegistry, device: &str) {
        let inventory = registry.port_inventory();
        let Some(ports) = inventory.get(device) else {
            tracing::warn!("{} does not appear in the port CSV", device);
            return;
        };
        let pod = self.partition.pod_of(device);
        let position = pod
            .and_then(|pod| self.layout.pod(pod))
            .into_iter()
            .chain(self.layout.pod(AGGREGATE_POD))
            .flat_map(|view| view.nodes.iter())
            .chain(self.layout.core.iter())
            .find(|node| node.id == device)
            .map(|node| node.position);
        tracing::debug!(
            "{}: pod {}, {} ports, position {:?}",
            device,
            pod.unwrap_or("-"),
            ports.len(),
            position
        );

        let links: Vec<_> = registry.links_touching(device).collect();
        tracing::debug!("{}: {} registry links", device, links.len());
        for (local, peer) in links {
            tracing::debug!("  {} -> {}", local, peer);
        }

        let device_edges: Vec<&DeviceEdge> = self
            .device_edges
            .iter()
            .filter(|e| e.low == device || e.high == device)
            .collect();
        let port_edges: Vec<&PortEdge> = self.port_edges.iter().filter(|e| e.touches(device)).collect();
        tracing::debug!(
            "{}: {} device edges, {} port edges",
            device,
            device_edges.len(),
            port_edges.len()
        );
        for edge in device_edges {
            tracing::debug!("  {} -- {}", edge.low, edge.high);
        }
        for edge in port_edges {
            tracing::debug!("  {} -- {}", edge.source, edge.target);
        }

        let bridges: Vec<&EdgeRecord> = self
            .bridges
            .edges_for(AGGREGATE_POD, device)
            .iter()
            .chain(self.bridges.edges_for_core(AGGREGATE_POD, device))
            .collect();
        for edge in bridges {
            tracing::debug!("  bridge {}", edge.id);
        }
    }
}

/// Leaf/spine port edges whose both ends belong to the pod; `ALL` is their union
fn pod_edges(partition: &PodPartition, port_edges: &[PortEdge]) -> BTreeMap<String, Vec<EdgeRecord>> {
    let mut by_pod: BTreeMap<String, Vec<EdgeRecord>> = BTreeMap::new();
    let mut seen = HashSet::new();
    let mut aggregate = Vec::new();

    for pod in partition.real_pods() {
        let Some(members) = partition.members(pod) else {
            continue;
        };
        let records: Vec<EdgeRecord> = port_edges
            .iter()
            .filter(|e| members.contains(&e.source.device) && members.contains(&e.target.device))
            .map(PortEdge::to_record)
            .collect();
        aggregate.extend(records.iter().filter(|r| seen.insert(r.id.clone())).cloned());
        by_pod.insert(pod.clone(), records);
    }

    by_pod.insert(AGGREGATE_POD.to_string(), aggregate);
    by_pod
}
