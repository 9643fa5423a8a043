//! Coordinates for core, spine and leaf rows.
//!
//! Two passes: every pod is laid out around its own horizontal offset, then
//! the core row is centered over the full span of spine/leaf nodes.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::config::LayoutConfig;
use crate::models::{LayoutNode, PodContainer, PodView, Position, Role, AGGREGATE_POD};

use super::pods::{PodMembers, PodPartition};

/// Positioned core row plus one view per pod (`ALL` included)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FabricLayout {
    pub core: Vec<LayoutNode>,
    pub pods: BTreeMap<String, PodView>,
    pub pod_spacing: f64,
}

impl FabricLayout {
    pub fn pod(&self, pod: &str) -> Option<&PodView> {
        self.pods.get(pod)
    }
}

/// Positions of `count` nodes evenly spaced by `gap` and centered at `center`
pub fn row(count: usize, gap: f64, center: f64) -> Vec<f64> {
    let mid = (count as f64 - 1.0) / 2.0;
    (0..count).map(|j| center + (j as f64 - mid) * gap).collect()
}

fn span(count: usize, gap: f64) -> f64 {
    if count == 0 {
        0.0
    } else {
        (count - 1) as f64 * gap
    }
}

/// Width of the box drawn around a pod
pub fn container_width(members: &PodMembers, cfg: &LayoutConfig) -> f64 {
    let spine_span = span(members.spines.len(), cfg.spine_gap);
    let leaf_span = span(members.leaves.len(), cfg.leaf_gap);
    spine_span.max(leaf_span).max(cfg.min_container_width) + cfg.container_margin
}

/// Distance between neighbouring pod centers
pub fn pod_spacing(widths: &[f64], cfg: &LayoutConfig) -> f64 {
    match cfg.pod_spacing {
        Some(fixed) => fixed,
        None => widths.iter().copied().fold(0.0, f64::max) + cfg.pod_margin,
    }
}

fn pod_view(pod: &str, members: &PodMembers, offset_x: f64, cfg: &LayoutConfig) -> PodView {
    let container = PodContainer {
        id: pod.to_string(),
        label: pod.to_string(),
        position: Position::new(offset_x, cfg.layer_gap * 1.5),
        width: container_width(members, cfg),
        height: cfg.container_height,
    };

    let place = |devices: &[String], role: Role, gap: f64, y: f64| -> Vec<LayoutNode> {
        devices
            .iter()
            .zip(row(devices.len(), gap, offset_x))
            .map(|(device, x)| LayoutNode {
                id: device.clone(),
                label: device.clone(),
                role,
                pod: Some(pod.to_string()),
                position: Position::new(x, y),
            })
            .collect()
    };

    let mut nodes = place(&members.spines, Role::Spine, cfg.spine_gap, cfg.layer_gap);
    nodes.extend(place(&members.leaves, Role::Leaf, cfg.leaf_gap, cfg.layer_gap * 2.0));

    PodView {
        containers: vec![container],
        nodes,
    }
}

/// Midpoint of the horizontal span of every spine/leaf node, 0 when there are none
fn fabric_midpoint<'a>(views: impl Iterator<Item = &'a PodView>) -> f64 {
    let xs: Vec<f64> = views
        .flat_map(|v| v.nodes.iter())
        .filter(|n| matches!(n.role, Role::Spine | Role::Leaf))
        .map(|n| n.position.x)
        .collect();
    if xs.is_empty() {
        return 0.0;
    }
    let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (min + max) / 2.0
}

/// Lay out every pod, build the `ALL` view, then center the core row.
pub fn layout(partition: &PodPartition, cores: &[String], cfg: &LayoutConfig) -> FabricLayout {
    let real_pods = partition.real_pods();
    let empty = PodMembers::default();
    let members_of = |pod: &str| partition.members(pod).unwrap_or(&empty);

    let widths: Vec<f64> = real_pods
        .iter()
        .map(|pod| container_width(members_of(pod), cfg))
        .collect();
    let spacing = pod_spacing(&widths, cfg);

    let offsets = row(real_pods.len(), spacing, 0.0);
    let mut pods: BTreeMap<String, PodView> = real_pods
        .iter()
        .zip(offsets)
        .map(|(pod, offset_x)| (pod.clone(), pod_view(pod, members_of(pod), offset_x, cfg)))
        .collect();

    let mid_x = fabric_midpoint(pods.values());
    tracing::debug!("Pod spacing {}, fabric midpoint {}", spacing, mid_x);

    let core = cores
        .iter()
        .zip(row(cores.len(), cfg.core_gap, mid_x))
        .map(|(device, x)| LayoutNode {
            id: device.clone(),
            label: device.clone(),
            role: Role::Core,
            pod: None,
            position: Position::new(x, 0.0),
        })
        .collect();

    let aggregate = aggregate_view(real_pods.iter().filter_map(|p| pods.get(p)));
    pods.insert(AGGREGATE_POD.to_string(), aggregate);

    FabricLayout {
        core,
        pods,
        pod_spacing: spacing,
    }
}

/// Union of pod views in pod order. A device listed under two pods keeps the
/// position from the first.
fn aggregate_view<'a>(views: impl Iterator<Item = &'a PodView>) -> PodView {
    let mut seen = HashSet::new();
    let mut all = PodView::default();
    for view in views {
        all.containers.extend(view.containers.iter().cloned());
        for node in &view.nodes {
            if seen.insert(node.id.clone()) {
                all.nodes.push(node.clone());
            }
        }
    }
    all
}
