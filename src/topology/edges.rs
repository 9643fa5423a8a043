//! Edge deduplication. A cable recorded from both ends becomes one edge.

use std::collections::HashSet;

use crate::config::RoleMarkers;
use crate::models::{Chain, DeviceEdge, PortEdge, PortKey, Role};
use crate::registry::PortRegistry;

/// Device-granularity edges from the consecutive pairs (A,B) and (B,C) of
/// every chain, in first-seen order.
pub fn device_edges(chains: &[Chain]) -> Vec<DeviceEdge> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();

    for chain in chains {
        for (x, y) in [(&chain.a, &chain.b), (&chain.b, &chain.c)] {
            let edge = DeviceEdge::canonical(&x.device, &y.device);
            if seen.insert(edge.clone()) {
                edges.push(edge);
            }
        }
    }

    edges
}

/// Port-granularity edges for every registry link between a leaf-marked and
/// a spine-marked device, in first-seen order.
pub fn leaf_spine_edges(registry: &PortRegistry, markers: &RoleMarkers) -> Vec<PortEdge> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();

    for (local, peer) in registry.iter() {
        if !is_leaf_spine(markers, local, peer) {
            continue;
        }
        let edge = PortEdge::canonical(local.clone(), peer.clone());
        if seen.insert(edge.clone()) {
            edges.push(edge);
        }
    }

    edges
}

fn is_leaf_spine(markers: &RoleMarkers, local: &PortKey, peer: &PortKey) -> bool {
    (markers.marks(&local.device, Role::Leaf) && markers.marks(&peer.device, Role::Spine))
        || (markers.marks(&local.device, Role::Spine) && markers.marks(&peer.device, Role::Leaf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::chains::trace_chains;
    use proptest::prelude::*;

    fn link(a: &str, pa: &str, b: &str, pb: &str) -> (PortKey, PortKey) {
        (PortKey::new(a, pa), PortKey::new(b, pb))
    }

    fn sample_links() -> Vec<(PortKey, PortKey)> {
        vec![
            link("IBLF1", "p1", "IBSP1", "p2"),
            link("IBSP1", "p2", "IBLF1", "p1"),
            link("IBLF1", "p5", "IBSP1", "p6"),
            link("IBSP1", "p6", "IBLF1", "p5"),
            link("IBSP1", "p3", "IBCR1", "p4"),
            link("IBCR1", "p4", "IBSP1", "p3"),
        ]
    }

    #[test]
    fn test_bidirectional_leaf_spine_link_is_one_edge() {
        let registry = PortRegistry::from_links(sample_links().into_iter().take(2));
        let edges = leaf_spine_edges(&registry, &RoleMarkers::default());
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, PortKey::new("IBLF1", "p1"));
        assert_eq!(edges[0].target, PortKey::new("IBSP1", "p2"));
    }

    #[test]
    fn test_parallel_cables_stay_distinct() {
        let registry = PortRegistry::from_links(sample_links());
        let edges = leaf_spine_edges(&registry, &RoleMarkers::default());
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.touches("IBLF1") && e.touches("IBSP1")));
    }

    #[test]
    fn test_core_spine_links_are_not_leaf_spine_edges() {
        let registry = PortRegistry::from_links(sample_links().into_iter().skip(4));
        assert!(leaf_spine_edges(&registry, &RoleMarkers::default()).is_empty());
    }

    #[test]
    fn test_one_sided_recording_still_yields_edge() {
        let registry = PortRegistry::from_links([link("IBSP1", "p2", "IBLF1", "p1")]);
        let edges = leaf_spine_edges(&registry, &RoleMarkers::default());
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source.device, "IBLF1");
    }

    #[test]
    fn test_device_edges_cover_every_chain() {
        let registry = PortRegistry::from_links(sample_links());
        let trace = trace_chains(&registry, &RoleMarkers::default());
        let edges = device_edges(&trace.chains);

        assert!(edges.contains(&DeviceEdge::canonical("IBLF1", "IBSP1")));
        assert!(edges.contains(&DeviceEdge::canonical("IBCR1", "IBSP1")));
        assert_eq!(edges.len(), 2);
    }

    fn fabric_link() -> impl Strategy<Value = (PortKey, PortKey)> {
        let leaf = (1u8..4).prop_map(|n| format!("POD1-IBLF-{:02}", n));
        let spine = (1u8..3).prop_map(|n| format!("POD1-IBSP-{:02}", n));
        let core = (1u8..3).prop_map(|n| format!("IBCR-{:02}", n));
        let device = prop_oneof![leaf, spine.clone(), core];
        (device, 1u8..5, spine, 1u8..5).prop_map(|(a, pa, b, pb)| {
            (PortKey::new(a, format!("p{}", pa)), PortKey::new(b, format!("p{}", pb)))
        })
    }

    /// How a cable appears in the export: `flipped` records B->A instead of
    /// A->B, `both_ends` adds the opposite row as well
    fn recording() -> impl Strategy<Value = (bool, bool)> {
        (any::<bool>(), any::<bool>())
    }

    type Cable = ((PortKey, PortKey), (bool, bool));

    /// Drop generated cables that reuse a port, so every port has one cable
    fn one_cable_per_port(cables: Vec<Cable>) -> Vec<Cable> {
        let mut used = HashSet::new();
        cables
            .into_iter()
            .filter(|((a, b), _)| {
                if a == b || used.contains(a) || used.contains(b) {
                    return false;
                }
                used.insert(a.clone());
                used.insert(b.clone());
                true
            })
            .collect()
    }

    /// Registry rows for `cables`; `flip_all` swaps the direction of every cable
    fn record(cables: &[Cable], flip_all: bool) -> PortRegistry {
        PortRegistry::from_links(cables.iter().flat_map(|((a, b), (flipped, both_ends))| {
            let (a, b) = if *flipped != flip_all { (b, a) } else { (a, b) };
            let mut rows = vec![(a.clone(), b.clone())];
            if *both_ends {
                rows.push((b.clone(), a.clone()));
            }
            rows
        }))
    }

    proptest! {
        #[test]
        fn dedup_ignores_recording_direction(
            cables in prop::collection::vec((fabric_link(), recording()), 1..12)
        ) {
            let markers = RoleMarkers::default();
            let cables = one_cable_per_port(cables);

            let forward = record(&cables, false);
            let flipped = record(&cables, true);

            let fwd_ports: HashSet<PortEdge> = leaf_spine_edges(&forward, &markers).into_iter().collect();
            let flip_ports: HashSet<PortEdge> = leaf_spine_edges(&flipped, &markers).into_iter().collect();
            let leaf_cables = cables
                .iter()
                .filter(|((a, _), _)| markers.marks(&a.device, Role::Leaf))
                .count();
            prop_assert_eq!(fwd_ports.len(), leaf_cables);
            prop_assert_eq!(fwd_ports, flip_ports);

            let fwd_devices: HashSet<DeviceEdge> =
                device_edges(&trace_chains(&forward, &markers).chains).into_iter().collect();
            let flip_devices: HashSet<DeviceEdge> =
                device_edges(&trace_chains(&flipped, &markers).chains).into_iter().collect();
            prop_assert_eq!(fwd_devices, flip_devices);
        }

        #[test]
        fn no_duplicate_canonical_keys(
            cables in prop::collection::vec((fabric_link(), recording()), 1..12)
        ) {
            let markers = RoleMarkers::default();
            let registry = record(&one_cable_per_port(cables), false);

            let ports = leaf_spine_edges(&registry, &markers);
            let unique: HashSet<&PortEdge> = ports.iter().collect();
            prop_assert_eq!(unique.len(), ports.len());

            let devices = device_edges(&trace_chains(&registry, &markers).chains);
            let unique: HashSet<&DeviceEdge> = devices.iter().collect();
            prop_assert_eq!(unique.len(), devices.len());
        }
    }

    #[test]
    fn test_flipped_one_sided_cable_matches_original() {
        let markers = RoleMarkers::default();
        let a_to_b = PortRegistry::from_links([link("IBLF1", "p1", "IBSP1", "p2")]);
        let b_to_a = PortRegistry::from_links([link("IBSP1", "p2", "IBLF1", "p1")]);
        assert_eq!(leaf_spine_edges(&a_to_b, &markers), leaf_spine_edges(&b_to_a, &markers));
    }
}
