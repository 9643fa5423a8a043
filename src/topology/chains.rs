//! Two-hop chain tracing over the port registry.

use std::collections::BTreeMap;

use crate::config::RoleMarkers;
use crate::models::{Chain, ChainHop, PortKey};
use crate::registry::PortRegistry;

/// Chains found in the registry plus how often each device took part in one
#[derive(Debug, Clone, Default)]
pub struct ChainTrace {
    pub chains: Vec<Chain>,
    pub participation: BTreeMap<String, usize>,
}

impl ChainTrace {
    /// The first `limit` chains as display lines, numbered from 1
    pub fn summary(&self, limit: usize) -> Vec<String> {
        self.chains
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, chain)| format!("Chain {}: {}", i + 1, chain.describe()))
            .collect()
    }

    /// Devices with the highest participation counts, ties broken by name
    pub fn busiest(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut counts: Vec<(&str, usize)> = self
            .participation
            .iter()
            .map(|(device, count)| (device.as_str(), *count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        counts.truncate(limit);
        counts
    }
}

/// For every link A:pa -> B:pb whose B:pb is itself mapped to C:pc, record
/// the chain A-B-C when any of the three devices has a fabric role.
pub fn trace_chains(registry: &PortRegistry, markers: &RoleMarkers) -> ChainTrace {
    let mut trace = ChainTrace::default();

    for (local, peer) in registry.iter() {
        let Some(next) = registry.get(peer) else {
            continue;
        };

        let touches_fabric = [local, peer, next]
            .iter()
            .any(|key| markers.is_fabric_device(&key.device));
        if !touches_fabric {
            continue;
        }

        let hop = |key: &PortKey| ChainHop {
            device: key.device.clone(),
            port: key.port.clone(),
            role: markers.classify(&key.device),
        };
        trace.chains.push(Chain {
            a: hop(local),
            b: hop(peer),
            c: hop(next),
        });

        for key in [local, peer, next] {
            *trace.participation.entry(key.device.clone()).or_default() += 1;
        }
    }

    trace
}
