use serde::Serialize;

use super::Role;

/// One side of a physical link: a device name and one of its ports
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PortKey {
    pub device: String,
    pub port: String,
}

impl PortKey {
    pub fn new(device: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            port: port.into(),
        }
    }
}

impl std::fmt::Display for PortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.device, self.port)
    }
}

/// A device participating in a traced chain, with its role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainHop {
    pub device: String,
    pub port: String,
    pub role: Role,
}

/// Three devices A-B-C reached by following two consecutive port hops
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub a: ChainHop,
    pub b: ChainHop,
    pub c: ChainHop,
}

impl Chain {
    /// Human-readable one-liner used in diagnostics
    pub fn describe(&self) -> String {
        format!(
            "{}({}) → {}({}) → {}({})",
            self.a.device, self.a.role, self.b.device, self.b.role, self.c.device, self.c.role
        )
    }
}

/// Undirected device-granularity edge. Endpoints are stored sorted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceEdge {
    pub low: String,
    pub high: String,
}

impl DeviceEdge {
    pub fn canonical(x: &str, y: &str) -> Self {
        if x <= y {
            Self { low: x.to_string(), high: y.to_string() }
        } else {
            Self { low: y.to_string(), high: x.to_string() }
        }
    }
}

/// Undirected port-granularity edge. `source` is always the smaller port key,
/// so both recordings of one cable produce the same value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PortEdge {
    pub source: PortKey,
    pub target: PortKey,
}

impl PortEdge {
    pub fn canonical(x: PortKey, y: PortKey) -> Self {
        if x <= y {
            Self { source: x, target: y }
        } else {
            Self { source: y, target: x }
        }
    }

    pub fn touches(&self, device: &str) -> bool {
        self.source.device == device || self.target.device == device
    }

    pub fn to_record(&self) -> EdgeRecord {
        EdgeRecord::new(&self.source, &self.target)
    }
}

/// Edge shape handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_ports: Vec<String>,
    pub target_ports: Vec<String>,
}

impl EdgeRecord {
    pub fn new(source: &PortKey, target: &PortKey) -> Self {
        Self {
            id: format!("{}->{}", source, target),
            source: source.device.clone(),
            target: target.device.clone(),
            source_ports: vec![source.port.clone()],
            target_ports: vec![target.port.clone()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_edge_is_order_independent() {
        assert_eq!(
            DeviceEdge::canonical("IBSP1", "IBLF1"),
            DeviceEdge::canonical("IBLF1", "IBSP1")
        );
    }

    #[test]
    fn test_port_edge_is_order_independent() {
        let a = PortKey::new("IBLF1", "p1");
        let b = PortKey::new("IBSP1", "p2");
        let forward = PortEdge::canonical(a.clone(), b.clone());
        let reverse = PortEdge::canonical(b, a);
        assert_eq!(forward, reverse);
        assert_eq!(forward.source.device, "IBLF1");
    }

    #[test]
    fn test_edge_record_id_format() {
        let record = EdgeRecord::new(&PortKey::new("IBCR1", "p4"), &PortKey::new("IBSP1", "p3"));
        assert_eq!(record.id, "IBCR1:p4->IBSP1:p3");
        assert_eq!(record.source_ports, vec!["p4"]);
        assert_eq!(record.target_ports, vec!["p3"]);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["sourcePorts"][0], "p4");
        assert_eq!(json["targetPorts"][0], "p3");
    }
}
