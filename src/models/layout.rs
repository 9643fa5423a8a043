use serde::Serialize;

use super::Role;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A positioned device. `pod` is None for core devices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    pub id: String,
    pub label: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod: Option<String>,
    pub position: Position,
}

/// Pod container pseudo-node drawn behind a pod's devices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PodContainer {
    pub id: String,
    pub label: String,
    pub position: Position,
    pub width: f64,
    pub height: f64,
}

/// Everything drawn for one pod
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct PodView {
    pub containers: Vec<PodContainer>,
    pub nodes: Vec<LayoutNode>,
}
