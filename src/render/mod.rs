//! Standalone HTML page for the reconstructed fabric.
//!
//! Graph data is embedded as JSON in `<script type="application/json">`
//! elements shaped as cytoscape elements; the page script only reads them.

use std::collections::BTreeMap;

use anyhow::{Context as _, Result};
use serde::Serialize;
use serde_json::{json, Value};
use tera::{Context, Tera};

use crate::config::Config;
use crate::models::{EdgeRecord, LayoutNode, PodContainer};
use crate::topology::Fabric;
use crate::utils::safe_json_for_html;

const TOPOLOGY_TEMPLATE: &str = include_str!("../../templates/topology.html");

/// Container fill colours, assigned by position in the pod list (ALL first)
pub const POD_COLORS: [&str; 7] = [
    "#f1c40f33",
    "#a2d5f2cc",
    "#b8e994cc",
    "#f7cac9cc",
    "#f9e79fcc",
    "#d2b4fccc",
    "#f5cba7cc",
];

pub fn pod_color(index: usize) -> &'static str {
    POD_COLORS[index % POD_COLORS.len()]
}

fn device_element(node: &LayoutNode) -> Value {
    let mut data = json!({
        "id": node.id,
        "label": node.label,
        "layer": node.role,
    });
    if let Some(pod) = &node.pod {
        data["parent"] = json!(pod);
    }
    json!({ "data": data, "position": node.position })
}

fn container_element(container: &PodContainer, color: &str) -> Value {
    json!({
        "data": {
            "id": container.id,
            "label": container.label,
            "kind": "pod",
            "color": color,
            "width": container.width,
            "height": container.height,
        },
        "position": container.position,
        "grabbable": false,
        "selectable": false,
    })
}

fn edge_element(record: &EdgeRecord) -> Value {
    json!({ "data": record })
}

/// pod -> containers followed by spine/leaf nodes
fn pod_node_elements(fabric: &Fabric) -> BTreeMap<&str, Vec<Value>> {
    let colors: BTreeMap<&str, &str> = fabric
        .partition
        .pods()
        .iter()
        .enumerate()
        .map(|(i, pod)| (pod.as_str(), pod_color(i)))
        .collect();

    fabric
        .layout
        .pods
        .iter()
        .map(|(pod, view)| {
            let containers = view.containers.iter().map(|c| {
                let color = colors.get(c.id.as_str()).copied().unwrap_or(POD_COLORS[0]);
                container_element(c, color)
            });
            let nodes = view.nodes.iter().map(device_element);
            (pod.as_str(), containers.chain(nodes).collect())
        })
        .collect()
}

fn pod_edge_elements(fabric: &Fabric) -> BTreeMap<&str, Vec<Value>> {
    fabric
        .pod_edges
        .iter()
        .map(|(pod, edges)| (pod.as_str(), edges.iter().map(edge_element).collect()))
        .collect()
}

fn bridge_elements(fabric: &Fabric) -> BTreeMap<&str, BTreeMap<&str, Vec<Value>>> {
    fabric
        .partition
        .pods()
        .iter()
        .map(|pod| {
            let spines = fabric
                .bridges
                .pod(pod)
                .map(|spines| {
                    spines
                        .iter()
                        .map(|(spine, edges)| (spine.as_str(), edges.iter().map(edge_element).collect()))
                        .collect()
                })
                .unwrap_or_default();
            (pod.as_str(), spines)
        })
        .collect()
}

fn script_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value).context("Failed to serialize topology data")?;
    Ok(safe_json_for_html(&json))
}

/// Render the interactive topology page
pub fn render_html(fabric: &Fabric, cfg: &Config) -> Result<String> {
    let core: Vec<Value> = fabric.layout.core.iter().map(device_element).collect();

    let mut context = Context::new();
    context.insert("core_count", &fabric.roster.core.len());
    context.insert("spine_count", &fabric.roster.spine.len());
    context.insert("leaf_count", &fabric.roster.leaf.len());
    context.insert("device_edge_count", &fabric.device_edges.len());
    context.insert("port_edge_count", &fabric.port_edges.len());
    context.insert("core_marker", &cfg.markers.core);
    context.insert("spine_marker", &cfg.markers.spine);
    context.insert("leaf_marker", &cfg.markers.leaf);
    context.insert("pods", fabric.partition.pods());
    context.insert("chains", &fabric.trace.summary(cfg.max_chains));
    context.insert("generated_at", &chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string());

    context.insert("core_nodes_json", &script_json(&core)?);
    context.insert("pod_nodes_json", &script_json(&pod_node_elements(fabric))?);
    context.insert("pod_edges_json", &script_json(&pod_edge_elements(fabric))?);
    context.insert("pod_list_json", &script_json(&fabric.partition.pods())?);
    context.insert("bridge_edges_json", &script_json(&bridge_elements(fabric))?);
    context.insert("settings_json", &script_json(&json!({ "labelWidth": cfg.label_width }))?);

    let mut tera = Tera::default();
    tera.add_raw_template("topology", TOPOLOGY_TEMPLATE)
        .map_err(|e| anyhow::anyhow!("Invalid topology template: {}", e))?;
    tera.render("topology", &context)
        .map_err(|e| anyhow::anyhow!("Template rendering failed: {}", e))
}
