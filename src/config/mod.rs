use std::path::PathBuf;

use clap::Parser;

/// Command-line flags. Every flag falls back to a `CLOS_*` environment variable.
#[derive(Parser, Debug)]
#[command(name = "clos-topology")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build an interactive CLOS topology page from a port-adjacency CSV export")]
pub struct Args {
    /// Port CSV to read
    #[arg(long, env = "CLOS_CSV")]
    pub csv: Option<PathBuf>,

    /// Pattern used to pick the newest CSV when --csv is not given
    #[arg(long, env = "CLOS_CSV_GLOB", default_value = "Ports-*.csv")]
    pub csv_glob: String,

    /// Output HTML file
    #[arg(long, env = "CLOS_OUTPUT", default_value = "topology.html")]
    pub output: PathBuf,

    /// Vertical distance between the core, spine and leaf rows
    #[arg(long, env = "CLOS_LAYER_GAP", default_value_t = 900.0)]
    pub layer_gap: f64,

    /// Horizontal distance between core nodes
    #[arg(long, env = "CLOS_NODE_GAP", default_value_t = 200.0)]
    pub node_gap: f64,

    /// Horizontal distance between spine nodes of a pod
    #[arg(long, env = "CLOS_SPINE_GAP", default_value_t = 350.0)]
    pub spine_gap: f64,

    /// Horizontal distance between leaf nodes of a pod
    #[arg(long, env = "CLOS_LEAF_GAP", default_value_t = 350.0)]
    pub leaf_gap: f64,

    /// Maximum node label width in pixels
    #[arg(long, env = "CLOS_LABEL_WIDTH", default_value_t = 150)]
    pub label_width: u32,

    /// Fixed horizontal spacing between pods (computed from pod widths if omitted)
    #[arg(long, env = "CLOS_POD_SPACING")]
    pub pod_spacing: Option<f64>,

    /// Extra margin added to the widest pod when spacing is computed
    #[arg(long, env = "CLOS_POD_MARGIN", default_value_t = 200.0)]
    pub pod_margin: f64,

    /// Number of traced chains listed on the page
    #[arg(long, env = "CLOS_MAX_CHAINS", default_value_t = 15)]
    pub max_chains: usize,

    #[arg(long, env = "CLOS_CORE_MARKER", default_value = "IBCR")]
    pub core_marker: String,

    #[arg(long, env = "CLOS_SPINE_MARKER", default_value = "IBSP")]
    pub spine_marker: String,

    #[arg(long, env = "CLOS_LEAF_MARKER", default_value = "IBLF")]
    pub leaf_marker: String,

    /// Enable debug logging
    #[arg(long, env = "CLOS_DEBUG")]
    pub debug: bool,

    /// With --debug, dump every link and edge touching this device
    #[arg(long, env = "CLOS_DEBUG_TARGET_LEAF", default_value = "")]
    pub debug_target_leaf: String,
}

/// Substrings that identify a device's role inside its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMarkers {
    pub core: String,
    pub spine: String,
    pub leaf: String,
}

impl Default for RoleMarkers {
    fn default() -> Self {
        Self {
            core: "IBCR".to_string(),
            spine: "IBSP".to_string(),
            leaf: "IBLF".to_string(),
        }
    }
}

/// Geometry parameters for the layout engine
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub layer_gap: f64,
    pub core_gap: f64,
    pub spine_gap: f64,
    pub leaf_gap: f64,
    /// None means auto: widest pod container + `pod_margin`
    pub pod_spacing: Option<f64>,
    pub pod_margin: f64,
    pub min_container_width: f64,
    pub container_margin: f64,
    pub container_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layer_gap: 900.0,
            core_gap: 200.0,
            spine_gap: 350.0,
            leaf_gap: 350.0,
            pod_spacing: None,
            pod_margin: 200.0,
            min_container_width: 300.0,
            container_margin: 300.0,
            container_height: 350.0,
        }
    }
}

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub csv: Option<PathBuf>,
    pub csv_glob: String,
    pub output: PathBuf,
    pub label_width: u32,
    pub max_chains: usize,
    pub debug: bool,
    pub debug_target_leaf: Option<String>,
    pub markers: RoleMarkers,
    pub layout: LayoutConfig,
}

impl Config {
    /// Load configuration from `.env`, environment variables and flags
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Self {
        let debug_target_leaf = Some(args.debug_target_leaf.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            csv: args.csv,
            csv_glob: args.csv_glob,
            output: args.output,
            label_width: args.label_width,
            max_chains: args.max_chains,
            debug: args.debug,
            debug_target_leaf,
            markers: RoleMarkers {
                core: args.core_marker,
                spine: args.spine_marker,
                leaf: args.leaf_marker,
            },
            layout: LayoutConfig {
                layer_gap: args.layer_gap,
                core_gap: args.node_gap,
                spine_gap: args.spine_gap,
                leaf_gap: args.leaf_gap,
                pod_spacing: args.pod_spacing,
                pod_margin: args.pod_margin,
                ..LayoutConfig::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_layout_config() {
        let args = Args::try_parse_from(["clos-topology"]).unwrap();
        let cfg = Config::from_args(args);
        assert_eq!(cfg.layout, LayoutConfig::default());
        assert_eq!(cfg.markers, RoleMarkers::default());
        assert_eq!(cfg.csv_glob, "Ports-*.csv");
        assert_eq!(cfg.output, PathBuf::from("topology.html"));
        assert_eq!(cfg.max_chains, 15);
        assert!(cfg.debug_target_leaf.is_none());
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::try_parse_from([
            "clos-topology",
            "--csv",
            "ports.csv",
            "--pod-spacing",
            "1200",
            "--spine-gap",
            "100",
            "--leaf-marker",
            "LF",
            "--debug",
            "--debug-target-leaf",
            " POD1-IBLF-01 ",
        ])
        .unwrap();
        let cfg = Config::from_args(args);
        assert_eq!(cfg.csv, Some(PathBuf::from("ports.csv")));
        assert_eq!(cfg.layout.pod_spacing, Some(1200.0));
        assert_eq!(cfg.layout.spine_gap, 100.0);
        assert_eq!(cfg.markers.leaf, "LF");
        assert!(cfg.debug);
        assert_eq!(cfg.debug_target_leaf.as_deref(), Some("POD1-IBLF-01"));
    }
}
