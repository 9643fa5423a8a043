mod config;
mod models;
mod registry;
mod render;
mod topology;
mod utils;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use registry::PortRegistry;
use topology::Fabric;

fn main() -> Result<()> {
    let cfg = Config::load();

    // Initialize tracing
    let default_filter = if cfg.debug {
        "clos_topology=debug"
    } else {
        "clos_topology=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    run(&cfg)
}

fn run(cfg: &Config) -> Result<()> {
    let csv_path = utils::resolve_csv(cfg.csv.as_deref(), &cfg.csv_glob)?;
    tracing::info!("Using CSV: {}", csv_path.display());

    let registry = PortRegistry::from_path(&csv_path)?;
    tracing::info!("Port registry: {} links", registry.len());
    if registry.is_empty() {
        tracing::warn!("{} holds no port rows", csv_path.display());
    }

    let fabric = Fabric::build(&registry, &cfg.markers, &cfg.layout)?;
    fabric.log_chains(cfg.max_chains);
    if cfg.debug {
        if let Some(device) = &cfg.debug_target_leaf {
            fabric.log_device_report(&registry, device);
        }
    }

    let html = render::render_html(&fabric, cfg)?;
    std::fs::write(&cfg.output, html)
        .with_context(|| format!("Failed to write {}", cfg.output.display()))?;
    tracing::info!("Wrote {}", cfg.output.display());

    Ok(())
}
