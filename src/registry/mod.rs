use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::PortKey;

pub const COL_SYSTEM: &str = "System";
pub const COL_PORT: &str = "Port";
pub const COL_PEER_NODE: &str = "Peer Node";
pub const COL_PEER_PORT: &str = "Peer Port";

const REQUIRED_COLUMNS: [&str; 4] = [COL_SYSTEM, COL_PORT, COL_PEER_NODE, COL_PEER_PORT];

/// Errors raised while building the registry. Any of them aborts the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The header row lacks a required column
    MissingColumn { column: String },
    /// A row has a missing or blank required field
    MalformedRecord {
        line: u64,
        field: String,
        record: Vec<String>,
    },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingColumn { column } => {
                write!(f, "missing required column '{}'", column)
            }
            Self::MalformedRecord { line, field, record } => write!(
                f,
                "malformed record at line {}: field '{}' is empty or missing (row: {:?})",
                line, field, record
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Canonical (device, port) -> (peer device, peer port) mapping.
///
/// Built once and read-only afterwards. Backed by a `BTreeMap` so every
/// traversal visits links in sorted port-key order regardless of the order
/// rows appeared in the source file.
#[derive(Debug, Clone, Default)]
pub struct PortRegistry {
    links: BTreeMap<PortKey, PortKey>,
}

impl PortRegistry {
    /// Read a port CSV from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("Failed to load port registry from {}", path.display()))
    }

    /// Read a port CSV from any reader. The first header may carry a BOM.
    pub fn from_reader<R: Read>(input: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let headers: Vec<String> = reader
            .headers()
            .context("Failed to read CSV header row")?
            .iter()
            .enumerate()
            .map(|(idx, h)| {
                let h = if idx == 0 { h.trim_start_matches('\u{feff}') } else { h };
                h.to_string()
            })
            .collect();

        let mut columns = [0usize; 4];
        for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| RegistryError::MissingColumn { column: name.to_string() })?;
        }

        let mut registry = Self::default();
        for (idx, result) in reader.records().enumerate() {
            let row = result.with_context(|| format!("Failed to read row {}", idx + 1))?;
            let line = row.position().map(|p| p.line()).unwrap_or(idx as u64 + 2);

            let mut fields: [&str; 4] = [""; 4];
            for (i, col) in columns.iter().enumerate() {
                let value = row.get(*col).map(str::trim).unwrap_or("");
                if value.is_empty() {
                    return Err(RegistryError::MalformedRecord {
                        line,
                        field: REQUIRED_COLUMNS[i].to_string(),
                        record: row.iter().map(|s| s.to_string()).collect(),
                    }
                    .into());
                }
                fields[i] = value;
            }

            let [system, port, peer, peer_port] = fields;
            registry.insert(PortKey::new(system, port), PortKey::new(peer, peer_port));
        }

        Ok(registry)
    }

    /// Build from already-split links; later duplicates overwrite earlier ones
    pub fn from_links<I>(links: I) -> Self
    where
        I: IntoIterator<Item = (PortKey, PortKey)>,
    {
        let mut registry = Self::default();
        for (local, peer) in links {
            registry.insert(local, peer);
        }
        registry
    }

    fn insert(&mut self, local: PortKey, peer: PortKey) {
        if let Some(previous) = self.links.get(&local) {
            if previous != &peer {
                tracing::debug!("{} remapped from {} to {} (last row wins)", local, previous, peer);
            }
        }
        self.links.insert(local, peer);
    }

    pub fn get(&self, key: &PortKey) -> Option<&PortKey> {
        self.links.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PortKey, &PortKey)> {
        self.links.iter()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Every port seen on each device, on either side of a link
    pub fn port_inventory(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut inventory: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (local, peer) in &self.links {
            inventory
                .entry(local.device.clone())
                .or_default()
                .insert(local.port.clone());
            inventory
                .entry(peer.device.clone())
                .or_default()
                .insert(peer.port.clone());
        }
        inventory
    }

    /// Raw links where `device` is on either side
    pub fn links_touching<'a>(&'a self, device: &'a str) -> impl Iterator<Item = (&'a PortKey, &'a PortKey)> + 'a {
        self.links
            .iter()
            .filter(move |(local, peer)| local.device == device || peer.device == device)
    }
}
