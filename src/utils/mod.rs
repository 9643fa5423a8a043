use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};

/// Pick the most recently modified file matching a glob pattern.
/// Returns None when nothing matches.
pub fn pick_latest_csv(pattern: &str) -> Result<Option<PathBuf>> {
    let mut newest: Option<(SystemTime, PathBuf)> = None;

    for entry in glob::glob(pattern).with_context(|| format!("Invalid CSV glob: {}", pattern))? {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Skipping unreadable CSV candidate: {}", e);
                continue;
            }
        };
        let modified = modified_time(&path)?;
        if newest.as_ref().map_or(true, |(t, _)| modified >= *t) {
            newest = Some((modified, path));
        }
    }

    Ok(newest.map(|(_, path)| path))
}

fn modified_time(path: &Path) -> Result<SystemTime> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .with_context(|| format!("Failed to stat {}", path.display()))
}

/// Resolve the input CSV: an explicit path wins, otherwise the newest glob match
pub fn resolve_csv(explicit: Option<&Path>, pattern: &str) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    pick_latest_csv(pattern)?
        .ok_or_else(|| anyhow::anyhow!("No CSV file matches '{}'; pass --csv explicitly", pattern))
}

/// Make JSON safe to embed inside a `<script>` element
pub fn safe_json_for_html(json: &str) -> String {
    json.replace("</script>", "<\\/script>")
}
