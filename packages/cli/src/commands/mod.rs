pub mod init;
pub mod list;
pub mod preview;
pub mod render;
pub mod validate;

pub use init::{init, InitArgs};
pub use list::{list, ListArgs};
pub use preview::{preview, PreviewArgs};
pub use render::{render, RenderArgs};
pub use validate::{validate, ValidateArgs};

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use sitekit_model::{MemorySiteStore, Site};
use sitekit_renderer::{builtin_registry, ComponentRenderer};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Resolve a user-supplied path against the working directory
pub(crate) fn resolve_path(cwd: &str, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        PathBuf::from(cwd).join(path)
    }
}

pub(crate) fn load_site(path: &Path) -> Result<Site> {
    if !path.is_file() {
        return Err(anyhow!("Site file does not exist: {}", path.display()));
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Site::from_json(&content).with_context(|| format!("Invalid site file {}", path.display()))
}

/// Every `*.json` site in `dir`. Unreadable files are reported and skipped.
pub(crate) fn load_site_dir(dir: &Path) -> Result<MemorySiteStore> {
    let mut store = MemorySiteStore::new();
    if !dir.exists() {
        return Ok(store);
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    for path in paths {
        match load_site(&path).and_then(|site| store.insert(site).map_err(Into::into)) {
            Ok(()) => debug!(path = %path.display(), "Loaded site"),
            Err(err) => eprintln!("  {} {} - {}", "✗".red(), path.display(), err),
        }
    }
    Ok(store)
}

pub(crate) fn builtin_renderer() -> ComponentRenderer {
    ComponentRenderer::new(Arc::new(builtin_registry()))
}

pub(crate) fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
