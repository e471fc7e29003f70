//! Shared CLI helpers used across multiple commands.

use std::path::Path;

use anyhow::Context;
use cadenza_config::{FACTORY_PATCH_NAMES, Patch, factory_patch};

/// Load a patch by factory name or file path.
///
/// Factory patches win when a name matches; anything else is read as a
/// TOML file.
pub fn load_patch(name: &str) -> anyhow::Result<Patch> {
    if let Some(patch) = factory_patch(name) {
        return Ok(patch);
    }

    let path = Path::new(name);
    if path.exists() {
        return Patch::load(path).with_context(|| format!("failed to load patch '{name}'"));
    }

    anyhow::bail!(
        "patch '{}' not found (factory patches: {})",
        name,
        FACTORY_PATCH_NAMES.join(", ")
    )
}
