use std::path::Path;

use anyhow::Context;
use token_chess::GameSetup;
use tracing::info;

/// Reads a [`GameSetup`] from a JSON file.
pub fn load_setup(path: &Path) -> anyhow::Result<GameSetup> {
    if !path.is_file() {
        anyhow::bail!("Setup file '{}' does not exist", path.display());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read setup file '{}'", path.display()))?;
    let setup: GameSetup = serde_json::from_str(&contents)
        .with_context(|| format!("Could not parse setup file '{}'", path.display()))?;
    info!(
        white = setup.white.len(),
        black = setup.black.len(),
        neutral = setup.neutral.len(),
        custom_position = setup.fen.is_some(),
        "Loaded setup"
    );
    Ok(setup)
}
