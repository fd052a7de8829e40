use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use volley::{EngineConfig, Player};

/// A lineup as stored on disk.
///
/// Either a bare array of players, or an object with an optional name.
#[derive(Deserialize)]
#[serde(untagged)]
enum LineupFileContents {
    Players(Vec<Player>),
    Named {
        #[serde(default)]
        name: Option<String>,
        players: Vec<Player>,
    },
}

#[derive(Debug)]
pub struct LineupFile {
    pub name: String,
    pub players: Vec<Player>,
}

impl LineupFile {
    /// Loads a lineup. Unnamed lineups are named after their file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Could not open lineup file '{}'", path.display()))?;
        let contents: LineupFileContents = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Could not parse lineup file '{}'", path.display()))?;
        let (name, players) = match contents {
            LineupFileContents::Players(players) => (None, players),
            LineupFileContents::Named { name, players } => (name, players),
        };
        if players.is_empty() {
            anyhow::bail!("Lineup file '{}' contains no players", path.display());
        }
        let name = name.unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        });
        Ok(Self { name, players })
    }
}

/// Reads the engine configuration, or returns the defaults without a path.
pub fn load_engine_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let file = File::open(path)
        .with_context(|| format!("Could not open config file '{}'", path.display()))?;
    let config = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Could not parse config file '{}'", path.display()))?;
    Ok(config)
}

/// One of the lineups shipped in `lineups/`.
#[cfg(test)]
pub(crate) fn sample_lineup(file_name: &str) -> anyhow::Result<LineupFile> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("lineups");
    LineupFile::load(&dir.join(file_name))
}
