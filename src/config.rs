use crate::cli::TallyCli;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Values read from a `--config` TOML file
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub bits: Option<usize>,
    pub rounds: Option<usize>,
    pub candidates: Option<usize>,
}

pub fn load(path: &Path) -> Result<FileConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Parse config {}", path.display()))
}

/// Session parameters, anything still `None` is prompted for
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Settings {
    pub bits: Option<usize>,
    pub rounds: Option<usize>,
    pub candidates: Option<usize>,
}

impl Settings {
    /// Command line flags win over the file
    pub fn merge(cli: &TallyCli, file: FileConfig) -> Self {
        Self {
            bits: cli.bits.or(file.bits),
            rounds: cli.rounds.or(file.rounds),
            candidates: cli.candidates.or(file.candidates),
        }
    }
}
