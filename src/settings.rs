use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::parser::ParseOptions;

const CONFIG_FILE: &str = "planning_update";
const ENV_PREFIX: &str = "PDU";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub db_path: PathBuf,
    pub trailing_pages: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            db_path: PathBuf::from("data/planning.sqlite"),
            trailing_pages: ParseOptions::default().trailing_pages,
        }
    }
}

impl Settings {
    /// `planning_update.toml` in the working directory if present, then
    /// `PDU_*` environment variables.
    pub fn load() -> Result<Self> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .and_then(Config::try_deserialize)
            .context("invalid planning_update settings")
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            trailing_pages: self.trailing_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.db_path, PathBuf::from("data/planning.sqlite"));
        assert_eq!(s.parse_options().trailing_pages, 1);
    }

    #[test]
    fn partial_source_keeps_defaults() {
        let s: Settings = Config::builder()
            .set_override("trailing_pages", 0)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(s.trailing_pages, 0);
        assert_eq!(s.db_path, PathBuf::from("data/planning.sqlite"));
    }
}
