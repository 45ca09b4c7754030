use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use stmtx_export::{DEFAULT_PAGE_SIZE, Paginator};

use crate::state::ensure_stmtx_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub preview: PreviewSection,
    pub extract: ExtractSection,
    pub output: OutputSection,
    pub inbox: InboxSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSection {
    /// Rows per preview page
    pub page_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractSection {
    /// Command used for PDF text extraction (poppler's pdftotext)
    pub pdftotext_command: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Where CSV files go; next to the source document when unset
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InboxSection {
    /// Staging directory for shared statements; `~/.stmtx/inbox` when unset
    pub dir: Option<PathBuf>,
}

impl Default for PreviewSection {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Default for ExtractSection {
    fn default() -> Self {
        Self {
            pdftotext_command: "pdftotext".to_string(),
        }
    }
}

impl Config {
    pub fn paginator(&self) -> Result<Paginator> {
        Paginator::new(self.preview.page_size).context("preview.page_size in config.toml")
    }

    pub fn inbox_dir(&self) -> Result<PathBuf> {
        match &self.inbox.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(ensure_stmtx_home()?.join("inbox")),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_stmtx_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.preview.page_size, 20);
        assert_eq!(cfg.extract.pdftotext_command, "pdftotext");
        assert_eq!(cfg.output.dir, None);
    }

    #[test]
    fn test_partial_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[preview]\npage_size = 50\n\n[output]\ndir = \"/tmp/csv\"\n").unwrap();

        let cfg = load_config_from(&p).unwrap();
        assert_eq!(cfg.preview.page_size, 50);
        assert_eq!(cfg.output.dir, Some(PathBuf::from("/tmp/csv")));
        assert_eq!(cfg.extract.pdftotext_command, "pdftotext");
        assert_eq!(cfg.paginator().unwrap().page_size(), 50);
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let mut cfg = Config::default();
        cfg.preview.page_size = 0;
        assert!(cfg.paginator().is_err());
    }

    #[test]
    fn test_round_trips_through_toml() {
        let cfg = Config::default();
        let s = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(toml::from_str::<Config>(&s).unwrap(), cfg);
    }
}
