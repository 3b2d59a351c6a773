//! Configuration file handling.
//!
//! The configuration decides which sources run and which dependencies are
//! left out of their results. Sources only see it through the
//! [`Configuration`] trait, which answers ignore queries.
//!
//! # Configuration Location
//!
//! By default the file is read from:
//! - Linux: `~/.config/licensed/config.toml`
//! - macOS: `~/Library/Application Support/licensed/config.toml`
//! - Windows: `%APPDATA%\licensed\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! [sources]
//! manifest = true
//!
//! [ignored]
//! bundler = ["rake"]
//! npm = ["@types/*"]
//!
//! [[manifest.dependencies]]
//! name = "left-pad"
//! version = "1.3.0"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// The fields an ignore rule is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IgnoreCriteria<'a> {
    /// Short source type, e.g. `"yarn"` for both `yarn/v1` and `yarn/berry`.
    pub source_type: &'a str,
    pub name: &'a str,
}

/// Answers whether a dependency should be left out of a source's results.
///
/// Implementations must behave as a pure predicate: sources may ask the same
/// question any number of times.
pub trait Configuration {
    fn is_ignored(&self, criteria: &IgnoreCriteria<'_>) -> bool;
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-source switches keyed on short source type.
    ///
    /// When any entry is `true`, only the `true` entries run. Otherwise every
    /// source runs except those set to `false`.
    pub sources: BTreeMap<String, bool>,

    /// Ignore rules keyed on short source type.
    ///
    /// Entries are exact dependency names or patterns using `*` as a
    /// wildcard (e.g. `"@types/*"`).
    pub ignored: BTreeMap<String, Vec<String>>,

    /// Dependencies declared by hand for the manifest source.
    pub manifest: ManifestConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    pub dependencies: Vec<ManifestDependency>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestDependency {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

impl Configuration for Config {
    fn is_ignored(&self, criteria: &IgnoreCriteria<'_>) -> bool {
        self.ignored
            .get(criteria.source_type)
            .map(|rules| rules.iter().any(|rule| rule_matches(rule, criteria.name)))
            .unwrap_or(false)
    }
}

impl Config {
    /// Loads configuration from the default config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Loads configuration from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Saves the configuration to the default config file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Saves the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Returns the path to the default configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("licensed")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Returns whether sources of `source_type` should run at all.
    pub fn source_enabled(&self, source_type: &str) -> bool {
        let allow_list = self.sources.values().any(|enabled| *enabled);

        match self.sources.get(source_type) {
            Some(enabled) => *enabled,
            None => !allow_list,
        }
    }

    /// Adds an ignore rule for `name` under `source_type`.
    pub fn ignore(&mut self, source_type: impl Into<String>, name: impl Into<String>) {
        let rules = self.ignored.entry(source_type.into()).or_default();
        let name = name.into();
        if !rules.contains(&name) {
            rules.push(name);
        }
    }
}

fn rule_matches(rule: &str, name: &str) -> bool {
    if rule.contains('*') {
        glob_match(rule, name)
    } else {
        rule == name
    }
}

/// Simple glob matching (supports * as wildcard).
fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();

    if parts.len() == 1 {
        return pattern == text;
    }

    let mut remaining = text;

    // Prefix before the first *
    let first = parts[0];
    if !first.is_empty() {
        match remaining.strip_prefix(first) {
            Some(rest) => remaining = rest,
            None => return false,
        }
    }

    // Suffix after the last *
    let last = parts[parts.len() - 1];
    if !last.is_empty() {
        match remaining.strip_suffix(last) {
            Some(rest) => remaining = rest,
            None => return false,
        }
    }

    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        match remaining.find(part) {
            Some(pos) => remaining = &remaining[pos + part.len()..],
            None => return false,
        }
    }

    true
}
