//! Persisted browser list, one pretty-printed JSON document per user.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(windows)]
pub const APP_DIR: &str = "BrowserSelector";
#[cfg(not(windows))]
pub const APP_DIR: &str = "browserselector";

pub const CONFIG_FILE: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine the config directory")]
    NoConfigDir,

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A browser the user can pick from the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserEntry {
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub path: String,
    // Passed before the URL, never through a shell
    #[serde(deserialize_with = "lenient")]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(deserialize_with = "lenient")]
    pub last_used: usize,
    #[serde(deserialize_with = "deserialize_browsers")]
    pub browsers: Vec<BrowserEntry>,
}

/// A value of the wrong type falls back to its default instead of failing
/// the whole document.
fn lenient<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(de)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn deserialize_browsers<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<BrowserEntry>, D::Error> {
    let values: Vec<serde_json::Value> = lenient(de)?;
    Ok(values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping browser entry: {}", e);
                None
            }
        })
        .collect())
}

/// Application config directory, created if it does not exist yet.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let dir = dirs::config_dir()
        .ok_or(ConfigError::NoConfigDir)?
        .join(APP_DIR);
    fs::create_dir_all(&dir).map_err(|source| ConfigError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

impl Config {
    /// Load the config at `path`.
    ///
    /// A missing or unreadable file and malformed JSON all produce the empty
    /// default; the user is never shown an error for it.
    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No config at {}, starting empty", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("Failed to read {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str::<Config>(&contents) {
            Ok(mut config) => {
                config.clamp_last_used();
                log::info!(
                    "Loaded {} browsers from {}",
                    config.browsers.len(),
                    path.display()
                );
                config
            }
            Err(e) => {
                log::warn!("Failed to parse {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Overwrite `path` with the current list and selection.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!(
            "Saved {} browsers to {} (last_used = {})",
            self.browsers.len(),
            path.display(),
            self.last_used
        );
        Ok(())
    }

    fn clamp_last_used(&mut self) {
        self.last_used = self.last_used.min(self.browsers.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(name: &str, path: &str, args: &[&str]) -> BrowserEntry {
        BrowserEntry {
            name: name.to_string(),
            path: path.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let config = Config {
            last_used: 1,
            browsers: vec![
                entry("Firefox", "/usr/bin/firefox", &[]),
                entry("Chromium", "/usr/bin/chromium", &["--incognito", "--new-window"]),
            ],
        };

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_yields_empty_config() {
        let dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&dir.path().join("nope.json"));
        assert!(loaded.browsers.is_empty());
        assert_eq!(loaded.last_used, 0);
    }

    #[test]
    fn test_empty_file_yields_empty_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_malformed_file_yields_empty_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ \"browsers\": [ { \"name\": ").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_last_used_clamped_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"last_used": 7, "browsers": [{"name": "a", "path": "/a"}, {"name": "b", "path": "/b"}]}"#,
        )
        .unwrap();

        assert_eq!(Config::load_from(&path).last_used, 1);
    }

    #[test]
    fn test_last_used_clamped_to_zero_when_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"last_used": 3, "browsers": []}"#).unwrap();

        assert_eq!(Config::load_from(&path).last_used, 0);
    }

    #[test]
    fn test_bad_last_used_keeps_browsers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"last_used": -1, "browsers": [{"name": "Firefox", "path": "/usr/bin/firefox", "args": []}]}"#,
        )
        .unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded.last_used, 0);
        assert_eq!(loaded.browsers, vec![entry("Firefox", "/usr/bin/firefox", &[])]);
    }

    #[test]
    fn test_bad_entry_fields_keep_other_browsers() {
        let json = r#"{
            "last_used": "one",
            "browsers": [
                {"name": "Firefox", "path": "/usr/bin/firefox", "args": "x"},
                "not an entry",
                {"name": 7, "path": "/usr/bin/lynx", "args": ["-dump"]}
            ]
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.last_used, 0);
        assert_eq!(
            config.browsers,
            vec![
                entry("Firefox", "/usr/bin/firefox", &[]),
                entry("", "/usr/bin/lynx", &["-dump"]),
            ]
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let json = r#"{"browsers": [{"name": "Lynx"}]}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.last_used, 0);
        assert_eq!(config.browsers[0].name, "Lynx");
        assert!(config.browsers[0].path.is_empty());
        assert!(config.browsers[0].args.is_empty());
    }

    #[test]
    fn test_saved_json_is_pretty_and_keyed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            last_used: 0,
            browsers: vec![entry("Firefox", "/usr/bin/firefox", &["-P", "work"])],
        };

        config.save_to(&path).unwrap();
        let written = fs::read_to_string(&path).unwrap();

        assert!(written.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["last_used"], 0);
        assert_eq!(value["browsers"][0]["path"], "/usr/bin/firefox");
        assert_eq!(value["browsers"][0]["args"][1], "work");
    }
}
