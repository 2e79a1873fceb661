use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::plugins::core_plugins;
use crate::types::StyleItem;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;

/// Engine configuration as written on disk.
///
/// Known keys map onto [`EngineConfig`]; every other key is kept as plugin
/// configuration (`selectors`, `shortcuts`, `variables`, ...).
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub prefix: Option<String>,
    #[serde(alias = "defaultSelector")]
    pub default_selector: Option<String>,
    pub preflights: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigFile {
    /// Engine configuration with the bundled plugins installed
    pub fn to_engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::new().with_plugins(core_plugins());
        if let Some(prefix) = &self.prefix {
            config = config.with_prefix(prefix.clone());
        }
        if let Some(selector) = &self.default_selector {
            config = config.with_default_selector(selector.clone());
        }
        for preflight in self.preflights.iter().flatten() {
            config = config.with_preflight(preflight.clone());
        }
        for (key, value) in &self.extra {
            config = config.with_extra(key.clone(), value.clone());
        }
        config
    }
}

/// Input for the CLI: one entry per call site, each holding that call's
/// style items.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StylesFile {
    #[serde(default)]
    pub calls: Vec<Vec<StyleItem>>,
}

fn read_structured<T: DeserializeOwned>(path: &str, what: &str) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| EngineError::FileNotFound {
        path: format!("{} file {}: {}", what, path, e),
    })?;

    if path.ends_with(".json") {
        serde_json::from_str(&content).map_err(|e| EngineError::InvalidFormat {
            message: format!("Invalid JSON {}: {}", what.to_lowercase(), e),
        })
    } else if path.ends_with(".toml") {
        toml::from_str(&content).map_err(|e| EngineError::InvalidFormat {
            message: format!("Invalid TOML {}: {}", what.to_lowercase(), e),
        })
    } else {
        Err(EngineError::InvalidFormat {
            message: format!("{} file must be .json or .toml format", what),
        })
    }
}

pub fn load(config_path: &str) -> Result<ConfigFile> {
    let config = read_structured(config_path, "Config")?;
    log::info!("Loaded configuration from {}", config_path);
    Ok(config)
}

pub fn load_styles(styles_path: &str) -> Result<StylesFile> {
    let styles: StylesFile = read_structured(styles_path, "Styles")?;
    log::info!("Loaded {} call(s) from {}", styles.calls.len(), styles_path);
    Ok(styles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_toml_config_keeps_plugin_keys() {
        let file = write_temp(
            ".toml",
            r##"
prefix = "x-"
defaultSelector = ".$$"
preflights = ["*{box-sizing:border-box}"]
shortcuts = [["flex", { display = "flex" }]]

[variables]
brand = "#f00"
"##,
        );

        let config = load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.prefix.as_deref(), Some("x-"));
        assert_eq!(config.default_selector.as_deref(), Some(".$$"));
        assert_eq!(config.preflights.as_ref().map(Vec::len), Some(1));
        assert!(config.extra.contains_key("shortcuts"));
        assert!(config.extra.contains_key("variables"));

        let engine_config = config.to_engine_config();
        assert_eq!(engine_config.prefix.as_deref(), Some("x-"));
        assert_eq!(engine_config.preflights.len(), 1);
    }

    #[test]
    fn test_load_json_styles() {
        let file = write_temp(".json", r#"{ "calls": [[{ "color": "red" }, "flex"], []] }"#);
        let styles = load_styles(file.path().to_str().unwrap()).unwrap();
        assert_eq!(styles.calls.len(), 2);
        assert_eq!(styles.calls[0][1], StyleItem::from("flex"));
        assert!(styles.calls[1].is_empty());
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_temp(".yaml", "calls: []");
        assert!(matches!(
            load_styles(file.path().to_str().unwrap()),
            Err(EngineError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load("/nonexistent/atomc.toml"),
            Err(EngineError::FileNotFound { .. })
        ));
    }
}
