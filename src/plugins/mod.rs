//! Bundled plugins. Each one is an ordinary [`Plugin`] reading its own key
//! out of the config's `extra` map.

mod important;
mod keyframes;
mod selectors;
mod shortcuts;
mod variables;

pub use important::ImportantPlugin;
pub use keyframes::KeyframesPlugin;
pub use selectors::SelectorsPlugin;
pub use shortcuts::ShortcutsPlugin;
pub use variables::VariablesPlugin;

use crate::config::ResolvedConfig;
use crate::error::{EngineError, Result};
use crate::plugin::PluginOption;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// A single value or a list of them
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// Deserialize `extra[key]`, or `None` when the key is absent
pub(crate) fn read_extra<T: DeserializeOwned>(config: &ResolvedConfig, key: &str) -> Result<Option<T>> {
    match config.extra_value(key) {
        None => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| EngineError::invalid_format(format!("Invalid '{}' config: {}", key, e))),
    }
}

/// All bundled plugins in their default configuration
pub fn core_plugins() -> PluginOption {
    PluginOption::group(vec![
        PluginOption::new(SelectorsPlugin::new()),
        PluginOption::new(ShortcutsPlugin::new()),
        PluginOption::new(VariablesPlugin::new()),
        PluginOption::new(KeyframesPlugin::new()),
        PluginOption::new(ImportantPlugin::new()),
    ])
}
