//! Plugin contract and ordered hook dispatch

use crate::config::{EngineConfig, ResolvedConfig};
use crate::error::Result;
use crate::types::{StyleDefinition, StyleItem};
use async_trait::async_trait;
use std::fmt;

/// Ordering bucket for a plugin. Within a bucket registration order holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Enforce {
    Pre,
    #[default]
    Normal,
    Post,
}

/// An engine extension. Every hook is optional.
///
/// The `transform_*` hooks receive the current payload and may return a
/// replacement; returning `Ok(None)` passes the payload on unchanged. An
/// error from any hook aborts the running engine operation.
///
/// Hooks must not call back into the engine that is running them.
#[async_trait(?Send)]
pub trait Plugin {
    fn name(&self) -> &str;

    fn enforce(&self) -> Enforce {
        Enforce::Normal
    }

    /// Inspect or rewrite the user config before defaults are applied
    async fn config(&mut self, _config: &mut EngineConfig) -> Result<()> {
        Ok(())
    }

    /// Called once defaults are applied; register rules and preflights here
    async fn config_resolved(&mut self, _config: &mut ResolvedConfig) -> Result<()> {
        Ok(())
    }

    async fn transform_selectors(&mut self, _selectors: &[String]) -> Result<Option<Vec<String>>> {
        Ok(None)
    }

    async fn transform_style_items(&mut self, _items: &[StyleItem]) -> Result<Option<Vec<StyleItem>>> {
        Ok(None)
    }

    async fn transform_style_definitions(
        &mut self,
        _definitions: &[StyleDefinition],
    ) -> Result<Option<Vec<StyleDefinition>>> {
        Ok(None)
    }

    /// Notified after a new atomic rule enters the store
    fn atomic_rule_added(&mut self) {}
}

/// Plugin list entry; groups are flattened in place
pub enum PluginOption {
    Plugin(Box<dyn Plugin>),
    Group(Vec<PluginOption>),
}

impl PluginOption {
    pub fn new(plugin: impl Plugin + 'static) -> Self {
        PluginOption::Plugin(Box::new(plugin))
    }

    pub fn group(options: Vec<PluginOption>) -> Self {
        PluginOption::Group(options)
    }

    fn flatten_into(self, out: &mut Vec<Box<dyn Plugin>>) {
        match self {
            PluginOption::Plugin(plugin) => out.push(plugin),
            PluginOption::Group(options) => {
                for option in options {
                    option.flatten_into(out);
                }
            }
        }
    }
}

impl From<Box<dyn Plugin>> for PluginOption {
    fn from(plugin: Box<dyn Plugin>) -> Self {
        PluginOption::Plugin(plugin)
    }
}

impl fmt::Debug for PluginOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginOption::Plugin(plugin) => write!(f, "Plugin({})", plugin.name()),
            PluginOption::Group(options) => f.debug_list().entries(options).finish(),
        }
    }
}

/// Plugins in hook execution order
pub struct PluginPipeline {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginPipeline {
    pub fn new(options: Vec<PluginOption>) -> Self {
        let mut plugins = Vec::new();
        for option in options {
            option.flatten_into(&mut plugins);
        }
        // stable: registration order is kept inside each bucket
        plugins.sort_by_key(|plugin| plugin.enforce());

        let pipeline = Self { plugins };
        log::debug!("Plugin order: {:?}", pipeline.names());
        pipeline
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|plugin| plugin.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub async fn config(&mut self, config: &mut EngineConfig) -> Result<()> {
        for plugin in &mut self.plugins {
            plugin.config(config).await?;
        }
        Ok(())
    }

    pub async fn config_resolved(&mut self, config: &mut ResolvedConfig) -> Result<()> {
        for plugin in &mut self.plugins {
            plugin.config_resolved(config).await?;
        }
        Ok(())
    }

    pub async fn transform_selectors(&mut self, selectors: Vec<String>) -> Result<Vec<String>> {
        let mut payload = selectors;
        for plugin in &mut self.plugins {
            if let Some(next) = plugin.transform_selectors(&payload).await? {
                payload = next;
            }
        }
        Ok(payload)
    }

    pub async fn transform_style_items(&mut self, items: Vec<StyleItem>) -> Result<Vec<StyleItem>> {
        let mut payload = items;
        for plugin in &mut self.plugins {
            if let Some(next) = plugin.transform_style_items(&payload).await? {
                payload = next;
            }
        }
        Ok(payload)
    }

    pub async fn transform_style_definitions(
        &mut self,
        definitions: Vec<StyleDefinition>,
    ) -> Result<Vec<StyleDefinition>> {
        let mut payload = definitions;
        for plugin in &mut self.plugins {
            if let Some(next) = plugin.transform_style_definitions(&payload).await? {
                payload = next;
            }
        }
        Ok(payload)
    }

    pub fn atomic_rule_added(&mut self) {
        for plugin in &mut self.plugins {
            plugin.atomic_rule_added();
        }
    }
}
