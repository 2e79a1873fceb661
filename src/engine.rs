//! The atomic style engine

use crate::config::{EngineConfig, ResolvedConfig};
use crate::error::Result;
use crate::extractor::Extractor;
use crate::plugin::PluginPipeline;
use crate::renderer::{render_atomic_rules, render_preview};
use crate::store::AtomicRuleStore;
use crate::types::*;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::fmt;

type AtomicStyleListener = Box<dyn FnMut(&AtomicRule)>;

/// Result of a `use_styles_detailed` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UseOutcome {
    /// Atomic rule names and unknown shortcut names, in output order
    pub names: Vec<String>,
    /// Shortcut names that resolved to nothing
    pub unknown: IndexSet<String>,
}

/// Build an engine: runs the `config` hook, applies defaults, then runs
/// `config_resolved`. Plugins must not use the engine during either hook.
pub async fn create_engine(mut config: EngineConfig) -> Result<Engine> {
    let mut plugins = PluginPipeline::new(std::mem::take(&mut config.plugins));
    plugins.config(&mut config).await?;

    let mut resolved = ResolvedConfig::resolve(config);
    plugins.config_resolved(&mut resolved).await?;

    log::debug!(
        "Engine ready: prefix '{}', default selector '{}', {} plugin(s)",
        resolved.prefix,
        resolved.default_selector,
        plugins.len()
    );

    Ok(Engine {
        config: resolved,
        plugins,
        store: AtomicRuleStore::new(),
        shortcut_cache: HashMap::new(),
        listeners: Vec::new(),
    })
}

pub struct Engine {
    config: ResolvedConfig,
    plugins: PluginPipeline,
    store: AtomicRuleStore,
    shortcut_cache: HashMap<String, Vec<ExtractedItem>>,
    listeners: Vec<AtomicStyleListener>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum SlotKey {
    Unknown(String),
    Target(Vec<String>, String),
}

#[derive(Debug)]
enum Slot {
    Unknown(String),
    Rule(AtomicRuleContent),
}

impl Engine {
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn store(&self) -> &AtomicRuleStore {
        &self.store
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.names()
    }

    /// Register a listener fired once for every newly created atomic rule
    pub fn on_atomic_style_added(&mut self, listener: impl FnMut(&AtomicRule) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Compile `items` into atomic rules and return their names. Unknown
    /// shortcut names are returned as given.
    pub async fn use_styles(&mut self, items: &[StyleItem]) -> Result<Vec<String>> {
        Ok(self.use_styles_detailed(items).await?.names)
    }

    pub async fn use_styles_detailed(&mut self, items: &[StyleItem]) -> Result<UseOutcome> {
        let extracted = self.extract_all(items).await?;

        let mut outcome = UseOutcome::default();
        for slot in optimize(extracted) {
            match slot {
                Slot::Unknown(name) => {
                    outcome.unknown.insert(name.clone());
                    outcome.names.push(name);
                }
                Slot::Rule(content) => {
                    let name = self.add_atomic_rule(content);
                    outcome.names.push(name);
                }
            }
        }
        Ok(outcome)
    }

    /// CSS for `items` alone with the placeholder left in place. The store
    /// is not touched.
    pub async fn preview_styles(&mut self, items: &[StyleItem]) -> Result<String> {
        let extracted = self.extract_all(items).await?;
        let contents: Vec<AtomicRuleContent> = optimize(extracted)
            .into_iter()
            .filter_map(|slot| match slot {
                Slot::Rule(content) => Some(content),
                Slot::Unknown(_) => None,
            })
            .collect();
        Ok(render_preview(&contents))
    }

    /// Preflights followed by every renderable atomic rule in the store
    pub fn render_styles(&self) -> String {
        let mut css: String = self
            .config
            .preflights
            .iter()
            .map(|preflight| preflight.render(self))
            .collect();
        css.push_str(&render_atomic_rules(self.store.rules()));
        css
    }

    async fn extract_all(&mut self, items: &[StyleItem]) -> Result<Vec<ExtractedItem>> {
        let mut extracted = Vec::new();
        for item in items {
            match item {
                StyleItem::Shortcut(name) => {
                    if let Some(cached) = self.shortcut_cache.get(name) {
                        extracted.extend(cached.iter().cloned());
                        continue;
                    }
                    let mut extractor =
                        Extractor::new(&self.config.default_selector, &mut self.plugins);
                    let resolved = extractor.extract_items(vec![item.clone()]).await?;
                    self.shortcut_cache.insert(name.clone(), resolved.clone());
                    extracted.extend(resolved);
                }
                StyleItem::Definition(definition) => {
                    let mut extractor =
                        Extractor::new(&self.config.default_selector, &mut self.plugins);
                    extracted.extend(extractor.extract(definition).await?);
                }
            }
        }
        Ok(extracted)
    }

    fn add_atomic_rule(&mut self, content: AtomicRuleContent) -> String {
        let interned = self.store.intern(content, &self.config.prefix);
        if interned.created {
            if let Some(rule) = self.store.get(&interned.name) {
                log::debug!(
                    "Atomic rule '{}' added: {:?} {}",
                    rule.name,
                    rule.content.selector_chain,
                    rule.content.declaration()
                );
                for listener in &mut self.listeners {
                    listener(rule);
                }
            }
            self.plugins.atomic_rule_added();
        }
        interned.name
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("plugins", &self.plugins.names())
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

/// Fold declarations so the last write to a selector chain and property
/// wins and moves to the end. A removal deletes without re-inserting.
/// Unknown names keep the slot of their first appearance.
fn optimize(items: Vec<ExtractedItem>) -> Vec<Slot> {
    let mut slots: IndexMap<SlotKey, Slot> = IndexMap::new();
    for item in items {
        match item {
            ExtractedItem::Unknown(name) => {
                slots
                    .entry(SlotKey::Unknown(name.clone()))
                    .or_insert(Slot::Unknown(name));
            }
            ExtractedItem::Content(content) => {
                let key = SlotKey::Target(content.selector_chain.clone(), content.property.clone());
                slots.shift_remove(&key);
                if let Some(value) = content.value {
                    slots.insert(
                        key,
                        Slot::Rule(AtomicRuleContent {
                            selector_chain: content.selector_chain,
                            property: content.property,
                            value,
                        }),
                    );
                }
            }
        }
    }
    slots.into_values().collect()
}
