//! Engine configuration

use crate::engine::Engine;
use crate::plugin::{Plugin, PluginOption};
use crate::types::{ATOMIC_RULE_PLACEHOLDER, DEFAULT_SELECTOR};
use serde_json::{Map, Value};
use std::fmt;
use std::rc::Rc;

/// Global CSS emitted ahead of the atomic rules on every render
#[derive(Clone)]
pub enum Preflight {
    Css(String),
    Dynamic(Rc<dyn Fn(&Engine) -> String>),
}

impl Preflight {
    pub fn dynamic(render: impl Fn(&Engine) -> String + 'static) -> Self {
        Preflight::Dynamic(Rc::new(render))
    }

    pub fn render(&self, engine: &Engine) -> String {
        match self {
            Preflight::Css(css) => css.clone(),
            Preflight::Dynamic(render) => render(engine),
        }
    }
}

impl From<&str> for Preflight {
    fn from(css: &str) -> Self {
        Preflight::Css(css.to_string())
    }
}

impl From<String> for Preflight {
    fn from(css: String) -> Self {
        Preflight::Css(css)
    }
}

impl fmt::Debug for Preflight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preflight::Css(css) => f.debug_tuple("Css").field(css).finish(),
            Preflight::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// User-facing configuration passed to [`crate::create_engine`]
#[derive(Debug, Default)]
pub struct EngineConfig {
    /// Prepended to every generated atomic rule name
    pub prefix: Option<String>,

    /// Selector template containing the `$$` marker
    pub default_selector: Option<String>,

    pub preflights: Vec<Preflight>,

    /// Taken out before the `config` hook runs
    pub plugins: Vec<PluginOption>,

    /// Plugin-specific keys
    pub extra: Map<String, Value>,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_default_selector(mut self, selector: impl Into<String>) -> Self {
        self.default_selector = Some(selector.into());
        self
    }

    pub fn with_preflight(mut self, preflight: impl Into<Preflight>) -> Self {
        self.preflights.push(preflight.into());
        self
    }

    pub fn with_plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(PluginOption::new(plugin));
        self
    }

    pub fn with_plugins(mut self, option: PluginOption) -> Self {
        self.plugins.push(option);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Configuration with defaults applied
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub prefix: String,
    pub default_selector: String,
    pub preflights: Vec<Preflight>,
    pub extra: Map<String, Value>,
}

impl ResolvedConfig {
    pub fn resolve(config: EngineConfig) -> Self {
        let default_selector = config
            .default_selector
            .unwrap_or_else(|| DEFAULT_SELECTOR.to_string());
        if !default_selector.contains(ATOMIC_RULE_PLACEHOLDER) {
            log::warn!(
                "Default selector '{}' has no '{}' marker; rules anchored on it will not render",
                default_selector, ATOMIC_RULE_PLACEHOLDER
            );
        }

        if !config.plugins.is_empty() {
            log::warn!(
                "{} plugin(s) added during the config hook are ignored",
                config.plugins.len()
            );
        }

        Self {
            prefix: config.prefix.unwrap_or_default(),
            default_selector,
            preflights: config.preflights,
            extra: config.extra,
        }
    }

    pub fn extra_value(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}
