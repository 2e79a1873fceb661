//! Atomic Style Compiler
//!
//! Compiles nested, declarative style definitions into a deduplicated set of
//! single-declaration CSS rules, each addressed by a short generated name.
//!
//! # Features
//!
//! - Arbitrarily nested selector and at-rule contexts
//! - Content-addressed naming: the same declaration always gets the same name
//! - Last-write-wins merging and `null` removal of declarations
//! - Fallback values rendered as repeated declarations
//! - Ordered, async plugin hooks for selector aliases, shortcuts, CSS
//!   variables, keyframes and `!important`
//!
//! # Basic Usage
//!
//! ```rust
//! use atomc::{create_engine, plugins, EngineConfig, Result, StyleItem};
//! use futures::executor::block_on;
//!
//! fn main() -> Result<()> {
//!     block_on(async {
//!         let mut engine = create_engine(EngineConfig::new().with_plugins(plugins::core_plugins())).await?;
//!         let item: StyleItem = serde_json::from_str(r#"{ "color": "red" }"#).unwrap();
//!         let names = engine.use_styles(&[item]).await?;
//!         assert_eq!(names, vec!["a"]);
//!         assert_eq!(engine.render_styles(), ".a{color:red}");
//!         Ok::<(), atomc::EngineError>(())
//!     })
//! }
//! ```
//!
//! # Compilation Pipeline
//!
//! 1. **Shortcuts** - shortcut names are expanded by `transform_style_items`
//! 2. **Extraction** - definitions are walked; selector chains go through
//!    `transform_selectors`, definitions through `transform_style_definitions`
//! 3. **Optimization** - later declarations on the same target replace earlier ones
//! 4. **Interning** - each declaration is named by content and stored
//! 5. **Rendering** - preflights, then stored rules grouped by selector chain

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod plugin;
pub mod plugins;
pub mod renderer;
pub mod resolver;
pub mod store;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use config::{EngineConfig, Preflight, ResolvedConfig};
pub use engine::{create_engine, Engine, UseOutcome};
pub use error::{EngineError, ResolverKind, Result};
pub use extractor::{normalize_selectors, Extractor};
pub use plugin::{Enforce, Plugin, PluginOption, PluginPipeline};
pub use plugins::{
    core_plugins, ImportantPlugin, KeyframesPlugin, SelectorsPlugin, ShortcutsPlugin, VariablesPlugin,
};
pub use resolver::{DynamicRule, RuleResolver, SelectorResolver, ShortcutResolver, StaticRule};
pub use store::{AtomicRuleStore, Interned};
pub use types::*;

/// Compiler version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Result of compiling a batch of call sites
#[derive(Debug, Clone, Default)]
pub struct CompilationOutput {
    /// Names returned for each call, in call order
    pub names: Vec<Vec<String>>,

    /// Unknown shortcut names across all calls
    pub unknown: Vec<String>,

    /// Full stylesheet after all calls
    pub css: String,

    /// Number of atomic rules in the store
    pub rule_count: usize,
}

/// Run every call through one engine and render the result
pub async fn compile_calls(config: EngineConfig, calls: &[Vec<StyleItem>]) -> Result<CompilationOutput> {
    let mut engine = create_engine(config).await?;
    let mut output = CompilationOutput::default();

    for call in calls {
        let outcome = engine.use_styles_detailed(call).await?;
        for name in outcome.unknown {
            if !output.unknown.contains(&name) {
                output.unknown.push(name);
            }
        }
        output.names.push(outcome.names);
    }

    output.css = engine.render_styles();
    output.rule_count = engine.store().len();
    log::debug!(
        "Compiled {} call(s) into {} atomic rule(s)",
        calls.len(),
        output.rule_count
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    fn calls(value: serde_json::Value) -> Vec<Vec<StyleItem>> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_names_are_shared_across_calls() {
        let output = block_on(compile_calls(
            EngineConfig::new(),
            &calls(json!([
                [{ "color": "red", "padding": "1px" }],
                [{ "color": "red" }, { "padding": "2px" }],
            ])),
        ))
        .unwrap();

        assert_eq!(output.names, vec![vec!["a", "b"], vec!["a", "c"]]);
        assert_eq!(output.rule_count, 3);
        assert_eq!(output.css, ".a{color:red}.b{padding:1px}.c{padding:2px}");
    }

    #[test]
    fn test_unknown_collected_once() {
        let output = block_on(compile_calls(
            EngineConfig::new().with_plugins(core_plugins()),
            &calls(json!([["ghost"], ["ghost", { "color": "red" }]])),
        ))
        .unwrap();

        assert_eq!(output.unknown, vec!["ghost"]);
        assert_eq!(output.names, vec![vec!["ghost"], vec!["ghost", "a"]]);
    }

    #[test]
    fn test_plugin_error_aborts_engine_creation() {
        let result = block_on(compile_calls(
            EngineConfig::new()
                .with_plugins(core_plugins())
                .with_extra("shortcuts", json!("not a list")),
            &[],
        ));
        assert!(matches!(result, Err(EngineError::InvalidFormat { .. })));
    }
}
