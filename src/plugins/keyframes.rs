//! `@keyframes` blocks for animations that are actually used

use super::read_extra;
use crate::config::{Preflight, ResolvedConfig};
use crate::engine::Engine;
use crate::error::Result;
use crate::plugin::Plugin;
use crate::types::PropertyValue;
use crate::utils::to_kebab_case;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::rc::Rc;

/// frame selector (`from`, `50%`, ...) -> property -> value
type Frames = IndexMap<String, IndexMap<String, PropertyValue>>;

/// Reads `extra.keyframes` (`name -> frames`) and adds a preflight that
/// emits only the keyframes referenced by an `animation` or
/// `animation-name` rule in the store at render time.
#[derive(Debug, Default)]
pub struct KeyframesPlugin;

impl KeyframesPlugin {
    pub fn new() -> Self {
        Self
    }
}

fn render_keyframes(name: &str, frames: &Frames) -> String {
    let mut css = format!("@keyframes {}{{", name);
    for (selector, properties) in frames {
        let body = properties
            .iter()
            .filter_map(|(property, value)| {
                let property = to_kebab_case(property);
                value.normalize().map(|values| {
                    values
                        .iter()
                        .map(|value| format!("{}:{}", property, value))
                        .collect::<Vec<_>>()
                        .join(";")
                })
            })
            .collect::<Vec<_>>()
            .join(";");
        css.push_str(selector);
        css.push('{');
        css.push_str(&body);
        css.push('}');
    }
    css.push('}');
    css
}

fn referenced_animations(engine: &Engine) -> HashSet<String> {
    engine
        .store()
        .rules()
        .filter(|rule| matches!(rule.content.property.as_str(), "animation" | "animation-name"))
        .flat_map(|rule| rule.content.value.iter())
        .flat_map(|value| value.split(|c: char| c.is_whitespace() || c == ','))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait(?Send)]
impl Plugin for KeyframesPlugin {
    fn name(&self) -> &str {
        "core:keyframes"
    }

    async fn config_resolved(&mut self, config: &mut ResolvedConfig) -> Result<()> {
        let keyframes: IndexMap<String, Frames> = read_extra(config, "keyframes")?.unwrap_or_default();
        if keyframes.is_empty() {
            return Ok(());
        }

        let keyframes = Rc::new(keyframes);
        config.preflights.push(Preflight::dynamic(move |engine| {
            let used = referenced_animations(engine);
            keyframes
                .iter()
                .filter(|(name, _)| used.contains(name.as_str()))
                .map(|(name, frames)| render_keyframes(name, frames))
                .collect()
        }));
        Ok(())
    }
}
