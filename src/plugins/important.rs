//! `!important` handling

use super::read_extra;
use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::plugin::Plugin;
use crate::types::{PropertyValue, Scalar, StyleDefinition, StyleValue};
use async_trait::async_trait;
use serde::Deserialize;

const IMPORTANT_KEY: &str = "__important";
const IMPORTANT_SUFFIX: &str = "!important";

#[derive(Debug, Default, Deserialize)]
struct ImportantOptions {
    #[serde(default)]
    default: bool,
}

/// Marks declarations `!important`.
///
/// `extra.important.default` sets the behavior for every definition; a
/// definition can override it with an `__important` key, which is removed
/// before extraction. Only the definition's own properties are affected,
/// nested contexts decide for themselves.
#[derive(Debug, Default)]
pub struct ImportantPlugin {
    default: bool,
}

impl ImportantPlugin {
    pub fn new() -> Self {
        Self::default()
    }
}

fn flag(value: &StyleValue) -> Option<bool> {
    match value {
        StyleValue::Property(PropertyValue::Scalar(Scalar::Bool(flag))) => Some(*flag),
        StyleValue::Property(PropertyValue::Scalar(Scalar::Str(s))) => match s.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn with_important(scalar: &Scalar) -> Scalar {
    let value = scalar.to_string();
    if value.trim_end().ends_with(IMPORTANT_SUFFIX) {
        Scalar::Str(value)
    } else {
        Scalar::Str(format!("{} {}", value, IMPORTANT_SUFFIX))
    }
}

fn mark_important(definition: StyleDefinition) -> StyleDefinition {
    definition
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                StyleValue::Property(PropertyValue::Scalar(scalar)) => {
                    StyleValue::Property(PropertyValue::Scalar(with_important(&scalar)))
                }
                StyleValue::Property(PropertyValue::Fallback(primary, fallbacks)) => {
                    StyleValue::Property(PropertyValue::Fallback(
                        with_important(&primary),
                        fallbacks.iter().map(with_important).collect(),
                    ))
                }
                other => other,
            };
            (key, value)
        })
        .collect()
}

#[async_trait(?Send)]
impl Plugin for ImportantPlugin {
    fn name(&self) -> &str {
        "core:important"
    }

    async fn config_resolved(&mut self, config: &mut ResolvedConfig) -> Result<()> {
        let options: ImportantOptions = read_extra(config, "important")?.unwrap_or_default();
        self.default = options.default;
        Ok(())
    }

    async fn transform_style_definitions(
        &mut self,
        definitions: &[StyleDefinition],
    ) -> Result<Option<Vec<StyleDefinition>>> {
        let transformed = definitions
            .iter()
            .map(|definition| {
                let mut definition = definition.clone();
                let important = definition
                    .shift_remove(IMPORTANT_KEY)
                    .and_then(|value| flag(&value))
                    .unwrap_or(self.default);
                if important {
                    mark_important(definition)
                } else {
                    definition
                }
            })
            .collect();
        Ok(Some(transformed))
    }
}
