//! CSS custom properties emitted as a `:root` preflight

use crate::config::{Preflight, ResolvedConfig};
use crate::error::{EngineError, Result};
use crate::plugin::Plugin;
use async_trait::async_trait;
use serde_json::Value;

/// Reads `extra.variables`, a map of names to values. Nested maps are
/// flattened with `-` so `{ "color": { "primary": "red" } }` declares
/// `--color-primary`. Names without a leading `--` get `--` plus the
/// configured prefix.
#[derive(Debug, Default)]
pub struct VariablesPlugin {
    declared: Vec<(String, String)>,
}

impl VariablesPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom properties declared by the last resolved config
    pub fn declared(&self) -> &[(String, String)] {
        &self.declared
    }
}

fn collect_variables(path: &str, value: &Value, prefix: &str, out: &mut Vec<(String, String)>) -> Result<()> {
    let value = match value {
        Value::Object(entries) => {
            for (key, nested) in entries {
                let nested_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}-{}", path, key)
                };
                collect_variables(&nested_path, nested, prefix, out)?;
            }
            return Ok(());
        }
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Null => return Ok(()),
        other => {
            return Err(EngineError::invalid_format(format!(
                "Variable '{}' has unsupported value {}",
                path, other
            )))
        }
    };

    let name = if path.starts_with("--") {
        path.to_string()
    } else {
        format!("--{}{}", prefix, path)
    };
    out.push((name, value));
    Ok(())
}

#[async_trait(?Send)]
impl Plugin for VariablesPlugin {
    fn name(&self) -> &str {
        "core:variables"
    }

    async fn config_resolved(&mut self, config: &mut ResolvedConfig) -> Result<()> {
        self.declared.clear();
        if let Some(variables) = config.extra_value("variables") {
            collect_variables("", variables, &config.prefix, &mut self.declared)?;
        }
        if self.declared.is_empty() {
            return Ok(());
        }

        let body = self
            .declared
            .iter()
            .map(|(name, value)| format!("{}:{}", name, value))
            .collect::<Vec<_>>()
            .join(";");
        config.preflights.push(Preflight::Css(format!(":root{{{}}}", body)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use futures::executor::block_on;
    use serde_json::json;

    fn resolve(config: EngineConfig) -> (VariablesPlugin, ResolvedConfig) {
        let mut plugin = VariablesPlugin::new();
        let mut resolved = ResolvedConfig::resolve(config);
        block_on(plugin.config_resolved(&mut resolved)).unwrap();
        (plugin, resolved)
    }

    #[test]
    fn test_nested_names_are_flattened() {
        let (plugin, resolved) = resolve(EngineConfig::new().with_extra(
            "variables",
            json!({ "color": { "primary": "red", "muted": "#999" }, "--gap": 4 }),
        ));

        assert_eq!(
            plugin.declared(),
            &[
                ("--color-primary".to_string(), "red".to_string()),
                ("--color-muted".to_string(), "#999".to_string()),
                ("--gap".to_string(), "4".to_string()),
            ]
        );
        match &resolved.preflights[..] {
            [Preflight::Css(css)] => {
                assert_eq!(css, ":root{--color-primary:red;--color-muted:#999;--gap:4}")
            }
            other => panic!("unexpected preflights {:?}", other),
        }
    }

    #[test]
    fn test_prefix_applies_to_plain_names() {
        let (plugin, _) = resolve(
            EngineConfig::new()
                .with_prefix("ui-")
                .with_extra("variables", json!({ "radius": "4px" })),
        );
        assert_eq!(plugin.declared(), &[("--ui-radius".to_string(), "4px".to_string())]);
    }

    #[test]
    fn test_no_variables_no_preflight() {
        let (_, resolved) = resolve(EngineConfig::new());
        assert!(resolved.preflights.is_empty());
    }

    #[test]
    fn test_unsupported_value_is_rejected() {
        let mut plugin = VariablesPlugin::new();
        let mut resolved =
            ResolvedConfig::resolve(EngineConfig::new().with_extra("variables", json!({ "flag": true })));
        assert!(block_on(plugin.config_resolved(&mut resolved)).is_err());
    }
}
