//! Core types and constants for the atomic style engine

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// Selector markers
pub const ATOMIC_RULE_PLACEHOLDER: &str = "$$";
pub const DEFAULT_SELECTOR_PLACEHOLDER: &str = "&";
pub const DEFAULT_SELECTOR: &str = ".$$";

/// A single CSS value token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Str(String),
    Num(f64),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => write!(f, "{}", s),
            Scalar::Num(n) => write!(f, "{}", format_number(*n)),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Number text the way script runtimes print it: no `-0`, and an exponent
/// outside `[1e-6, 1e21)`.
fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return n.to_string();
    }
    let formatted = format!("{:e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{}e+{}", mantissa, exponent),
        _ => formatted,
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Num(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Num(value as f64)
    }
}

/// Value side of a declaration.
///
/// `Null` is a removal directive: it deletes an earlier declaration of the
/// same property on the same selector chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Scalar(Scalar),
    Fallback(Scalar, Vec<Scalar>),
    Null,
}

impl PropertyValue {
    /// Flatten into the ordered, de-duplicated value list emitted as
    /// `prop:v1;prop:v2`. Returns `None` for a removal directive.
    pub fn normalize(&self) -> Option<Vec<String>> {
        match self {
            PropertyValue::Scalar(scalar) => Some(vec![scalar.to_string()]),
            PropertyValue::Fallback(primary, fallbacks) => {
                let mut values: Vec<String> = Vec::with_capacity(fallbacks.len() + 1);
                for value in std::iter::once(primary).chain(fallbacks) {
                    let value = value.to_string();
                    if !values.contains(&value) {
                        values.push(value);
                    }
                }
                Some(values)
            }
            PropertyValue::Null => None,
        }
    }
}

macro_rules! impl_from_scalar {
    ($($source:ty),*) => {
        $(
            impl From<$source> for PropertyValue {
                fn from(value: $source) -> Self {
                    PropertyValue::Scalar(value.into())
                }
            }

            impl From<$source> for StyleValue {
                fn from(value: $source) -> Self {
                    StyleValue::Property(value.into())
                }
            }
        )*
    };
}

impl_from_scalar!(&str, String, f64, i64);

/// Ordered style definition: property or selector key to value
pub type StyleDefinition = IndexMap<String, StyleValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Nested(StyleDefinition),
    Property(PropertyValue),
    Items(Vec<StyleItem>),
}

impl From<PropertyValue> for StyleValue {
    fn from(value: PropertyValue) -> Self {
        StyleValue::Property(value)
    }
}

impl From<StyleDefinition> for StyleValue {
    fn from(value: StyleDefinition) -> Self {
        StyleValue::Nested(value)
    }
}

/// Argument to `Engine::use_styles`: an inline definition or a shortcut name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleItem {
    Shortcut(String),
    Definition(StyleDefinition),
}

impl StyleItem {
    pub fn shortcut(name: impl Into<String>) -> Self {
        StyleItem::Shortcut(name.into())
    }

    pub fn as_shortcut(&self) -> Option<&str> {
        match self {
            StyleItem::Shortcut(name) => Some(name),
            StyleItem::Definition(_) => None,
        }
    }
}

impl From<&str> for StyleItem {
    fn from(value: &str) -> Self {
        StyleItem::Shortcut(value.to_string())
    }
}

impl From<StyleDefinition> for StyleItem {
    fn from(value: StyleDefinition) -> Self {
        StyleItem::Definition(value)
    }
}

/// One declaration pulled out of a style tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtractedRuleContent {
    pub selector_chain: Vec<String>,
    pub property: String,
    /// `None` marks a removal of an earlier declaration
    pub value: Option<Vec<String>>,
}

/// Extraction output in source order
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedItem {
    Content(ExtractedRuleContent),
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AtomicRuleContent {
    pub selector_chain: Vec<String>,
    pub property: String,
    pub value: Vec<String>,
}

impl AtomicRuleContent {
    /// Serialized identity used for content addressing
    pub fn content_key(&self) -> String {
        serde_json::json!([self.selector_chain, self.property, self.value]).to_string()
    }

    /// Declaration body, repeating the property for each fallback value
    pub fn declaration(&self) -> String {
        self.value
            .iter()
            .map(|value| format!("{}:{}", self.property, value))
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Renderable rules anchor their innermost selector on the placeholder
    pub fn is_renderable(&self) -> bool {
        self.selector_chain
            .last()
            .map_or(false, |selector| selector.contains(ATOMIC_RULE_PLACEHOLDER))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AtomicRule {
    pub name: String,
    pub content: AtomicRuleContent,
}
