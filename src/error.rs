//! Error types for the atomic style engine

use std::fmt;
use thiserror::Error;

/// Which resolver a cycle was detected in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverKind {
    Selector,
    Shortcut,
}

impl fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverKind::Selector => write!(f, "selector"),
            ResolverKind::Shortcut => write!(f, "shortcut"),
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Invalid rule pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Cyclic {kind} resolution: {}", .chain.join(" -> "))]
    CyclicResolution { kind: ResolverKind, chain: Vec<String> },

    #[error("Plugin '{plugin}' failed: {message}")]
    Plugin { plugin: String, message: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    pub fn plugin(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Plugin {
            plugin: plugin.into(),
            message: message.into(),
        }
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    pub fn cyclic(kind: ResolverKind, chain: Vec<String>) -> Self {
        Self::CyclicResolution { kind, chain }
    }
}
