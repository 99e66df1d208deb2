//! Error types for galaxy generation.

use std::fmt;

/// Errors that can occur while generating or uploading a galaxy.
#[derive(Debug, Clone, PartialEq)]
pub enum GalaxyError {
    /// A parameter is out of its valid range, or a color string failed to parse.
    InvalidParameter {
        name: &'static str,
        reason: String,
    },
    /// Buffers for `count` particles could not be allocated or indexed.
    ResourceExhausted { count: usize },
}

impl GalaxyError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        GalaxyError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GalaxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GalaxyError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter `{}`: {}", name, reason)
            }
            GalaxyError::ResourceExhausted { count } => {
                write!(f, "Not enough resources to build a galaxy of {} particles", count)
            }
        }
    }
}

impl std::error::Error for GalaxyError {}
