use serde::{Deserialize, Serialize};
use std::fmt;

/// A package architecture.
///
/// Agnostic architectures (such as `any`) hold packages that run on every
/// concrete architecture, so lookups for a concrete architecture also
/// consider them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Architecture {
    pub name: String,
    #[serde(default)]
    pub agnostic: bool,
}

impl Architecture {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            agnostic: false,
        }
    }

    pub fn agnostic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            agnostic: true,
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
