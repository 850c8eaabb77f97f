//! Architecture matching helpers.

use crate::model::Architecture;

/// The architectures a lookup for one requested architecture matches:
/// the requested one plus every agnostic architecture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchSet {
    archs: Vec<Architecture>,
}

impl ArchSet {
    /// Build the set for `requested`. Duplicates (e.g. when `requested` is
    /// itself agnostic) are dropped and the requested arch stays first.
    pub fn for_requested(requested: Architecture, agnostic: Vec<Architecture>) -> Self {
        let mut archs = vec![requested];
        for arch in agnostic {
            if !archs.iter().any(|a| a.name == arch.name) {
                archs.push(arch);
            }
        }
        Self { archs }
    }

    pub fn requested(&self) -> &Architecture {
        &self.archs[0]
    }

    pub fn names(&self) -> Vec<String> {
        self.archs.iter().map(|a| a.name.clone()).collect()
    }
}

/// Pick the concrete architecture that stands in for an agnostic one, e.g.
/// when an `any` package needs a per-arch download path.
///
/// Deterministic: the first non-agnostic architecture by name.
pub fn canonical_concrete(archs: &[Architecture]) -> Option<&Architecture> {
    archs
        .iter()
        .filter(|a| !a.agnostic)
        .min_by(|a, b| a.name.cmp(&b.name))
}
