use serde::Serialize;

use crate::model::{Architecture, LookupKey, Package, UpdateRecord};

/// What a lookup resolved to. Exactly one variant per lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// The exact package that was asked for
    Found { package: Package },
    /// A single agnostic-arch package; callers redirect permanently to its
    /// own (repo, arch) rather than the requested arch
    RedirectCanonical { package: Package },
    /// Packages built from the requested name as pkgbase, ordered by name
    SplitPackageListing {
        pkgbase: String,
        arch: Architecture,
        packages: Vec<Package>,
    },
    /// The package existed here recently; the latest matching history record
    RecentlyRemoved { update: UpdateRecord },
    /// The lookup was incomplete and becomes a search
    SearchFallback { key: LookupKey },
    /// Well-formed lookup, nothing matched
    NotFound,
}

impl ResolutionOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            ResolutionOutcome::Found { .. } => "found",
            ResolutionOutcome::RedirectCanonical { .. } => "redirect_canonical",
            ResolutionOutcome::SplitPackageListing { .. } => "split_package_listing",
            ResolutionOutcome::RecentlyRemoved { .. } => "recently_removed",
            ResolutionOutcome::SearchFallback { .. } => "search_fallback",
            ResolutionOutcome::NotFound => "not_found",
        }
    }

    /// The single package this outcome points at, if any.
    pub fn package(&self) -> Option<&Package> {
        match self {
            ResolutionOutcome::Found { package }
            | ResolutionOutcome::RedirectCanonical { package } => Some(package),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolutionOutcome::NotFound)
    }
}
