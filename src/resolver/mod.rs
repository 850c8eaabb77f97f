//! Package identity resolution.
//!
//! A lookup `{name, repo, arch}` runs through a fixed chain of stages. Each
//! stage either produces the final [`ResolutionOutcome`] or hands over to the
//! next one:
//!
//! 1. `Incomplete` - blank fields turn the lookup into a search
//! 2. `Exact` - the package with exactly this identity
//! 3. `Agnostic` - a single agnostic-arch package under the same name and repo
//! 4. `Split` - packages sharing the requested name as pkgbase; an unknown
//!    repo ends the chain here
//! 5. `Removed` - the latest recent history record for the identity
//!
//! When every stage misses the outcome is [`ResolutionOutcome::NotFound`].

mod arch;
mod outcome;

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::catalog::{NameField, PackageCatalog, PackageHistory, PackageQuery};
use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::model::{Architecture, LookupKey, Package, Timestamp};

pub use arch::{ArchSet, canonical_concrete};
pub use outcome::ResolutionOutcome;

/// One step of the resolution chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Incomplete,
    Exact,
    Agnostic,
    Split,
    Removed,
}

impl Stage {
    /// Stages in the order they run. There are no backward transitions.
    pub const ORDER: [Stage; 5] = [
        Stage::Incomplete,
        Stage::Exact,
        Stage::Agnostic,
        Stage::Split,
        Stage::Removed,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Incomplete => write!(f, "incomplete"),
            Stage::Exact => write!(f, "exact"),
            Stage::Agnostic => write!(f, "agnostic"),
            Stage::Split => write!(f, "split"),
            Stage::Removed => write!(f, "removed"),
        }
    }
}

type StageResult = Result<Option<ResolutionOutcome>, ResolveError>;

/// Per-call state shared between stages.
///
/// The requested architecture, the agnostic architectures and the matching
/// set are fetched at most once per resolution and reused by later stages.
struct Lookup<'k> {
    key: &'k LookupKey,
    now: Timestamp,
    arch: Option<Architecture>,
    agnostic: Option<Vec<Architecture>>,
    arch_set: Option<ArchSet>,
}

impl<'k> Lookup<'k> {
    fn new(key: &'k LookupKey, now: Timestamp) -> Self {
        Self {
            key,
            now,
            arch: None,
            agnostic: None,
            arch_set: None,
        }
    }
}

/// Resolves lookups against a package catalog and its update history.
///
/// Holds no mutable state; one resolver can serve any number of concurrent
/// lookups.
#[derive(Clone)]
pub struct Resolver {
    catalog: Arc<dyn PackageCatalog>,
    history: Arc<dyn PackageHistory>,
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(
        catalog: Arc<dyn PackageCatalog>,
        history: Arc<dyn PackageHistory>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            catalog,
            history,
            config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn catalog(&self) -> &dyn PackageCatalog {
        self.catalog.as_ref()
    }

    /// Resolve `key` as of `now`.
    ///
    /// Returns [`ResolveError::InvalidArchitecture`] when the fallback chain
    /// needs the requested architecture and it does not exist. Data source
    /// failures are returned as [`ResolveError::DataSourceUnavailable`] and
    /// never turned into a fallback outcome.
    pub async fn resolve(
        &self,
        key: &LookupKey,
        now: Timestamp,
    ) -> Result<ResolutionOutcome, ResolveError> {
        let mut lookup = Lookup::new(key, now);

        for stage in Stage::ORDER {
            if let Some(outcome) = self.run_stage(stage, &mut lookup).await? {
                debug!("Resolved {} at stage {}: {}", key, stage, outcome.kind());
                return Ok(outcome);
            }
            debug!("Stage {} found nothing for {}", stage, key);
        }

        Ok(ResolutionOutcome::NotFound)
    }

    /// Exact identity lookup without any fallback.
    pub async fn find_exact(
        &self,
        name: &str,
        repo: &str,
        arch: &str,
    ) -> Result<Option<Package>, ResolveError> {
        Ok(self.catalog.find_exact(name, repo, arch).await?)
    }

    async fn run_stage(&self, stage: Stage, lookup: &mut Lookup<'_>) -> StageResult {
        match stage {
            Stage::Incomplete => Ok(self.incomplete(lookup)),
            Stage::Exact => self.exact(lookup).await,
            Stage::Agnostic => self.agnostic(lookup).await,
            Stage::Split => self.split(lookup).await,
            Stage::Removed => self.removed(lookup).await,
        }
    }

    fn incomplete(&self, lookup: &Lookup<'_>) -> Option<ResolutionOutcome> {
        (!lookup.key.is_complete()).then(|| ResolutionOutcome::SearchFallback {
            key: lookup.key.clone(),
        })
    }

    async fn exact(&self, lookup: &Lookup<'_>) -> StageResult {
        let key = lookup.key;
        let found = self
            .catalog
            .find_exact(&key.name, &key.repo, &key.arch)
            .await?;
        Ok(found.map(|package| ResolutionOutcome::Found { package }))
    }

    async fn agnostic(&self, lookup: &mut Lookup<'_>) -> StageResult {
        let arch = self.requested_arch(lookup).await?;
        if arch.agnostic {
            return Ok(None);
        }

        let agnostic = self.agnostic_archs(lookup).await?;
        if agnostic.is_empty() {
            return Ok(None);
        }

        let query = PackageQuery {
            field: NameField::Pkgname,
            name: lookup.key.name.clone(),
            repos: vec![lookup.key.repo.clone()],
            archs: agnostic.iter().map(|a| a.name.clone()).collect(),
        };
        let mut matches = self.catalog.find_by_arch_set(&query).await?;

        // More than one candidate is ambiguous; leave it to the split check.
        if matches.len() == 1
            && let Some(package) = matches.pop()
        {
            return Ok(Some(ResolutionOutcome::RedirectCanonical { package }));
        }
        debug!(
            "{} agnostic candidates for {}, not redirecting",
            matches.len(),
            lookup.key
        );
        Ok(None)
    }

    async fn split(&self, lookup: &mut Lookup<'_>) -> StageResult {
        let arch_set = self.arch_set(lookup).await?;

        // An unknown repo ends the chain; history is not consulted.
        let Some(repo) = self.catalog.resolve_repo(&lookup.key.repo).await? else {
            debug!("Unknown repo {}", lookup.key.repo);
            return Ok(Some(ResolutionOutcome::NotFound));
        };

        // Any repo with the same testing/staging flags is in scope, not just
        // the requested one.
        let scope = self.catalog.repos_with_scope(repo.scope()).await?;
        let query = PackageQuery {
            field: NameField::Pkgbase,
            name: lookup.key.name.clone(),
            repos: scope.into_iter().map(|r| r.name).collect(),
            archs: arch_set.names(),
        };
        let packages = self.catalog.find_by_arch_set(&query).await?;

        if packages.is_empty() {
            return Ok(None);
        }
        if !packages.iter().any(|p| p.repo == repo) {
            debug!(
                "Split packages for {} exist only outside repo {}",
                lookup.key.name, repo.name
            );
            return Ok(None);
        }

        Ok(Some(ResolutionOutcome::SplitPackageListing {
            pkgbase: lookup.key.name.clone(),
            arch: arch_set.requested().clone(),
            packages,
        }))
    }

    async fn removed(&self, lookup: &mut Lookup<'_>) -> StageResult {
        let arch_set = self.arch_set(lookup).await?;
        // A cutoff reaching past the representable range filters nothing.
        let since = self
            .config
            .removal_cutoff
            .and_then(|cutoff| lookup.now.checked_sub_signed(cutoff));

        let records = self
            .history
            .recent_removals(&lookup.key.name, &lookup.key.repo, &arch_set.names(), since)
            .await?;

        Ok(records
            .into_iter()
            .max_by_key(|u| u.recency())
            .map(|update| ResolutionOutcome::RecentlyRemoved { update }))
    }

    async fn requested_arch(
        &self,
        lookup: &mut Lookup<'_>,
    ) -> Result<Architecture, ResolveError> {
        if let Some(arch) = &lookup.arch {
            return Ok(arch.clone());
        }
        let arch = self
            .catalog
            .resolve_architecture(&lookup.key.arch)
            .await?
            .ok_or_else(|| ResolveError::InvalidArchitecture(lookup.key.arch.clone()))?;
        lookup.arch = Some(arch.clone());
        Ok(arch)
    }

    async fn agnostic_archs(
        &self,
        lookup: &mut Lookup<'_>,
    ) -> Result<Vec<Architecture>, ResolveError> {
        if let Some(archs) = &lookup.agnostic {
            return Ok(archs.clone());
        }
        let archs = self.catalog.agnostic_architectures().await?;
        lookup.agnostic = Some(archs.clone());
        Ok(archs)
    }

    async fn arch_set(&self, lookup: &mut Lookup<'_>) -> Result<ArchSet, ResolveError> {
        if let Some(set) = &lookup.arch_set {
            return Ok(set.clone());
        }
        let requested = self.requested_arch(lookup).await?;
        let agnostic = self.agnostic_archs(lookup).await?;
        let set = ArchSet::for_requested(requested, agnostic);
        lookup.arch_set = Some(set.clone());
        Ok(set)
    }
}
