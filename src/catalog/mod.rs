//! Data sources the resolver queries.
//!
//! The resolver never builds ad-hoc queries. Every lookup it needs is a typed
//! method with a fixed predicate on one of two traits:
//!
//! - [`PackageCatalog`] - currently published packages, repositories and architectures
//! - [`PackageHistory`] - append-only package update records
//!
//! [`SnapshotCatalog`] implements both over an in-memory [`Snapshot`].

mod snapshot;

use anyhow::Result;
use async_trait::async_trait;

use crate::model::{
    Architecture, Package, PackageFile, Repo, RepoScope, Timestamp, UpdateRecord,
};

pub use snapshot::{PackageRow, Snapshot, SnapshotCatalog};

/// Which package field a [`PackageQuery`] matches the name against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    Pkgname,
    Pkgbase,
}

/// Fixed-shape multi-package query.
///
/// Matches packages where `field == name`, the repository name equals one of
/// `repos` (case-insensitive) and the architecture name is one of `archs`.
/// Results are ordered by `pkgname` ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageQuery {
    pub field: NameField,
    pub name: String,
    pub repos: Vec<String>,
    pub archs: Vec<String>,
}

/// Number of packages in one group for one architecture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub name: String,
    pub arch: String,
    pub count: usize,
}

/// Current package database.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageCatalog: Send + Sync {
    /// Package with exactly this name and arch, in the named repo (case-insensitive).
    async fn find_exact(&self, name: &str, repo: &str, arch: &str) -> Result<Option<Package>>;

    /// All packages matching `query`, ordered by package name.
    async fn find_by_arch_set(&self, query: &PackageQuery) -> Result<Vec<Package>>;

    /// Architecture with exactly this name.
    async fn resolve_architecture(&self, name: &str) -> Result<Option<Architecture>>;

    /// Every agnostic architecture.
    async fn agnostic_architectures(&self) -> Result<Vec<Architecture>>;

    /// Every non-agnostic architecture, ordered by name.
    async fn concrete_architectures(&self) -> Result<Vec<Architecture>>;

    /// Repository with this name (case-insensitive).
    async fn resolve_repo(&self, name: &str) -> Result<Option<Repo>>;

    /// Every repository sharing the given (testing, staging) scope.
    async fn repos_with_scope(&self, scope: RepoScope) -> Result<Vec<Repo>>;

    /// Packages belonging to `group` with an architecture in `archs`, ordered by name.
    async fn find_by_group(&self, group: &str, archs: &[String]) -> Result<Vec<Package>>;

    /// Package counts per (group, arch) over packages with an architecture in
    /// `archs`, ordered by group name then arch name.
    async fn find_groups(&self, archs: &[String]) -> Result<Vec<GroupCount>>;

    /// File list of the package with this exact identity, in stored order.
    /// `None` when no such package exists.
    async fn find_files(
        &self,
        name: &str,
        repo: &str,
        arch: &str,
    ) -> Result<Option<Vec<PackageFile>>>;
}

/// Package update history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageHistory: Send + Sync {
    /// Update records for `pkgname` in the named repo (case-insensitive) with an
    /// architecture in `archs`, created at or after `since` when given.
    async fn recent_removals(
        &self,
        pkgname: &str,
        repo: &str,
        archs: &[String],
        since: Option<Timestamp>,
    ) -> Result<Vec<UpdateRecord>>;
}
