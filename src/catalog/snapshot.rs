//! In-memory package database loaded from a JSON snapshot.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use super::{GroupCount, NameField, PackageCatalog, PackageHistory, PackageQuery};
use crate::model::{
    Architecture, Package, PackageFile, Repo, RepoScope, Timestamp, UpdateRecord, repo_key,
};
use crate::runtime::Runtime;

/// A package as stored in a snapshot, referring to its repo and arch by name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PackageRow {
    pub pkgname: String,
    /// Defaults to `pkgname` when absent
    #[serde(default)]
    pub pkgbase: Option<String>,
    #[serde(default)]
    pub pkgver: String,
    #[serde(default)]
    pub pkgrel: String,
    pub repo: String,
    pub arch: String,
    #[serde(default)]
    pub packager: Option<String>,
    #[serde(default)]
    pub filename: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    /// Kept in the order given; listings preserve it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<PackageFile>,
}

/// Serialized package database: catalog tables plus update history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    #[serde(default)]
    pub architectures: Vec<Architecture>,
    #[serde(default)]
    pub repos: Vec<Repo>,
    #[serde(default)]
    pub packages: Vec<PackageRow>,
    #[serde(default)]
    pub updates: Vec<UpdateRecord>,
}

impl Snapshot {
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime.read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot {:?}", path))?;
        debug!(
            "Loaded snapshot {:?}: {} packages, {} updates",
            path,
            snapshot.packages.len(),
            snapshot.updates.len()
        );
        Ok(snapshot)
    }
}

/// Exact-lookup index key: (pkgname, case-folded repo name, arch name).
type IdentityKey = (String, String, String);

/// [`PackageCatalog`] and [`PackageHistory`] backed by a [`Snapshot`].
///
/// Package rows are joined with their repo and arch when the catalog is
/// built, so every reference must resolve.
#[derive(Debug)]
pub struct SnapshotCatalog {
    architectures: Vec<Architecture>,
    repos: Vec<Repo>,
    packages: Vec<Package>,
    /// File lists, indexed like `packages`
    files: Vec<Vec<PackageFile>>,
    by_identity: HashMap<IdentityKey, usize>,
    updates: Vec<UpdateRecord>,
}

impl SnapshotCatalog {
    pub fn new(snapshot: Snapshot) -> Result<Self> {
        let Snapshot {
            architectures,
            repos,
            packages: rows,
            updates,
        } = snapshot;

        let mut packages = Vec::with_capacity(rows.len());
        let mut files = Vec::with_capacity(rows.len());
        let mut by_identity = HashMap::with_capacity(rows.len());

        for row in rows {
            let repo = repos
                .iter()
                .find(|r| r.is_named(&row.repo))
                .cloned()
                .with_context(|| {
                    format!("Package {} refers to unknown repo {}", row.pkgname, row.repo)
                })?;
            let arch = architectures
                .iter()
                .find(|a| a.name == row.arch)
                .cloned()
                .with_context(|| {
                    format!("Package {} refers to unknown arch {}", row.pkgname, row.arch)
                })?;

            let key = identity_key(&row.pkgname, &repo.name, &arch.name);
            if by_identity.contains_key(&key) {
                anyhow::bail!(
                    "Duplicate package {} in {}/{}",
                    row.pkgname,
                    repo.name,
                    arch.name
                );
            }
            by_identity.insert(key, packages.len());

            files.push(row.files);
            packages.push(Package {
                pkgbase: row.pkgbase.unwrap_or_else(|| row.pkgname.clone()),
                pkgname: row.pkgname,
                pkgver: row.pkgver,
                pkgrel: row.pkgrel,
                repo,
                arch,
                packager: row.packager,
                filename: row.filename,
                groups: row.groups,
            });
        }

        Ok(Self {
            architectures,
            repos,
            packages,
            files,
            by_identity,
            updates,
        })
    }

    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let snapshot = Snapshot::load(runtime, path)?;
        Self::new(snapshot).with_context(|| format!("Invalid snapshot {:?}", path))
    }

    fn sorted(mut packages: Vec<Package>) -> Vec<Package> {
        packages.sort_by(|a, b| {
            a.pkgname
                .cmp(&b.pkgname)
                .then_with(|| a.repo.name.cmp(&b.repo.name))
                .then_with(|| a.arch.name.cmp(&b.arch.name))
        });
        packages
    }
}

fn identity_key(pkgname: &str, repo: &str, arch: &str) -> IdentityKey {
    (pkgname.to_string(), repo_key(repo), arch.to_string())
}

fn repo_in(repos: &[String], repo: &Repo) -> bool {
    repos.iter().any(|name| repo.is_named(name))
}

fn arch_in(archs: &[String], arch: &str) -> bool {
    archs.iter().any(|name| name == arch)
}

#[async_trait]
impl PackageCatalog for SnapshotCatalog {
    async fn find_exact(&self, name: &str, repo: &str, arch: &str) -> Result<Option<Package>> {
        Ok(self
            .by_identity
            .get(&identity_key(name, repo, arch))
            .map(|&idx| self.packages[idx].clone()))
    }

    async fn find_by_arch_set(&self, query: &PackageQuery) -> Result<Vec<Package>> {
        let matches = self
            .packages
            .iter()
            .filter(|p| match query.field {
                NameField::Pkgname => p.pkgname == query.name,
                NameField::Pkgbase => p.pkgbase == query.name,
            })
            .filter(|p| repo_in(&query.repos, &p.repo))
            .filter(|p| arch_in(&query.archs, &p.arch.name))
            .cloned()
            .collect();
        Ok(Self::sorted(matches))
    }

    async fn resolve_architecture(&self, name: &str) -> Result<Option<Architecture>> {
        Ok(self.architectures.iter().find(|a| a.name == name).cloned())
    }

    async fn agnostic_architectures(&self) -> Result<Vec<Architecture>> {
        Ok(self
            .architectures
            .iter()
            .filter(|a| a.agnostic)
            .cloned()
            .collect())
    }

    async fn concrete_architectures(&self) -> Result<Vec<Architecture>> {
        let mut archs: Vec<Architecture> = self
            .architectures
            .iter()
            .filter(|a| !a.agnostic)
            .cloned()
            .collect();
        archs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(archs)
    }

    async fn resolve_repo(&self, name: &str) -> Result<Option<Repo>> {
        Ok(self.repos.iter().find(|r| r.is_named(name)).cloned())
    }

    async fn repos_with_scope(&self, scope: RepoScope) -> Result<Vec<Repo>> {
        Ok(self
            .repos
            .iter()
            .filter(|r| r.scope() == scope)
            .cloned()
            .collect())
    }

    async fn find_by_group(&self, group: &str, archs: &[String]) -> Result<Vec<Package>> {
        let matches = self
            .packages
            .iter()
            .filter(|p| p.groups.iter().any(|g| g == group))
            .filter(|p| arch_in(archs, &p.arch.name))
            .cloned()
            .collect();
        Ok(Self::sorted(matches))
    }

    async fn find_groups(&self, archs: &[String]) -> Result<Vec<GroupCount>> {
        let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
        for package in self.packages.iter().filter(|p| arch_in(archs, &p.arch.name)) {
            for group in &package.groups {
                *counts
                    .entry((group.as_str(), package.arch.name.as_str()))
                    .or_default() += 1;
            }
        }
        Ok(counts
            .into_iter()
            .map(|((name, arch), count)| GroupCount {
                name: name.to_string(),
                arch: arch.to_string(),
                count,
            })
            .collect())
    }

    async fn find_files(
        &self,
        name: &str,
        repo: &str,
        arch: &str,
    ) -> Result<Option<Vec<PackageFile>>> {
        Ok(self
            .by_identity
            .get(&identity_key(name, repo, arch))
            .map(|&idx| self.files[idx].clone()))
    }
}

#[async_trait]
impl PackageHistory for SnapshotCatalog {
    async fn recent_removals(
        &self,
        pkgname: &str,
        repo: &str,
        archs: &[String],
        since: Option<Timestamp>,
    ) -> Result<Vec<UpdateRecord>> {
        let repo = repo_key(repo);
        Ok(self
            .updates
            .iter()
            .filter(|u| u.pkgname == pkgname)
            .filter(|u| repo_key(&u.repo) == repo)
            .filter(|u| arch_in(archs, &u.arch))
            .filter(|u| since.is_none_or(|when| u.created >= when))
            .cloned()
            .collect())
    }
}
