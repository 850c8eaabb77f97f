//! Package group listings.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::PackageCatalog;
use crate::error::ResolveError;
use crate::model::{Architecture, Package};
use crate::resolver::ArchSet;

/// Packages in a group for one architecture, agnostic packages included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupListing {
    pub group: String,
    pub arch: Architecture,
    pub packages: Vec<Package>,
}

/// List the members of `group` available on `arch`, ordered by package name.
///
/// Returns `None` when the group has no packages for that architecture.
pub async fn group_listing(
    catalog: &dyn PackageCatalog,
    arch: &str,
    group: &str,
) -> Result<Option<GroupListing>, ResolveError> {
    let requested = catalog
        .resolve_architecture(arch)
        .await?
        .ok_or_else(|| ResolveError::InvalidArchitecture(arch.to_string()))?;
    let agnostic = catalog.agnostic_architectures().await?;
    let arch_set = ArchSet::for_requested(requested, agnostic);

    let packages = catalog.find_by_group(group, &arch_set.names()).await?;
    if packages.is_empty() {
        return Ok(None);
    }

    Ok(Some(GroupListing {
        group: group.to_string(),
        arch: arch_set.requested().clone(),
        packages,
    }))
}

/// Size of one group on one concrete architecture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub name: String,
    pub arch: String,
    pub count: usize,
}

/// Every group with its package count per concrete architecture, ordered by
/// group name then arch.
///
/// Agnostic members count toward each concrete architecture. With `arch`
/// given only that architecture is listed; it must exist and must not be
/// agnostic.
pub async fn group_overview(
    catalog: &dyn PackageCatalog,
    arch: Option<&str>,
) -> Result<Vec<GroupSummary>, ResolveError> {
    let concrete = match arch {
        Some(name) => {
            let arch = catalog
                .resolve_architecture(name)
                .await?
                .filter(|a| !a.agnostic)
                .ok_or_else(|| ResolveError::InvalidArchitecture(name.to_string()))?;
            vec![arch]
        }
        None => catalog.concrete_architectures().await?,
    };
    let agnostic = catalog.agnostic_architectures().await?;
    let names: Vec<String> = concrete
        .iter()
        .chain(&agnostic)
        .map(|a| a.name.clone())
        .collect();

    let mut totals: BTreeMap<(String, String), usize> = BTreeMap::new();
    for group in catalog.find_groups(&names).await? {
        if agnostic.iter().any(|a| a.name == group.arch) {
            for arch in &concrete {
                *totals
                    .entry((group.name.clone(), arch.name.clone()))
                    .or_default() += group.count;
            }
        } else {
            *totals.entry((group.name, group.arch)).or_default() += group.count;
        }
    }

    Ok(totals
        .into_iter()
        .map(|((name, arch), count)| GroupSummary { name, arch, count })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SnapshotCatalog;
    use crate::test_utils::{fixture_snapshot, package_row};

    #[tokio::test]
    async fn test_group_listing_includes_agnostic_members() {
        let catalog = SnapshotCatalog::new(fixture_snapshot()).unwrap();
        let listing = group_listing(&catalog, "x86_64", "base").await.unwrap().unwrap();
        let names: Vec<_> = listing.packages.iter().map(|p| p.pkgname.as_str()).collect();
        assert_eq!(names, vec!["ca-certificates", "glibc"]);
        assert_eq!(listing.arch.name, "x86_64");
    }

    #[tokio::test]
    async fn test_group_listing_excludes_other_arches() {
        let catalog = SnapshotCatalog::new(fixture_snapshot()).unwrap();
        let listing = group_listing(&catalog, "i686", "base").await.unwrap().unwrap();
        let names: Vec<_> = listing.packages.iter().map(|p| p.pkgname.as_str()).collect();
        assert_eq!(names, vec!["ca-certificates"]);
    }

    #[tokio::test]
    async fn test_empty_group_is_none() {
        let catalog = SnapshotCatalog::new(fixture_snapshot()).unwrap();
        assert!(group_listing(&catalog, "x86_64", "xorg").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_arch_is_invalid() {
        let catalog = SnapshotCatalog::new(fixture_snapshot()).unwrap();
        let err = group_listing(&catalog, "sparc", "base").await.unwrap_err();
        assert!(matches!(err, ResolveError::InvalidArchitecture(_)));
    }

    #[tokio::test]
    async fn test_group_overview_adds_agnostic_members_to_every_arch() {
        let mut snapshot = fixture_snapshot();
        let mut xterm = package_row("xterm", None, "extra", "i686");
        xterm.groups = vec!["xorg".to_string()];
        snapshot.packages.push(xterm);
        let catalog = SnapshotCatalog::new(snapshot).unwrap();

        let overview = group_overview(&catalog, None).await.unwrap();
        let rows: Vec<_> = overview
            .iter()
            .map(|g| (g.name.as_str(), g.arch.as_str(), g.count))
            .collect();
        assert_eq!(
            rows,
            vec![("base", "i686", 1), ("base", "x86_64", 2), ("xorg", "i686", 1)]
        );
    }

    #[tokio::test]
    async fn test_group_overview_for_one_arch() {
        let catalog = SnapshotCatalog::new(fixture_snapshot()).unwrap();
        let overview = group_overview(&catalog, Some("x86_64")).await.unwrap();
        assert_eq!(
            overview,
            vec![GroupSummary {
                name: "base".to_string(),
                arch: "x86_64".to_string(),
                count: 2,
            }]
        );
    }

    #[tokio::test]
    async fn test_group_overview_rejects_agnostic_and_unknown_arch() {
        let catalog = SnapshotCatalog::new(fixture_snapshot()).unwrap();
        for arch in ["any", "sparc"] {
            let err = group_overview(&catalog, Some(arch)).await.unwrap_err();
            assert!(matches!(err, ResolveError::InvalidArchitecture(ref a) if a == arch));
        }
    }
}
