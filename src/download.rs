//! Download locations for published packages.
//!
//! Mirrors lay packages out as `{mirror}{repo}/os/{arch}/{filename}`. Agnostic
//! packages are stored under every concrete architecture, so one concrete
//! architecture is picked to stand in for them. Choosing the mirror itself is
//! up to the caller.

use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::catalog::PackageCatalog;
use crate::error::ResolveError;
use crate::model::{LookupKey, Package, repo_key};
use crate::resolver::{Resolver, canonical_concrete};

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Package not found: {0}")]
    PackageNotFound(LookupKey),

    #[error("No concrete architecture available for agnostic package {0}")]
    NoConcreteArchitecture(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Where a package file can be fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadTarget {
    pub url: String,
    pub repo: String,
    pub arch: String,
    pub filename: String,
}

/// The architecture directory a package is downloaded from.
///
/// Concrete packages use their own architecture; agnostic ones use the first
/// concrete architecture by name.
pub async fn canonical_arch(
    package: &Package,
    catalog: &dyn PackageCatalog,
) -> Result<String, DownloadError> {
    if !package.arch.agnostic {
        return Ok(package.arch.name.clone());
    }

    let concrete = catalog
        .concrete_architectures()
        .await
        .map_err(ResolveError::from)?;
    canonical_concrete(&concrete)
        .map(|a| a.name.clone())
        .ok_or_else(|| DownloadError::NoConcreteArchitecture(package.pkgname.clone()))
}

/// Download target for the package with exactly this identity.
pub async fn download_target(
    resolver: &Resolver,
    key: &LookupKey,
    mirror: &str,
) -> Result<DownloadTarget, DownloadError> {
    let package = resolver
        .find_exact(&key.name, &key.repo, &key.arch)
        .await?
        .ok_or_else(|| DownloadError::PackageNotFound(key.clone()))?;

    let arch = canonical_arch(&package, resolver.catalog()).await?;
    let repo = repo_key(&package.repo.name);
    let host = if mirror.ends_with('/') {
        mirror.to_string()
    } else {
        format!("{}/", mirror)
    };

    let url = format!("{}{}/os/{}/{}", host, repo, arch, package.filename);
    debug!("Download target for {}: {}", key, url);

    Ok(DownloadTarget {
        url,
        repo,
        arch,
        filename: package.filename,
    })
}
