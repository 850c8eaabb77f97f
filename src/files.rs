//! Package file lists.

use serde::Serialize;

use crate::catalog::PackageCatalog;
use crate::error::ResolveError;
use crate::model::{LookupKey, PackageFile, repo_key};

/// The files shipped by one package, in the order they were stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileListing {
    pub pkgname: String,
    pub repo: String,
    pub arch: String,
    pub files: Vec<PackageFile>,
    pub dir_count: usize,
    pub files_count: usize,
}

impl FileListing {
    fn new(key: &LookupKey, files: Vec<PackageFile>) -> Self {
        let dir_count = files.iter().filter(|f| f.is_directory).count();
        Self {
            pkgname: key.name.clone(),
            repo: repo_key(&key.repo),
            arch: key.arch.to_lowercase(),
            files_count: files.len() - dir_count,
            dir_count,
            files,
        }
    }
}

/// File list of the package with exactly this identity, or `None` when there
/// is no such package. No fallback is attempted.
pub async fn file_listing(
    catalog: &dyn PackageCatalog,
    key: &LookupKey,
) -> Result<Option<FileListing>, ResolveError> {
    let files = catalog.find_files(&key.name, &key.repo, &key.arch).await?;
    Ok(files.map(|files| FileListing::new(key, files)))
}
