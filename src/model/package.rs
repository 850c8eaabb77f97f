use serde::{Deserialize, Serialize};

use super::{Architecture, LookupKey};

/// The (testing, staging) flag pair of a repository.
///
/// Split-package matching treats every repository with the same scope as
/// equivalent, regardless of its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoScope {
    pub testing: bool,
    pub staging: bool,
}

/// A package repository (e.g. `core`, `extra`, `testing`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Repo {
    pub name: String,
    #[serde(default)]
    pub testing: bool,
    #[serde(default)]
    pub staging: bool,
}

impl Repo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            testing: false,
            staging: false,
        }
    }

    pub fn testing(name: impl Into<String>) -> Self {
        Self {
            testing: true,
            ..Self::new(name)
        }
    }

    pub fn staging(name: impl Into<String>) -> Self {
        Self {
            staging: true,
            ..Self::new(name)
        }
    }

    pub fn scope(&self) -> RepoScope {
        RepoScope {
            testing: self.testing,
            staging: self.staging,
        }
    }

    /// Repository names are compared case-insensitively.
    pub fn is_named(&self, name: &str) -> bool {
        repo_key(&self.name) == repo_key(name)
    }
}

/// Case-folded form of a repository name, used wherever repos are matched
/// by name. Folds non-ASCII letters too.
pub fn repo_key(name: &str) -> String {
    name.to_lowercase()
}

/// One entry of a package's file list. Directories are listed as entries of
/// their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageFile {
    pub path: String,
    #[serde(default)]
    pub is_directory: bool,
}

impl PackageFile {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_directory: false,
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_directory: true,
        }
    }
}

/// A currently published package, joined with its repository and architecture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub pkgname: String,
    pub pkgbase: String,
    pub pkgver: String,
    pub pkgrel: String,
    pub repo: Repo,
    pub arch: Architecture,
    pub packager: Option<String>,
    pub filename: String,
    pub groups: Vec<String>,
}

impl Package {
    /// The lookup key that addresses exactly this package.
    pub fn identity(&self) -> LookupKey {
        LookupKey::new(&self.pkgname, &self.repo.name, &self.arch.name)
    }

    /// Path of the package's details page under its canonical (repo, arch).
    pub fn canonical_path(&self) -> String {
        format!(
            "/packages/{}/{}/{}/",
            repo_key(&self.repo.name),
            self.arch.name,
            self.pkgname
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Package {
        Package {
            pkgname: "python-foo".into(),
            pkgbase: "python-foo".into(),
            pkgver: "1.2".into(),
            pkgrel: "3".into(),
            repo: Repo::new("Extra"),
            arch: Architecture::agnostic("any"),
            packager: None,
            filename: "python-foo-1.2-3-any.pkg.tar.zst".into(),
            groups: vec![],
        }
    }

    #[test]
    fn test_repo_is_named_ignores_case() {
        let repo = Repo::new("Extra");
        assert!(repo.is_named("extra"));
        assert!(repo.is_named("EXTRA"));
        assert!(!repo.is_named("core"));
    }

    #[test]
    fn test_repo_is_named_folds_unicode() {
        let repo = Repo::new("Ünstable");
        assert!(repo.is_named("ünstable"));
        assert!(repo.is_named("ÜNSTABLE"));
        assert_eq!(repo_key("Ärger"), "ärger");
    }

    #[test]
    fn test_repo_scope() {
        assert_eq!(
            Repo::testing("core-testing").scope(),
            RepoScope {
                testing: true,
                staging: false
            }
        );
        assert_eq!(Repo::new("core").scope(), Repo::new("extra").scope());
        assert_ne!(Repo::new("core").scope(), Repo::staging("staging").scope());
    }

    #[test]
    fn test_canonical_path_lowercases_repo() {
        assert_eq!(sample().canonical_path(), "/packages/extra/any/python-foo/");
    }

    #[test]
    fn test_identity() {
        let key = sample().identity();
        assert_eq!(key, LookupKey::new("python-foo", "Extra", "any"));
    }
}
