//! Maps resolution results to HTTP-style responses.

use serde::Serialize;

use crate::error::ResolveError;
use crate::resolver::ResolutionOutcome;

pub const OK: u16 = 200;
pub const MOVED_PERMANENTLY: u16 = 301;
pub const FOUND: u16 = 302;
pub const NOT_FOUND: u16 = 404;
pub const GONE: u16 = 410;
pub const SERVICE_UNAVAILABLE: u16 = 503;

/// Status and optional redirect location for a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Response {
    fn status(status: u16) -> Self {
        Self {
            status,
            location: None,
        }
    }

    fn redirect(status: u16, location: String) -> Self {
        Self {
            status,
            location: Some(location),
        }
    }

    pub fn from_outcome(outcome: &ResolutionOutcome) -> Self {
        match outcome {
            ResolutionOutcome::Found { .. } | ResolutionOutcome::SplitPackageListing { .. } => {
                Self::status(OK)
            }
            ResolutionOutcome::RedirectCanonical { package } => {
                Self::redirect(MOVED_PERMANENTLY, package.canonical_path())
            }
            ResolutionOutcome::SearchFallback { key } => Self::redirect(FOUND, key.search_query()),
            ResolutionOutcome::RecentlyRemoved { .. } => Self::status(GONE),
            ResolutionOutcome::NotFound => Self::status(NOT_FOUND),
        }
    }

    pub fn from_error(err: &ResolveError) -> Self {
        match err {
            ResolveError::InvalidArchitecture(_) => Self::status(NOT_FOUND),
            ResolveError::DataSourceUnavailable(_) => Self::status(SERVICE_UNAVAILABLE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PackageCatalog, SnapshotCatalog};
    use crate::model::LookupKey;
    use crate::test_utils::{days_ago, fixture_snapshot, update_record};

    #[tokio::test]
    async fn test_found_and_redirect() {
        let catalog = SnapshotCatalog::new(fixture_snapshot()).unwrap();
        let package = catalog
            .find_exact("ca-certificates", "core", "any")
            .await
            .unwrap()
            .unwrap();

        let found = Response::from_outcome(&ResolutionOutcome::Found {
            package: package.clone(),
        });
        assert_eq!(found.status, OK);
        assert_eq!(found.location, None);

        let redirect = Response::from_outcome(&ResolutionOutcome::RedirectCanonical { package });
        assert_eq!(redirect.status, MOVED_PERMANENTLY);
        assert_eq!(
            redirect.location.as_deref(),
            Some("/packages/core/any/ca-certificates/")
        );
    }

    #[test]
    fn test_search_fallback_redirects_to_search() {
        let outcome = ResolutionOutcome::SearchFallback {
            key: LookupKey::new("foo", "Core", ""),
        };
        let response = Response::from_outcome(&outcome);
        assert_eq!(response.status, FOUND);
        assert_eq!(response.location.as_deref(), Some("/packages/?repo=core&q=foo"));
    }

    #[test]
    fn test_gone_and_not_found() {
        let removed = ResolutionOutcome::RecentlyRemoved {
            update: update_record(1, "foo", "core", "x86_64", days_ago(1)),
        };
        assert_eq!(Response::from_outcome(&removed).status, GONE);
        assert_eq!(
            Response::from_outcome(&ResolutionOutcome::NotFound).status,
            NOT_FOUND
        );
    }

    #[test]
    fn test_errors() {
        let invalid = ResolveError::InvalidArchitecture("sparc".into());
        assert_eq!(Response::from_error(&invalid).status, NOT_FOUND);

        let unavailable = ResolveError::DataSourceUnavailable(anyhow::anyhow!("down"));
        assert_eq!(Response::from_error(&unavailable).status, SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_serialize_skips_missing_location() {
        let json = serde_json::to_string(&Response::status(GONE)).unwrap();
        assert_eq!(json, r#"{"status":410}"#);
    }
}
