use serde::{Deserialize, Serialize};
use std::fmt;
use url::form_urlencoded;

/// Search page the presentation layer falls back to for incomplete lookups.
pub const SEARCH_PATH: &str = "/packages/";

/// The identity a caller asks for: package name, repository and architecture.
///
/// Any field may be blank; a blank field turns the lookup into a search.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LookupKey {
    pub name: String,
    pub repo: String,
    pub arch: String,
}

impl LookupKey {
    pub fn new(name: impl Into<String>, repo: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            repo: repo.into(),
            arch: arch.into(),
        }
    }

    /// True when name, repo and arch are all non-empty.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.repo.is_empty() && !self.arch.is_empty()
    }

    /// Search URL built from the non-blank fields.
    ///
    /// `arch` and `repo` are lower-cased; the name is passed through as `q`.
    pub fn search_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        let fields = [
            ("arch", self.arch.to_lowercase()),
            ("repo", self.repo.to_lowercase()),
            ("q", self.name.clone()),
        ];
        for (key, value) in fields.iter().filter(|(_, v)| !v.is_empty()) {
            query.append_pair(key, value);
        }
        format!("{}?{}", SEARCH_PATH, query.finish())
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.repo, self.arch, self.name)
    }
}
