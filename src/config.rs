//! Resolver configuration.

use chrono::Duration;

/// How far back the recently-removed check looks, by default.
pub const DEFAULT_REMOVAL_CUTOFF_DAYS: i64 = 60;

/// Tunables for [`Resolver`](crate::resolver::Resolver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Only history records created within this window count as "recently
    /// removed". `None` disables the time filter entirely.
    pub removal_cutoff: Option<Duration>,
}

impl ResolverConfig {
    /// Cutoff of `days` days; values beyond chrono's range saturate.
    pub fn with_cutoff_days(days: i64) -> Self {
        Self {
            removal_cutoff: Some(Duration::try_days(days).unwrap_or(Duration::MAX)),
        }
    }

    pub fn without_cutoff() -> Self {
        Self {
            removal_cutoff: None,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::with_cutoff_days(DEFAULT_REMOVAL_CUTOFF_DAYS)
    }
}
