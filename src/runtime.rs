//! Runtime abstraction over the process environment.
//!
//! The CLI reads snapshots and the wall clock through this trait so that the
//! resolution path can be driven with a fixed clock in tests.

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::Path;

use crate::model::Timestamp;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // File System
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn exists(&self, path: &Path) -> bool;

    // Clock
    fn now(&self) -> Timestamp;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    #[tracing::instrument(skip(self))]
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read file to string: {:?}", path))
    }

    #[tracing::instrument(skip(self))]
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn now(&self) -> Timestamp {
        Utc::now()
    }
}
