//! Domain model for package identity resolution.
//!
//! These are plain data types: packages as they are currently published,
//! the architectures and repositories they live in, and the historical
//! update records left behind when packages are removed or moved.

pub mod arch;
pub mod lookup;
pub mod package;
pub mod update;

use chrono::{DateTime, Utc};

pub use arch::*;
pub use lookup::*;
pub use package::*;
pub use update::*;

/// Point in time used for history records and the resolver clock.
pub type Timestamp = DateTime<Utc>;
