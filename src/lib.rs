pub mod catalog;
pub mod config;
pub mod download;
pub mod error;
pub mod files;
pub mod group;
pub mod model;
pub mod resolver;
pub mod response;
pub mod runtime;

pub use config::ResolverConfig;
pub use error::ResolveError;
pub use model::LookupKey;
pub use resolver::{ResolutionOutcome, Resolver};
