use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use log::debug;
use pkgresolve::catalog::SnapshotCatalog;
use pkgresolve::config::{DEFAULT_REMOVAL_CUTOFF_DAYS, ResolverConfig};
use pkgresolve::download::{DownloadError, download_target};
use pkgresolve::files::file_listing;
use pkgresolve::group::{group_listing, group_overview};
use pkgresolve::response::{self, Response};
use pkgresolve::runtime::{RealRuntime, Runtime};
use pkgresolve::{LookupKey, Resolver};
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// pkgresolve - package identity resolver
///
/// Resolves a package lookup (repo, arch, name) against a package database
/// snapshot and prints the result as JSON: the exact package, a canonical
/// redirect, a split package listing, a "recently removed" notice, a search
/// redirect, or not found.
///
/// Examples:
///   pkgresolve -s db.json details core x86_64 glibc
///   pkgresolve -s db.json download extra any python-foo --mirror https://mirror.example.org/
///   pkgresolve -s db.json groups x86_64
#[derive(Parser, Debug)]
#[command(author, version = env!("PKGRESOLVE_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Package database snapshot (JSON)
    #[arg(
        long = "snapshot",
        short = 's',
        env = "PKGRESOLVE_SNAPSHOT",
        value_name = "PATH",
        global = true
    )]
    snapshot: Option<PathBuf>,

    /// How many days back a removal still counts as recent
    #[arg(
        long = "cutoff-days",
        env = "PKGRESOLVE_CUTOFF_DAYS",
        value_name = "DAYS",
        default_value_t = DEFAULT_REMOVAL_CUTOFF_DAYS,
        value_parser = clap::value_parser!(i64).range(0..),
        global = true
    )]
    cutoff_days: i64,

    /// Consider removals of any age
    #[arg(long = "no-cutoff", global = true)]
    no_cutoff: bool,

    /// Resolve as of this time instead of now (RFC 3339)
    #[arg(long = "now", value_name = "TIME", global = true)]
    now: Option<DateTime<Utc>>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Resolve a package lookup through the full fallback chain
    Details(LookupArgs),

    /// Print the mirror download URL of an exact package
    Download(DownloadArgs),

    /// List the packages of a group for an architecture
    Group(GroupArgs),

    /// List every group with its size per architecture
    Groups(GroupsArgs),

    /// List the files of an exact package
    Files(LookupArgs),
}

#[derive(clap::Args, Debug)]
struct LookupArgs {
    /// Repository name (case-insensitive)
    #[arg(default_value = "")]
    repo: String,

    /// Architecture name
    #[arg(default_value = "")]
    arch: String,

    /// Package name
    #[arg(default_value = "")]
    name: String,
}

impl LookupArgs {
    fn key(&self) -> LookupKey {
        LookupKey::new(&self.name, &self.repo, &self.arch)
    }
}

#[derive(clap::Args, Debug)]
struct DownloadArgs {
    #[command(flatten)]
    lookup: LookupArgs,

    /// Mirror base URL
    #[arg(long = "mirror", value_name = "URL")]
    mirror: String,
}

#[derive(clap::Args, Debug)]
struct GroupArgs {
    /// Architecture name
    arch: String,

    /// Group name
    name: String,
}

#[derive(clap::Args, Debug)]
struct GroupsArgs {
    /// Only list groups for this (non-agnostic) architecture
    arch: Option<String>,
}

impl Cli {
    fn resolver_config(&self) -> ResolverConfig {
        if self.no_cutoff {
            ResolverConfig::without_cutoff()
        } else {
            ResolverConfig::with_cutoff_days(self.cutoff_days)
        }
    }
}

fn print_json(out: &mut impl Write, value: &serde_json::Value) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

async fn run<R: Runtime>(runtime: &R, cli: Cli, out: &mut impl Write) -> Result<()> {
    let snapshot = cli
        .snapshot
        .clone()
        .context("No snapshot given. Use --snapshot or set PKGRESOLVE_SNAPSHOT.")?;
    if !runtime.exists(&snapshot) {
        anyhow::bail!("Snapshot {:?} does not exist.", snapshot);
    }

    let catalog = Arc::new(SnapshotCatalog::load(runtime, &snapshot)?);
    let resolver = Resolver::new(catalog.clone(), catalog.clone(), cli.resolver_config());
    let now = cli.now.unwrap_or_else(|| runtime.now());
    debug!("Resolving as of {} with {:?}", now, resolver.config());

    match &cli.command {
        Commands::Details(args) => {
            let key = args.key();
            match resolver.resolve(&key, now).await {
                Ok(outcome) => {
                    let response = Response::from_outcome(&outcome);
                    print_json(out, &json!({ "response": response, "result": outcome }))
                }
                Err(err) => {
                    let response = Response::from_error(&err);
                    print_json(out, &json!({ "response": response, "error": err.to_string() }))?;
                    Err(err).with_context(|| format!("Failed to resolve {}", key))
                }
            }
        }
        Commands::Download(args) => {
            let key = args.lookup.key();
            match download_target(&resolver, &key, &args.mirror).await {
                Ok(target) => {
                    let response = Response {
                        status: response::FOUND,
                        location: Some(target.url.clone()),
                    };
                    print_json(out, &json!({ "response": response, "result": target }))
                }
                Err(err) => {
                    let status = match &err {
                        DownloadError::Resolve(e) => Response::from_error(e).status,
                        _ => response::NOT_FOUND,
                    };
                    let report = json!({ "response": { "status": status }, "error": err.to_string() });
                    print_json(out, &report)?;
                    Err(err).with_context(|| format!("Failed to locate download for {}", key))
                }
            }
        }
        Commands::Group(args) => {
            let listing = group_listing(catalog.as_ref(), &args.arch, &args.name).await?;
            let status = if listing.is_some() {
                response::OK
            } else {
                response::NOT_FOUND
            };
            print_json(out, &json!({ "response": { "status": status }, "result": listing }))
        }
        Commands::Groups(args) => {
            let arch = args.arch.as_deref();
            match group_overview(catalog.as_ref(), arch).await {
                Ok(groups) => {
                    let report = json!({ "response": { "status": response::OK }, "result": groups });
                    print_json(out, &report)
                }
                Err(err) => {
                    let response = Response::from_error(&err);
                    print_json(out, &json!({ "response": response, "error": err.to_string() }))?;
                    Err(err).context("Failed to list groups")
                }
            }
        }
        Commands::Files(args) => {
            let key = args.key();
            if !key.is_complete() {
                anyhow::bail!("A file listing needs a repo, an arch and a name.");
            }
            let listing = file_listing(catalog.as_ref(), &key)
                .await
                .with_context(|| format!("Failed to list files of {}", key))?;
            let status = if listing.is_some() {
                response::OK
            } else {
                response::NOT_FOUND
            };
            print_json(out, &json!({ "response": { "status": status }, "result": listing }))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;

    let stdout = std::io::stdout();
    run(&runtime, cli, &mut stdout.lock()).await
}
