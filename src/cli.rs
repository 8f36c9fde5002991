use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::source::{SourceRequest, VersionSelector, DEFAULT_LOCKFILE};

/// Ruby version picker - resolve the Ruby to install from project files
///
/// rbpick reads the version a project asks for (explicit input, `.ruby-version`,
/// `.tool-versions` or the `RUBY VERSION` section of a lockfile) and matches it
/// against the builds available for the current platform, printing the exact
/// `<engine>-<version>` to install.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/rbpick/config.toml)
    #[arg(long, global = true, value_name = "PATH", env = "RBPICK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the declared version against the catalog
    ///
    /// Prints `<engine>-<version>` for the matching catalog entry.
    Resolve {
        #[command(flatten)]
        declaration: DeclarationArgs,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Show the declared engine and version without consulting a catalog
    Detect {
        #[command(flatten)]
        declaration: DeclarationArgs,
    },

    /// List catalog versions for an engine, newest first
    List {
        /// Engine name (lists available engines if not specified)
        #[arg(value_name = "ENGINE")]
        engine: Option<String>,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Validate the catalog file
    Check {
        /// Catalog file (defaults to the configured catalog)
        #[arg(long, value_name = "PATH", env = "RBPICK_CATALOG")]
        catalog: Option<PathBuf>,
    },
}

/// Where the requested version comes from.
#[derive(Args, Debug, Clone)]
pub struct DeclarationArgs {
    /// Version to use: a version or prefix (`3.2`), `engine-version`, an engine
    /// name, `.ruby-version`, `.tool-versions`, or `default` to read project files
    #[arg(
        short = 'r',
        long = "ruby-version",
        value_name = "VERSION",
        env = "RBPICK_RUBY_VERSION",
        default_value = "default"
    )]
    pub ruby_version: String,

    /// Read the version from this lockfile when VERSION is `default`
    #[arg(
        long,
        value_name = "PATH",
        env = "RBPICK_LOCKFILE",
        num_args = 0..=1,
        default_missing_value = DEFAULT_LOCKFILE
    )]
    pub lockfile: Option<PathBuf>,

    /// Project directory containing the version files
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,
}

impl DeclarationArgs {
    pub fn request(&self) -> SourceRequest {
        let selector = self
            .ruby_version
            .trim()
            .parse::<VersionSelector>()
            .unwrap_or_else(|never| match never {});
        SourceRequest::new(selector, self.dir.clone()).with_lockfile(self.lockfile.clone())
    }
}

/// Which catalog to match against.
#[derive(Args, Debug, Clone, Default)]
pub struct CatalogArgs {
    /// Catalog file listing available versions per platform and engine
    #[arg(long, value_name = "PATH", env = "RBPICK_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Platform identifier (defaults to the current platform)
    #[arg(long, value_name = "PLATFORM", env = "RBPICK_PLATFORM")]
    pub platform: Option<String>,
}
