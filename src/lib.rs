// Public API
pub mod cli;
pub mod commands;

// Core domain types
pub mod catalog;
mod config;
pub mod declaration;
mod error;
pub mod lockfile;
pub mod matcher;
pub mod platform;
pub mod policy;
pub mod resolver;
pub mod source;
mod ui;
mod util;

// Re-export main types
pub use catalog::{CatalogFile, CatalogSource};
pub use config::Config;
pub use declaration::{DeclarationParser, VersionSpec};
pub use error::ResolveError;
pub use lockfile::{LockfileHeader, LockfilePattern};
pub use policy::{RubyPolicy, VersionPolicy};
pub use resolver::{Declaration, Resolution, Resolver};
pub use source::{DeclarationSource, SourceRequest, VersionSelector};
