use crate::catalog::CatalogSource;
use crate::declaration::{DeclarationParser, VersionSpec};
use crate::error::ResolveError;
use crate::matcher;
use crate::policy::{RubyPolicy, VersionPolicy};
use crate::source::{select_source, DeclarationSource, SourceRequest};
use std::fmt;

/// A declaration together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub source: DeclarationSource,
    pub spec: VersionSpec,
}

/// Final engine and catalog entry for one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub engine: String,
    /// Version as requested, possibly a prefix or empty.
    pub requested: String,
    /// Entry taken verbatim from the catalog.
    pub version: String,
    pub platform: String,
    pub source: DeclarationSource,
}

impl Resolution {
    /// `<engine>-<version>`, the identifier handed to installers.
    pub fn identifier(&self) -> String {
        format!("{}-{}", self.engine, self.version)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

/// Runs source selection, declaration parsing and catalog matching.
///
/// Every input is explicit: the working directory lives in the
/// [`SourceRequest`] and the platform is passed per call, so resolutions
/// never depend on process-wide state.
#[derive(Debug, Clone, Default)]
pub struct Resolver<P = RubyPolicy> {
    parser: DeclarationParser,
    policy: P,
}

impl<P: VersionPolicy> Resolver<P> {
    pub fn new(parser: DeclarationParser, policy: P) -> Self {
        Self { parser, policy }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn detect(&self, request: &SourceRequest) -> Result<Declaration, ResolveError> {
        let source = select_source(request)?;
        let spec = self.parser.parse(&source, &self.policy)?;
        Ok(Declaration { source, spec })
    }

    pub fn resolve(
        &self,
        request: &SourceRequest,
        catalog: &dyn CatalogSource,
        platform: &str,
    ) -> Result<Resolution, ResolveError> {
        let Declaration { source, spec } = self.detect(request)?;
        let version = matcher::resolve_from_source(
            catalog,
            platform,
            &spec.engine,
            &spec.version_prefix,
            &self.policy,
        )?;

        Ok(Resolution {
            version: version.to_string(),
            engine: spec.engine,
            requested: spec.version_prefix,
            platform: platform.to_string(),
            source,
        })
    }
}
