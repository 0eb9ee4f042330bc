//! Version source resolution.
//!
//! Turns the user's description of what goes into an application version into
//! one validated [`SourceSpecification`] plus optional [`Filters`]. The
//! description comes either from a spec file (`--spec`, optionally with
//! `--spec-vars`) or from the five `--source-type-*` flags together with
//! `--include-filter` / `--exclude-filter`. The two modes are mutually
//! exclusive.

pub mod entries;
pub mod filters;
pub mod grammar;
pub mod spec_file;

use crate::constants::{
    EXCLUDE_FILTER_FLAG, INCLUDE_FILTER_FLAG, SOURCE_TYPE_APPLICATION_VERSIONS_FLAG,
    SOURCE_TYPE_ARTIFACTS_FLAG, SOURCE_TYPE_BUILDS_FLAG, SOURCE_TYPE_PACKAGES_FLAG,
    SOURCE_TYPE_RELEASE_BUNDLES_FLAG, SPEC_FLAG, SPEC_VARS_FLAG,
};
use crate::error::{Result, SourceError};
use crate::model::{Filters, SourceKind, SourceSpecification};
use clap::Args;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Raw source-related flag values, exactly as given on the command line.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFlags {
    /// Path to a JSON spec file describing the version sources
    #[arg(long = SPEC_FLAG)]
    pub spec: Option<PathBuf>,
    /// Variables substituted into the spec file, e.g. "KEY1=value1;KEY2=value2"
    #[arg(long = SPEC_VARS_FLAG)]
    pub spec_vars: Option<String>,
    /// Builds: "name=<n>,id=<id>[,started=<ts>][,repo-key=<r>][,include-deps=<bool>][;...]"
    #[arg(long = SOURCE_TYPE_BUILDS_FLAG)]
    pub builds: Option<String>,
    /// Release bundles: "name=<n>,version=<v>[,project-key=<p>][,repo-key=<r>][;...]"
    #[arg(long = SOURCE_TYPE_RELEASE_BUNDLES_FLAG)]
    pub release_bundles: Option<String>,
    /// Other application versions: "application-key=<k>,version=<v>[;...]"
    #[arg(long = SOURCE_TYPE_APPLICATION_VERSIONS_FLAG)]
    pub application_versions: Option<String>,
    /// Packages: "type=<t>,name=<n>,version=<v>,repo-key=<r>[;...]"
    #[arg(long = SOURCE_TYPE_PACKAGES_FLAG)]
    pub packages: Option<String>,
    /// Artifacts: "path=<p>[,sha256=<h>][;...]"
    #[arg(long = SOURCE_TYPE_ARTIFACTS_FLAG)]
    pub artifacts: Option<String>,
    /// Include filter, repeatable: "filter_type=package|artifact,..."
    #[arg(long = INCLUDE_FILTER_FLAG)]
    pub include_filters: Vec<String>,
    /// Exclude filter, repeatable: "filter_type=package|artifact,..."
    #[arg(long = EXCLUDE_FILTER_FLAG)]
    pub exclude_filters: Vec<String>,
}

impl SourceFlags {
    fn source_flag(&self, kind: SourceKind) -> Option<&str> {
        match kind {
            SourceKind::Build => self.builds.as_deref(),
            SourceKind::ReleaseBundle => self.release_bundles.as_deref(),
            SourceKind::ApplicationVersion => self.application_versions.as_deref(),
            SourceKind::Package => self.packages.as_deref(),
            SourceKind::Artifact => self.artifacts.as_deref(),
        }
    }

    fn set_source_kinds(&self) -> impl Iterator<Item = SourceKind> + '_ {
        SourceKind::ALL
            .into_iter()
            .filter(|kind| self.source_flag(*kind).is_some())
    }
}

/// `--spec` may not be combined with any source or filter flag.
pub fn validate_exclusivity(flags: &SourceFlags) -> Result<()> {
    if flags.spec.is_none() {
        return Ok(());
    }
    if let Some(kind) = flags.set_source_kinds().next() {
        return Err(SourceError::SpecWithSourceFlag { flag: kind.flag() });
    }
    if !flags.include_filters.is_empty() {
        return Err(SourceError::SpecWithFilterFlag {
            flag: INCLUDE_FILTER_FLAG,
        });
    }
    if !flags.exclude_filters.is_empty() {
        return Err(SourceError::SpecWithFilterFlag {
            flag: EXCLUDE_FILTER_FLAG,
        });
    }
    Ok(())
}

/// Either `--spec` or at least one source flag must be given.
pub fn validate_presence(flags: &SourceFlags) -> Result<()> {
    if flags.spec.is_some() || flags.set_source_kinds().next().is_some() {
        Ok(())
    } else {
        Err(SourceError::NoSource)
    }
}

/// Validate the flag combination and build the canonical sources and filters.
///
/// Fails fast: the first error from any parser aborts the whole resolution.
pub fn resolve(flags: &SourceFlags) -> Result<(SourceSpecification, Option<Filters>)> {
    validate_exclusivity(flags)?;
    validate_presence(flags)?;

    if let Some(path) = &flags.spec {
        let vars = flags
            .spec_vars
            .as_deref()
            .map(spec_file::parse_spec_vars)
            .unwrap_or_default();
        debug!(path = %path.display(), vars = vars.len(), "resolving sources from spec file");
        return spec_file::load_spec_file(path, &vars);
    }

    if flags.spec_vars.is_some() {
        warn!("--{SPEC_VARS_FLAG} has no effect without --{SPEC_FLAG}");
    }
    let sources = sources_from_flags(flags)?;
    let filters = filters_from_flags(flags)?;
    debug!(?sources, ?filters, "resolved sources from flags");
    Ok((sources, filters))
}

fn sources_from_flags(flags: &SourceFlags) -> Result<SourceSpecification> {
    let parse = |kind: SourceKind| flags.source_flag(kind).unwrap_or_default();
    let sources = SourceSpecification {
        packages: entries::parse_packages(parse(SourceKind::Package))?,
        builds: entries::parse_builds(parse(SourceKind::Build))?,
        release_bundles: entries::parse_release_bundles(parse(SourceKind::ReleaseBundle))?,
        versions: entries::parse_version_references(parse(SourceKind::ApplicationVersion))?,
        artifacts: entries::parse_artifacts(parse(SourceKind::Artifact))?,
    };
    // Every given flag can still be blank.
    if sources.is_empty() {
        return Err(SourceError::NoSource);
    }
    Ok(sources)
}

fn filters_from_flags(flags: &SourceFlags) -> Result<Option<Filters>> {
    let filters = Filters {
        included: filters::parse_filters(&flags.include_filters)?,
        excluded: filters::parse_filters(&flags.exclude_filters)?,
    };
    Ok(filters.non_empty())
}
