//! Parsers for the five `--source-type-*` flags.
//!
//! Each parser turns one raw flag value into an ordered list of typed records.
//! The first malformed entry aborts the whole flag.

use super::grammar::{parse_entries, FieldMap};
use crate::error::{EntryError, Result, SourceError};
use crate::model::{Artifact, Build, Package, ReleaseBundle, SourceKind, VersionReference};

const NAME: &str = "name";
const VERSION: &str = "version";
const REPO_KEY: &str = "repo-key";

/// Field access over one parsed entry.
struct Entry(FieldMap);

impl Entry {
    fn required(&mut self, key: &'static str) -> std::result::Result<String, EntryError> {
        self.0.remove(key).ok_or(EntryError::MissingField(key))
    }

    /// Empty values are treated the same as an absent key.
    fn optional(&mut self, key: &str) -> Option<String> {
        self.0.remove(key).filter(|v| !v.is_empty())
    }

    fn flag(&mut self, key: &'static str) -> std::result::Result<bool, EntryError> {
        match self.0.remove(key) {
            None => Ok(false),
            Some(value) => match value.as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(EntryError::InvalidBool { field: key, value }),
            },
        }
    }
}

fn parse_kind<T>(
    input: &str,
    kind: SourceKind,
    mut record: impl FnMut(&mut Entry) -> std::result::Result<T, EntryError>,
) -> Result<Vec<T>> {
    let entries = parse_entries(input).map_err(SourceError::entry(kind))?;
    entries
        .into_iter()
        .map(|fields| record(&mut Entry(fields)).map_err(SourceError::entry(kind)))
        .collect()
}

/// `type=<t>,name=<n>,version=<v>,repo-key=<r>[;...]`
pub fn parse_packages(input: &str) -> Result<Vec<Package>> {
    parse_kind(input, SourceKind::Package, |entry| {
        Ok(Package {
            package_type: entry.required("type")?,
            name: entry.required(NAME)?,
            version: entry.required(VERSION)?,
            repository_key: entry.required(REPO_KEY)?,
        })
    })
}

/// `name=<n>,id=<id>[,started=<ts>][,repo-key=<r>][,include-deps=<true|false>][;...]`
pub fn parse_builds(input: &str) -> Result<Vec<Build>> {
    parse_kind(input, SourceKind::Build, |entry| {
        let name = entry.required(NAME)?;
        let number = entry.required("id")?;
        Ok(Build {
            name,
            number,
            started: entry.optional("started"),
            repository_key: entry.optional(REPO_KEY),
            include_dependencies: entry.flag("include-deps")?,
        })
    })
}

/// `name=<n>,version=<v>[,project-key=<p>][,repo-key=<r>][;...]`
pub fn parse_release_bundles(input: &str) -> Result<Vec<ReleaseBundle>> {
    parse_kind(input, SourceKind::ReleaseBundle, |entry| {
        let name = entry.required(NAME)?;
        let version = entry.required(VERSION)?;
        Ok(ReleaseBundle {
            name,
            version,
            project_key: entry.optional("project-key"),
            repository_key: entry.optional(REPO_KEY),
        })
    })
}

/// `application-key=<k>,version=<v>[;...]`
pub fn parse_version_references(input: &str) -> Result<Vec<VersionReference>> {
    parse_kind(input, SourceKind::ApplicationVersion, |entry| {
        Ok(VersionReference {
            application_key: entry.required("application-key")?,
            version: entry.required(VERSION)?,
        })
    })
}

/// `path=<p>[,sha256=<h>][;...]`
pub fn parse_artifacts(input: &str) -> Result<Vec<Artifact>> {
    parse_kind(input, SourceKind::Artifact, |entry| {
        Ok(Artifact {
            path: entry.required("path")?,
            sha256: entry.optional("sha256"),
        })
    })
}
