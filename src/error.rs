//! Error taxonomy of the version source resolver.
//!
//! Every variant is user-facing text: the command layer prints the `Display`
//! output as the failure message, so the wording here is part of the CLI contract.

use crate::model::SourceKind;

pub type Result<T> = std::result::Result<T, SourceError>;

/// Low-level failure inside a single delimited entry.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("invalid key-value pair: '{entry}' (expected format key=value)")]
    MalformedPair { entry: String },

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid value '{value}' for {field}: expected 'true' or 'false'")]
    InvalidBool { field: &'static str, value: String },
}

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    /// A source flag entry violates the grammar of its kind.
    #[error("invalid {kind} format: {source}")]
    InvalidEntry {
        kind: SourceKind,
        #[source]
        source: EntryError,
    },

    #[error("invalid filter format at index {index}: {source}")]
    InvalidFilterFormat {
        index: usize,
        #[source]
        source: EntryError,
    },

    #[error("invalid filter format at index {index}: missing 'filter_type' field")]
    MissingFilterType { index: usize },

    #[error(
        "invalid package filter at index {index}: at least one of 'type', 'name', or 'version' must be specified"
    )]
    EmptyPackageFilter { index: usize },

    #[error(
        "invalid artifact filter at index {index}: at least one of 'path' or 'sha256' must be specified"
    )]
    EmptyArtifactFilter { index: usize },

    #[error("invalid filter_type '{value}' at index {index}: must be 'package' or 'artifact'")]
    UnknownFilterType { value: String, index: usize },

    #[error("--spec provided: all other source flags (e.g., --{flag}) are not allowed")]
    SpecWithSourceFlag { flag: &'static str },

    #[error("--spec provided: filter flags (e.g., --{flag}) are not allowed")]
    SpecWithFilterFlag { flag: &'static str },

    #[error(
        "at least one source flag is required: provide --spec or at least one of the following: --source-type-builds, --source-type-release-bundles, --source-type-application-versions, --source-type-packages, --source-type-artifacts"
    )]
    NoSource,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Decode(#[from] serde_json::Error),

    #[error(
        "spec file is empty: must provide at least one source (artifacts, packages, builds, release_bundles, or versions)"
    )]
    EmptySpec,
}

impl SourceError {
    pub(crate) fn entry(kind: SourceKind) -> impl FnOnce(EntryError) -> SourceError {
        move |source| SourceError::InvalidEntry { kind, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_error_is_wrapped_with_kind_context() {
        let err = SourceError::entry(SourceKind::Package)(EntryError::MissingField("repo-key"));
        assert_eq!(
            err.to_string(),
            "invalid package format: missing required field: repo-key"
        );
    }

    #[test]
    fn test_no_source_lists_every_alternative() {
        let msg = SourceError::NoSource.to_string();
        for kind in SourceKind::ALL {
            let flag = kind.flag();
            assert!(msg.contains(&format!("--{flag}")), "{msg} should name --{flag}");
        }
        assert!(msg.contains("--spec"));
    }
}
