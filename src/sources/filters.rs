//! Parser for `--include-filter` / `--exclude-filter` values.
//!
//! Each flag occurrence is one filter:
//!
//! ```text
//! filter_type=package,type=docker,name=frontend-*
//! filter_type=artifact,path=libs/*.jar
//! ```

use super::grammar::parse_fields;
use crate::error::{Result, SourceError};
use crate::model::{ArtifactFilter, PackageFilter, SourceFilter};

const FILTER_TYPE: &str = "filter_type";

/// Parse raw filter values, one per flag occurrence, preserving order.
///
/// Errors carry the 0-based position of the offending value.
pub fn parse_filters<S: AsRef<str>>(values: &[S]) -> Result<Vec<SourceFilter>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| parse_filter(index, value.as_ref()))
        .collect()
}

fn parse_filter(index: usize, value: &str) -> Result<SourceFilter> {
    let mut fields = parse_fields(value.trim())
        .map_err(|source| SourceError::InvalidFilterFormat { index, source })?;
    let filter_type = fields
        .remove(FILTER_TYPE)
        .ok_or(SourceError::MissingFilterType { index })?;

    match filter_type.as_str() {
        "package" => PackageFilter::new(
            fields.remove("type"),
            fields.remove("name"),
            fields.remove("version"),
        )
        .map(SourceFilter::Package)
        .ok_or(SourceError::EmptyPackageFilter { index }),
        "artifact" => ArtifactFilter::new(fields.remove("path"), fields.remove("sha256"))
            .map(SourceFilter::Artifact)
            .ok_or(SourceError::EmptyArtifactFilter { index }),
        _ => Err(SourceError::UnknownFilterType {
            value: filter_type,
            index,
        }),
    }
}
