//! Domain and wire types for application versions.
//!
//! The same structures are decoded from spec files and serialized into request
//! bodies, so the serde field names below are the platform's JSON names.

use crate::constants::PROMOTION_TYPE_FLAG;
use crate::sources::grammar::parse_enum_flag;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The five kinds of source an application version can be assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Build,
    ReleaseBundle,
    ApplicationVersion,
    Package,
    Artifact,
}

impl SourceKind {
    /// Every kind, in the order the flags are checked and reported.
    pub const ALL: [SourceKind; 5] = [
        SourceKind::Build,
        SourceKind::ReleaseBundle,
        SourceKind::ApplicationVersion,
        SourceKind::Package,
        SourceKind::Artifact,
    ];

    /// The command-line flag that carries entries of this kind.
    pub fn flag(self) -> &'static str {
        use crate::constants::*;
        match self {
            SourceKind::Build => SOURCE_TYPE_BUILDS_FLAG,
            SourceKind::ReleaseBundle => SOURCE_TYPE_RELEASE_BUNDLES_FLAG,
            SourceKind::ApplicationVersion => SOURCE_TYPE_APPLICATION_VERSIONS_FLAG,
            SourceKind::Package => SOURCE_TYPE_PACKAGES_FLAG,
            SourceKind::Artifact => SOURCE_TYPE_ARTIFACTS_FLAG,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Build => "build",
            SourceKind::ReleaseBundle => "release bundle",
            SourceKind::ApplicationVersion => "application version",
            SourceKind::Package => "package",
            SourceKind::Artifact => "artifact",
        };
        f.write_str(name)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// `null` decodes like an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Optional text fields: `null` and `""` both decode as `None`, the same way
/// an empty `key=` is read from the command line.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_blank(Option::<String>::deserialize(deserializer)?))
}

/// A package version stored in a repository.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Package {
    #[serde(rename = "type")]
    pub package_type: String,
    pub name: String,
    pub version: String,
    #[serde(rename = "repository")]
    pub repository_key: String,
}

/// A build-info record, identified by name and run number.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Build {
    pub name: String,
    pub number: String,
    /// Build start timestamp; passed through to the platform unvalidated.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub started: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub repository_key: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "is_false"
    )]
    pub include_dependencies: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReleaseBundle {
    pub name: String,
    pub version: String,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub project_key: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub repository_key: Option<String>,
}

/// Reference to another application version whose contents are pulled in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VersionReference {
    pub application_key: String,
    pub version: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: String,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub sha256: Option<String>,
}

/// Everything that goes into an application version.
///
/// Produced by [`crate::sources::resolve`]; a value coming out of the resolver
/// always holds at least one entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceSpecification {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub packages: Vec<Package>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub builds: Vec<Build>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub release_bundles: Vec<ReleaseBundle>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub versions: Vec<VersionReference>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub artifacts: Vec<Artifact>,
}

impl SourceSpecification {
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
            && self.builds.is_empty()
            && self.release_bundles.is_empty()
            && self.versions.is_empty()
            && self.artifacts.is_empty()
    }
}

/// Include/exclude rules applied to the contents of the sources.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Filters {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub included: Vec<SourceFilter>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub excluded: Vec<SourceFilter>,
}

impl Filters {
    /// Collapse a filter set with nothing in it to `None`.
    pub fn non_empty(self) -> Option<Filters> {
        if self.included.is_empty() && self.excluded.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Package-shaped filter. At least one field is always set.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PackageFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    package_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    package_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    package_version: Option<String>,
}

impl PackageFilter {
    /// Returns `None` when every field is absent or empty.
    pub fn new(
        package_type: Option<String>,
        package_name: Option<String>,
        package_version: Option<String>,
    ) -> Option<Self> {
        let filter = PackageFilter {
            package_type: non_blank(package_type),
            package_name: non_blank(package_name),
            package_version: non_blank(package_version),
        };
        if filter.package_type.is_none()
            && filter.package_name.is_none()
            && filter.package_version.is_none()
        {
            return None;
        }
        Some(filter)
    }

    pub fn package_type(&self) -> Option<&str> {
        self.package_type.as_deref()
    }

    pub fn package_name(&self) -> Option<&str> {
        self.package_name.as_deref()
    }

    pub fn package_version(&self) -> Option<&str> {
        self.package_version.as_deref()
    }
}

/// Artifact-shaped filter. At least one field is always set.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha256: Option<String>,
}

impl ArtifactFilter {
    /// Returns `None` when both fields are absent or empty.
    pub fn new(path: Option<String>, sha256: Option<String>) -> Option<Self> {
        let filter = ArtifactFilter {
            path: non_blank(path),
            sha256: non_blank(sha256),
        };
        if filter.path.is_none() && filter.sha256.is_none() {
            return None;
        }
        Some(filter)
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn sha256(&self) -> Option<&str> {
        self.sha256.as_deref()
    }
}

/// A single include or exclude rule.
///
/// On the wire the variant is implied by which fields are present, so it
/// serializes untagged and deserializes by classifying the fields.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged, try_from = "RawSourceFilter")]
pub enum SourceFilter {
    Package(PackageFilter),
    Artifact(ArtifactFilter),
}

#[derive(Deserialize)]
struct RawSourceFilter {
    package_type: Option<String>,
    package_name: Option<String>,
    package_version: Option<String>,
    path: Option<String>,
    sha256: Option<String>,
}

impl TryFrom<RawSourceFilter> for SourceFilter {
    type Error = String;

    fn try_from(raw: RawSourceFilter) -> Result<Self, Self::Error> {
        let package = PackageFilter::new(raw.package_type, raw.package_name, raw.package_version);
        let artifact = ArtifactFilter::new(raw.path, raw.sha256);
        match (package, artifact) {
            (Some(package), None) => Ok(SourceFilter::Package(package)),
            (None, Some(artifact)) => Ok(SourceFilter::Artifact(artifact)),
            (Some(_), Some(_)) => Err(
                "invalid filter: package fields and artifact fields cannot be combined in one filter"
                    .to_string(),
            ),
            (None, None) => Err(
                "invalid filter: at least one of 'package_type', 'package_name', 'package_version', 'path', or 'sha256' must be specified"
                    .to_string(),
            ),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateAppVersionRequest {
    pub application_key: String,
    pub version: String,
    pub sources: SourceSpecification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UpdateVersionSourcesRequest {
    pub add_sources: SourceSpecification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,
}

/// Annotation changes for an existing version.
///
/// `Some("")` as the tag removes the current tag; an empty value list for a
/// property clears that property's values.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateAppVersionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub delete_properties: Vec<String>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PromotionType {
    #[default]
    Copy,
    Move,
    /// Not selectable from the command line; sent when `--dry-run` is given.
    DryRun,
}

impl PromotionType {
    /// Values accepted by `--promotion-type` on promote.
    pub const FLAG_VALUES: [&'static str; 2] = ["copy", "move"];
    /// Release also takes `dry_run` directly.
    pub const RELEASE_FLAG_VALUES: [&'static str; 3] = ["copy", "move", "dry_run"];

    /// Parse a `--promotion-type` value; empty or absent means the default.
    pub fn from_flag(value: Option<&str>) -> anyhow::Result<Self> {
        Self::parse(value, &Self::FLAG_VALUES)
    }

    /// Like [`PromotionType::from_flag`], additionally accepting `dry_run`.
    pub fn from_flag_with_dry_run(value: Option<&str>) -> anyhow::Result<Self> {
        Self::parse(value, &Self::RELEASE_FLAG_VALUES)
    }

    fn parse(value: Option<&str>, allowed: &[&'static str]) -> anyhow::Result<Self> {
        let value = parse_enum_flag(PROMOTION_TYPE_FLAG, value, "copy", allowed)?;
        Ok(match value {
            "move" => PromotionType::Move,
            "dry_run" => PromotionType::DryRun,
            _ => PromotionType::Copy,
        })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PromoteAppVersionRequest {
    pub stage: String,
    pub promotion_type: PromotionType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub included_repository_keys: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded_repository_keys: Vec<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAppVersionRequest {
    pub promotion_type: PromotionType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub included_repository_keys: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded_repository_keys: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub artifact_additional_properties: BTreeMap<String, String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RollbackAppVersionRequest {
    pub from_stage: String,
}

pub const BUSINESS_CRITICALITY_VALUES: [&str; 5] =
    ["unspecified", "low", "medium", "high", "critical"];
pub const MATURITY_LEVEL_VALUES: [&str; 4] =
    ["unspecified", "experimental", "production", "end_of_life"];

/// One label assignment; a key may appear more than once.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LabelKeyValue {
    pub key: String,
    pub value: String,
}

/// Incremental label changes sent on update.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelUpdates {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remove: Vec<LabelKeyValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add: Vec<LabelKeyValue>,
}

/// Application body for create and update.
///
/// `None` fields are left out of the request, so an update only touches what
/// was given on the command line.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct AppDescriptor {
    pub application_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maturity_level: Option<String>,
    #[serde(rename = "criticality", skip_serializing_if = "Option::is_none")]
    pub business_criticality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_updates: Option<LabelUpdates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_owners: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_owners: Option<Vec<String>>,
}

/// Package versions bound to, or unbound from, an application.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BindPackageRequest {
    pub application_key: String,
    #[serde(rename = "type")]
    pub package_type: String,
    pub name: String,
    /// Empty on unbind means every version.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_package_serializes_with_platform_names() {
        let pkg = Package {
            package_type: "npm".into(),
            name: "pkg".into(),
            version: "1.0.0".into(),
            repository_key: "npm-local".into(),
        };
        assert_eq!(
            serde_json::to_value(&pkg).unwrap(),
            json!({"type": "npm", "name": "pkg", "version": "1.0.0", "repository": "npm-local"})
        );
    }

    #[test]
    fn test_build_omits_unset_optionals() {
        let build = Build {
            name: "b1".into(),
            number: "42".into(),
            started: None,
            repository_key: None,
            include_dependencies: false,
        };
        assert_eq!(
            serde_json::to_value(&build).unwrap(),
            json!({"name": "b1", "number": "42"})
        );
    }

    #[test]
    fn test_package_filter_requires_a_field() {
        assert!(PackageFilter::new(None, Some(String::new()), None).is_none());
        let filter = PackageFilter::new(Some("docker".into()), None, None).unwrap();
        assert_eq!(filter.package_type(), Some("docker"));
        assert_eq!(filter.package_name(), None);
    }

    #[test]
    fn test_source_filter_classifies_decoded_fields() {
        let filter: SourceFilter =
            serde_json::from_value(json!({"package_type": "docker", "package_name": "frontend-*"}))
                .unwrap();
        assert!(matches!(filter, SourceFilter::Package(_)));

        let filter: SourceFilter =
            serde_json::from_value(json!({"path": "libs/vulnerable-*.jar"})).unwrap();
        assert!(matches!(filter, SourceFilter::Artifact(ref a) if a.path() == Some("libs/vulnerable-*.jar")));
    }

    #[test]
    fn test_source_filter_rejects_mixed_or_empty_objects() {
        let mixed = serde_json::from_value::<SourceFilter>(json!({"package_name": "a", "path": "b"}));
        assert!(mixed.unwrap_err().to_string().contains("cannot be combined"));

        let empty = serde_json::from_value::<SourceFilter>(json!({}));
        assert!(empty.unwrap_err().to_string().contains("at least one of"));
    }

    #[test]
    fn test_source_filter_serializes_untagged() {
        let filter = SourceFilter::Artifact(ArtifactFilter::new(Some("a/*.jar".into()), None).unwrap());
        assert_eq!(serde_json::to_value(&filter).unwrap(), json!({"path": "a/*.jar"}));
    }

    #[test]
    fn test_empty_filters_collapse_to_none() {
        assert_eq!(Filters::default().non_empty(), None);
    }

    #[test]
    fn test_promotion_type_from_flag() {
        assert_eq!(PromotionType::from_flag(None).unwrap(), PromotionType::Copy);
        assert_eq!(PromotionType::from_flag(Some("move")).unwrap(), PromotionType::Move);
        let err = PromotionType::from_flag(Some("dry_run")).unwrap_err();
        assert!(err.to_string().contains("invalid value 'dry_run'"));
    }

    #[test]
    fn test_release_promotion_type_accepts_dry_run() {
        assert_eq!(
            PromotionType::from_flag_with_dry_run(Some("dry_run")).unwrap(),
            PromotionType::DryRun
        );
        assert_eq!(
            PromotionType::from_flag_with_dry_run(Some("")).unwrap(),
            PromotionType::Copy
        );
        assert_eq!(
            PromotionType::from_flag_with_dry_run(Some("teleport"))
                .unwrap_err()
                .to_string(),
            "invalid value 'teleport' for --promotion-type: must be one of copy, move, dry_run"
        );
    }

    #[test]
    fn test_null_list_fields_decode_as_empty() {
        let spec: SourceSpecification =
            serde_json::from_value(json!({"packages": null, "artifacts": [{"path": "a/b.bin"}]}))
                .unwrap();
        assert!(spec.packages.is_empty());
        assert_eq!(spec.artifacts.len(), 1);
    }

    #[test]
    fn test_app_descriptor_omits_unset_fields() {
        let app = AppDescriptor {
            application_key: "app".into(),
            business_criticality: Some("high".into()),
            user_owners: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&app).unwrap(),
            json!({"application_key": "app", "criticality": "high", "user_owners": []})
        );
    }
}
