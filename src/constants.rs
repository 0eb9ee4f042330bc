//! Names shared between the command layer, the source resolver and the transport.

pub const SPEC_FLAG: &str = "spec";
pub const SPEC_VARS_FLAG: &str = "spec-vars";

pub const SOURCE_TYPE_BUILDS_FLAG: &str = "source-type-builds";
pub const SOURCE_TYPE_RELEASE_BUNDLES_FLAG: &str = "source-type-release-bundles";
pub const SOURCE_TYPE_APPLICATION_VERSIONS_FLAG: &str = "source-type-application-versions";
pub const SOURCE_TYPE_PACKAGES_FLAG: &str = "source-type-packages";
pub const SOURCE_TYPE_ARTIFACTS_FLAG: &str = "source-type-artifacts";

pub const INCLUDE_FILTER_FLAG: &str = "include-filter";
pub const EXCLUDE_FILTER_FLAG: &str = "exclude-filter";

pub const PROMOTION_TYPE_FLAG: &str = "promotion-type";

pub const URL_ENV: &str = "APPTRUST_URL";
pub const ACCESS_TOKEN_ENV: &str = "APPTRUST_ACCESS_TOKEN";
pub const SERVER_ID_ENV: &str = "APPTRUST_SERVER_ID";
pub const SERVERS_PATH_ENV: &str = "APPTRUST_SERVERS_PATH";
pub const LOG_ENV: &str = "APPTRUST_LOG";

/// File name of the server profiles file under the user config directory.
pub const SERVERS_CONFIG: &str = "apptrust/servers.yaml";

/// Path appended to the platform URL to reach the versioned API.
pub const API_ROOT: &str = "apptrust/api/v1";

pub const PROJECT_FLAG: &str = "project";
pub const BUSINESS_CRITICALITY_FLAG: &str = "business-criticality";
pub const MATURITY_LEVEL_FLAG: &str = "maturity-level";
