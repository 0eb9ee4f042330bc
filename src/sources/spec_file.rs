//! Loading sources from a JSON spec file.
//!
//! ```json
//! {
//!   "packages": [{"type": "npm", "name": "${PKG}", "version": "1.0.0", "repository": "npm-local"}],
//!   "builds": [{"name": "web", "number": "42", "include_dependencies": true}],
//!   "filters": {"excluded": [{"path": "libs/vulnerable-*.jar"}]}
//! }
//! ```
//!
//! `${NAME}` placeholders are replaced from `--spec-vars` before the JSON is
//! decoded. Replacement is literal and single-pass: substituted text is never
//! rescanned, and placeholders without a matching variable are left as-is.

use crate::error::{Result, SourceError};
use crate::model::{
    null_as_default, Artifact, Build, Filters, Package, ReleaseBundle, SourceSpecification,
    VersionReference,
};
use regex::{Captures, Regex};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// On-disk shape of a spec file. Unknown top-level keys are ignored and
/// `null` lists count as absent.
#[derive(Deserialize, Debug)]
struct VersionSpec {
    #[serde(default, deserialize_with = "null_as_default")]
    packages: Vec<Package>,
    #[serde(default, deserialize_with = "null_as_default")]
    builds: Vec<Build>,
    #[serde(default, deserialize_with = "null_as_default")]
    release_bundles: Vec<ReleaseBundle>,
    #[serde(default, deserialize_with = "null_as_default")]
    versions: Vec<VersionReference>,
    #[serde(default, deserialize_with = "null_as_default")]
    artifacts: Vec<Artifact>,
    #[serde(default)]
    filters: Option<Filters>,
}

/// Parse `KEY=value;KEY2=value2`. A `\;` keeps a literal semicolon inside a
/// value; items without `=` are skipped.
pub fn parse_spec_vars(raw: &str) -> HashMap<String, String> {
    let mut items: Vec<String> = Vec::new();
    for part in raw.split(';') {
        match items.last_mut() {
            Some(last) if last.ends_with('\\') => {
                last.pop();
                last.push(';');
                last.push_str(part);
            }
            _ => items.push(part.to_string()),
        }
    }

    let mut vars = HashMap::new();
    for item in items.iter().filter(|item| !item.is_empty()) {
        match item.split_once('=') {
            Some((key, value)) => {
                vars.insert(key.to_string(), value.to_string());
            }
            None => debug!(item = %item, "ignoring spec variable without '='"),
        }
    }
    vars
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\$\{([^{}]*)\}").expect("placeholder pattern is valid"))
}

/// Replace every `${NAME}` whose `NAME` is an exact key of `vars`.
pub fn substitute_vars(content: &str, vars: &HashMap<String, String>) -> String {
    let mut replaced = 0usize;
    let output = placeholder().replace_all(content, |caps: &Captures| match vars.get(&caps[1]) {
        Some(value) => {
            replaced += 1;
            value.clone()
        }
        None => caps[0].to_string(),
    });
    debug!(replaced, "substituted spec variables");
    output.into_owned()
}

/// Read, substitute and decode a spec file.
///
/// I/O and JSON errors are returned unmodified. A file that decodes but names
/// no source at all is rejected with [`SourceError::EmptySpec`].
pub fn load_spec_file(
    path: &Path,
    vars: &HashMap<String, String>,
) -> Result<(SourceSpecification, Option<Filters>)> {
    debug!(path = %path.display(), "reading spec file");
    let content = fs::read(path)?;
    // Non-UTF-8 content skips substitution so the decoder reports it.
    let spec: VersionSpec = match std::str::from_utf8(&content) {
        Ok(text) if !vars.is_empty() => serde_json::from_str(&substitute_vars(text, vars))?,
        _ => serde_json::from_slice(&content)?,
    };
    let sources = SourceSpecification {
        packages: spec.packages,
        builds: spec.builds,
        release_bundles: spec.release_bundles,
        versions: spec.versions,
        artifacts: spec.artifacts,
    };
    if sources.is_empty() {
        return Err(SourceError::EmptySpec);
    }
    Ok((sources, spec.filters.and_then(Filters::non_empty)))
}
