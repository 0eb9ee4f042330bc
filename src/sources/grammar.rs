//! Delimited flag grammars.
//!
//! Source flags use `key=value` fields separated by `,`, grouped into entries
//! separated by `;`:
//!
//! ```text
//! type=npm,name=pkg1,version=1.0.0,repo-key=repo1;type=docker,name=pkg2,...
//! ```
//!
//! Keys and values are trimmed. Unknown keys are kept in the field map and
//! simply never read, so newer flag fields do not break older parsers.

use crate::error::EntryError;
use crate::model::LabelKeyValue;
use anyhow::{anyhow, bail, Result};
use std::collections::{BTreeMap, HashMap};

pub type FieldMap = HashMap<String, String>;

/// Split a `;`-separated flag value into trimmed, non-blank items.
pub fn split_list(input: &str) -> impl Iterator<Item = &str> {
    input.split(';').map(str::trim).filter(|item| !item.is_empty())
}

/// Parse a whole source flag value into one field map per entry.
///
/// An empty input yields no entries. A repeated key keeps its last value.
pub fn parse_entries(input: &str) -> std::result::Result<Vec<FieldMap>, EntryError> {
    split_list(input).map(parse_fields).collect()
}

/// Parse the `,`-separated `key=value` fields of a single entry.
pub fn parse_fields(entry: &str) -> std::result::Result<FieldMap, EntryError> {
    let mut fields = FieldMap::new();
    for token in entry.split(',') {
        let mut parts = token.split('=');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => {
                fields.insert(key.trim().to_string(), value.trim().to_string());
            }
            _ => {
                return Err(EntryError::MalformedPair {
                    entry: entry.to_string(),
                })
            }
        }
    }
    Ok(fields)
}

/// `a;b;c` → `["a", "b", "c"]`.
pub fn parse_list_flag(input: &str) -> Vec<String> {
    split_list(input).map(str::to_string).collect()
}

/// `k=v;k2=v2` → map. Values may themselves contain `=`.
pub fn parse_map_flag(input: &str) -> std::result::Result<BTreeMap<String, String>, EntryError> {
    let mut map = BTreeMap::new();
    for pair in split_list(input) {
        let (key, value) = pair.split_once('=').ok_or_else(|| EntryError::MalformedPair {
            entry: pair.to_string(),
        })?;
        map.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(map)
}

/// `k=v;k=v2` → ordered pairs; unlike [`parse_map_flag`] repeated keys are kept.
pub fn parse_label_pairs(input: &str) -> std::result::Result<Vec<LabelKeyValue>, EntryError> {
    split_list(input)
        .map(|pair| {
            let (key, value) = pair.split_once('=').ok_or_else(|| EntryError::MalformedPair {
                entry: pair.to_string(),
            })?;
            Ok(LabelKeyValue {
                key: key.trim().to_string(),
                value: value.trim().to_string(),
            })
        })
        .collect()
}

/// `1.0.0,1.1.0` → `["1.0.0", "1.1.0"]`.
pub fn parse_comma_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Check a flag value against its allowed values; empty or absent gives `default`.
pub fn parse_enum_flag<'a>(
    flag: &str,
    value: Option<&str>,
    default: &'a str,
    allowed: &[&'a str],
) -> Result<&'a str> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Ok(default);
    }
    allowed
        .iter()
        .copied()
        .find(|candidate| *candidate == value)
        .ok_or_else(|| {
            anyhow!(
                "invalid value '{}' for --{}: must be one of {}",
                value,
                flag,
                allowed.join(", ")
            )
        })
}

/// `k=v1,v2;k2=v3` → map of key to values. `k=` maps to an empty list.
pub fn parse_properties_flag(input: &str) -> Result<BTreeMap<String, Vec<String>>> {
    let mut properties = BTreeMap::new();
    for item in split_list(input) {
        let Some((key, values)) = item.split_once('=') else {
            bail!("invalid property format: '{item}' (expected format key=value1[,value2,...])");
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("invalid property format: '{item}': property key cannot be empty");
        }
        let values = values
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();
        properties.insert(key.to_string(), values);
    }
    Ok(properties)
}
