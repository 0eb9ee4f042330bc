//! Connection configuration for the AppTrust CLI
//!
//! Connection details come from two places:
//! - Global flags / environment variables (`--url`, `--access-token`, `--server-id`)
//! - Server profiles stored in `~/.config/apptrust/servers.yaml`, or the path
//!   given by `APPTRUST_SERVERS_PATH`
//!
//! Explicit flags always win over a profile.
//!
//! ## Environment Variable Expansion
//!
//! The profiles file supports environment variable expansion:
//! - `${VAR}` - Simple substitution
//! - `${VAR:-default}` - Use default if VAR is unset or empty
//! - `${VAR-default}` - Use default if VAR is unset
//! - `${VAR:+alt}` - Use alt if VAR is set and non-empty
//! - `${VAR+alt}` - Use alt if VAR is set

use anyhow::{bail, Context};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::{env, fs, path::PathBuf};

use crate::constants::{SERVERS_CONFIG, SERVERS_PATH_ENV};
use crate::GlobalOpts;

/// Server profiles loaded from `servers.yaml`
///
/// # Example
///
/// ```yaml
/// defaultServer: prod
/// servers:
///   - id: prod
///     url: https://platform.example.com
///     auth:
///       type: bearer
///       tokenEnv: APPTRUST_TOKEN
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServersConfig {
    /// Profile used when `--server-id` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_server: Option<String>,
    #[serde(default)]
    pub servers: Vec<ServerConfig>,
}

/// A named platform instance.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub id: String,
    /// Platform base URL, e.g. `https://platform.example.com`
    pub url: String,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Credentials are never stored in the file itself, only the name of the
/// environment variable that holds them.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum AuthConfig {
    /// Anonymous access
    #[default]
    None,
    /// Access token sent as `Authorization: Bearer <token>`
    Bearer {
        #[serde(rename = "tokenEnv")]
        token_env: String,
    },
}

impl ServersConfig {
    pub fn find(&self, id: &str) -> Option<&ServerConfig> {
        self.servers.iter().find(|s| s.id == id)
    }

    /// The profile to use when none is named explicitly.
    fn fallback(&self) -> Option<&ServerConfig> {
        match &self.default_server {
            Some(id) => self.find(id),
            None if self.servers.len() == 1 => self.servers.first(),
            None => None,
        }
    }
}

/// Fully resolved connection details for one command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDetails {
    pub url: String,
    pub access_token: Option<String>,
}

impl ServerDetails {
    /// Combine global flags with the stored profiles.
    ///
    /// # Errors
    /// - `--server-id` names an unknown profile
    /// - no URL could be determined
    /// - a profile's token variable is unset
    pub fn resolve(opts: &GlobalOpts, servers: &ServersConfig) -> anyhow::Result<Self> {
        let profile = match &opts.server_id {
            Some(id) => Some(
                servers
                    .find(id)
                    .with_context(|| format!("server '{id}' is not configured"))?,
            ),
            None => servers.fallback(),
        };

        let url = opts
            .url
            .clone()
            .or_else(|| profile.map(|p| p.url.clone()))
            .filter(|u| !u.trim().is_empty());
        let Some(url) = url else {
            bail!(
                "platform URL is mandatory: pass --url, set {}, or configure a server profile",
                crate::constants::URL_ENV
            );
        };

        let access_token = match (&opts.access_token, profile.map(|p| &p.auth)) {
            (Some(token), _) => Some(token.clone()),
            (None, Some(AuthConfig::Bearer { token_env })) => Some(
                env::var(token_env)
                    .with_context(|| format!("reading access token from ${token_env}"))?,
            ),
            (None, _) => None,
        };

        Ok(ServerDetails {
            url: url.trim_end_matches('/').to_string(),
            access_token,
        })
    }
}

pub fn servers_config_path() -> PathBuf {
    env::var(SERVERS_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut p = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push(SERVERS_CONFIG);
            p
        })
}

/// Load profiles from `path`; a missing file means no profiles.
pub fn load_servers_config(path: &Path) -> anyhow::Result<ServersConfig> {
    if !path.exists() {
        return Ok(ServersConfig::default());
    }
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading server profiles {}", path.display()))?;
    let cfg: ServersConfig = serde_yaml::from_str(&expand_env_placeholders(&data))
        .with_context(|| format!("parsing server profiles {}", path.display()))?;
    Ok(cfg)
}

pub fn save_servers_config(cfg: &ServersConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_yaml::to_string(cfg)?;
    fs::write(path, data).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn env_placeholder() -> &'static Regex {
    static ENV_PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    ENV_PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?:(:?[-+])([^}]*))?\}")
            .expect("env placeholder pattern is valid")
    })
}

pub fn expand_env_placeholders(input: &str) -> String {
    env_placeholder()
        .replace_all(input, |caps: &regex::Captures| {
            let var_name = &caps[1];
            let op = caps.get(2).map_or("", |m| m.as_str());
            let val = caps.get(3).map_or("", |m| m.as_str());
            let var = env::var(var_name).ok();

            match (var.as_deref(), op) {
                (Some(v), "") => v.to_string(),                       // ${VAR}
                (Some(v), ":-") if !v.is_empty() => v.to_string(),    // ${VAR:-default}
                (_, ":-") => val.to_string(),
                (Some(v), "-") => v.to_string(),                      // ${VAR-default}
                (None, "-") => val.to_string(),
                (Some(v), ":+") if !v.is_empty() => val.to_string(), // ${VAR:+alt}
                (Some(_), "+") => val.to_string(),                    // ${VAR+alt}
                _ => String::new(),
            }
        })
        .to_string()
}
