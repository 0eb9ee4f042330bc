use crate::config::{
    load_servers_config, save_servers_config, servers_config_path, AuthConfig, ServerConfig,
    ServersConfig,
};
use anyhow::{anyhow, Result};
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand, Debug)]
pub enum ServerCommands {
    /// List configured server profiles
    List,
    /// Add a server profile
    Add {
        /// Profile id
        id: String,
        /// Platform URL
        #[arg(long)]
        url: String,
        /// Environment variable holding the access token
        #[arg(long)]
        token_env: Option<String>,
        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },
    /// Remove a server profile by id
    Remove { id: String },
}

pub fn run(cmd: ServerCommands) -> Result<()> {
    apply(cmd, &servers_config_path())
}

fn apply(cmd: ServerCommands, path: &Path) -> Result<()> {
    let mut servers = load_servers_config(path)?;

    match cmd {
        ServerCommands::List => {
            if servers.servers.is_empty() {
                println!("(no server profiles defined)");
            } else {
                for s in &servers.servers {
                    let marker = if is_default(&servers, &s.id) { " (default)" } else { "" };
                    println!(" - {} → {} (auth={:?}){}", s.id, s.url, s.auth, marker);
                }
            }
        }
        ServerCommands::Add {
            id,
            url,
            token_env,
            default,
        } => {
            if servers.find(&id).is_some() {
                return Err(anyhow!("server '{}' already exists", id));
            }
            let auth = match token_env {
                Some(token_env) => AuthConfig::Bearer { token_env },
                None => AuthConfig::None,
            };
            servers.servers.push(ServerConfig {
                id: id.clone(),
                url,
                auth,
            });
            if default {
                servers.default_server = Some(id.clone());
            }
            save_servers_config(&servers, path)?;
            println!("✅ Added server '{id}' successfully");
        }
        ServerCommands::Remove { id } => {
            let before = servers.servers.len();
            servers.servers.retain(|s| s.id != id);
            if servers.servers.len() == before {
                println!("no such server '{id}'");
            } else {
                if is_default(&servers, &id) {
                    servers.default_server = None;
                }
                save_servers_config(&servers, path)?;
                println!("removed '{id}'");
            }
        }
    }

    Ok(())
}

fn is_default(servers: &ServersConfig, id: &str) -> bool {
    servers.default_server.as_deref() == Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn add(id: &str, token_env: Option<&str>, default: bool) -> ServerCommands {
        ServerCommands::Add {
            id: id.into(),
            url: format!("https://{id}.example.com"),
            token_env: token_env.map(str::to_string),
            default,
        }
    }

    #[test]
    fn test_add_and_remove_profiles() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("apptrust").join("servers.yaml");

        apply(add("prod", Some("PROD_TOKEN"), true), &path).unwrap();
        apply(add("local", None, false), &path).unwrap();

        let servers = load_servers_config(&path).unwrap();
        assert_eq!(servers.default_server.as_deref(), Some("prod"));
        assert_eq!(servers.servers.len(), 2);
        assert_eq!(
            servers.find("prod").unwrap().auth,
            AuthConfig::Bearer {
                token_env: "PROD_TOKEN".into()
            }
        );

        apply(ServerCommands::Remove { id: "prod".into() }, &path).unwrap();
        let servers = load_servers_config(&path).unwrap();
        assert_eq!(servers.default_server, None);
        assert!(servers.find("prod").is_none());
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("servers.yaml");
        apply(add("prod", None, false), &path).unwrap();
        let err = apply(add("prod", None, false), &path).unwrap_err();
        assert_eq!(err.to_string(), "server 'prod' already exists");
    }

    #[test]
    fn test_removing_unknown_id_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("servers.yaml");
        apply(ServerCommands::Remove { id: "ghost".into() }, &path).unwrap();
        assert!(!path.exists());
    }
}
