//! Credential resolution.
//!
//! Environment variables win when the full set is present; otherwise the
//! `mcpServers.odoo.env` block of `~/.cursor/mcp.json` is consulted.
//! Resolution from raw inputs is a pure function (`from_sources`) so the
//! precedence rules are testable without touching the process environment.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The four variables required together on the environment path
pub const ENV_VARS: [&str; 4] = ["ODOO_URL", "ODOO_DB", "ODOO_USERNAME", "ODOO_API_KEY"];

/// Connection settings for one run; immutable once resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub url: String,
    pub db: String,
    pub username: String,
    pub password: String,
}

/// Shape of the fallback config file (only the parts we read)
#[derive(Debug, Deserialize)]
struct McpConfig {
    #[serde(default, rename = "mcpServers")]
    mcp_servers: HashMap<String, McpServer>,
}

#[derive(Debug, Deserialize)]
struct McpServer {
    #[serde(default)]
    env: HashMap<String, String>,
}

impl Credentials {
    /// Resolve credentials from an environment map plus optional fallback
    /// file contents.
    ///
    /// The environment path requires all four of [`ENV_VARS`] non-empty;
    /// partial sets are ignored entirely and the file is tried instead.
    /// The file path requires only `ODOO_URL` (the rest default to empty,
    /// matching the service's own tolerance for blank fields).
    pub fn from_sources(
        env: &HashMap<String, String>,
        file_contents: Option<&str>,
    ) -> Result<Self> {
        if let Some(creds) = Self::from_env_map(env) {
            return Ok(creds);
        }

        if let Some(contents) = file_contents {
            let config: McpConfig = serde_json::from_str(contents)
                .context("Failed to parse fallback config file as JSON")?;
            if let Some(odoo) = config.mcp_servers.get("odoo") {
                if let Some(url) = non_empty(odoo.env.get("ODOO_URL")) {
                    let lookup = |key: &str| {
                        odoo.env.get(key).cloned().unwrap_or_default()
                    };
                    return Ok(Self {
                        url: url.trim_end_matches('/').to_string(),
                        db: lookup("ODOO_DB"),
                        username: lookup("ODOO_USERNAME"),
                        password: lookup("ODOO_API_KEY"),
                    });
                }
            }
        }

        bail!(
            "Set {} or configure ~/.cursor/mcp.json",
            ENV_VARS.join(", ")
        );
    }

    fn from_env_map(env: &HashMap<String, String>) -> Option<Self> {
        let url = non_empty(env.get("ODOO_URL"))?;
        let db = non_empty(env.get("ODOO_DB"))?;
        let username = non_empty(env.get("ODOO_USERNAME"))?;
        let password = non_empty(env.get("ODOO_API_KEY"))?;
        Some(Self {
            url: url.trim_end_matches('/').to_string(),
            db: db.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Resolve from the real process environment and filesystem.
    ///
    /// `config_override` replaces the default `~/.cursor/mcp.json` location
    /// when given.
    pub fn resolve(config_override: Option<&Path>) -> Result<Self> {
        let env: HashMap<String, String> = ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok().map(|v| (name.to_string(), v)))
            .collect();

        let config_path = match config_override {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_config_path(),
        };
        let file_contents = match config_path {
            Some(ref path) if path.is_file() => Some(
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
            ),
            _ => None,
        };

        Self::from_sources(&env, file_contents.as_deref())
    }

    /// Default fallback config location: `~/.cursor/mcp.json`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".cursor").join("mcp.json"))
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_env() -> HashMap<String, String> {
        [
            ("ODOO_URL", "https://example.odoo.com/"),
            ("ODOO_DB", "prod"),
            ("ODOO_USERNAME", "ops@example.com"),
            ("ODOO_API_KEY", "secret"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    const MCP_JSON: &str = r#"{
        "mcpServers": {
            "odoo": {
                "command": "uvx",
                "env": {
                    "ODOO_URL": "https://file.odoo.com",
                    "ODOO_DB": "filedb",
                    "ODOO_USERNAME": "file@example.com",
                    "ODOO_API_KEY": "filekey"
                }
            }
        }
    }"#;

    #[test]
    fn test_env_path_used_when_complete() {
        let creds = Credentials::from_sources(&full_env(), Some(MCP_JSON)).unwrap();
        assert_eq!(creds.url, "https://example.odoo.com");
        assert_eq!(creds.db, "prod");
        assert_eq!(creds.username, "ops@example.com");
        assert_eq!(creds.password, "secret");
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let creds = Credentials::from_sources(&full_env(), None).unwrap();
        assert!(!creds.url.ends_with('/'));
    }

    #[test]
    fn test_partial_env_falls_back_to_file() {
        for missing in ENV_VARS {
            let mut env = full_env();
            env.remove(missing);
            let creds = Credentials::from_sources(&env, Some(MCP_JSON)).unwrap();
            assert_eq!(creds.url, "https://file.odoo.com", "missing {}", missing);
            assert_eq!(creds.db, "filedb");
        }
    }

    #[test]
    fn test_empty_env_value_treated_as_missing() {
        let mut env = full_env();
        env.insert("ODOO_API_KEY".to_string(), String::new());
        let creds = Credentials::from_sources(&env, Some(MCP_JSON)).unwrap();
        assert_eq!(creds.password, "filekey");
    }

    #[test]
    fn test_file_missing_other_fields_default_empty() {
        let contents = r#"{"mcpServers": {"odoo": {"env": {"ODOO_URL": "https://x.test"}}}}"#;
        let creds = Credentials::from_sources(&HashMap::new(), Some(contents)).unwrap();
        assert_eq!(creds.url, "https://x.test");
        assert_eq!(creds.db, "");
        assert_eq!(creds.username, "");
        assert_eq!(creds.password, "");
    }

    #[test]
    fn test_no_sources_error_names_env_vars() {
        let err = Credentials::from_sources(&HashMap::new(), None).unwrap_err();
        let message = err.to_string();
        for var in ENV_VARS {
            assert!(message.contains(var), "error should name {}", var);
        }
    }

    #[test]
    fn test_file_without_odoo_server_fails() {
        let contents = r#"{"mcpServers": {"other": {"env": {"ODOO_URL": "https://x.test"}}}}"#;
        assert!(Credentials::from_sources(&HashMap::new(), Some(contents)).is_err());
    }

    #[test]
    fn test_invalid_json_is_error() {
        let result = Credentials::from_sources(&HashMap::new(), Some("not json"));
        assert!(result.unwrap_err().to_string().contains("JSON"));
    }

    #[test]
    fn test_default_config_path_under_home() {
        let path = Credentials::default_config_path().unwrap();
        assert!(path.ends_with(".cursor/mcp.json"));
    }
}
