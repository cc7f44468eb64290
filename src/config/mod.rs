use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_BASE_URL;

pub const TOKEN_ENV: &str = "FEDCTL_TOKEN";
pub const API_URL_ENV: &str = "VITE_API_URL";
pub const STRIPE_KEY_ENV: &str = "VITE_STRIPE_PUBLIC_KEY";

/// `[api]` block from config.toml.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub token_command: Option<String>,
    pub stripe_public_key: Option<String>,
}

/// Top-level fedctl config file structure.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct FedConfig {
    #[serde(default)]
    pub api: ApiConfig,
}

impl FedConfig {
    /// Load config from ~/.fedctl/config.toml. Returns default if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(FedConfig::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: FedConfig =
            toml::from_str(&content).with_context(|| "Failed to parse config.toml")?;
        Ok(config)
    }

    /// Display config with secrets redacted.
    pub fn display_redacted(&self) -> String {
        let mut lines = vec!["[api]".to_string()];
        let api = &self.api;
        if let Some(ref url) = api.base_url {
            lines.push(format!("  base_url = \"{}\"", url));
        }
        if let Some(ref token) = api.token {
            lines.push(format!("  token = \"{}\"", redact(token)));
        }
        if let Some(ref cmd) = api.token_command {
            lines.push(format!("  token_command = \"{}\"", cmd));
        }
        if let Some(ref key) = api.stripe_public_key {
            lines.push(format!("  stripe_public_key = \"{}\"", redact(key)));
        }
        if lines.len() == 1 {
            lines.push("  (nothing configured)".to_string());
        }
        lines.join("\n")
    }
}

fn redact(secret: &str) -> String {
    let n = secret.chars().count();
    if n > 8 {
        let head: String = secret.chars().take(4).collect();
        let tail: String = secret.chars().skip(n - 4).collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Resolve the bearer token: CLI flag > env var > config token > config command.
/// `Ok(None)` means no credentials at all; endpoints will answer 401.
pub fn resolve_token(cli_flag: Option<&str>, config: &ApiConfig) -> Result<Option<String>> {
    // 1. CLI flag
    if let Some(token) = cli_flag.filter(|t| !t.is_empty()) {
        return Ok(Some(token.to_string()));
    }

    // 2. Environment variable
    if let Some(val) = env_non_empty(TOKEN_ENV) {
        return Ok(Some(val));
    }

    // 3. Config file token
    if let Some(ref token) = config.token {
        if !token.is_empty() {
            return Ok(Some(token.clone()));
        }
    }

    // 4. External command
    if let Some(ref cmd) = config.token_command {
        if !cmd.is_empty() {
            return run_token_command(cmd).map(Some);
        }
    }

    Ok(None)
}

fn run_token_command(cmd: &str) -> Result<String> {
    let output = std::process::Command::new("sh")
        .arg("-c")
        .arg(cmd)
        .output()
        .with_context(|| format!("Failed to run token_command: {cmd}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "token_command failed (exit {}): {}",
            output.status.code().unwrap_or(-1),
            stderr.trim()
        );
    }

    let secret = String::from_utf8(output.stdout)
        .context("token_command output is not valid UTF-8")?
        .trim()
        .to_string();

    if secret.is_empty() {
        bail!("token_command printed nothing");
    }
    Ok(secret)
}

/// Base URL: CLI flag > VITE_API_URL > config > localhost default.
pub fn resolve_base_url(cli_flag: Option<&str>, config: &ApiConfig) -> String {
    cli_flag
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .or_else(|| env_non_empty(API_URL_ENV))
        .or_else(|| config.base_url.clone().filter(|u| !u.is_empty()))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Publishable key for the hosted card widget.
pub fn resolve_stripe_key(config: &ApiConfig) -> Option<String> {
    env_non_empty(STRIPE_KEY_ENV).or_else(|| config.stripe_public_key.clone().filter(|k| !k.is_empty()))
}

/// Path to the config file: ~/.fedctl/config.toml
pub fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".fedctl").join("config.toml"))
}

/// Default config template content.
pub fn default_config_template() -> &'static str {
    r#"# ~/.fedctl/config.toml
# Token resolution order: --token flag > FEDCTL_TOKEN > token > token_command
# Base URL resolution order: --api-url flag > VITE_API_URL > base_url

[api]
# base_url = "https://api.your-federation.org"
# token = "your-bearer-token"
# token_command = "your-secrets-manager-command-here"
# stripe_public_key = "pk_live_..."
"#
}

/// Create the default config file if it doesn't already exist.
pub fn init_config() -> Result<bool> {
    init_config_at(&config_path()?)
}

pub fn init_config_at(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, default_config_template())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_to_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        assert!(init_config_at(&path).unwrap());
        assert!(!init_config_at(&path).unwrap());
        let cfg = FedConfig::load_from(&path).unwrap();
        assert!(cfg.api.token.is_none());
        assert!(cfg.api.base_url.is_none());
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = FedConfig::load_from(&dir.path().join("none.toml")).unwrap();
        assert!(cfg.display_redacted().contains("nothing configured"));
    }

    #[test]
    fn cli_flag_beats_config() {
        let api = ApiConfig {
            token: Some("from-config".into()),
            base_url: Some("https://cfg.example.org".into()),
            ..Default::default()
        };
        assert_eq!(resolve_token(Some("from-flag"), &api).unwrap().as_deref(), Some("from-flag"));
        assert_eq!(resolve_base_url(Some("https://flag.example.org"), &api), "https://flag.example.org");
    }

    #[test]
    fn token_command_output_is_trimmed() {
        let api = ApiConfig {
            token_command: Some("printf '  abc123\\n'".into()),
            ..Default::default()
        };
        // env var would take precedence
        if std::env::var(TOKEN_ENV).is_ok() {
            return;
        }
        let token = resolve_token(None, &api).unwrap();
        assert_eq!(token.as_deref(), Some("abc123"));
    }

    #[test]
    fn secrets_are_redacted() {
        let cfg = FedConfig {
            api: ApiConfig {
                token: Some("abcdefghijklmnop".into()),
                ..Default::default()
            },
        };
        let shown = cfg.display_redacted();
        assert!(shown.contains("abcd...mnop"));
        assert!(!shown.contains("efghijkl"));
    }

    #[test]
    fn redaction_counts_characters_not_bytes() {
        assert_eq!(redact("aéééééé"), "****");
        assert_eq!(redact("ñandú-clave-ñoño"), "ñand...ñoño");
        let cfg = FedConfig {
            api: ApiConfig {
                stripe_public_key: Some("pk_€€€€€€€€€€".into()),
                ..Default::default()
            },
        };
        assert!(cfg.display_redacted().contains("pk_€...€€€€"));
    }
}
