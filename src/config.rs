//! Minimal runtime configuration helpers.
//! Credentials come from the environment; tokens are never written anywhere.

use std::path::Path;

use crate::client::BASE_URL;

#[derive(Debug, Clone)]
pub struct Config {
    /// Ember account email address.
    pub username: String,
    pub password: String,
    /// Override for tests or region-specific deployments.
    pub api_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let username = required_env("EMBER_USERNAME")?;
        let password = required_env("EMBER_PASSWORD")?;

        let api_base_url = std::env::var("EMBER_API_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| BASE_URL.to_string());

        Ok(Config {
            username,
            password,
            api_base_url,
        })
    }
}

fn required_env(name: &str) -> Result<String, String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(format!("Missing credentials: set the {} environment variable", name)),
    }
}

/// Load `./.env` into the process environment when present. Returns whether a
/// file was loaded.
///
/// Understands `KEY=VALUE` lines, blank lines, `#` comments, an optional
/// `export ` prefix and single- or double-quoted values. Values already set
/// in the process environment win over file values.
pub fn load_dotenv() -> Result<bool, String> {
    let path = Path::new(".env");
    if !path.is_file() {
        return Ok(false);
    }

    let contents =
        std::fs::read_to_string(path).map_err(|e| format!("failed to read {}: {}", path.display(), e))?;

    for (index, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").map(str::trim_start).unwrap_or(line);

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| format!(".env:{}: missing '=' in assignment", index + 1))?;
        let key = key.trim();
        if key.is_empty() || key.chars().any(|c| c.is_whitespace()) {
            return Err(format!(".env:{}: invalid variable name", index + 1));
        }

        if std::env::var_os(key).is_none() {
            // Updating process-level environment variables is unsafe on some targets.
            unsafe {
                std::env::set_var(key, unquote(value.trim()));
            }
        }
    }

    Ok(true)
}

fn unquote(raw: &str) -> String {
    if let Some(inner) = raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        inner.to_string()
    } else if let Some(inner) = raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        inner.to_string()
    } else {
        // unquoted values run until an inline comment
        raw.split('#').next().unwrap_or_default().trim_end().to_string()
    }
}
