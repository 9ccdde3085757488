//! Configuration loading for Dnya.
//!
//! Reads `config.toml` from the data directory (`~/.dnya/` by default) into
//! [`DnyaConfig`], falling back to defaults when the file is missing or
//! malformed, then applies environment overrides. Secrets are read only
//! from the environment.

use std::path::{Path, PathBuf};

use dnya_types::config::DnyaConfig;
use secrecy::SecretString;

use crate::sqlite::pool::database_url_for;

pub const DATA_DIR_ENV: &str = "DNYA_DATA_DIR";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const WEB_DIR_ENV: &str = "DNYA_WEB_DIR";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const PINECONE_API_KEY_ENV: &str = "PINECONE_API_KEY";
pub const PINECONE_INDEX_NAME_ENV: &str = "PINECONE_INDEX_NAME";
pub const PINECONE_INDEX_HOST_ENV: &str = "PINECONE_INDEX_HOST";

/// Resolve the data directory.
///
/// Priority:
/// 1. `DNYA_DATA_DIR` environment variable
/// 2. `~/.dnya`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".dnya");
    }
    PathBuf::from(".dnya")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// A missing file yields defaults quietly; an unreadable or malformed file
/// yields defaults with a warning.
pub async fn load_config(data_dir: &Path) -> DnyaConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return DnyaConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return DnyaConfig::default();
        }
    };

    match toml::from_str::<DnyaConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            DnyaConfig::default()
        }
    }
}

/// Apply non-secret environment overrides. Empty values are ignored.
pub fn apply_env_overrides(config: &mut DnyaConfig, env: impl Fn(&str) -> Option<String>) {
    let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = env(DATABASE_URL_ENV) {
        config.server.database_url = Some(url);
    }
    if let Some(dir) = env(WEB_DIR_ENV) {
        config.server.web_dir = Some(dir);
    }
    if let Some(name) = env(PINECONE_INDEX_NAME_ENV) {
        config.retrieval.index_name = name;
    }
    if let Some(host) = env(PINECONE_INDEX_HOST_ENV) {
        config.retrieval.index_host = Some(host);
    }
}

/// The SQLite URL to open: explicit config first, else `{data_dir}/dnya.db`.
pub fn database_url(config: &DnyaConfig, data_dir: &Path) -> String {
    config
        .server
        .database_url
        .clone()
        .unwrap_or_else(|| database_url_for(data_dir))
}

/// Secrets read from the environment.
///
/// Does NOT derive Debug.
pub struct Secrets {
    pub jwt_secret: Option<SecretString>,
    pub gemini_api_key: Option<SecretString>,
    pub pinecone_api_key: Option<SecretString>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(env: impl Fn(&str) -> Option<String>) -> Self {
        let secret = |key: &str| {
            env(key)
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::from)
        };
        Self {
            jwt_secret: secret(JWT_SECRET_ENV),
            gemini_api_key: secret(GEMINI_API_KEY_ENV),
            pinecone_api_key: secret(PINECONE_API_KEY_ENV),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.retrieval.index_name, "dnyanu");
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[server]
port = 9000

[llm]
timeout_secs = 10

[retrieval]
top_k = 5
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.llm.timeout_secs, 10);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.chat.history_window, 6);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.server.port, 7000);
    }

    #[test]
    fn env_overrides_apply_and_skip_empty() {
        let mut config = DnyaConfig::default();
        apply_env_overrides(
            &mut config,
            lookup(&[
                (DATABASE_URL_ENV, "sqlite:///var/lib/dnya.db"),
                (PINECONE_INDEX_NAME_ENV, "other-index"),
                (PINECONE_INDEX_HOST_ENV, ""),
            ]),
        );
        assert_eq!(
            config.server.database_url.as_deref(),
            Some("sqlite:///var/lib/dnya.db")
        );
        assert_eq!(config.retrieval.index_name, "other-index");
        assert!(config.retrieval.index_host.is_none());
    }

    #[test]
    fn database_url_defaults_to_data_dir() {
        let config = DnyaConfig::default();
        assert_eq!(
            database_url(&config, Path::new("/srv/dnya")),
            "sqlite:///srv/dnya/dnya.db"
        );
    }

    #[test]
    fn secrets_from_lookup() {
        let secrets = Secrets::from_lookup(lookup(&[
            (JWT_SECRET_ENV, "s3cret"),
            (GEMINI_API_KEY_ENV, "  "),
        ]));
        assert_eq!(
            secrets.jwt_secret.as_ref().map(|s| s.expose_secret().to_string()),
            Some("s3cret".to_string())
        );
        assert!(secrets.gemini_api_key.is_none());
        assert!(secrets.pinecone_api_key.is_none());
    }
}
