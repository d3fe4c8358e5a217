use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub addr: SocketAddr,
    pub media_dir: PathBuf,
    pub index_cache_ttl: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let jwt_secret = var("YATUBE_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("YATUBE_JWT_SECRET is unset or still a placeholder; set it in .env and restart");
        }

        let host = var("YATUBE_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = var("YATUBE_PORT")
            .unwrap_or_else(|| "8000".into())
            .parse()
            .context("YATUBE_PORT must be a port number")?;
        let addr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        let cache_secs: u64 = var("YATUBE_INDEX_CACHE_SECS")
            .map(|v| v.parse())
            .transpose()
            .context("YATUBE_INDEX_CACHE_SECS must be a whole number of seconds")?
            .unwrap_or(20);

        Ok(Self {
            jwt_secret,
            db_path: var("YATUBE_DB_PATH").unwrap_or_else(|| "yatube.db".into()).into(),
            addr,
            media_dir: var("YATUBE_MEDIA_DIR").unwrap_or_else(|| "./media".into()).into(),
            index_cache_ttl: Duration::from_secs(cache_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[("YATUBE_JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.addr, "0.0.0.0:8000".parse().unwrap());
        assert_eq!(config.db_path, PathBuf::from("yatube.db"));
        assert_eq!(config.media_dir, PathBuf::from("./media"));
        assert_eq!(config.index_cache_ttl, Duration::from_secs(20));
    }

    #[test]
    fn rejects_missing_or_placeholder_secret() {
        assert!(config(&[]).is_err());
        assert!(config(&[("YATUBE_JWT_SECRET", "dev-secret-change-me")]).is_err());
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("YATUBE_JWT_SECRET", "s3cret"),
            ("YATUBE_HOST", "127.0.0.1"),
            ("YATUBE_PORT", "9001"),
            ("YATUBE_INDEX_CACHE_SECS", "0"),
        ])
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:9001".parse().unwrap());
        assert!(config.index_cache_ttl.is_zero());
    }

    #[test]
    fn bad_port() {
        assert!(config(&[("YATUBE_JWT_SECRET", "s3cret"), ("YATUBE_PORT", "http")]).is_err());
    }
}
