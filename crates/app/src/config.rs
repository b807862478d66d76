use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};

pub const DEFAULT_DB_URL: &str = "sqlite://portal.sqlite3";
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Resolved settings for `portal serve`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeConfig {
    pub db_url: String,
    pub bind: SocketAddr,
}

impl ServeConfig {
    /// # Errors
    ///
    /// Fails if the bind address does not parse.
    pub fn resolve(db: &str, bind: &str) -> anyhow::Result<Self> {
        let bind = bind
            .parse()
            .with_context(|| format!("invalid bind address: {bind}"))?;
        Ok(Self {
            db_url: normalize_sqlite_url(db),
            bind,
        })
    }
}

/// Turn bare paths and relative `sqlite:` URLs into absolute `sqlite://` URLs.
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Ensure the parent directory of a file-backed database exists.
///
/// # Errors
///
/// Fails for a `sqlite://` URL without a path or if the directory cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> anyhow::Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("unsupported database url: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("database url has no path: {db_url}");
    }

    if let Some(parent) = Path::new(path).parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_urls_pass_through() {
        assert_eq!(
            normalize_sqlite_url("sqlite:///var/lib/portal.db"),
            "sqlite:///var/lib/portal.db"
        );
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
    }

    #[test]
    fn relative_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:data/portal.db");
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/portal.db"));
    }

    #[test]
    fn bind_must_be_a_socket_address() {
        assert!(ServeConfig::resolve(DEFAULT_DB_URL, "localhost").is_err());
        let config = ServeConfig::resolve(DEFAULT_DB_URL, DEFAULT_BIND).unwrap();
        assert_eq!(config.bind.port(), 8080);
    }

    #[test]
    fn prepare_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested/portal.sqlite3");
        let url = format!("sqlite://{}", db.display());

        prepare_sqlite_file(&url).unwrap();

        assert!(db.parent().unwrap().is_dir());
        assert!(prepare_sqlite_file("sqlite://").is_err());
    }
}
