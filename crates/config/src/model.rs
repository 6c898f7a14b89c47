use crate::error::{ErrorKind, Result};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_LISTING_URL: &str = "https://jdk.java.net/archive/";
pub const DEFAULT_FILTER: &str = "zip";
pub const DEFAULT_MAX_AGE_DAYS: u32 = 30;
const CACHE_FILE_NAME: &str = "jdk_links_cache.json";
const INSTALL_DIR_NAME: &str = ".env";

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "envkit")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listing: ListingConfig,
    pub cache: CacheConfig,
    pub install: InstallConfig,
    pub http: HttpConfig,
}
impl Config {
    /// Reject values that would only fail later, half way through a command.
    pub fn validate(&self) -> Result<()> {
        if let Err(err) = url::Url::parse(&self.listing.url) {
            exn::bail!(ErrorKind::Invalid { key: "listing.url", reason: err.to_string() });
        }
        if self.listing.filter.is_empty() {
            exn::bail!(ErrorKind::Invalid { key: "listing.filter", reason: "must not be empty".to_string() });
        }
        if self.cache.max_age_days == 0 {
            exn::bail!(ErrorKind::Invalid { key: "cache.max_age_days", reason: "must be greater than zero".to_string() });
        }
        if self.install.concurrency == Some(0) {
            exn::bail!(ErrorKind::Invalid { key: "install.concurrency", reason: "must be greater than zero".to_string() });
        }
        if self.http.user_agent.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid { key: "http.user_agent", reason: "must not be empty".to_string() });
        }
        Ok(())
    }
}

/// Where download links are discovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Directory-listing page that is scraped for links.
    pub url: String,
    /// Only links containing this keyword are kept.
    pub filter: String,
}
impl Default for ListingConfig {
    fn default() -> Self {
        Self { url: DEFAULT_LISTING_URL.to_string(), filter: DEFAULT_FILTER.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub path: PathBuf,
    /// Snapshots at least this many days old are scraped again.
    pub max_age_days: u32,
}
impl CacheConfig {
    pub fn max_age(&self) -> time::Duration {
        time::Duration::days(i64::from(self.max_age_days))
    }
}
impl Default for CacheConfig {
    fn default() -> Self {
        let dir = project_dirs()
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("envkit"));
        Self { path: dir.join(CACHE_FILE_NAME), max_age_days: DEFAULT_MAX_AGE_DAYS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Downloaded archives are extracted below this directory.
    pub dir: PathBuf,
    /// Maximum number of archive entries extracted at once. Defaults to the
    /// available parallelism.
    pub concurrency: Option<usize>,
}
impl Default for InstallConfig {
    fn default() -> Self {
        let dir = BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(INSTALL_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(INSTALL_DIR_NAME));
        Self { dir, concurrency: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
}
impl Default for HttpConfig {
    fn default() -> Self {
        Self { user_agent: concat!("envkit/", env!("CARGO_PKG_VERSION")).to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.listing.url, "https://jdk.java.net/archive/");
        assert_eq!(config.listing.filter, "zip");
        assert_eq!(config.cache.max_age(), time::Duration::days(30));
        assert!(config.cache.path.ends_with("jdk_links_cache.json"));
        assert!(config.install.dir.ends_with(".env"));
        assert!(config.http.user_agent.starts_with("envkit/"));
    }

    #[rstest]
    #[case::url(|c: &mut Config| c.listing.url = "not a url".to_string(), "listing.url")]
    #[case::filter(|c: &mut Config| c.listing.filter = String::new(), "listing.filter")]
    #[case::max_age(|c: &mut Config| c.cache.max_age_days = 0, "cache.max_age_days")]
    #[case::concurrency(|c: &mut Config| c.install.concurrency = Some(0), "install.concurrency")]
    #[case::user_agent(|c: &mut Config| c.http.user_agent = "  ".to_string(), "http.user_agent")]
    fn test_validation(#[case] break_it: fn(&mut Config), #[case] expected: &str) {
        let mut config = Config::default();
        break_it(&mut config);
        let err = config.validate().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid { key, .. } if *key == expected));
    }
}
