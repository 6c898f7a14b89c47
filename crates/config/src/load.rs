//! Layered configuration sources.
//!
//! Later layers override earlier ones:
//! 1. Built-in defaults.
//! 2. The user's config file (`<config dir>/envkit/config.toml`), if present.
//! 3. A file passed explicitly on the command line, which must exist.
//! 4. `ENVKIT_` environment variables, with `__` separating nested keys
//!    (`ENVKIT_CACHE__MAX_AGE_DAYS=7`).

use crate::error::{ErrorKind, Result};
use crate::model::{Config, project_dirs};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "ENVKIT_";
const USER_CONFIG_FILE_NAME: &str = "config.toml";

/// The per-user config file location, whether or not it exists.
pub fn user_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(USER_CONFIG_FILE_NAME))
}

/// Merge a config file, picking the format from its extension (TOML unless
/// it says otherwise).
fn merge_file(figment: Figment, path: &Path) -> Figment {
    match path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
        Some("json") => figment.merge(Json::file(path)),
        _ => figment.merge(Toml::file(path)),
    }
}

/// Build the layered figment from explicit file locations.
///
/// A missing `user` file is skipped; a missing `explicit` file is an error.
pub fn figment(user: Option<&Path>, explicit: Option<&Path>) -> Result<Figment> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));
    if let Some(user) = user {
        figment = merge_file(figment, user);
    }
    if let Some(explicit) = explicit {
        if !explicit.is_file() {
            exn::bail!(ErrorKind::NotFound(explicit.to_path_buf()));
        }
        figment = merge_file(figment, explicit);
    }
    Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
}

impl Config {
    /// Extract and validate a configuration from any figment.
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration from every default source, plus `explicit`.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let user = user_config_file();
        let config = Self::from_figment(&figment(user.as_deref(), explicit)?)?;
        tracing::debug!(?config, "Loaded configuration");
        Ok(config)
    }
}
