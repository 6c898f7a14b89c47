//! Configuration loading and validation for envkit.
//!
//! Everything that would otherwise be a hard-coded constant (the listing URL,
//! the link filter, cache location and lifetime, install directory, worker
//! count) lives in [`Config`], loaded with [`Config::load`].

pub mod error;
mod load;
mod model;

pub use crate::load::{ENV_PREFIX, figment, user_config_file};
pub use crate::model::{
    CacheConfig, Config, DEFAULT_FILTER, DEFAULT_LISTING_URL, DEFAULT_MAX_AGE_DAYS, HttpConfig, InstallConfig,
    ListingConfig,
};
