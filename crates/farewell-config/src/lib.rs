//! Configuration loading for the farewell wall (`~/.config/farewell/config.toml`).

pub mod config;
pub mod paths;

pub use config::{
    CacheConfig, FarewellConfig, ImagesConfig, LoggingConfig, PageConfig, RemoteConfig,
    RetryConfig,
};
