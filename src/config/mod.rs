//! Application configuration

mod app_config;

pub use app_config::{
    AdminConfig, AppConfig, GateConfig, LogFormat, LoggingConfig, MetricsConfig, SeedKey,
    ServerConfig, StorageSettings,
};
