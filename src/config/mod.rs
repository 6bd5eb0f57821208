// src/config/mod.rs
pub mod app;

pub use app::{
    load_default, load_from, AppConfig, CommunityConfig, DEFAULT_CONFIG_PATH, ENV_CONFIG_PATH,
};
