pub mod config;
pub mod data;
pub mod local_cache;
pub mod logger;
