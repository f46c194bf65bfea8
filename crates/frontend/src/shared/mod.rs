pub mod api;
pub mod export;
pub mod local_cache;
