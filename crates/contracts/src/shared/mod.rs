pub mod lenient;
pub mod local_cache;
pub mod logger;
pub mod timestamp;
