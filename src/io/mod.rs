pub mod config_io;
pub mod kv;
pub mod lock;
pub mod persist;
