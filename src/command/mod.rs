mod env_info;
mod kvs;
mod remote_config;
mod send;

pub use env_info::env_info;
pub use kvs::{kvs_get, kvs_set};
pub use remote_config::{free_minutes, instrumentation_key};
pub use send::send;
