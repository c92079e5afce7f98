pub mod defaults;
pub mod envvars;
pub mod keys;
mod remote_defaults;

pub use remote_defaults::REMOTE_DEFAULTS;
