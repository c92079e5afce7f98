//! Remotely configured values: fetched from the config endpoint and cached in
//! the store with a per-value expiry window.

pub mod cache;
pub mod fetch;

pub use cache::{get_instrumentation_key, get_reward_gift_card_free_minutes, ConfigCacheError};
pub use fetch::{ConfigApi, ConfigResponse, ExtensionConfig, FetchError};
