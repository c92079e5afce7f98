use kvstore::KVDb;
use ureq::tls::{TlsConfig, TlsProvider};

use crate::constants::{defaults, keys, REMOTE_DEFAULTS};

/// Endpoint URL for `key`, taken from the store if overridden there, otherwise
/// from the built-in defaults.
pub fn get_remote_url(kvs: &KVDb, key: &str) -> String {
    match kvs.get::<String>(key) {
        Ok(Some(url)) if !url.is_empty() => url,
        _ => REMOTE_DEFAULTS.get(key).copied().unwrap_or_default().to_string(),
    }
}

pub fn get_config_api_url(kvs: &KVDb) -> String {
    get_remote_url(kvs, keys::CONFIG_API_URL)
}

pub fn get_telemetry_url(kvs: &KVDb) -> String {
    get_remote_url(kvs, keys::TELEMETRY_URL)
}

/// Agent shared by all calls of one operation. Non-2xx statuses are returned as
/// regular responses so callers can log and classify them.
pub fn get_ureq_agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .tls_config(
            TlsConfig::builder()
                .provider(TlsProvider::NativeTls)
                .build(),
        )
        .timeout_global(Some(defaults::API_REQUEST_TIMEOUT))
        .http_status_as_error(false)
        .build()
        .into()
}
