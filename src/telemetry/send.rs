use chrono::Utc;
use kvstore::KVDb;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::ext_config::{get_instrumentation_key, ConfigApi, ConfigCacheError, FetchError};
use crate::host::HostEnv;
use crate::interfaces::http_api::{get_config_api_url, get_telemetry_url, get_ureq_agent};

use super::{build_event, IdentityAttributes, TelemetryType};

const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("could not obtain instrumentation key: {0}")]
    InstrumentationKey(#[from] ConfigCacheError),
    #[error(transparent)]
    Http(#[from] ureq::Error),
    #[error("telemetry request returned status {0}")]
    Status(u16),
    #[error("could not serialize telemetry event: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<FetchError> for TelemetryError {
    fn from(e: FetchError) -> Self {
        TelemetryError::InstrumentationKey(e.into())
    }
}

/// Sends one telemetry event. Fire-and-forget: failures are logged and never
/// reported to the caller, and nothing is sent if the instrumentation key
/// cannot be obtained.
pub fn send_telemetry_data(
    kvs: &KVDb,
    host: &HostEnv,
    kind: TelemetryType,
    data: Option<Map<String, Value>>,
) {
    match try_send_telemetry_data(kvs, host, kind, data) {
        Ok(()) => log::debug!("Sent {kind} telemetry"),
        Err(e) => log::error!("Failed to send {kind} telemetry: {e}"),
    }
}

fn try_send_telemetry_data(
    kvs: &KVDb,
    host: &HostEnv,
    kind: TelemetryType,
    data: Option<Map<String, Value>>,
) -> Result<(), TelemetryError> {
    let agent = get_ureq_agent();
    let api = ConfigApi::new(agent.clone(), &get_config_api_url(kvs), &host.extension_id)?;
    let ikey = get_instrumentation_key(kvs, &api)?;

    let identity = IdentityAttributes::load(kvs);
    let event = build_event(&ikey, kind, &identity, host, data, Utc::now());
    let body = serde_json::to_string(&event)?;
    log::trace!("Telemetry payload: {body}");

    let response = agent
        .post(get_telemetry_url(kvs))
        .header("Content-Type", CONTENT_TYPE)
        .header(API_KEY_HEADER, ikey.as_str())
        .send(body)?;
    let status = response.status();
    if !status.is_success() {
        return Err(TelemetryError::Status(status.as_u16()));
    }
    Ok(())
}
