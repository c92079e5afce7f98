use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::defaults;
use crate::helpers::time::iso_millis;
use crate::host::{browser_name, browser_version, os_version, HostEnv};

use super::{IdentityAttributes, TelemetryType};

pub const EVENT_NAME: &str = "Microsoft.ApplicationInsights.Event";
pub const BASE_DATA_NAME: &str = "BrowserExtension";
pub const BASE_TYPE: &str = "EventData";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    #[serde(rename = "iKey")]
    pub i_key: String,
    pub name: String,
    pub time: String,
    pub data: EventData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventData {
    pub base_data: BaseData,
    pub base_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseData {
    pub name: String,
    pub properties: Map<String, Value>,
}

/// Assembles the event envelope. Fields in `extra` are applied last and replace
/// default properties of the same name.
pub fn build_event(
    instrumentation_key: &str,
    kind: TelemetryType,
    identity: &IdentityAttributes,
    host: &HostEnv,
    extra: Option<Map<String, Value>>,
    now: DateTime<Utc>,
) -> TelemetryEvent {
    let mut properties = default_properties(kind, identity, host);
    if let Some(extra) = extra {
        properties.extend(extra);
    }

    TelemetryEvent {
        i_key: instrumentation_key.to_string(),
        name: EVENT_NAME.to_string(),
        time: iso_millis(now),
        data: EventData {
            base_data: BaseData {
                name: BASE_DATA_NAME.to_string(),
                properties,
            },
            base_type: BASE_TYPE.to_string(),
        },
    }
}

fn default_properties(
    kind: TelemetryType,
    identity: &IdentityAttributes,
    host: &HostEnv,
) -> Map<String, Value> {
    let ua = host.user_agent.as_str();
    let or_empty = |v: &Option<String>| v.clone().unwrap_or_default();
    let mkt = identity
        .lp_market
        .as_ref()
        .or(identity.market.as_ref())
        .unwrap_or(&host.locale);
    let language = identity.market.as_ref().unwrap_or(&host.locale);

    let mut props = Map::new();
    let mut put = |k: &str, v: String| {
        props.insert(k.to_string(), Value::String(v));
    };
    put("type", kind.to_string());
    if let Some(machine_id) = &identity.machine_id {
        put("machineId", machine_id.clone());
    }
    put("extensionId", host.extension_id.clone());
    put("extensionName", host.telemetry_name());
    put("extensionVersion", host.extension_version.clone());
    put("os", os_version(ua).to_string());
    put("browser", browser_name(ua).to_string());
    put("browserVersion", browser_version(ua));
    put(
        "partnerCode",
        identity
            .partner_code
            .clone()
            .unwrap_or_else(|| defaults::PARTNER_CODE.to_string()),
    );
    put(
        "channel",
        identity
            .channel
            .clone()
            .unwrap_or_else(|| defaults::CHANNEL.to_string()),
    );
    put("dpc", or_empty(&identity.dpc));
    put("market", or_empty(&identity.market));
    put("mkt", mkt.clone());
    put("language", language.clone());
    put("lpMarket", or_empty(&identity.lp_market));
    put("bcex", or_empty(&identity.bcex));
    props
}
