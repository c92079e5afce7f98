use serde_json::{Map, Value};

use ext_telemetry::TelemetryType;

pub struct KvsGetArgs {
    pub key: String,
}

pub struct KvsSetArgs {
    pub key: String,
    pub value: String,
}

pub struct SendArgs {
    pub kind: TelemetryType,
    pub data: Option<Map<String, Value>>,
}

pub struct EnvInfoArgs {
    pub user_agent: Option<String>,
}
