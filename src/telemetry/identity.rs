use kvstore::KVDb;
use serde_json::Value;

use crate::constants::keys;

/// Distribution context of the installation. Written elsewhere in the
/// extension; only read here.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IdentityAttributes {
    pub partner_code: Option<String>,
    pub channel: Option<String>,
    pub machine_id: Option<String>,
    pub dpc: Option<String>,
    pub lp_market: Option<String>,
    pub market: Option<String>,
    pub bcex: Option<String>,
}

impl IdentityAttributes {
    pub fn load(kvs: &KVDb) -> Self {
        IdentityAttributes {
            partner_code: read_attr(kvs, keys::PARTNER_CODE),
            channel: read_attr(kvs, keys::CHANNEL),
            machine_id: read_attr(kvs, keys::MACHINE_ID),
            dpc: read_attr(kvs, keys::DPC),
            lp_market: read_attr(kvs, keys::LP_MARKET),
            market: read_attr(kvs, keys::MARKET),
            bcex: read_attr(kvs, keys::BCEX),
        }
    }
}

// Empty strings, zero, false and null count as unset
fn read_attr(kvs: &KVDb, key: &str) -> Option<String> {
    let value = match kvs.get::<Value>(key) {
        Ok(v) => v?,
        Err(e) => {
            log::warn!("Could not read {key}: {e}");
            return None;
        }
    };
    match value {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some(String::from("true")),
        _ => None,
    }
}
