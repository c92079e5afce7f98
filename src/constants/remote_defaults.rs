use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::keys;

pub static REMOTE_DEFAULTS: Lazy<HashMap<&str, &str>> = Lazy::new(|| {
    HashMap::from([
        (
            keys::CONFIG_API_URL,
            "https://services.bingapis.com/ge-apps/api/Extension/getConfig",
        ),
        (keys::TELEMETRY_URL, "https://dc.services.visualstudio.com/v2/track"),
    ])
});
