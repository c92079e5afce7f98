use std::time::Duration;

pub const API_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const LOG_LEVEL: &str = "INFO";

pub const INSTRUMENTATION_EXPIRE_DAYS: f64 = 7.0;
pub const REWARD_GIFT_CARD_FREE_MINUTES_EXPIRE_DAYS: f64 = 1.0;

pub const PARTNER_CODE: &str = "U523";
pub const CHANNEL: &str = "Organic";

pub const EXTENSION_ID: &str = "fbgcedjacmlbgleddnoacbnijgmiolem";
pub const EXTENSION_NAME: &str = env!("CARGO_PKG_NAME");
pub const EXTENSION_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const LOCALE: &str = "en-US";
