pub mod constants;
pub mod ext_config;
pub mod helpers;
pub mod host;
pub mod interfaces;
pub mod telemetry;

pub use ext_config::{get_instrumentation_key, get_reward_gift_card_free_minutes};
pub use telemetry::{send_telemetry_data, TelemetryType};
