use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod identity;
mod payload;
mod send;

pub use identity::IdentityAttributes;
pub use payload::{build_event, BaseData, EventData, TelemetryEvent};
pub use send::{send_telemetry_data, TelemetryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TelemetryType {
    #[serde(rename = "ping")]
    Ping,
    #[serde(rename = "install")]
    Install,
    /// Feature session notification
    #[serde(rename = "fsn")]
    Fsn,
    #[serde(rename = "giftCard")]
    GiftCard,
}

impl TelemetryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TelemetryType::Ping => "ping",
            TelemetryType::Install => "install",
            TelemetryType::Fsn => "fsn",
            TelemetryType::GiftCard => "giftCard",
        }
    }
}

impl fmt::Display for TelemetryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("unknown telemetry type '{0}'; expected one of ping, install, fsn, giftCard")]
pub struct UnknownTelemetryType(String);

impl FromStr for TelemetryType {
    type Err = UnknownTelemetryType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ping" => Ok(TelemetryType::Ping),
            "install" => Ok(TelemetryType::Install),
            "fsn" | "feature-session-notification" => Ok(TelemetryType::Fsn),
            "giftCard" | "gift-card" => Ok(TelemetryType::GiftCard),
            _ => Err(UnknownTelemetryType(s.to_string())),
        }
    }
}
