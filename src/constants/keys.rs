// Remote config cache
pub const INSTRUMENTATION_KEY: &str = "instrumentationKey";
pub const INSTRUMENTATION_FRESH_TIME: &str = "instrumentationFreshTime";
pub const REWARD_GIFT_CARD_FREE_MINUTES: &str = "rewardGiftCardFreeMinutes";
pub const REWARD_GIFT_CARD_FREE_MINUTES_FRESH_TIME: &str = "rewardGiftCardFreeMinutesFreshTime";

// Identity attributes (written by other parts of the extension)
pub const PARTNER_CODE: &str = "PartnerCode";
pub const CHANNEL: &str = "Channel";
pub const MACHINE_ID: &str = "MachineID";
pub const DPC: &str = "DPC";
pub const LP_MARKET: &str = "LPMKT";
pub const MARKET: &str = "Market";
pub const BCEX: &str = "BCEX";

// Endpoint overrides
pub const CONFIG_API_URL: &str = "configApiUrl";
pub const TELEMETRY_URL: &str = "telemetryUrl";
