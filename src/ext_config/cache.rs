use chrono::{DateTime, Utc};
use kvstore::KVDb;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::constants::{defaults, keys};
use crate::helpers::time::{days_since, parse_timestamp};

use super::fetch::{ConfigApi, FetchError};

#[derive(Error, Debug)]
pub enum ConfigCacheError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("no {0} found in config")]
    MissingField(&'static str),
}

/// A remotely configured value cached in the store next to the time it was fetched.
#[derive(Debug, Clone, Copy)]
pub struct CachedSetting {
    pub value_key: &'static str,
    pub fresh_time_key: &'static str,
    pub expire_days: f64,
}

pub const INSTRUMENTATION_KEY: CachedSetting = CachedSetting {
    value_key: keys::INSTRUMENTATION_KEY,
    fresh_time_key: keys::INSTRUMENTATION_FRESH_TIME,
    expire_days: defaults::INSTRUMENTATION_EXPIRE_DAYS,
};

pub const REWARD_GIFT_CARD_FREE_MINUTES: CachedSetting = CachedSetting {
    value_key: keys::REWARD_GIFT_CARD_FREE_MINUTES,
    fresh_time_key: keys::REWARD_GIFT_CARD_FREE_MINUTES_FRESH_TIME,
    expire_days: defaults::REWARD_GIFT_CARD_FREE_MINUTES_EXPIRE_DAYS,
};

impl CachedSetting {
    pub fn is_fresh(&self, fresh_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        days_since(fresh_time, now) <= self.expire_days
    }

    /// The stored value, if both it and its timestamp are present and the
    /// timestamp is within the expiry window.
    pub fn cached<T: DeserializeOwned>(&self, kvs: &KVDb, now: DateTime<Utc>) -> Option<T> {
        let fresh_time = match kvs.get::<String>(self.fresh_time_key) {
            Ok(Some(ts)) => parse_timestamp(&ts)?,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Could not read {}: {e}", self.fresh_time_key);
                return None;
            }
        };
        if !self.is_fresh(fresh_time, now) {
            log::debug!("Cached {} expired (fetched {fresh_time})", self.value_key);
            return None;
        }
        match kvs.get::<T>(self.value_key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Could not read {}: {e}", self.value_key);
                None
            }
        }
    }

    /// Writes value and timestamp together.
    pub fn store<T: Serialize>(
        &self,
        kvs: &KVDb,
        value: &T,
        now: DateTime<Utc>,
    ) -> Result<(), kvstore::KVStoreError> {
        kvs.set_many(&[
            (self.value_key, serde_json::to_value(value)?),
            (self.fresh_time_key, json!(now.to_rfc3339())),
        ])
    }

    fn store_or_warn<T: Serialize>(&self, kvs: &KVDb, value: &T, now: DateTime<Utc>) {
        if let Err(e) = self.store(kvs, value, now) {
            log::warn!("Could not cache {}: {e}", self.value_key);
        }
    }
}

pub fn get_instrumentation_key(kvs: &KVDb, api: &ConfigApi) -> Result<String, ConfigCacheError> {
    get_instrumentation_key_at(kvs, api, Utc::now())
}

fn get_instrumentation_key_at(
    kvs: &KVDb,
    api: &ConfigApi,
    now: DateTime<Utc>,
) -> Result<String, ConfigCacheError> {
    let setting = INSTRUMENTATION_KEY;
    if let Some(ikey) = setting.cached::<String>(kvs, now).filter(|k| !k.is_empty()) {
        log::debug!("Using cached instrumentation key");
        return Ok(ikey);
    }

    let ikey = api
        .fetch_response()?
        .instrumentation_key
        .filter(|k| !k.is_empty())
        .ok_or(ConfigCacheError::MissingField(setting.value_key))?;
    setting.store_or_warn(kvs, &ikey, now);
    log::info!("Refreshed instrumentation key");
    Ok(ikey)
}

pub fn get_reward_gift_card_free_minutes(
    kvs: &KVDb,
    api: &ConfigApi,
) -> Result<f64, ConfigCacheError> {
    get_reward_gift_card_free_minutes_at(kvs, api, Utc::now())
}

fn get_reward_gift_card_free_minutes_at(
    kvs: &KVDb,
    api: &ConfigApi,
    now: DateTime<Utc>,
) -> Result<f64, ConfigCacheError> {
    let setting = REWARD_GIFT_CARD_FREE_MINUTES;
    if let Some(minutes) = setting
        .cached::<Value>(kvs, now)
        .as_ref()
        .and_then(free_minutes_from_value)
    {
        log::debug!("Using cached reward gift card free minutes: {minutes}");
        return Ok(minutes);
    }

    let minutes = api
        .fetch_config()?
        .reward_gift_card_free_minutes
        .as_ref()
        .and_then(free_minutes_from_value)
        .ok_or(ConfigCacheError::MissingField(setting.value_key))?;
    setting.store_or_warn(kvs, &minutes, now);
    log::info!("Refreshed reward gift card free minutes: {minutes}");
    Ok(minutes)
}

/// Accepts any non-zero finite number or a string holding one. Zero counts as unset.
fn free_minutes_from_value(value: &Value) -> Option<f64> {
    let minutes = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (minutes.is_finite() && minutes != 0.0).then_some(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;
    use mockito::{Matcher, Mock, Server, ServerGuard};

    use crate::interfaces::http_api::get_ureq_agent;

    const CONFIG_PATH: &str = "/getConfig";

    fn setup() -> (ServerGuard, ConfigApi, KVDb) {
        let server = Server::new();
        let api = ConfigApi::new(
            get_ureq_agent(),
            &format!("{}{CONFIG_PATH}", server.url()),
            "ext-id",
        )
        .unwrap();
        (server, api, KVDb::new(":memory:").unwrap())
    }

    fn config_mock(server: &mut ServerGuard, body: Value, hits: usize) -> Mock {
        server
            .mock("GET", CONFIG_PATH)
            .match_query(Matcher::Any)
            .with_body(body.to_string())
            .expect(hits)
            .create()
    }

    fn full_config() -> Value {
        json!({
            "instrumentationKey": "fresh-ikey",
            "extensionConfigJson": "{\"rewardGiftCardFreeMinutes\": 45}"
        })
    }

    #[test]
    fn fresh_ikey_skips_fetch() {
        let (mut server, api, kvs) = setup();
        let m = config_mock(&mut server, full_config(), 0);
        let now = Utc::now();
        INSTRUMENTATION_KEY
            .store(&kvs, &"cached-ikey", now - Duration::days(6))
            .unwrap();

        assert_eq!(get_instrumentation_key_at(&kvs, &api, now).unwrap(), "cached-ikey");
        m.assert();
    }

    #[test]
    fn expired_ikey_is_refetched_and_stored() {
        let (mut server, api, kvs) = setup();
        let m = config_mock(&mut server, full_config(), 1);
        let now = Utc::now();
        INSTRUMENTATION_KEY
            .store(&kvs, &"old-ikey", now - Duration::days(7) - Duration::minutes(1))
            .unwrap();

        assert_eq!(get_instrumentation_key_at(&kvs, &api, now).unwrap(), "fresh-ikey");
        m.assert();
        assert_eq!(
            kvs.get::<String>(keys::INSTRUMENTATION_KEY).unwrap(),
            Some("fresh-ikey".into())
        );
        assert_eq!(
            kvs.get::<String>(keys::INSTRUMENTATION_FRESH_TIME).unwrap(),
            Some(now.to_rfc3339())
        );
    }

    #[test]
    fn exactly_at_window_is_still_fresh() {
        let now = Utc::now();
        assert!(INSTRUMENTATION_KEY.is_fresh(now - Duration::days(7), now));
        assert!(!REWARD_GIFT_CARD_FREE_MINUTES.is_fresh(now - Duration::hours(25), now));
    }

    #[test]
    fn missing_timestamp_triggers_fetch() {
        let (mut server, api, kvs) = setup();
        let m = config_mock(&mut server, full_config(), 1);
        kvs.set(keys::INSTRUMENTATION_KEY, "orphan-ikey").unwrap();

        assert_eq!(get_instrumentation_key(&kvs, &api).unwrap(), "fresh-ikey");
        m.assert();
    }

    #[test]
    fn empty_cached_ikey_triggers_fetch() {
        let (mut server, api, kvs) = setup();
        let m = config_mock(&mut server, full_config(), 1);
        INSTRUMENTATION_KEY.store(&kvs, &"", Utc::now()).unwrap();

        assert_eq!(get_instrumentation_key(&kvs, &api).unwrap(), "fresh-ikey");
        m.assert();
    }

    #[test]
    fn failed_fetch_leaves_cache_untouched() {
        let (mut server, api, kvs) = setup();
        let m = server
            .mock("GET", CONFIG_PATH)
            .match_query(Matcher::Any)
            .with_status(500)
            .expect(1)
            .create();
        let stale = Utc::now() - Duration::days(30);
        INSTRUMENTATION_KEY.store(&kvs, &"stale-ikey", stale).unwrap();

        assert!(matches!(
            get_instrumentation_key(&kvs, &api),
            Err(ConfigCacheError::Fetch(FetchError::Status(500)))
        ));
        m.assert();
        assert_eq!(
            kvs.get::<String>(keys::INSTRUMENTATION_KEY).unwrap(),
            Some("stale-ikey".into())
        );
        assert_eq!(
            kvs.get::<String>(keys::INSTRUMENTATION_FRESH_TIME).unwrap(),
            Some(stale.to_rfc3339())
        );
    }

    #[test]
    fn missing_ikey_field_is_rejected_without_write() {
        let (mut server, api, kvs) = setup();
        let _m = config_mock(&mut server, json!({ "extensionConfigJson": "{}" }), 1);

        assert!(matches!(
            get_instrumentation_key(&kvs, &api),
            Err(ConfigCacheError::MissingField(keys::INSTRUMENTATION_KEY))
        ));
        assert_eq!(kvs.get_raw(keys::INSTRUMENTATION_KEY).unwrap(), None);
        assert_eq!(kvs.get_raw(keys::INSTRUMENTATION_FRESH_TIME).unwrap(), None);
    }

    #[test]
    fn legacy_date_string_timestamp_is_honoured() {
        let (mut server, api, kvs) = setup();
        let m = config_mock(&mut server, full_config(), 0);
        let now = Utc::now();
        kvs.set(keys::INSTRUMENTATION_KEY, "legacy-ikey").unwrap();
        kvs.set(
            keys::INSTRUMENTATION_FRESH_TIME,
            &now.format("%a %b %d %Y").to_string(),
        )
        .unwrap();

        assert_eq!(get_instrumentation_key_at(&kvs, &api, now).unwrap(), "legacy-ikey");
        m.assert();
    }

    #[test]
    fn fresh_free_minutes_skip_fetch() {
        let (mut server, api, kvs) = setup();
        let m = config_mock(&mut server, full_config(), 0);
        let now = Utc::now();
        REWARD_GIFT_CARD_FREE_MINUTES
            .store(&kvs, &20, now - Duration::hours(23))
            .unwrap();

        assert_eq!(get_reward_gift_card_free_minutes_at(&kvs, &api, now).unwrap(), 20.0);
        m.assert();
    }

    #[test]
    fn expired_free_minutes_are_refetched() {
        let (mut server, api, kvs) = setup();
        let m = config_mock(&mut server, full_config(), 1);
        let now = Utc::now();
        REWARD_GIFT_CARD_FREE_MINUTES
            .store(&kvs, &20, now - Duration::hours(25))
            .unwrap();

        assert_eq!(get_reward_gift_card_free_minutes_at(&kvs, &api, now).unwrap(), 45.0);
        m.assert();
        assert_eq!(
            kvs.get::<f64>(keys::REWARD_GIFT_CARD_FREE_MINUTES).unwrap(),
            Some(45.0)
        );
        assert_eq!(
            kvs.get::<String>(keys::REWARD_GIFT_CARD_FREE_MINUTES_FRESH_TIME).unwrap(),
            Some(now.to_rfc3339())
        );
    }

    #[test]
    fn legacy_utc_string_timestamp_for_free_minutes() {
        let (mut server, api, kvs) = setup();
        let m = config_mock(&mut server, full_config(), 0);
        let now = Utc::now();
        kvs.set(keys::REWARD_GIFT_CARD_FREE_MINUTES, &10).unwrap();
        kvs.set(
            keys::REWARD_GIFT_CARD_FREE_MINUTES_FRESH_TIME,
            &(now - Duration::hours(2)).to_rfc2822(),
        )
        .unwrap();

        assert_eq!(get_reward_gift_card_free_minutes_at(&kvs, &api, now).unwrap(), 10.0);
        m.assert();
    }

    #[test]
    fn fractional_free_minutes_are_fetched_and_cached() {
        let (mut server, api, kvs) = setup();
        let m = config_mock(
            &mut server,
            json!({
                "instrumentationKey": "ikey",
                "extensionConfigJson": "{\"rewardGiftCardFreeMinutes\": 1.5}"
            }),
            1,
        );
        let now = Utc::now();

        assert_eq!(get_reward_gift_card_free_minutes_at(&kvs, &api, now).unwrap(), 1.5);
        // Served from the store on the next call
        assert_eq!(get_reward_gift_card_free_minutes_at(&kvs, &api, now).unwrap(), 1.5);
        m.assert();
        assert_eq!(
            kvs.get::<f64>(keys::REWARD_GIFT_CARD_FREE_MINUTES).unwrap(),
            Some(1.5)
        );
    }

    #[test]
    fn missing_free_minutes_field_is_rejected_without_write() {
        let (mut server, api, kvs) = setup();
        let _m = config_mock(
            &mut server,
            json!({
                "instrumentationKey": "ikey",
                "extensionConfigJson": "{\"somethingElse\": true}"
            }),
            1,
        );

        assert!(matches!(
            get_reward_gift_card_free_minutes(&kvs, &api),
            Err(ConfigCacheError::MissingField(keys::REWARD_GIFT_CARD_FREE_MINUTES))
        ));
        assert_eq!(kvs.get_raw(keys::REWARD_GIFT_CARD_FREE_MINUTES).unwrap(), None);
    }

    #[test]
    fn unparseable_nested_config_is_rejected() {
        let (mut server, api, kvs) = setup();
        let _m = config_mock(
            &mut server,
            json!({ "instrumentationKey": "ikey", "extensionConfigJson": "{broken" }),
            1,
        );

        assert!(matches!(
            get_reward_gift_card_free_minutes(&kvs, &api),
            Err(ConfigCacheError::Fetch(FetchError::ParseNestedConfig(_)))
        ));
    }

    #[test]
    fn free_minutes_values() {
        assert_eq!(free_minutes_from_value(&json!(30)), Some(30.0));
        assert_eq!(free_minutes_from_value(&json!("15")), Some(15.0));
        assert_eq!(free_minutes_from_value(&json!(1.5)), Some(1.5));
        assert_eq!(free_minutes_from_value(&json!("0.25")), Some(0.25));
        assert_eq!(free_minutes_from_value(&json!(-5)), Some(-5.0));
        assert_eq!(free_minutes_from_value(&json!(0)), None);
        assert_eq!(free_minutes_from_value(&json!(0.0)), None);
        assert_eq!(free_minutes_from_value(&json!("0")), None);
        assert_eq!(free_minutes_from_value(&json!("")), None);
        assert_eq!(free_minutes_from_value(&json!("many")), None);
        assert_eq!(free_minutes_from_value(&json!("NaN")), None);
        assert_eq!(free_minutes_from_value(&json!(null)), None);
    }
}
