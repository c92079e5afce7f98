use anyhow::Result;
use kvstore::KVDb;

use ext_telemetry::ext_config::ConfigApi;
use ext_telemetry::host::HostEnv;
use ext_telemetry::interfaces::{http_api, kvpath};
use ext_telemetry::{get_instrumentation_key, get_reward_gift_card_free_minutes};

fn open() -> Result<(KVDb, ConfigApi)> {
    let kvs = KVDb::new(kvpath::SQLITE_STORE.as_path())?;
    let host = HostEnv::from_env();
    let api = ConfigApi::new(
        http_api::get_ureq_agent(),
        &http_api::get_config_api_url(&kvs),
        &host.extension_id,
    )?;
    Ok((kvs, api))
}

pub fn free_minutes() -> Result<()> {
    let (kvs, api) = open()?;
    let minutes = get_reward_gift_card_free_minutes(&kvs, &api)?;
    println!("{minutes}");
    Ok(())
}

pub fn instrumentation_key() -> Result<()> {
    let (kvs, api) = open()?;
    let ikey = get_instrumentation_key(&kvs, &api)?;
    println!("{ikey}");
    Ok(())
}
