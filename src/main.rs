mod argsets;
mod command;

use std::ffi::OsString;

use anyhow::{anyhow, Result};
use env_logger::Env;
use serde_json::{json, Map, Value};

use ext_telemetry::constants::{defaults, envvars};
use ext_telemetry::helpers::load_dotenv;

const CMD_SEND: &str = "send";
const CMD_FREE_MINUTES: &str = "free-minutes";
const CMD_INSTRUMENTATION_KEY: &str = "instrumentation-key";
const CMD_ENV_INFO: &str = "env-info";
const CMD_KVS_GET: &str = "kvs-get";
const CMD_KVS_SET: &str = "kvs-set";

fn main() -> Result<()> {
    load_dotenv();
    env_logger::Builder::from_env(Env::default().filter_or(envvars::LOG_LEVEL, defaults::LOG_LEVEL))
        .init();

    let mut args = pico_args::Arguments::from_env();
    match args.subcommand()?.as_deref() {
        Some(CMD_SEND) => command::send(argsets::SendArgs {
            kind: args.free_from_str()?,
            data: parse_data(args.finish())?,
        }),
        Some(CMD_FREE_MINUTES) => command::free_minutes(),
        Some(CMD_INSTRUMENTATION_KEY) => command::instrumentation_key(),
        Some(CMD_ENV_INFO) => command::env_info(argsets::EnvInfoArgs {
            user_agent: args.opt_free_from_str()?,
        }),
        Some(CMD_KVS_GET) => command::kvs_get(argsets::KvsGetArgs {
            key: args.free_from_str()?,
        }),
        Some(CMD_KVS_SET) => command::kvs_set(argsets::KvsSetArgs {
            key: args.free_from_str()?,
            value: args.free_from_str()?,
        }),
        _ => Err(anyhow!(
            "Subcommand must be one of 'send', 'free-minutes', 'instrumentation-key', 'env-info', 'kvs-get', 'kvs-set'"
        )),
    }
}

// Extra event fields given as key=value; values that parse as JSON are kept as such
fn parse_data(free: Vec<OsString>) -> Result<Option<Map<String, Value>>> {
    if free.is_empty() {
        return Ok(None);
    }
    let mut data = Map::new();
    for arg in free {
        let arg = arg
            .into_string()
            .map_err(|a| anyhow!("Argument is not valid UTF-8: {a:?}"))?;
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected key=value, got '{arg}'"))?;
        let value = serde_json::from_str(value).unwrap_or_else(|_| json!(value));
        data.insert(key.to_string(), value);
    }
    Ok(Some(data))
}
