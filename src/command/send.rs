use anyhow::Result;
use kvstore::KVDb;

use ext_telemetry::host::HostEnv;
use ext_telemetry::interfaces::kvpath;
use ext_telemetry::send_telemetry_data;

use crate::argsets::SendArgs;

/// Exits successfully whether or not the event was delivered.
pub fn send(args: SendArgs) -> Result<()> {
    let kvs = KVDb::new(kvpath::SQLITE_STORE.as_path())?;
    let host = HostEnv::from_env();
    log::info!("Sending {} telemetry for extension {}", args.kind, host.extension_id);
    send_telemetry_data(&kvs, &host, args.kind, args.data);
    Ok(())
}
