use anyhow::Result;

use ext_telemetry::host::{browser_name, browser_version, os_version, HostEnv};

use crate::argsets::EnvInfoArgs;

pub fn env_info(args: EnvInfoArgs) -> Result<()> {
    let host = HostEnv::from_env();
    let ua = args.user_agent.unwrap_or(host.user_agent);
    println!("browser: {}", browser_name(&ua));
    println!("browserVersion: {}", browser_version(&ua));
    println!("os: {}", os_version(&ua));
    println!("locale: {}", host.locale);
    Ok(())
}
