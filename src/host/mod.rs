//! Values supplied by the extension runtime hosting this module.

use std::env;

use crate::constants::{defaults, envvars};

pub mod user_agent;

pub use user_agent::{browser_name, browser_version, os_version, Browser, OsVersion};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnv {
    pub extension_id: String,
    pub extension_name: String,
    pub extension_version: String,
    pub user_agent: String,
    pub locale: String,
}

impl HostEnv {
    pub fn from_env() -> Self {
        HostEnv {
            extension_id: env_or(envvars::EXTENSION_ID, defaults::EXTENSION_ID),
            extension_name: env_or(envvars::EXTENSION_NAME, defaults::EXTENSION_NAME),
            extension_version: env_or(envvars::EXTENSION_VERSION, defaults::EXTENSION_VERSION),
            user_agent: env::var(envvars::USER_AGENT).unwrap_or_default(),
            locale: env::var(envvars::LOCALE)
                .ok()
                .filter(|l| !l.is_empty())
                .or_else(|| env::var(envvars::LANG).ok().and_then(|l| locale_from_lang(&l)))
                .unwrap_or_else(|| defaults::LOCALE.to_string()),
        }
    }

    /// Display name as reported in telemetry: no spaces, `&` spelled out.
    pub fn telemetry_name(&self) -> String {
        self.extension_name.replace(' ', "").replace('&', "and")
    }
}

fn env_or(var: &str, default: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}

/// `en_US.UTF-8` -> `en-US`. POSIX pseudo-locales carry no language and map to `None`.
fn locale_from_lang(lang: &str) -> Option<String> {
    let tag = lang.split(['.', '@']).next().unwrap_or_default();
    if tag.is_empty() || tag == "C" || tag == "POSIX" {
        return None;
    }
    Some(tag.replace('_', "-"))
}
