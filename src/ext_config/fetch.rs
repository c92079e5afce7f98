use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

const EXTENSION_ID_PARAM: &str = "extensionId";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid config URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    Http(#[from] ureq::Error),
    #[error("config request returned status {0}")]
    Status(u16),
    #[error("could not parse config response JSON: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("no extensionConfigJson found in config")]
    MissingNestedConfig,
    #[error("failed to parse extensionConfigJson: {0}")]
    ParseNestedConfig(String),
}

/// Body returned by the config endpoint.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub instrumentation_key: Option<String>,
    pub extension_config_json: Option<String>,
}

/// Contents of `extensionConfigJson`. Fields this module doesn't use are kept in `extra`.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionConfig {
    pub reward_gift_card_free_minutes: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigResponse {
    pub fn extension_config(&self) -> Result<ExtensionConfig, FetchError> {
        let raw = self
            .extension_config_json
            .as_deref()
            .ok_or_else(|| FetchError::ParseNestedConfig("field is absent".into()))?;
        let parsed: Option<ExtensionConfig> = serde_json::from_str(raw)
            .map_err(|e| FetchError::ParseNestedConfig(e.to_string()))?;
        parsed.ok_or(FetchError::MissingNestedConfig)
    }
}

pub struct ConfigApi {
    agent: ureq::Agent,
    url: Url,
}

impl ConfigApi {
    pub fn new(agent: ureq::Agent, base_url: &str, extension_id: &str) -> Result<Self, FetchError> {
        let mut url = Url::parse(base_url)?;
        url.query_pairs_mut()
            .append_pair(EXTENSION_ID_PARAM, extension_id);
        Ok(ConfigApi { agent, url })
    }

    /// One GET against the config endpoint; no retries.
    pub fn fetch_response(&self) -> Result<ConfigResponse, FetchError> {
        log::debug!("Fetching extension config from {}", self.url);
        let mut response = self.agent.get(self.url.as_str()).call()?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("Config request failed with status {status}");
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response.body_mut().read_to_string()?;
        serde_json::from_str(&body).map_err(Into::into)
    }

    pub fn fetch_config(&self) -> Result<ExtensionConfig, FetchError> {
        self.fetch_response()?.extension_config()
    }
}
