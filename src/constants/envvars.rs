pub const DATA_DIR: &str = "EXT_DATA_DIR";
pub const ROOT_DIR: &str = "EXT_ROOT_DIR";

pub const EXTENSION_ID: &str = "EXT_ID";
pub const EXTENSION_NAME: &str = "EXT_NAME";
pub const EXTENSION_VERSION: &str = "EXT_VERSION";
pub const USER_AGENT: &str = "EXT_USER_AGENT";
pub const LOCALE: &str = "EXT_LOCALE";
pub const LANG: &str = "LANG";

pub const LOG_LEVEL: &str = "LOG_LEVEL";
