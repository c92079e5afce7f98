use std::env;

use crate::constants::envvars;

pub fn load_dotenv() {
    if dotenv::dotenv().is_ok() {
        log::debug!("Loaded local .env")
    }
    // Also load $EXT_DATA_DIR/.env if exists
    if let Ok(data_dir) = env::var(envvars::DATA_DIR) {
        let data_dir_dotenv = format!("{data_dir}/.env");
        if dotenv::from_path(&data_dir_dotenv).is_ok() {
            log::debug!("Loaded {data_dir_dotenv}");
        }
    }
}
