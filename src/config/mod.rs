#[allow(clippy::module_inception)]
pub mod config;

pub use config::{
    config_path, get_access_token, get_api_url, load_config, load_config_from, save_config,
    save_config_to, Config,
};
