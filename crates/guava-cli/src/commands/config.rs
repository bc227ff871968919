use std::path::PathBuf;

use guava_core::config::ClientConfig;
use guava_core::util::normalize_text_option;

use crate::cli::ConfigCommands;
use crate::commands::common::{print_json, resolve_config, resolve_config_path, SessionOptions};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, options: &SessionOptions) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => {
            let config = resolve_config(options)?;
            print_json(&config)
        }
        ConfigCommands::Path => {
            println!("{}", resolve_config_path(options)?.display());
            Ok(())
        }
        ConfigCommands::Set {
            api_base_url,
            request_timeout_secs,
            storage_path,
            purge_local_on_logout,
        } => {
            let path = resolve_config_path(options)?;
            let mut config = ClientConfig::load_from_path(&path)?;
            let changed = apply_config_changes(
                &mut config,
                ConfigChanges {
                    api_base_url,
                    request_timeout_secs,
                    storage_path,
                    purge_local_on_logout,
                },
            );
            if !changed {
                return Err(CliError::Config(
                    "Nothing to set. Pass at least one option, e.g. --api-base-url".to_string(),
                ));
            }

            config.save_to_path(&path)?;
            println!("Updated {}", path.display());
            Ok(())
        }
    }
}

#[derive(Debug, Default)]
pub struct ConfigChanges {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub storage_path: Option<PathBuf>,
    pub purge_local_on_logout: Option<bool>,
}

/// Returns whether anything was changed. Validation happens on save.
pub fn apply_config_changes(config: &mut ClientConfig, changes: ConfigChanges) -> bool {
    let mut changed = false;
    if let Some(url) = normalize_text_option(changes.api_base_url) {
        config.api_base_url = url;
        changed = true;
    }
    if let Some(timeout) = changes.request_timeout_secs {
        config.request_timeout_secs = timeout;
        changed = true;
    }
    if let Some(path) = changes.storage_path {
        config.storage_path = Some(path);
        changed = true;
    }
    if let Some(purge) = changes.purge_local_on_logout {
        config.purge_local_on_logout = purge;
        changed = true;
    }
    changed
}
