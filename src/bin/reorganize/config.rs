use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;

use audiobook_tools::print_error;

use crate::ReorganizeArgs;

/// Final config combined from CLI arguments and user config file.
#[derive(Debug)]
pub struct Config {
    pub(crate) dryrun: bool,
    pub(crate) split: bool,
    pub(crate) log_file: Option<PathBuf>,
    pub(crate) verbose: bool,
}

/// Config from the user config file
#[derive(Debug, Default, Deserialize)]
struct ReorganizeConfig {
    #[serde(default)]
    dryrun: bool,
    #[serde(default)]
    split: bool,
    #[serde(default)]
    log_file: Option<String>,
    #[serde(default)]
    verbose: bool,
}

/// Wrapper needed for parsing the user config file section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    reorg: ReorganizeConfig,
}

impl ReorganizeConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    fn get_user_config() -> Self {
        audiobook_tools::config::CONFIG_PATH
            .as_deref()
            .and_then(|path| {
                fs::read_to_string(path)
                    .map_err(|e| {
                        print_error!("Error reading config file {}: {e}", path.display());
                    })
                    .ok()
            })
            .and_then(|config_string| Self::from_toml_str(&config_string).ok())
            .unwrap_or_default()
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.reorg)
            .map_err(|e| anyhow::anyhow!("Failed to parse config: {e}"))
    }
}

impl Config {
    /// Create config from given command line args and user config file.
    pub fn from_args(args: ReorganizeArgs) -> Self {
        let user_config = ReorganizeConfig::get_user_config();
        Self {
            dryrun: args.dryrun || user_config.dryrun,
            split: args.split || user_config.split,
            log_file: args.log_file.or_else(|| user_config.log_file.map(PathBuf::from)),
            verbose: args.verbose || user_config.verbose,
        }
    }
}
