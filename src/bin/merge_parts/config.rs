use std::fs;

use anyhow::Result;
use serde::Deserialize;

use audiobook_tools::print_error;

use crate::MergePartsArgs;

/// Final config combined from CLI arguments and user config file.
#[derive(Debug)]
pub struct Config {
    pub(crate) dryrun: bool,
    pub(crate) verbose: bool,
}

/// Config from the user config file
#[derive(Debug, Default, Deserialize)]
struct MergePartsConfig {
    #[serde(default)]
    dryrun: bool,
    #[serde(default)]
    verbose: bool,
}

/// Wrapper needed for parsing the user config file section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    mergeparts: MergePartsConfig,
}

impl MergePartsConfig {
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
            .map(|config| config.mergeparts)
            .map_err(|e| anyhow::anyhow!("Failed to parse config: {e}"))
    }
}

impl Config {
    /// Create config from given command line args and user config file.
    pub fn from_args(args: MergePartsArgs) -> Self {
        let user_config = MergePartsConfig::get_user_config();
        Self {
            dryrun: args.dryrun || user_config.dryrun,
            verbose: args.verbose || user_config.verbose,
        }
    }
}

#[cfg(test)]
mod mergeparts_config_tests {
    use super::*;

    #[test]
    fn from_toml_str_parses_empty_config() {
        let toml = "";
        let config = MergePartsConfig::from_toml_str(toml).expect("should parse empty config");
        assert!(!config.dryrun);
        assert!(!config.verbose);
    }

    #[test]
    fn from_toml_str_parses_mergeparts_section() {
        let toml = r"
[mergeparts]
dryrun = true
verbose = true
";
        let config = MergePartsConfig::from_toml_str(toml).expect("should parse config");
        assert!(config.dryrun);
        assert!(config.verbose);
    }

    #[test]
    fn from_toml_str_invalid_toml_returns_error() {
        let toml = "this is not valid toml {{{";
        let result = MergePartsConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn from_toml_str_ignores_other_sections() {
        let toml = r"
[reorg]
split = true

[mergeparts]
verbose = true
";
        let config = MergePartsConfig::from_toml_str(toml).expect("should parse config");
        assert!(config.verbose);
        assert!(!config.dryrun);
    }
}
