use crate::asset::Os;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Immutable runtime configuration, built once at startup and passed down to
/// whoever needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Operating systems we are willing to install on.
    pub supported_oses: Vec<Os>,
    /// Package-manager tools to look for on the machine, in preference order.
    pub package_manager_tools: Vec<String>,
    /// Where downloaded assets land.
    pub download_dir: PathBuf,
}

/// The subset of `Config` that can come from a TOML file.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    download_dir: Option<String>,
    package_managers: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Config {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Config {
            supported_oses: vec![Os::Linux, Os::Darwin],
            package_manager_tools: vec![
                "apt".to_string(),
                "apt-get".to_string(),
                "dpkg".to_string(),
            ],
            download_dir: home.join("src").join("releases"),
        }
    }
}

impl Config {
    /// Default config, optionally overridden by a TOML file. Without an
    /// explicit path, `~/.config/relget/config.toml` is used when present.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => dirs::config_dir()
                .map(|dir| dir.join("relget").join("config.toml"))
                .filter(|candidate| candidate.exists()),
        };

        let mut config = Config::default();
        let Some(path) = path else {
            return Ok(config);
        };

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let file: ConfigFile = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(dir) = file.download_dir {
            config.download_dir = PathBuf::from(dir);
        }
        if let Some(managers) = file.package_managers {
            config.package_manager_tools = managers;
        }

        Ok(config)
    }
}
