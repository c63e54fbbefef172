use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::errors::JoblyError;

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_DATABASE: &str = "~/.jobly";

/// Contents of the `.joblyrc` TOML file. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub port: Option<u16>,
    pub database: Option<String>,
    pub secret: Option<String>,
}

impl Config {
    /// Reads the config file. A missing file is an empty config.
    pub fn load(path: &str) -> Result<Config, JoblyError> {
        let path = shellexpand::tilde(path).into_owned();

        if !Path::new(&path).exists() {
            debug!("No config file at {}, using defaults", path);
            return Ok(Config::default());
        }

        let content =
            fs::read_to_string(&path).map_err(|err| JoblyError::ReadConfigFile { source: err })?;

        Config::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Config, JoblyError> {
        toml::from_str(content).map_err(|err| JoblyError::ParseConfigFile { source: err })
    }
}

/// Values given on the command line. They win over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub database: Option<String>,
    pub secret: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct Settings {
    pub port: u16,
    pub database: String,
    pub secret: String,
}

impl Settings {
    pub fn resolve(overrides: Overrides, config: Config) -> Result<Settings, JoblyError> {
        let secret = overrides
            .secret
            .or(config.secret)
            .ok_or(JoblyError::MissingSecret {})?;

        Ok(Settings {
            port: overrides.port.or(config.port).unwrap_or(DEFAULT_PORT),
            database: overrides
                .database
                .or(config.database)
                .unwrap_or_else(|| DEFAULT_DATABASE.to_owned()),
            secret,
        })
    }
}
