use crate::bibfile::DEFAULT_BIB_PATH;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

pub const CONFIG_FILE: &str = "portfolio.toml";

/// Site-level settings, mirroring the metadata the site itself carries.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub author: String,
    pub bibliography: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            title: String::new(),
            author: String::new(),
            bibliography: DEFAULT_BIB_PATH.to_string(),
        }
    }
}

pub fn read_config_file() -> Result<Config> {
    let config_path = Path::new(CONFIG_FILE);
    if config_path.exists() {
        // Read the contents of the portfolio.toml file
        let file = fs::File::open(config_path)?;
        let mut reader = BufReader::new(file);
        let mut toml_content = String::new();
        reader.read_to_string(&mut toml_content)?;
        // Deserialize the TOML content into a Config struct
        let config: Config = toml::from_str(&toml_content)?;
        Ok(config)
    } else {
        // Return default configuration if the file doesn't exist
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_the_conventional_bib_path() {
        let config = Config::default();
        assert_eq!(config.bibliography, DEFAULT_BIB_PATH);
        assert!(config.title.is_empty());
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: Config = toml::from_str("title = \"Markus Hofer\"").unwrap();
        assert_eq!(config.title, "Markus Hofer");
        assert_eq!(config.bibliography, DEFAULT_BIB_PATH);
    }
}
