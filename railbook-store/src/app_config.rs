use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub data_dir: String,
}

impl StorageConfig {
    pub fn users_file(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("users.json")
    }

    pub fn trains_file(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("trains.json")
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let s = config::Config::builder()
            .set_default("storage.data_dir", "data")?
            // Both files are optional; the defaults above make a bare
            // checkout work with no configuration at all.
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `RAILBOOK_STORAGE__DATA_DIR=/tmp/railbook`
            .add_source(config::Environment::with_prefix("RAILBOOK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_without_config_files() {
        let config = Config::load().unwrap();
        assert_eq!(config.storage.data_dir, "data");
        assert!(config.storage.users_file().ends_with("users.json"));
        assert!(config.storage.trains_file().ends_with("trains.json"));
    }
}
