use controller::config::{ControllerConfig, ValidationError};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub controller: ControllerConfig,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    Load(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] ValidationError),
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: Config = serde_yaml::from_reader(file)?;
        config.controller.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp_file(s: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        write!(tmp, "{}", s).expect("write yaml");

        tmp
    }

    #[test]
    fn loads_valid_config() {
        let tmp = write_tmp_file(
            r#"
controller:
    discovery_root: /srv/greenhouse/plants
    housekeeping:
        probability: 0.015
"#,
        );

        let config = Config::from_file(tmp.path()).unwrap();
        assert_eq!(
            config.controller.discovery_root.as_deref(),
            Some(Path::new("/srv/greenhouse/plants"))
        );
    }

    #[test]
    fn rejects_invalid_probability() {
        let tmp = write_tmp_file(
            r#"
controller:
    housekeeping:
        probability: 2.0
"#,
        );

        assert!(matches!(
            Config::from_file(tmp.path()).unwrap_err(),
            ConfigError::Invalid(_)
        ));
    }

    #[test]
    fn rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::from_file(&dir.path().join("nope.yaml")).unwrap_err(),
            ConfigError::Load(_)
        ));
    }
}
