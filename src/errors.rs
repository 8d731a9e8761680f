use thiserror::Error;

#[derive(Error, Debug)]
#[error("error in configuration: {0}")]
pub struct ConfigError(pub String);

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> ConfigError {
        ConfigError(format!("config file error: {}", e))
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> ConfigError {
        ConfigError(format!("config document error: {}", e))
    }
}

#[derive(Error, Debug)]
#[error("error during initialization: {0}")]
pub struct InitError(pub String);

impl From<std::io::Error> for InitError {
    fn from(e: std::io::Error) -> InitError {
        InitError(e.to_string())
    }
}
impl From<log::SetLoggerError> for InitError {
    fn from(e: log::SetLoggerError) -> InitError {
        InitError(e.to_string())
    }
}
impl From<log4rs::config::runtime::ConfigErrors> for InitError {
    fn from(e: log4rs::config::runtime::ConfigErrors) -> InitError {
        InitError(e.to_string())
    }
}
