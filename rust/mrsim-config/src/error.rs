use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error reading configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("property {0} is not valid (in {1})")]
    UnknownProperty(String, String),

    #[error("invalid value for property {0}: {1}")]
    InvalidValue(String, String),

    #[error("property {0} is required but was not set")]
    MissingProperty(&'static str),

    #[error("malformed platform/deploy TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("host {0:?} referenced in deployment but not present in platform")]
    DanglingHost(String),

    #[error("master host {0:?} must not also appear in the workers list")]
    MasterIsWorker(String),

    #[error("deployment must name at least one worker")]
    NoWorkers,
}
