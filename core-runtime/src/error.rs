use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required setting {variable}: {message}")]
    MissingSetting { variable: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
