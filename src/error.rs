use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not read config file {path}: {source}")]
    ConfigRead {
        path: String,
        source: std::io::Error,
    },

    #[error("Could not parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Missing configuration value: {0}")]
    MissingConfig(&'static str),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Could not decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{service} returned status {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Unexpected response from {service}: {message}")]
    Unexpected {
        service: &'static str,
        message: String,
    },
}

impl Error {
    pub fn unexpected(service: &'static str, message: &str) -> Error {
        Error::Unexpected {
            service,
            message: message.to_owned(),
        }
    }
}
