use std::fmt;

#[derive(Debug)]
pub enum Error {
    Authentication(String),
    Http(reqwest::Error),
    GatewayNotFound(String),
    DeviceNotFound(u64),
    Config(String),
    Protocol(String),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Authentication(msg) => write!(f, "authentication failed: {msg}"),
            Error::Http(e) => write!(f, "HTTP error: {e}"),
            Error::GatewayNotFound(name) => write!(f, "no gateway named {name:?}"),
            Error::DeviceNotFound(id) => write!(f, "device {id} not present in snapshot"),
            Error::Config(msg) => write!(f, "invalid configuration: {msg}"),
            Error::Protocol(msg) => write!(f, "protocol error: {msg}"),
            Error::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
