use std::error::Error;
use std::fmt;

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    Config(String),
    Transport { fetcher: &'static str, status: u16 },
}

impl fmt::Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricsError::Config(message) => {
                write!(f, "configuration error: {message}")
            }
            MetricsError::Transport { fetcher, status } => {
                write!(f, "request failed in the {fetcher} fetcher (status {status})")
            }
        }
    }
}

impl Error for MetricsError {}
