use simple_error::SimpleError;
use std::fmt;

/// Error types for microstrip synthesis and response approximation
#[derive(Debug, PartialEq)]
pub enum DesignError {
    InvalidGeometry(String),
    InvalidFrequency(String),
    InvalidParameter(String),
    UnsupportedOrder(usize),
    Parse(String),
    Io(String),
}

impl fmt::Display for DesignError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DesignError::InvalidGeometry(msg) => write!(f, "Invalid geometry: {}", msg),
            DesignError::InvalidFrequency(msg) => write!(f, "Invalid frequency: {}", msg),
            DesignError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            DesignError::UnsupportedOrder(n) => {
                write!(f, "No prototype table for filter order {}", n)
            }
            DesignError::Parse(msg) => write!(f, "Parse error: {}", msg),
            DesignError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for DesignError {}

impl From<SimpleError> for DesignError {
    fn from(err: SimpleError) -> Self {
        DesignError::Parse(err.as_str().to_string())
    }
}

impl From<std::io::Error> for DesignError {
    fn from(err: std::io::Error) -> Self {
        DesignError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for DesignError {
    fn from(err: toml::de::Error) -> Self {
        DesignError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for DesignError {
    fn from(err: serde_json::Error) -> Self {
        DesignError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DesignError>;

/// Reject non-positive or non-finite lengths.
pub(crate) fn check_length(name: &str, val: f64) -> Result<f64> {
    if val.is_finite() && val > 0.0 {
        Ok(val)
    } else {
        Err(DesignError::InvalidGeometry(format!(
            "{} must be positive, got {}",
            name, val
        )))
    }
}
