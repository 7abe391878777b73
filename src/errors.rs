// errors.rs
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GuidError {
    #[error("buffer too small: {required} bytes required, {actual} provided")]
    BufferTooSmall { required: usize, actual: usize },
    #[error("invalid guid: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("missing configuration: {}", .0.join(","))]
    Missing(Vec<String>),
}
