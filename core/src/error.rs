use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlasmaError {
    #[error("canvas must be at least 1x1, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("invalid displacement model: {0}")]
    InvalidDisplacement(String),
    #[error("could not parse {key}={value:?}")]
    Config { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, PlasmaError>;
