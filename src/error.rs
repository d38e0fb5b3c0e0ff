use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScopeError {
    /// Non-finite, out-of-range or non-positive input to the loop model.
    #[error("invalid parameter: {name} = {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("unknown material: {0}")]
    UnknownMaterial(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScopeError>;
