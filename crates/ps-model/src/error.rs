use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelConfigError {
    #[error("model parameter `{name}` must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("model parameter `{name}` must be > 0, got {value}")]
    NonPositive { name: &'static str, value: f64 },
}

pub type ModelResult<T> = Result<T, ModelConfigError>;
