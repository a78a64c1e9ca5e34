use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AgentError {
    #[error("agent parameter `{name}` must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("agent parameter `{name}` must be > 0, got {value}")]
    NonPositive { name: &'static str, value: f64 },
}

pub type AgentResult<T> = Result<T, AgentError>;
