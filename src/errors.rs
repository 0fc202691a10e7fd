use thiserror::Error;

/// Error type for a benchmark comparison run.
#[derive(Debug, Error)]
pub enum CobError {
    #[error("unable to resolve revision: {0}")]
    RevisionResolution(String),
    #[error("checkout failed: {0}")]
    Checkout(String),
    #[error("benchmark harness failed: {0}")]
    HarnessExecution(String),
    #[error("failed to parse benchmark output: {0}")]
    Parse(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("report error: {0}")]
    Report(String),
}

impl CobError {
    pub fn revision<T: Into<String>>(msg: T) -> Self {
        CobError::RevisionResolution(msg.into())
    }

    pub fn checkout<T: Into<String>>(msg: T) -> Self {
        CobError::Checkout(msg.into())
    }

    pub fn harness<T: Into<String>>(msg: T) -> Self {
        CobError::HarnessExecution(msg.into())
    }

    pub fn parse<T: Into<String>>(msg: T) -> Self {
        CobError::Parse(msg.into())
    }

    pub fn invalid_config<T: Into<String>>(msg: T) -> Self {
        CobError::InvalidConfig(msg.into())
    }

    pub fn report<T: Into<String>>(msg: T) -> Self {
        CobError::Report(msg.into())
    }
}
