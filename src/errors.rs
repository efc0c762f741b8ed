use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CostModelError {
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Upstream query error: {0}")]
    UpstreamQueryError(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Unknown group field: {0}")]
    UnknownGroupField(String),

    #[error("Invalid rate: {0}")]
    InvalidRate(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Helper for mapping a failed metrics call into an upstream error
pub fn upstream_error<E: ToString>(err: E) -> CostModelError {
    CostModelError::UpstreamQueryError(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_detail() {
        let err = CostModelError::InvalidDuration("abc".into());
        assert_eq!(err.to_string(), "Invalid duration: abc");

        let err = upstream_error(anyhow::anyhow!("connection refused"));
        assert_eq!(err, CostModelError::UpstreamQueryError("connection refused".into()));
    }
}
