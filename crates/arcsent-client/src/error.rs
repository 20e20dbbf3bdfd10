//! Client error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The daemon rejected the credential (HTTP 401).
    #[error("Unauthorized")]
    Unauthorized,

    /// Any other non-2xx response; carries the status text.
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Credential store error: {0}")]
    Credential(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl ApiError {
    /// Whether the failure should send the operator back to re-authenticate.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_distinguishable() {
        let unauthorized = ApiError::Unauthorized;
        let failed = ApiError::RequestFailed("Unauthorized".to_string());

        assert!(unauthorized.is_unauthorized());
        assert!(!failed.is_unauthorized());
        assert_ne!(unauthorized, failed);
        assert_ne!(unauthorized.to_string(), failed.to_string());
        assert_eq!(failed.to_string(), "Request failed: Unauthorized");
    }
}
