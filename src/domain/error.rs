use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Provider timed out: {provider}")]
    Timeout { provider: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Corrupt cache entry: {key}")]
    Corruption { key: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn timeout(provider: impl Into<String>) -> Self {
        Self::Timeout {
            provider: provider.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    pub fn corruption(key: impl Into<String>) -> Self {
        Self::Corruption { key: key.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True for failures that originate in a remote data tier.
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Self::Provider { .. } | Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("latitude out of range");
        assert_eq!(
            error.to_string(),
            "Validation error: latitude out of range"
        );
    }

    #[test]
    fn test_provider_error() {
        let error = DomainError::provider("effis", "HTTP 503");
        assert_eq!(error.to_string(), "Provider error: effis - HTTP 503");
        assert!(error.is_provider_failure());
    }

    #[test]
    fn test_timeout_is_provider_failure() {
        assert!(DomainError::timeout("effis").is_provider_failure());
        assert!(!DomainError::storage("disk full").is_provider_failure());
    }

    #[test]
    fn test_corruption_error() {
        let error = DomainError::corruption("gcvwr");
        assert_eq!(error.to_string(), "Corrupt cache entry: gcvwr");
    }
}
