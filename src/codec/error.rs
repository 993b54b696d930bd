//! Error types for codec operations

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Failed to encode to webp: {0}")]
    EncodeFailed(String),

    #[error("WebP encoder produced no output")]
    NoOutput,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_output_display() {
        assert_eq!(
            CodecError::NoOutput.to_string(),
            "WebP encoder produced no output"
        );
    }

    #[test]
    fn test_decode_failed_display() {
        let err = CodecError::DecodeFailed("invalid header".to_string());
        assert_eq!(err.to_string(), "Failed to decode image: invalid header");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CodecError>();
    }
}
