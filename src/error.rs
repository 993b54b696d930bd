// Error types module

use std::fmt;

use crate::codec::CodecError;
use crate::dom::DomError;

/// Centralized error type for the interception pipeline
///
/// Categorizes errors into the taxonomy the swallow-and-fall-back policy is
/// written against: every variant is recoverable, and the worst-case outcome
/// anywhere in the pipeline is a file passed through unconverted.
#[derive(Debug)]
pub enum InterceptError {
    /// No matching DOM target found (surface, input)
    Discovery(String),

    /// A DOM API call failed (dispatch on a detached element, etc.)
    EventApi(String),

    /// The codec adapter could not produce converted output
    Conversion(CodecError),

    /// The settings bridge failed to load or persist a value
    Settings(String),
}

impl fmt::Display for InterceptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterceptError::Discovery(msg) => write!(f, "Discovery error: {}", msg),
            InterceptError::EventApi(msg) => write!(f, "Event API error: {}", msg),
            InterceptError::Conversion(err) => write!(f, "Conversion error: {}", err),
            InterceptError::Settings(msg) => write!(f, "Settings error: {}", msg),
        }
    }
}

impl std::error::Error for InterceptError {}

impl InterceptError {
    /// Helper constructors for common error patterns
    pub fn discovery(msg: impl Into<String>) -> Self {
        InterceptError::Discovery(msg.into())
    }

    pub fn event_api(msg: impl Into<String>) -> Self {
        InterceptError::EventApi(msg.into())
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        InterceptError::Settings(msg.into())
    }
}

impl From<CodecError> for InterceptError {
    fn from(err: CodecError) -> Self {
        InterceptError::Conversion(err)
    }
}

impl From<DomError> for InterceptError {
    fn from(err: DomError) -> Self {
        match err {
            DomError::NoSuchNode { .. } | DomError::Detached { .. } => {
                InterceptError::EventApi(err.to_string())
            }
            DomError::NotAFileInput { .. } => InterceptError::Discovery(err.to_string()),
            DomError::Dispatch(msg) => InterceptError::EventApi(msg),
        }
    }
}
