//! DOM re-scan and attachment tracking
//!
//! The host page re-renders its upload widgets at will, so interception has
//! to be re-established continuously: every structural-change batch re-runs
//! surface discovery and attachment. Attachment is idempotent through
//! element-owned markers, which is the sole guard against duplicate-handler
//! races.

pub mod discovery;
pub mod observer;
pub mod tracker;

// Re-export commonly used types
pub use discovery::find_upload_area;
pub use observer::Rescanner;
pub use tracker::AttachmentTracker;
