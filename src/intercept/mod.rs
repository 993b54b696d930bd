//! Event interception layer
//!
//! Two independent sub-protocols, both gated by settings:
//! - **Drop**: capture-phase pre-emption of drag-and-drop on the upload
//!   surface, conversion, file-list replacement on the designated input,
//!   deferred synthetic change dispatch
//! - **Change**: capture-phase pre-emption of file-picker changes on each
//!   tracked input, conversion in place, synchronous synthetic re-dispatch
//!   so host listeners observe the converted list
//!
//! Both convert a file list the same way: concurrent per-file fan-out with
//! an all-or-nothing join, order and count preserved, per-file failures
//! falling back to the original file. Errors anywhere in either protocol are
//! swallowed; breaking the host page is the one unacceptable outcome.

pub mod change;
pub mod convert;
pub mod drop;
pub mod relay;

// Re-export commonly used types
pub use change::ChangeInterceptor;
pub use convert::convert_file_list;
pub use drop::DropInterceptor;
pub use relay::ChangeRelay;
