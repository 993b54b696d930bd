// autowebp - client-side WebP re-encode pipeline for forum image uploads
//
// The codec adapter converts PNG/JPEG uploads to WebP; the interception
// layer substitutes the converted files before the host page's own upload
// logic observes them; the scan module keeps interception attached while
// the page re-renders. The DOM is injected behind a trait so the whole
// pipeline runs without a browser.

pub mod codec;
pub mod constants;
pub mod dom;
pub mod error;
pub mod intercept;
pub mod logging;
pub mod pipeline;
pub mod scan;
pub mod settings;

pub use error::InterceptError;
pub use pipeline::UploadInterceptor;
