// Constants module - centralized default values and DOM anchor points
//
// The selectors and marker keys below are the contract with the one host
// page this crate targets; they are not configurable at runtime.

// =============================================================================
// Settings defaults
// =============================================================================

/// Interception enabled unless the user turned it off
pub const DEFAULT_ENABLED: bool = true;

/// Convert files arriving via drag-and-drop
pub const DEFAULT_COMPRESS_ON_DRAG: bool = true;

/// Convert files arriving via the file picker
pub const DEFAULT_COMPRESS_ON_UPLOAD: bool = true;

/// Default WebP quality percentage
pub const DEFAULT_QUALITY: u8 = 80;

/// Lowest quality the options surface allows
pub const MIN_QUALITY: u8 = 10;

/// Highest quality the options surface allows
pub const MAX_QUALITY: u8 = 100;

// =============================================================================
// Upload surface discovery
// =============================================================================

/// Primary content-area selector: class list of the upload container
pub const UPLOAD_AREA_CLASSES: [&str; 2] = ["content_box", "img_upcont"];

/// Fallback sortable-list id when the content area is absent
pub const UPLOAD_AREA_FALLBACK_ID: &str = "sortable";

/// Name attribute of the page's designated file input
pub const FILE_INPUT_NAME: &str = "files[]";

// =============================================================================
// Attachment markers
// =============================================================================

/// Marker set on a surface once drop interception is installed
pub const DROP_ATTACHED_MARKER: &str = "__dc_webp_drop_attached";

/// Marker set on a file input once change interception is installed
pub const INPUT_ATTACHED_MARKER: &str = "__dc_webp_listener_attached";

// =============================================================================
// Options surface
// =============================================================================

/// Debounce window for persisting quality-slider edits, in milliseconds
pub const QUALITY_DEBOUNCE_MS: u64 = 220;
