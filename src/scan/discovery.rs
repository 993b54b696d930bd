//! Upload surface discovery

use crate::constants::{UPLOAD_AREA_CLASSES, UPLOAD_AREA_FALLBACK_ID};
use crate::dom::{Document, NodeId, Selector};

/// Locate the current upload surface
///
/// First match wins: the primary content-area selector, then the sortable
/// list, then the document body, which always matches.
pub fn find_upload_area(doc: &dyn Document) -> NodeId {
    doc.query_selector(&Selector::classes(&UPLOAD_AREA_CLASSES))
        .or_else(|| doc.query_selector(&Selector::id(UPLOAD_AREA_FALLBACK_ID)))
        .unwrap_or_else(|| doc.body())
}
