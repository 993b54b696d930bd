//! Shared file-list conversion: fan-out, then join

use futures::future::join_all;

use crate::codec::{is_eligible_mime, FileCandidate, WebpConverter};

/// Convert every eligible file in a list, preserving order and count
///
/// Conversion is a per-element map, never a filter or reorder: ineligible
/// files pass through untouched and a failed conversion falls back to that
/// file's original form without aborting the rest of the batch. All
/// conversions run concurrently and all complete before the list is
/// returned.
pub async fn convert_file_list(
    converter: &WebpConverter,
    files: Vec<FileCandidate>,
    quality: u8,
) -> Vec<FileCandidate> {
    let conversions = files.into_iter().map(|file| async move {
        if !is_eligible_mime(&file.mime) {
            return file;
        }
        match converter.convert(file.clone(), quality).await {
            Ok(converted) => converted,
            Err(err) => {
                tracing::debug!(
                    name = %file.name,
                    error = %err,
                    "Conversion failed, keeping original file"
                );
                file
            }
        }
    });

    join_all(conversions).await
}
