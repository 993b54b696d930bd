//! Declared-MIME gating and output naming
//!
//! Eligibility is decided from the declared MIME type only, never from
//! content sniffing. PNG and JPEG (including the nonstandard `image/jpg`
//! spelling) are eligible; any other `image/*` type still counts as an image
//! for the passthrough gate but is not converted by the interception layer.

use regex::Regex;
use std::sync::OnceLock;

/// Declared MIME type of every converted file
pub const MIME_WEBP: &str = "image/webp";

static ELIGIBLE_MIME: OnceLock<Regex> = OnceLock::new();
static CONVERTIBLE_SUFFIX: OnceLock<Regex> = OnceLock::new();

fn eligible_mime() -> &'static Regex {
    ELIGIBLE_MIME.get_or_init(|| Regex::new(r"(?i)^image/(png|jpe?g)$").expect("static pattern"))
}

fn convertible_suffix() -> &'static Regex {
    CONVERTIBLE_SUFFIX
        .get_or_init(|| Regex::new(r"(?i)\.(png|jpg|jpeg)$").expect("static pattern"))
}

/// Whether a declared MIME type is eligible for conversion (PNG or JPEG,
/// case-insensitive)
pub fn is_eligible_mime(mime: &str) -> bool {
    eligible_mime().is_match(mime)
}

/// Whether a declared MIME type is an image type at all
pub fn is_image_mime(mime: &str) -> bool {
    let prefix = "image/";
    mime.len() > prefix.len()
        && mime
            .get(..prefix.len())
            .map_or(false, |head| head.eq_ignore_ascii_case(prefix))
}

/// Rewrite a convertible suffix to `.webp`
///
/// Names without a recognized suffix are returned unchanged; the converted
/// file then keeps its original name but carries the `image/webp` type.
pub fn webp_name(name: &str) -> String {
    convertible_suffix().replace(name, ".webp").into_owned()
}

/// Convert an integer quality percentage to the 0-1 compression factor the
/// encoder consumes
pub fn quality_factor(quality: u8) -> f32 {
    f32::from(quality.min(100)) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eligible_mime_accepts_png_and_jpeg() {
        assert!(is_eligible_mime("image/png"));
        assert!(is_eligible_mime("image/jpeg"));
        assert!(is_eligible_mime("image/jpg"));
    }

    #[test]
    fn test_eligible_mime_is_case_insensitive() {
        assert!(is_eligible_mime("IMAGE/PNG"));
        assert!(is_eligible_mime("Image/Jpeg"));
    }

    #[test]
    fn test_eligible_mime_rejects_other_types() {
        assert!(!is_eligible_mime("image/gif"));
        assert!(!is_eligible_mime("image/webp"));
        assert!(!is_eligible_mime("text/plain"));
        assert!(!is_eligible_mime("image/pngx"));
    }

    #[test]
    fn test_is_image_mime() {
        assert!(is_image_mime("image/gif"));
        assert!(is_image_mime("IMAGE/PNG"));
        assert!(!is_image_mime("text/plain"));
        assert!(!is_image_mime("image/"));
    }

    #[test]
    fn test_webp_name_rewrites_suffixes() {
        assert_eq!(webp_name("photo.png"), "photo.webp");
        assert_eq!(webp_name("photo.jpg"), "photo.webp");
        assert_eq!(webp_name("photo.jpeg"), "photo.webp");
        assert_eq!(webp_name("photo.PNG"), "photo.webp");
    }

    #[test]
    fn test_webp_name_leaves_other_names_alone() {
        assert_eq!(webp_name("notes.txt"), "notes.txt");
        assert_eq!(webp_name("archive.png.gz"), "archive.png.gz");
        assert_eq!(webp_name("noextension"), "noextension");
    }

    #[test]
    fn test_quality_factor_range() {
        assert_eq!(quality_factor(100), 1.0);
        assert_eq!(quality_factor(80), 0.8);
        assert_eq!(quality_factor(10), 0.1);
        // Values above the scale clamp instead of overshooting
        assert_eq!(quality_factor(255), 1.0);
    }
}
