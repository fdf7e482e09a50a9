//! Rewrite CDN thumbnail URLs to their full-resolution form.

use super::{CDN_HOST, ORIGINALS_SEGMENT, THUMBNAIL_SEGMENTS};

/// Rewrites every thumbnail size segment of a CDN URL to `/originals/`.
///
/// Non-CDN URLs come back unchanged. Replacement repeats until no thumbnail
/// segment is left, so adjacent segments such as `/236x/236x/` are fully
/// rewritten and `normalize(normalize(u)) == normalize(u)` holds.
pub fn normalize(url: &str) -> String {
    if !url.contains(CDN_HOST) {
        return url.to_string();
    }
    let mut out = url.to_string();
    while let Some(seg) = THUMBNAIL_SEGMENTS.iter().find(|seg| out.contains(*seg)) {
        out = out.replace(seg, ORIGINALS_SEGMENT);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url_model::{classify, ResolutionTier};

    #[test]
    fn thumbnail_becomes_original() {
        assert_eq!(
            normalize("https://i.pinimg.com/236x/ab/cd/photo.jpg"),
            "https://i.pinimg.com/originals/ab/cd/photo.jpg"
        );
        assert_eq!(
            normalize("https://i.pinimg.com/736x/ab/cd/photo.jpg"),
            "https://i.pinimg.com/originals/ab/cd/photo.jpg"
        );
    }

    #[test]
    fn original_and_foreign_urls_unchanged() {
        let original = "https://i.pinimg.com/originals/ab/cd/photo.jpg";
        assert_eq!(normalize(original), original);
        let foreign = "https://example.com/236x/photo.jpg";
        assert_eq!(normalize(foreign), foreign);
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for url in [
            "https://i.pinimg.com/236x/ab/cd/photo.jpg",
            "https://i.pinimg.com/236x/236x/photo.jpg",
            "https://i.pinimg.com/564x/474x/photo.jpg",
            "https://i.pinimg.com/originals/photo.jpg",
            "https://example.com/474x/a.png",
            "garbage",
        ] {
            let once = normalize(url);
            assert_eq!(normalize(&once), once, "{url}");
        }
    }

    #[test]
    fn normalized_thumbnails_classify_as_original() {
        for size in ["236x", "474x", "564x", "736x"] {
            let url = format!("https://i.pinimg.com/{size}/ab/cd/photo.jpg");
            assert_eq!(classify(&url).tier, ResolutionTier::Thumbnail);
            assert_eq!(classify(&normalize(&url)).tier, ResolutionTier::Original);
        }
    }

    #[test]
    fn adjacent_thumbnail_segments_fully_rewritten() {
        assert_eq!(
            normalize("https://i.pinimg.com/236x/236x/photo.jpg"),
            "https://i.pinimg.com/originals/originals/photo.jpg"
        );
    }
}
