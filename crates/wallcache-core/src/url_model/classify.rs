//! Domain and resolution-tier classification, plus the fail-closed validity filter.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{CDN_HOST, ORIGINALS_SEGMENT, SITE_HOST, THUMBNAIL_SEGMENTS};

/// Substrings that disqualify a URL outright (checked lower-cased).
/// `.gif` is here because animations are low quality as wallpapers.
const DENIED_MARKERS: [&str; 5] = ["blob:", "data:", "video-thumbnails", "storypin", ".gif"];

/// Path suffixes accepted as still images (checked lower-cased).
const IMAGE_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".webp"];

/// Which host a media URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Domain {
    /// Image CDN (`pinimg.com`).
    Cdn,
    /// The site itself (`pinterest.com`).
    Site,
    Other,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Cdn => CDN_HOST,
            Domain::Site => SITE_HOST,
            Domain::Other => "other",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Coarse image quality derived from the URL path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionTier {
    Original,
    Thumbnail,
    #[default]
    Unknown,
}

impl ResolutionTier {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolutionTier::Original => "original",
            ResolutionTier::Thumbnail => "thumbnail",
            ResolutionTier::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub domain: Domain,
    pub tier: ResolutionTier,
}

/// Classifies a media URL by host and resolution tier.
///
/// Domain checks are priority ordered: the CDN marker wins over the site
/// marker. Tier checks look only at path segments, so a non-CDN URL with an
/// `/originals/` segment still reports `Original`.
pub fn classify(url: &str) -> Classification {
    let domain = if url.contains(CDN_HOST) {
        Domain::Cdn
    } else if url.contains(SITE_HOST) {
        Domain::Site
    } else {
        Domain::Other
    };

    let tier = if url.contains(ORIGINALS_SEGMENT) {
        ResolutionTier::Original
    } else if THUMBNAIL_SEGMENTS.iter().any(|seg| url.contains(seg)) {
        ResolutionTier::Thumbnail
    } else {
        ResolutionTier::Unknown
    };

    Classification { domain, tier }
}

/// Returns true only for CDN still-image URLs that pass every filter.
///
/// Each check rejects independently; the substring checks run first and the
/// URL is parsed only when everything else already passed.
pub fn is_valid_image_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }
    let lower = url.to_ascii_lowercase();
    if DENIED_MARKERS.iter().any(|marker| lower.contains(marker)) {
        return false;
    }
    if !url.contains(CDN_HOST) {
        return false;
    }
    has_image_extension(url)
}

fn has_image_extension(url: &str) -> bool {
    let Ok(parsed) = url::Url::parse(url) else {
        return false;
    };
    let path = parsed.path().to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_domains_in_priority_order() {
        assert_eq!(
            classify("https://i.pinimg.com/originals/a/b/c.jpg").domain,
            Domain::Cdn
        );
        assert_eq!(
            classify("https://www.pinterest.com/pin/123/").domain,
            Domain::Site
        );
        // CDN marker wins even when the site marker is also present.
        assert_eq!(
            classify("https://i.pinimg.com/x.jpg?ref=pinterest.com").domain,
            Domain::Cdn
        );
        assert_eq!(classify("https://example.com/a.jpg").domain, Domain::Other);
        assert_eq!(classify("").domain, Domain::Other);
    }

    #[test]
    fn classify_tiers() {
        assert_eq!(
            classify("https://i.pinimg.com/originals/ab/cd/photo.jpg").tier,
            ResolutionTier::Original
        );
        for size in ["236x", "474x", "564x", "736x"] {
            let url = format!("https://i.pinimg.com/{size}/ab/cd/photo.jpg");
            assert_eq!(classify(&url).tier, ResolutionTier::Thumbnail, "{url}");
        }
        assert_eq!(
            classify("https://i.pinimg.com/1200x/ab/cd/photo.jpg").tier,
            ResolutionTier::Unknown
        );
        assert_eq!(classify("not a url").tier, ResolutionTier::Unknown);
    }

    #[test]
    fn valid_accepts_cdn_original_jpg() {
        assert!(is_valid_image_url(
            "https://i.pinimg.com/originals/ab/cd/photo.jpg"
        ));
        assert!(is_valid_image_url(
            "https://i.pinimg.com/originals/ab/cd/photo.JPEG"
        ));
        assert!(is_valid_image_url(
            "https://i.pinimg.com/originals/ab/cd/photo.webp?x=1"
        ));
        assert!(is_valid_image_url("https://i.pinimg.com/736x/ab/cd/photo.png"));
    }

    #[test]
    fn valid_rejects_gif() {
        assert!(!is_valid_image_url(
            "https://i.pinimg.com/originals/ab/cd/photo.gif"
        ));
        assert!(!is_valid_image_url(
            "https://i.pinimg.com/originals/ab/cd/photo.GIF"
        ));
    }

    #[test]
    fn valid_rejects_deny_listed_markers_regardless_of_domain() {
        for url in [
            "blob:https://i.pinimg.com/originals/a.jpg",
            "data:image/jpeg;base64,pinimg.com.jpg",
            "https://i.pinimg.com/video-thumbnails/a/b.jpg",
            "https://i.pinimg.com/storypin/a/b.jpg",
            "https://i.pinimg.com/originals/anim.gif.jpg",
            "blob:https://example.com/abc",
            "https://example.com/a.gif",
        ] {
            assert!(!is_valid_image_url(url), "{url}");
        }
    }

    #[test]
    fn valid_rejects_non_cdn_and_bad_extension() {
        assert!(!is_valid_image_url(""));
        assert!(!is_valid_image_url("https://example.com/originals/a.jpg"));
        assert!(!is_valid_image_url("https://www.pinterest.com/pin/1/a.jpg"));
        assert!(!is_valid_image_url("https://i.pinimg.com/originals/ab/cd/photo"));
        assert!(!is_valid_image_url("https://i.pinimg.com/originals/a.bmp"));
        // Extension only in the query string does not count.
        assert!(!is_valid_image_url("https://i.pinimg.com/originals/a?f=b.jpg"));
        // Unparseable.
        assert!(!is_valid_image_url("pinimg.com/originals/a.jpg"));
    }
}
