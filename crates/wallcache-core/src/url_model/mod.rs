//! Media URL modeling: classification, normalization to the highest
//! resolution, and srcset candidate selection.
//!
//! All functions here are pure and total; unknown input never errors, it just
//! lands in the `Other` / `Unknown` buckets.

mod classify;
mod normalize;
mod srcset;

pub use classify::{classify, is_valid_image_url, Classification, Domain, ResolutionTier};
pub use normalize::normalize;
pub use srcset::highest_srcset_candidate;

/// Host marker of the image CDN every valid media URL must come from.
pub const CDN_HOST: &str = "pinimg.com";

/// Host marker of the site itself (pin pages, boards).
pub const SITE_HOST: &str = "pinterest.com";

/// Path segment of full-resolution CDN images.
pub const ORIGINALS_SEGMENT: &str = "/originals/";

/// Fixed-width thumbnail path segments served by the CDN.
pub const THUMBNAIL_SEGMENTS: [&str; 4] = ["/236x/", "/474x/", "/564x/", "/736x/"];
