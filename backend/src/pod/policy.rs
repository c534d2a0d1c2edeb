//! Named extraction configurations.
//!
//! The three presets keep the observable behaviour of the thumbnail,
//! full-resolution and legacy photo filters. Photo counts feed the quality
//! score, so their numbers must not drift.

use crate::pod::geometry::Geometry;

/// Where brand keywords are looked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandExclusion {
    /// Only `alt` and `class` text.
    TextOnly,
    /// `alt`, `class` and the image URL itself.
    Everywhere,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoFilterPolicy {
    pub name: &'static str,
    pub min_short_side: u32,
    pub min_pixel_area: u64,
    /// Inclusive `(min, max)` bounds on `width / height`.
    pub aspect_range: (f64, f64),
    pub min_long_side: u32,
    pub accept_data_uris: bool,
    pub brand_exclusion: BrandExclusion,
    /// Value written to `FilteredPhoto::is_thumbnail`.
    pub thumbnail_flag: Option<bool>,
}

impl PhotoFilterPolicy {
    /// Loose bounds for fast, low-bandwidth previews.
    pub const fn thumbnail() -> Self {
        Self {
            name: "thumbnail",
            min_short_side: 150,
            min_pixel_area: 40_000,
            aspect_range: (0.4, 2.5),
            min_long_side: 200,
            accept_data_uris: false,
            brand_exclusion: BrandExclusion::Everywhere,
            thumbnail_flag: Some(true),
        }
    }

    /// Strict bounds for the detail view.
    pub const fn full_resolution() -> Self {
        Self {
            name: "full_resolution",
            min_short_side: 350,
            min_pixel_area: 200_000,
            aspect_range: (0.45, 1.9),
            min_long_side: 600,
            accept_data_uris: false,
            brand_exclusion: BrandExclusion::TextOnly,
            thumbnail_flag: Some(false),
        }
    }

    /// Single-tier filter of the first revision; still accepts data URIs.
    pub const fn legacy() -> Self {
        Self {
            name: "legacy",
            min_short_side: 350,
            min_pixel_area: 200_000,
            aspect_range: (0.45, 1.9),
            min_long_side: 600,
            accept_data_uris: true,
            brand_exclusion: BrandExclusion::TextOnly,
            thumbnail_flag: None,
        }
    }

    /// Size rules for ordinary photos. URL acceptance is checked separately.
    pub fn admits_photo(&self, geometry: &Geometry) -> bool {
        let (min_aspect, max_aspect) = self.aspect_range;
        geometry.short_side >= self.min_short_side
            && geometry.pixel_area >= self.min_pixel_area
            && geometry.aspect_ratio >= min_aspect
            && geometry.aspect_ratio <= max_aspect
            && geometry.long_side >= self.min_long_side
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_resolution_bounds() {
        let policy = PhotoFilterPolicy::full_resolution();
        assert!(policy.admits_photo(&Geometry::of(768, 1024)));
        // short side
        assert!(!policy.admits_photo(&Geometry::of(349, 640)));
        // banner
        assert!(!policy.admits_photo(&Geometry::of(1600, 400)));
        // tall strip
        assert!(!policy.admits_photo(&Geometry::of(400, 1000)));
        // long side
        assert!(!policy.admits_photo(&Geometry::of(590, 590)));
    }

    #[test]
    fn thumbnail_is_looser() {
        let thumb = PhotoFilterPolicy::thumbnail();
        let full = PhotoFilterPolicy::full_resolution();
        let small = Geometry::of(240, 320);
        assert!(thumb.admits_photo(&small));
        assert!(!full.admits_photo(&small));
        assert!(thumb.admits_photo(&Geometry::of(500, 210)));
    }

    #[test]
    fn legacy_differs_only_in_url_policy() {
        let legacy = PhotoFilterPolicy::legacy();
        let full = PhotoFilterPolicy::full_resolution();
        assert_eq!(legacy.min_short_side, full.min_short_side);
        assert_eq!(legacy.min_pixel_area, full.min_pixel_area);
        assert_eq!(legacy.aspect_range, full.aspect_range);
        assert!(legacy.accept_data_uris);
        assert!(!full.accept_data_uris);
        assert_eq!(legacy.thumbnail_flag, None);
    }
}
