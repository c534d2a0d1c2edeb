/// Size measurements every classification rule is expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub short_side: u32,
    pub long_side: u32,
    pub pixel_area: u64,
    /// `width / max(height, 1)`.
    pub aspect_ratio: f64,
}

impl Geometry {
    pub fn of(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            short_side: width.min(height),
            long_side: width.max(height),
            pixel_area: u64::from(width) * u64::from(height),
            aspect_ratio: f64::from(width) / f64::from(height.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portrait_photo() {
        let g = Geometry::of(768, 1024);
        assert_eq!(g.short_side, 768);
        assert_eq!(g.long_side, 1024);
        assert_eq!(g.pixel_area, 786_432);
        assert!((g.aspect_ratio - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_height_does_not_divide_by_zero() {
        let g = Geometry::of(300, 0);
        assert_eq!(g.aspect_ratio, 300.0);
        assert_eq!(g.pixel_area, 0);
    }
}
