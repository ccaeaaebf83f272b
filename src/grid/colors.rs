//! Hue ramp color table for intensity bands.
//!
//! Bucket 0 gets the highest hue (240°, blue) and the last bucket hue 0°
//! (red), with the hues in between spaced evenly.

use super::{GridError, Result, NO_DATA_BUCKET};

/// Highest hue on the ramp, in degrees.
pub const MAX_HUE: f32 = 240.0;

/// Linear RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Convert an HSV color to RGB.
///
/// `hue` is in degrees and wraps around 360; `saturation` and `value` are in
/// `[0, 1]`.
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Rgb {
    let h = hue.rem_euclid(360.0);
    let c = value * saturation;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = value - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    Rgb::new(r + m, g + m, b + m)
}

/// One color per bucket, indexed by bucket number.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTable {
    colors: Vec<Rgb>,
}

impl ColorTable {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Color for a bucket. [`NO_DATA_BUCKET`] (or any negative bucket) is
    /// white; buckets past the end of the table get the last color.
    pub fn color_for(&self, bucket: i32) -> Rgb {
        if bucket <= NO_DATA_BUCKET {
            return Rgb::WHITE;
        }
        let index = (bucket as usize).min(self.colors.len().saturating_sub(1));
        self.colors.get(index).copied().unwrap_or(Rgb::WHITE)
    }
}

/// Build the hue ramp for `num_buckets` bands.
///
/// # Errors
///
/// Returns [`GridError::InvalidBucketCount`] if `num_buckets < 2`.
pub fn build_color_table(num_buckets: usize) -> Result<ColorTable> {
    if num_buckets < 2 {
        return Err(GridError::InvalidBucketCount(num_buckets));
    }

    let step = MAX_HUE / (num_buckets - 1) as f32;
    let colors = (0..num_buckets)
        .map(|i| hsv_to_rgb((num_buckets - 1 - i) as f32 * step, 1.0, 1.0))
        .collect();

    Ok(ColorTable { colors })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Rgb, b: Rgb) -> bool {
        (a.r - b.r).abs() < 1e-5 && (a.g - b.g).abs() < 1e-5 && (a.b - b.b).abs() < 1e-5
    }

    // ==================== HSV Conversion ====================

    #[test]
    fn test_hsv_primaries() {
        assert!(approx_eq(hsv_to_rgb(0.0, 1.0, 1.0), Rgb::new(1.0, 0.0, 0.0)));
        assert!(approx_eq(hsv_to_rgb(120.0, 1.0, 1.0), Rgb::new(0.0, 1.0, 0.0)));
        assert!(approx_eq(hsv_to_rgb(240.0, 1.0, 1.0), Rgb::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_hsv_all_sectors() {
        assert!(approx_eq(hsv_to_rgb(30.0, 1.0, 1.0), Rgb::new(1.0, 0.5, 0.0)));
        assert!(approx_eq(hsv_to_rgb(90.0, 1.0, 1.0), Rgb::new(0.5, 1.0, 0.0)));
        assert!(approx_eq(hsv_to_rgb(150.0, 1.0, 1.0), Rgb::new(0.0, 1.0, 0.5)));
        assert!(approx_eq(hsv_to_rgb(210.0, 1.0, 1.0), Rgb::new(0.0, 0.5, 1.0)));
        assert!(approx_eq(hsv_to_rgb(270.0, 1.0, 1.0), Rgb::new(0.5, 0.0, 1.0)));
        assert!(approx_eq(hsv_to_rgb(330.0, 1.0, 1.0), Rgb::new(1.0, 0.0, 0.5)));
    }

    #[test]
    fn test_hsv_wraps_hue() {
        assert!(approx_eq(hsv_to_rgb(360.0, 1.0, 1.0), hsv_to_rgb(0.0, 1.0, 1.0)));
        assert!(approx_eq(hsv_to_rgb(-120.0, 1.0, 1.0), hsv_to_rgb(240.0, 1.0, 1.0)));
    }

    #[test]
    fn test_hsv_zero_saturation_is_gray() {
        let gray = hsv_to_rgb(200.0, 0.0, 0.4);
        assert!(approx_eq(gray, Rgb::new(0.4, 0.4, 0.4)));
    }

    // ==================== Color Table ====================

    #[test]
    fn test_table_length_and_bounds() {
        for k in 2..40 {
            let table = build_color_table(k).unwrap();
            assert_eq!(table.len(), k);
            for c in table.colors() {
                for v in c.to_array() {
                    assert!((0.0..=1.0).contains(&v), "component {} out of range", v);
                }
            }
        }
    }

    #[test]
    fn test_table_endpoints() {
        let table = build_color_table(20).unwrap();
        // First bucket is blue, last is red
        assert!(approx_eq(table.colors()[0], Rgb::new(0.0, 0.0, 1.0)));
        assert!(approx_eq(table.colors()[19], Rgb::new(1.0, 0.0, 0.0)));
        assert_ne!(table.colors()[0], table.colors()[19]);
    }

    #[test]
    fn test_table_two_buckets() {
        let table = build_color_table(2).unwrap();
        assert!(approx_eq(table.colors()[0], Rgb::new(0.0, 0.0, 1.0)));
        assert!(approx_eq(table.colors()[1], Rgb::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_table_three_buckets_midpoint_is_green() {
        let table = build_color_table(3).unwrap();
        assert!(approx_eq(table.colors()[1], Rgb::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_table_invalid_count() {
        assert!(matches!(build_color_table(0), Err(GridError::InvalidBucketCount(0))));
        assert!(matches!(build_color_table(1), Err(GridError::InvalidBucketCount(1))));
    }

    #[test]
    fn test_color_for_no_data_is_white() {
        let table = build_color_table(5).unwrap();
        assert_eq!(table.color_for(NO_DATA_BUCKET), Rgb::WHITE);
    }

    #[test]
    fn test_color_for_clamps_past_end() {
        let table = build_color_table(5).unwrap();
        assert_eq!(table.color_for(4), table.colors()[4]);
        assert_eq!(table.color_for(12), table.colors()[4]);
    }
}
