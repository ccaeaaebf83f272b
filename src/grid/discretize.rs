//! Quantization of scalar samples into intensity bands.

use super::{GridError, Result, ValueRange};

/// Bucket assigned to samples that hold the sentinel value.
pub const NO_DATA_BUCKET: i32 = -1;

/// Map one sample to its bucket.
///
/// Values are scaled onto `[0, num_buckets - 1]` and rounded half up, so
/// `range.min` lands in bucket 0 and `range.max` in the last bucket. No clamp
/// is applied; callers guarantee `range.min <= value <= range.max` and
/// `range.max > range.min`. The sentinel always maps to [`NO_DATA_BUCKET`].
///
/// ```
/// use gridbands::grid::{discretize, ValueRange, NO_DATA_BUCKET};
///
/// let range = ValueRange { min: 0.5, max: 10.0 };
/// assert_eq!(discretize(0.5, range, 20, 0.0), 0);
/// assert_eq!(discretize(10.0, range, 20, 0.0), 19);
/// assert_eq!(discretize(0.0, range, 20, 0.0), NO_DATA_BUCKET);
/// ```
pub fn discretize(value: f32, range: ValueRange, num_buckets: usize, sentinel: f32) -> i32 {
    if value == sentinel {
        return NO_DATA_BUCKET;
    }
    let t = (value - range.min) / range.span();
    (t * (num_buckets - 1) as f32 + 0.5).floor() as i32
}

/// Discretize every sample of a grid.
///
/// # Errors
///
/// - [`GridError::InvalidBucketCount`] when `num_buckets < 2`
/// - [`GridError::DegenerateRange`] when `range.max <= range.min`
pub fn bucketize(
    samples: &[f32],
    range: ValueRange,
    num_buckets: usize,
    sentinel: f32,
) -> Result<Vec<i32>> {
    if num_buckets < 2 {
        return Err(GridError::InvalidBucketCount(num_buckets));
    }
    if range.max <= range.min {
        return Err(GridError::DegenerateRange {
            min: range.min,
            max: range.max,
        });
    }

    Ok(samples
        .iter()
        .map(|&value| discretize(value, range, num_buckets, sentinel))
        .collect())
}
