//! Scalar grid data and the data-to-geometry pipeline.
//!
//! This module provides:
//! - [`GridData`] - Raw samples, dimensions and value range read from disk
//! - [`load_grid`] - Parser for `# <m> <n>` grid files
//! - [`Grid`] - Samples paired with their bucket assignment
//! - [`GridMesh`] / [`ContourLines`] - Vertex streams handed to the renderer

pub mod colors;
pub mod contours;
pub mod discretize;
pub mod error;
pub mod loader;
pub mod mesh;

pub use colors::{build_color_table, ColorTable, Rgb};
pub use contours::{build_contours, ContourLines, Segment};
pub use discretize::{bucketize, discretize, NO_DATA_BUCKET};
pub use error::{GridError, Result};
pub use loader::{load_grid, parse_grid_content};
pub use mesh::{build_mesh, to_ndc, GridMesh, Vertex};

/// Sample value that marks a grid point without a measurement.
pub const NO_DATA: f32 = 0.0;

/// Number of intensity bands used when none is given.
pub const DEFAULT_NUM_BUCKETS: usize = 20;

/// Observed range of the non-sentinel samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    /// Grow the range to include `value`.
    pub fn include(&mut self, value: f32) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }
}

/// Raw grid samples parsed from a data file.
///
/// Samples are stored row-major: the value at column `x` of row `y` lives at
/// `samples[y * width + x]`.
#[derive(Debug, Clone)]
pub struct GridData {
    /// Number of columns (`m`)
    pub width: usize,
    /// Number of rows (`n`)
    pub height: usize,
    /// Flat row-major sample buffer of length `width * height`
    pub samples: Vec<f32>,
    /// Range of the non-sentinel samples, `None` if every sample is missing
    pub range: Option<ValueRange>,
}

impl GridData {
    /// Build grid data from a flat sample buffer, computing the value range
    /// over every sample that is not `sentinel`.
    ///
    /// # Example
    ///
    /// ```
    /// use gridbands::grid::{GridData, NO_DATA};
    ///
    /// let data = GridData::new(2, 2, vec![1.0, 2.0, 3.0, 4.0], NO_DATA);
    /// let range = data.range.unwrap();
    /// assert_eq!(range.min, 1.0);
    /// assert_eq!(range.max, 4.0);
    /// ```
    pub fn new(width: usize, height: usize, samples: Vec<f32>, sentinel: f32) -> Self {
        let mut range: Option<ValueRange> = None;
        for &value in samples.iter().filter(|&&v| v != sentinel) {
            range
                .get_or_insert(ValueRange {
                    min: value,
                    max: value,
                })
                .include(value);
        }

        Self {
            width,
            height,
            samples,
            range,
        }
    }

    /// Number of interior cells, `(m-1) * (n-1)`.
    pub fn cell_count(&self) -> usize {
        self.width.saturating_sub(1) * self.height.saturating_sub(1)
    }
}

/// Settings that shape the pipeline for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    /// Number of intensity bands, at least 2
    pub num_buckets: usize,
    /// Sample value treated as "no measurement"
    pub sentinel: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            num_buckets: DEFAULT_NUM_BUCKETS,
            sentinel: NO_DATA,
        }
    }
}

/// A loaded grid together with the bucket of every sample.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Grid {
    pub data: GridData,
    pub buckets: Vec<i32>,
    pub colors: ColorTable,
}

impl Grid {
    /// Discretize `data` and build its color table.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidBucketCount`] if fewer than two buckets are
    /// requested and [`GridError::DegenerateRange`] if the data has no spread.
    pub fn new(data: GridData, config: &PipelineConfig) -> Result<Self> {
        let colors = build_color_table(config.num_buckets)?;
        let range = data.range.ok_or(GridError::DegenerateRange {
            min: config.sentinel,
            max: config.sentinel,
        })?;
        let buckets = bucketize(&data.samples, range, config.num_buckets, config.sentinel)?;

        log::debug!(
            "Bucketed {}x{} grid into {} bands ({} samples without data)",
            data.width,
            data.height,
            config.num_buckets,
            buckets.iter().filter(|&&b| b == NO_DATA_BUCKET).count()
        );

        Ok(Self {
            data,
            buckets,
            colors,
        })
    }

    pub fn width(&self) -> usize {
        self.data.width
    }

    pub fn height(&self) -> usize {
        self.data.height
    }

    /// Filled quad mesh, two triangles per interior cell.
    pub fn mesh(&self) -> GridMesh {
        build_mesh(&self.buckets, self.width(), self.height(), &self.colors)
    }

    /// Band boundaries between neighboring cells.
    pub fn contours(&self) -> ContourLines {
        build_contours(&self.buckets, self.width(), self.height())
    }
}
