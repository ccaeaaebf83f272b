//! Contour extraction between cells in different bands.
//!
//! Each cell is compared with its right and lower neighbor; a differing
//! bucket produces a segment along the shared edge. No interpolation is
//! done, so contours follow cell edges.

use glam::Vec2;

use super::{to_ndc, Rgb, Vertex};

/// Line segment in normalized device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

/// Contour segments for a whole grid.
#[derive(Debug, Clone, Default)]
pub struct ContourLines {
    pub segments: Vec<Segment>,
}

impl ContourLines {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Expand into a line list with every endpoint in `color`.
    pub fn to_vertices(&self, color: Rgb) -> Vec<Vertex> {
        let color = color.to_array();
        self.segments
            .iter()
            .flat_map(|s| [s.start, s.end])
            .map(|p| Vertex {
                position: p.to_array(),
                color,
            })
            .collect()
    }
}

/// Find every cell edge where adjacent buckets differ.
///
/// Cells span `x in 0..m-1`, `y in 0..n-1`. The right neighbor of cell
/// `(x, y)` is `(x+1, y)` and the lower neighbor is `(x, y+1)`.
pub fn build_contours(buckets: &[i32], m: usize, n: usize) -> ContourLines {
    let mut segments = Vec::new();

    let segment = |(x0, y0): (usize, usize), (x1, y1): (usize, usize)| Segment {
        start: to_ndc(x0, y0, m, n),
        end: to_ndc(x1, y1, m, n),
    };

    for y in 0..n.saturating_sub(1) {
        for x in 0..m.saturating_sub(1) {
            let i = y * m + x;
            let (Some(&here), Some(&right), Some(&below)) =
                (buckets.get(i), buckets.get(i + 1), buckets.get(i + m))
            else {
                continue;
            };

            if here != right {
                segments.push(segment((x + 1, y + 1), (x + 1, y)));
            }
            if here != below {
                segments.push(segment((x, y + 1), (x + 1, y + 1)));
            }
        }
    }

    log::debug!("Extracted {} contour segments", segments.len());
    ContourLines { segments }
}
