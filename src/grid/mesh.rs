use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::{ColorTable, NO_DATA_BUCKET};

pub const X_MIN: f32 = -0.95;
pub const X_MAX: f32 = 0.95;
pub const Y_MIN: f32 = -0.95;
pub const Y_MAX: f32 = 0.95;

/// Vertex data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 3],
}

impl Vertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Map grid point `(x, y)` of an `m x n` grid into normalized device
/// coordinates inside the `[-0.95, 0.95]` square. Row 0 sits at the bottom.
///
/// A grid that is one point wide along an axis maps to the low edge.
pub fn to_ndc(x: usize, y: usize, m: usize, n: usize) -> Vec2 {
    fn axis(i: usize, count: usize, lo: f32, hi: f32) -> f32 {
        if count < 2 {
            return lo;
        }
        lo + (hi - lo) * i as f32 / (count - 1) as f32
    }

    Vec2::new(axis(x, m, X_MIN, X_MAX), axis(y, n, Y_MIN, Y_MAX))
}

/// Flat-colored quad mesh ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GridMesh {
    /// Triangle list, six vertices per cell
    pub vertices: Vec<Vertex>,
}

impl GridMesh {
    pub fn positions(&self) -> impl Iterator<Item = [f32; 2]> + '_ {
        self.vertices.iter().map(|v| v.position)
    }

    pub fn colors(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.vertices.iter().map(|v| v.color)
    }
}

/// Generate two triangles for every interior cell of an `m x n` bucket grid.
///
/// Each cell takes the color of the bucket at its own `(x, y)` index; cells
/// without data are white. A bucket slice shorter than `m * n` reads as
/// missing data past its end.
pub fn build_mesh(buckets: &[i32], m: usize, n: usize, colors: &ColorTable) -> GridMesh {
    let cells = m.saturating_sub(1) * n.saturating_sub(1);
    let mut vertices = Vec::with_capacity(cells * 6);

    for y in 0..n.saturating_sub(1) {
        for x in 0..m.saturating_sub(1) {
            let bucket = buckets.get(y * m + x).copied().unwrap_or(NO_DATA_BUCKET);
            let color = colors.color_for(bucket).to_array();

            let mut push = |px: usize, py: usize| {
                vertices.push(Vertex {
                    position: to_ndc(px, py, m, n).to_array(),
                    color,
                });
            };

            // a b c, a c d
            push(x, y + 1);
            push(x + 1, y + 1);
            push(x + 1, y);
            push(x, y + 1);
            push(x + 1, y);
            push(x, y);
        }
    }

    log::debug!("Built mesh: {} cells, {} vertices", cells, vertices.len());
    GridMesh { vertices }
}
