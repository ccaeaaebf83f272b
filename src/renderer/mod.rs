//! GPU rendering using wgpu.
//!
//! This module provides the [`Renderer`] struct which handles:
//! - wgpu device and surface initialization
//! - Shader and pipeline setup for filled cells and contour lines
//! - Vertex buffer upload and drawing

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use gridbands::grid::{ContourLines, GridMesh, Rgb, Vertex};

/// Longest window side in physical pixels.
pub const WINDOW_EXTENT: u32 = 768;

/// Color of contour lines.
pub const CONTOUR_COLOR: Rgb = Rgb::BLACK;

const CLEAR_COLOR: wgpu::Color = wgpu::Color::WHITE;

/// Window size that keeps the grid's aspect ratio, with the longer side at
/// [`WINDOW_EXTENT`] pixels.
pub fn window_size(columns: usize, rows: usize) -> PhysicalSize<u32> {
    let columns = columns.max(1) as u64;
    let rows = rows.max(1) as u64;
    let longest = columns.max(rows);
    let scale = |d: u64| ((u64::from(WINDOW_EXTENT) * d / longest) as u32).max(1);
    PhysicalSize::new(scale(columns), scale(rows))
}

/// GPU renderer holding the surface, both pipelines and the uploaded geometry.
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    /// Current window size (for resize handling)
    pub size: PhysicalSize<u32>,

    fill_pipeline: wgpu::RenderPipeline,
    contour_pipeline: wgpu::RenderPipeline,

    // Geometry buffers
    mesh_buffer: Option<wgpu::Buffer>,
    contour_buffer: Option<wgpu::Buffer>,
    num_mesh_vertices: u32,
    num_contour_vertices: u32,
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Cell triangles are wound clockwise in NDC
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

impl Renderer {
    /// Create a new renderer for the given window.
    ///
    /// # Errors
    ///
    /// Returns an error if GPU initialization fails.
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        // Prefer a linear format so bucket colors reach the screen unchanged
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Grid Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/grid.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Grid Pipeline Layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let fill_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            wgpu::PrimitiveTopology::TriangleList,
            "Fill Pipeline",
        );
        let contour_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            wgpu::PrimitiveTopology::LineList,
            "Contour Pipeline",
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            fill_pipeline,
            contour_pipeline,
            mesh_buffer: None,
            contour_buffer: None,
            num_mesh_vertices: 0,
            num_contour_vertices: 0,
        })
    }

    /// Handle window resize.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn create_vertex_buffer(&self, vertices: &[Vertex], label: &str) -> Option<wgpu::Buffer> {
        if vertices.is_empty() {
            return None;
        }
        Some(
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents: bytemuck::cast_slice(vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
        )
    }

    /// Upload the cell mesh and contour lines to GPU buffers.
    pub fn upload(&mut self, mesh: &GridMesh, contours: &ContourLines) {
        let contour_vertices = contours.to_vertices(CONTOUR_COLOR);

        self.mesh_buffer = self.create_vertex_buffer(&mesh.vertices, "Mesh Vertex Buffer");
        self.contour_buffer = self.create_vertex_buffer(&contour_vertices, "Contour Vertex Buffer");
        self.num_mesh_vertices = mesh.vertices.len() as u32;
        self.num_contour_vertices = contour_vertices.len() as u32;
    }

    /// Render a frame: filled cells first, contour lines on top.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if surface acquisition fails.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(mesh_buffer) = &self.mesh_buffer {
                render_pass.set_pipeline(&self.fill_pipeline);
                render_pass.set_vertex_buffer(0, mesh_buffer.slice(..));
                render_pass.draw(0..self.num_mesh_vertices, 0..1);
            }

            if let Some(contour_buffer) = &self.contour_buffer {
                render_pass.set_pipeline(&self.contour_pipeline);
                render_pass.set_vertex_buffer(0, contour_buffer.slice(..));
                render_pass.draw(0..self.num_contour_vertices, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
