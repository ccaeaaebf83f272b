mod renderer;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use gridbands::grid::{
    load_grid, ContourLines, Grid, GridMesh, PipelineConfig, DEFAULT_NUM_BUCKETS, NO_DATA,
};
use renderer::{window_size, Renderer};

#[derive(Parser, Debug)]
#[command(name = "gridbands")]
#[command(about = "Banded contour view of a 2D scalar grid")]
struct Args {
    /// Grid data file: a `# <m> <n>` header followed by m*n values
    data_file: PathBuf,

    /// Number of intensity bands
    #[arg(default_value_t = DEFAULT_NUM_BUCKETS)]
    num_buckets: usize,

    /// Directory the data file is looked up in
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Value that marks a grid point without data
    #[arg(long, default_value_t = NO_DATA, allow_hyphen_values = true)]
    sentinel: f32,
}

impl Args {
    fn data_path(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.join(&self.data_file),
            None => self.data_file.clone(),
        }
    }

    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            num_buckets: self.num_buckets,
            sentinel: self.sentinel,
        }
    }
}

struct App {
    title: String,
    size: winit::dpi::PhysicalSize<u32>,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    mesh: GridMesh,
    contours: ContourLines,
    error: Option<anyhow::Error>,
}

impl App {
    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title(self.title.as_str())
            .with_inner_size(self.size)
            .with_position(PhysicalPosition::new(100, 100));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let mut renderer = pollster::block_on(Renderer::new(window.clone()))?;
        renderer.upload(&self.mesh, &self.contours);

        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_window(event_loop) {
                self.error = Some(e.context("Failed to set up rendering"));
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(ref mut renderer) = self.renderer {
                    renderer.resize(physical_size);
                }
                if let Some(ref window) = self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(ref mut renderer) = self.renderer {
                    match renderer.render() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            renderer.resize(renderer.size);
                            if let Some(ref window) = self.window {
                                window.request_redraw();
                            }
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => log::error!("Render error: {:?}", e),
                    }
                }
            }
            _ => {}
        }
    }
}

/// Parse arguments; usage errors exit with status 1.
fn parse_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args();
    let path = args.data_path();

    // Load and bucket the grid
    let data = load_grid(&path, args.sentinel)
        .with_context(|| format!("Failed to read data file '{}'", path.display()))?;
    let grid = Grid::new(data, &args.pipeline_config())
        .with_context(|| format!("Cannot discretize '{}'", path.display()))?;
    println!(
        "Loaded grid: {}x{}, value range: {:?}, {} buckets",
        grid.width(),
        grid.height(),
        grid.data.range,
        grid.colors.len()
    );

    // Generate geometry
    let mesh = grid.mesh();
    let contours = grid.contours();
    println!(
        "Generated geometry: {} mesh vertices, {} contour segments",
        mesh.vertices.len(),
        contours.len()
    );

    // Create window and run
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let title = args
        .data_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.data_file.display().to_string());

    let mut app = App {
        title,
        size: window_size(grid.width(), grid.height()),
        window: None,
        renderer: None,
        mesh,
        contours,
        error: None,
    };

    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
