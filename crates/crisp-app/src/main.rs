// crisp demo host.
// Opens a window, owns the wgpu surface and frame loop, and drives the label
// renderer through its resize and render hooks.

mod config;

use std::process::ExitCode;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crisp_core::{linear_ticks, Error, Result};
use crisp_renderer::LabelRenderer;

use crate::config::Config;

// ──────────────────────────────────────────────
// GPU state
// ──────────────────────────────────────────────

struct Gpu {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    surface_config: wgpu::SurfaceConfiguration,
}

impl Gpu {
    fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| Error::Initialization(format!("create surface: {e}")))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| Error::Initialization("no suitable GPU adapter found".to_string()))?;

        // Labels sample outside their glyph column as transparent when the
        // adapter can clamp to a border colour.
        let required_features =
            adapter.features() & wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("crisp_device"),
                required_features,
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| Error::Initialization(format!("request device: {e}")))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or_else(|| Error::Initialization("surface reports no formats".to_string()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        log::info!(
            "GPU ready: {} ({:?}), surface {:?}",
            adapter.get_info().name,
            adapter.get_info().backend,
            format
        );

        Ok(Self {
            surface,
            device: Arc::new(device),
            queue: Arc::new(queue),
            surface_config,
        })
    }

    fn reconfigure(&mut self, size: PhysicalSize<u32>) {
        self.surface_config.width = size.width.max(1);
        self.surface_config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.surface_config);
    }
}

// ──────────────────────────────────────────────
// App
// ──────────────────────────────────────────────

struct App {
    config: Config,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    renderer: Option<LabelRenderer>,
    window_size: PhysicalSize<u32>,
    font_size_px: f32,
    failed: bool,
}

impl App {
    fn new(config: Config) -> Self {
        Self {
            config,
            window: None,
            gpu: None,
            renderer: None,
            window_size: PhysicalSize::new(0, 0),
            font_size_px: 0.0,
            failed: false,
        }
    }

    fn init(&mut self, window: Arc<Window>) -> Result<()> {
        self.window_size = window.inner_size();
        let scale_factor = window.scale_factor() as f32;

        let gpu = Gpu::new(Arc::clone(&window))?;
        let renderer = self.build_renderer(&gpu, scale_factor)?;

        self.font_size_px = self.config.font_size_px(scale_factor);
        self.gpu = Some(gpu);
        self.renderer = Some(renderer);
        self.window = Some(window);
        Ok(())
    }

    /// A renderer with the atlas rasterized at `scale_factor`, ticks set and
    /// laid out for the current window size.
    fn build_renderer(&self, gpu: &Gpu, scale_factor: f32) -> Result<LabelRenderer> {
        let mut renderer = LabelRenderer::initialize(
            Arc::clone(&gpu.device),
            Arc::clone(&gpu.queue),
            gpu.surface_config.format,
            self.config.renderer_config(scale_factor)?,
        )?;

        let data = self.config.data;
        let count = self.config.tick_count;
        renderer.set_tick_values(
            &linear_ticks(data.bottom, data.top, count),
            &linear_ticks(data.left, data.right, count),
        )?;
        if self.window_size.width > 0 && self.window_size.height > 0 {
            renderer.resize(self.window_size.width, self.window_size.height)?;
        }
        Ok(renderer)
    }

    /// The window moved to a display with another DPI: re-rasterize the atlas
    /// if the font lands on a different pixel size.
    fn rescale(&mut self, scale_factor: f32) {
        let font_size_px = self.config.font_size_px(scale_factor);
        if font_size_px == self.font_size_px {
            return;
        }
        let Some(gpu) = self.gpu.as_ref() else {
            return;
        };
        match self.build_renderer(gpu, scale_factor) {
            Ok(renderer) => {
                log::info!("Scale factor {scale_factor}: label font now {font_size_px} px");
                self.renderer = Some(renderer);
                self.font_size_px = font_size_px;
            }
            // The old atlas still draws, just at the previous size.
            Err(e) => log::warn!("Label rebuild for scale factor {scale_factor} failed: {e}"),
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.window_size = size;
        // Minimized: keep the last layout until the window comes back.
        if size.width == 0 || size.height == 0 {
            return;
        }
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.reconfigure(size);
        }
        if let Some(renderer) = self.renderer.as_mut() {
            if let Err(e) = renderer.resize(size.width, size.height) {
                log::warn!("Label resize to {}x{} failed: {e}", size.width, size.height);
            }
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn render(&mut self) {
        if self.window_size.width == 0 || self.window_size.height == 0 {
            return;
        }
        let (Some(gpu), Some(renderer)) = (self.gpu.as_mut(), self.renderer.as_mut()) else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.reconfigure(self.window_size);
                return;
            }
            Err(e) => {
                log::error!("Surface error: {}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("plot_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.config.background_color()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            renderer.render(&mut pass);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Error) {
        log::error!("{err}");
        self.failed = true;
        event_loop.exit();
    }
}

// ──────────────────────────────────────────────
// ApplicationHandler implementation
// ──────────────────────────────────────────────

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title("crisp")
            .with_inner_size(LogicalSize::new(800.0, 400.0))
            .with_min_inner_size(LogicalSize::new(200.0, 120.0));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, Error::Initialization(format!("create window: {e}")));
                return;
            }
        };

        if let Err(e) = self.init(Arc::clone(&window)) {
            self.fail(event_loop, e);
            return;
        }
        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.rescale(scale_factor as f32);
            }
            WindowEvent::RedrawRequested => self.render(),
            _ => {}
        }
    }
}

// ──────────────────────────────────────────────
// Entry point
// ──────────────────────────────────────────────

fn main() -> ExitCode {
    env_logger::init();

    let config = Config::load();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut app = App::new(config);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {e}");
        return ExitCode::FAILURE;
    }

    if app.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
