// GPU side of crisp axis labels.
// Rasterizes the label glyph set with cosmic-text, uploads it once, and submits
// the quads laid out by crisp_core::LabelEngine with wgpu.

mod atlas;
mod font;
mod pipeline;

use std::ops::Range;
use std::sync::Arc;

use crisp_core::{
    build_atlas, DeviceSize, Label, LabelEngine, PixelSize, ProjectionRect, Result, Tuning,
};

pub use atlas::{address_mode, AtlasTexture};
pub use font::CosmicRasterizer;
pub use pipeline::{LabelPipeline, LabelVertex, Uniforms, UNIFORM_SIZE};

/// Smallest vertex buffer allocation, in bytes.
const MIN_VERTEX_BUFFER: usize = 16 * 1024;

// ──────────────────────────────────────────────
// Configuration
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererConfig {
    /// Label font size in device pixels.
    pub font_size_px: f32,
    /// Straight-alpha RGBA.
    pub text_color: [f32; 4],
    /// Initial data rectangle; margins are reserved around it.
    pub projection: ProjectionRect,
    pub tuning: Tuning,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            font_size_px: 12.0,
            text_color: [0.0, 0.0, 0.0, 1.0],
            projection: ProjectionRect {
                left: 0.0,
                right: 1.0,
                bottom: 0.0,
                top: 1.0,
            },
            tuning: Tuning::default(),
        }
    }
}

// ──────────────────────────────────────────────
// LabelRenderer
// ──────────────────────────────────────────────

pub struct LabelRenderer {
    engine: LabelEngine,

    pipeline: LabelPipeline,
    // Owns the texture the atlas bind group samples.
    #[allow(dead_code)]
    atlas: AtlasTexture,
    atlas_bind_group: wgpu::BindGroup,

    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    text_color: [f32; 4],

    // All labels back to back; one draw range per label.
    vertices: Vec<LabelVertex>,
    draw_ranges: Vec<Range<u32>>,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    uploaded_generation: Option<u64>,

    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
}

impl LabelRenderer {
    /// Build the atlas, upload it and create every GPU resource the labels need.
    ///
    /// Any failure here is fatal for text rendering: the caller should not use
    /// the other operations without a renderer.
    pub fn initialize(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        format: wgpu::TextureFormat,
        config: RendererConfig,
    ) -> Result<Self> {
        config.projection.validate()?;

        let mut rasterizer = CosmicRasterizer::new(config.font_size_px);
        let image = build_atlas(&mut rasterizer)?;

        let atlas = AtlasTexture::upload(&device, &queue, &image)?;
        let pipeline = LabelPipeline::new(&device, format)?;
        let atlas_bind_group = atlas.bind_group(&device, &pipeline.atlas_layout);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("label_uniform_buffer"),
            size: UNIFORM_SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("label_uniform_bg"),
            layout: &pipeline.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let vertex_buffer = create_vertex_buffer(&device, MIN_VERTEX_BUFFER);
        let engine = LabelEngine::new(&image, config.projection, config.tuning);

        log::info!(
            "Label renderer ready: {:.1} px font, {}x{} cells",
            config.font_size_px,
            image.cell.width,
            image.cell.height
        );

        let renderer = Self {
            engine,
            pipeline,
            atlas,
            atlas_bind_group,
            uniform_buffer,
            uniform_bind_group,
            text_color: config.text_color,
            vertices: Vec::new(),
            draw_ranges: Vec::new(),
            vertex_buffer,
            vertex_capacity: MIN_VERTEX_BUFFER,
            uploaded_generation: None,
            device,
            queue,
        };
        renderer.write_uniforms();
        Ok(renderer)
    }

    // ── Host operations ────────────────────────

    /// The drawable surface is now `width` x `height` device pixels.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.engine.resize(DeviceSize::new(width, height))?;
        self.write_uniforms();
        Ok(())
    }

    /// Replace the data rectangle the labels annotate.
    pub fn set_projection(&mut self, rect: ProjectionRect) -> Result<()> {
        self.engine.set_projection(rect)?;
        self.write_uniforms();
        Ok(())
    }

    /// Replace both label sets. Vertical labels sit along the left edge,
    /// horizontal ones along the bottom.
    pub fn set_tick_values(&mut self, vertical: &[f64], horizontal: &[f64]) -> Result<()> {
        self.engine.set_tick_values(vertical, horizontal)?;
        self.write_uniforms();
        Ok(())
    }

    pub fn set_text_color(&mut self, color: [f32; 4]) {
        self.text_color = color;
        self.write_uniforms();
    }

    /// Draw every label into `pass`.
    ///
    /// Vertex data is re-uploaded only when the label geometry changed since
    /// the last call. Nothing is drawn before the first [`Self::resize`].
    pub fn render(&mut self, pass: &mut wgpu::RenderPass<'_>) {
        if self.engine.pixel_size().is_none() {
            return;
        }
        if self.uploaded_generation != Some(self.engine.generation()) {
            self.upload_labels();
        }
        if self.draw_ranges.is_empty() {
            return;
        }

        pass.set_pipeline(&self.pipeline.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_bind_group(1, &self.atlas_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        for range in &self.draw_ranges {
            pass.draw(range.clone(), 0..1);
        }
    }

    // ── Accessors ──────────────────────────────

    /// Column-major orthographic matrix for the effective projection. The
    /// renderer already binds it for its own draws.
    pub fn projection_matrix(&self) -> [[f32; 4]; 4] {
        self.engine.projection_matrix()
    }

    /// Effective projection, data rect plus reserved margins.
    pub fn projection(&self) -> ProjectionRect {
        self.engine.projection()
    }

    pub fn pixel_size(&self) -> Option<PixelSize> {
        self.engine.pixel_size()
    }

    pub fn labels(&self) -> &[Label] {
        self.engine.labels()
    }

    pub fn engine(&self) -> &LabelEngine {
        &self.engine
    }

    // ── GPU upload ─────────────────────────────

    fn write_uniforms(&self) {
        let uniforms = Uniforms {
            projection: self.engine.projection_matrix(),
            color: self.text_color,
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    fn upload_labels(&mut self) {
        collect_label_vertices(self.engine.labels(), &mut self.vertices, &mut self.draw_ranges);

        let bytes: &[u8] = bytemuck::cast_slice(&self.vertices);
        if bytes.len() > self.vertex_capacity {
            let new_cap = bytes.len().next_power_of_two().max(MIN_VERTEX_BUFFER);
            self.vertex_buffer = create_vertex_buffer(&self.device, new_cap);
            self.vertex_capacity = new_cap;
            log::debug!("Label vertex buffer grown to {new_cap} bytes");
        }
        if !bytes.is_empty() {
            self.queue.write_buffer(&self.vertex_buffer, 0, bytes);
        }
        self.uploaded_generation = Some(self.engine.generation());
    }
}

fn create_vertex_buffer(device: &wgpu::Device, size: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("label_vertex_buffer"),
        size: size as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Flatten every label's quads into `vertices`, recording the vertex range
/// each label occupies. Both outputs are cleared first.
pub(crate) fn collect_label_vertices(
    labels: &[Label],
    vertices: &mut Vec<LabelVertex>,
    ranges: &mut Vec<Range<u32>>,
) {
    vertices.clear();
    ranges.clear();
    for label in labels {
        let start = vertices.len() as u32;
        vertices.extend(label.quads.iter().copied().map(LabelVertex::from));
        let end = vertices.len() as u32;
        if end > start {
            ranges.push(start..end);
        }
    }
}
