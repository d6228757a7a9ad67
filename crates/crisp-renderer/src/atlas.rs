// Atlas texture: the label glyph atlas uploaded once as single-channel coverage.

use crisp_core::{AtlasImage, Error, Result};

pub struct AtlasTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl AtlasTexture {
    /// Create the texture and sampler and copy `image` into it.
    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, image: &AtlasImage) -> Result<Self> {
        if image.pixels.len() != (image.width * image.height) as usize {
            return Err(Error::Initialization(format!(
                "atlas holds {} bytes, expected {}x{}",
                image.pixels.len(),
                image.width,
                image.height
            )));
        }

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("label_atlas"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let (address_mode, border_color) = address_mode(device.features());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("label_atlas_sampler"),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            border_color,
            ..Default::default()
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(Error::Initialization(format!("atlas texture: {err}")));
        }

        log::info!(
            "Uploaded label atlas {}x{} ({:?})",
            image.width,
            image.height,
            address_mode
        );
        Ok(Self {
            texture,
            view,
            sampler,
        })
    }

    pub fn bind_group(
        &self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("label_atlas_bg"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&self.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }
}

/// Sampling outside a glyph column must read as empty. Clamp-to-border gives
/// that directly; without it, edge clamping on the atlas border is the
/// closest match.
pub fn address_mode(features: wgpu::Features) -> (wgpu::AddressMode, Option<wgpu::SamplerBorderColor>) {
    if features.contains(wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER) {
        (
            wgpu::AddressMode::ClampToBorder,
            Some(wgpu::SamplerBorderColor::TransparentBlack),
        )
    } else {
        (wgpu::AddressMode::ClampToEdge, None)
    }
}
