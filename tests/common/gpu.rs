use std::iter;

use hologram_shader::{
    data_structures::texture::Texture,
    render::{Gpu, Renderer},
};

/// Offscreen targets are square so every row is already 256 byte aligned.
pub const TARGET_SIZE: u32 = 256;
pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

pub struct Headless {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl Headless {
    pub async fn new() -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .expect("integration tests need a GPU adapter");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Test Device"),
                ..Default::default()
            })
            .await
            .expect("Failed to open the test device");
        Self { device, queue }
    }

    pub fn gpu(&self) -> Gpu<'_> {
        Gpu {
            device: &self.device,
            queue: &self.queue,
            color_format: COLOR_FORMAT,
            aspect: 1.0,
        }
    }

    pub fn white_texture(&self) -> Texture {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            4,
            4,
            image::Rgba([255, 255, 255, 255]),
        ));
        Texture::from_image(&self.device, &self.queue, &img, Some("white")).unwrap()
    }

    /// Renders one frame offscreen and reads the color target back.
    pub async fn render_frame(&self, renderer: &Renderer) -> image::RgbaImage {
        let extent = wgpu::Extent3d {
            width: TARGET_SIZE,
            height: TARGET_SIZE,
            depth_or_array_layers: 1,
        };
        let color = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Test Output Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth =
            Texture::create_depth_texture(&self.device, [TARGET_SIZE, TARGET_SIZE], "test_depth");
        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = renderer.encode(&self.device, &color_view, &depth.view);
        let u32_size = std::mem::size_of::<u32>() as u32;
        let output_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            size: (u32_size * TARGET_SIZE * TARGET_SIZE) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            label: Some("Test Output Buffer"),
            mapped_at_creation: false,
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &color,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(u32_size * TARGET_SIZE),
                    rows_per_image: Some(TARGET_SIZE),
                },
            },
            extent,
        );
        self.queue.submit(iter::once(encoder.finish()));

        // map first, then poll, otherwise the mapping never resolves
        let (tx, rx) = tokio::sync::oneshot::channel();
        let buffer_slice = output_buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            tx.send(result).unwrap();
        });
        self.device.poll(wgpu::PollType::Wait).unwrap();
        rx.await.unwrap().unwrap();

        let data = buffer_slice.get_mapped_range().to_vec();
        output_buffer.unmap();
        image::RgbaImage::from_raw(TARGET_SIZE, TARGET_SIZE, data).unwrap()
    }
}
