use anyhow::Context;

use crate::data_structures::texture;

/// Texture + sampler layout used by every material.
pub fn base_color_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("Base color bind_group_layout"),
    })
}

/// `./assets/<file_name>` if it exists, otherwise the copy the build script
/// placed next to the compiled crate.
pub fn asset_path(file_name: &str) -> std::path::PathBuf {
    let local = std::path::Path::new("./").join("assets").join(file_name);
    if local.exists() {
        return local;
    }
    std::path::Path::new(env!("OUT_DIR"))
        .join("assets")
        .join(file_name)
}

pub async fn load_string(file_name: &str) -> anyhow::Result<String> {
    let path = asset_path(file_name);
    let txt = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Could not read {}", path.display()))?;
    Ok(txt)
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    let path = asset_path(file_name);
    let data = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Could not read {}", path.display()))?;
    Ok(data)
}

/// Loads an image from `assets/` as an sRGB texture with mipmaps.
pub async fn load_texture(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<texture::Texture> {
    let data = load_binary(file_name).await?;
    let format = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str());
    texture::Texture::from_bytes(device, queue, &data, file_name, format)
}
