//! The renderer: per-frame update, light upload and scene draw submission.
//!
//! Pipeline, sampler and bind group layouts are built once in
//! [`Renderer::new`]. Every frame [`Renderer::render`] walks the scene graph,
//! creates fresh uniform buffers for each drawable node and a fresh pair of
//! light storage buffers, and submits one draw per node.
//!
//! # Key types
//!
//! - [`Renderer`] owns the scene, the assets and the GPU state objects
//! - [`Gpu`] is what a renderer is built against: a window [`Context`] or an
//!   offscreen device
//! - [`VertexUniforms`] / [`FragmentUniforms`] are the per-draw uniform blocks

use std::iter;

use anyhow::{Context as _, bail};
use cgmath::{Matrix4, SquareMatrix};
use wgpu::util::DeviceExt;

use crate::{
    camera::{Camera, FrameState},
    config::RendererConfig,
    context::Context,
    data_structures::{
        light::{point_lights_raw, sun_lights_raw},
        model::{DrawMesh, MeshId},
        scene_graph::{DrawRecord, Scene},
        texture::{TextureId, create_default_sampler},
    },
    math,
    pipelines::hologram::{
        DRAW_GROUP, HologramLayouts, LIGHT_GROUP, MATERIAL_GROUP, mk_hologram_pipeline,
    },
    resources::{self, Assets},
};

/// Vertex stage uniforms of a single draw.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VertexUniforms {
    view_projection: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    // mat3x3 columns are 16 byte aligned in uniform buffers
    normal: [[f32; 4]; 3],
}

impl VertexUniforms {
    pub fn new(view_projection: &Matrix4<f32>, model: &Matrix4<f32>) -> Self {
        Self {
            view_projection: math::to_cols4(view_projection),
            model: math::to_cols4(model),
            normal: math::to_padded_cols3(&math::normal_matrix(model)),
        }
    }
}

/// Fragment stage uniforms of a single draw: scene-wide values plus the
/// node's material.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FragmentUniforms {
    camera_world_position: [f32; 3],
    point_light_count: u32,
    ambient_light_color: [f32; 3],
    sun_light_count: u32,
    specular_color: [f32; 3],
    specular_power: f32,
    frequency: f32,
    _padding: [f32; 3],
}

impl FragmentUniforms {
    pub fn new(scene: &Scene, record: &DrawRecord<'_>) -> Self {
        Self {
            camera_world_position: scene.camera_world_position.into(),
            point_light_count: scene.point_lights.len() as u32,
            ambient_light_color: scene.ambient_light_color.into(),
            sun_light_count: scene.sun_lights.len() as u32,
            specular_color: record.material.specular_color.into(),
            specular_power: record.material.specular_power,
            frequency: scene.frequency,
            _padding: [0.0; 3],
        }
    }

    pub fn point_light_count(&self) -> u32 {
        self.point_light_count
    }

    pub fn sun_light_count(&self) -> u32 {
        self.sun_light_count
    }
}

/// GPU buffers of one draw. They only have to outlive the frame's render pass.
struct DrawResources {
    mesh: MeshId,
    bind_group: wgpu::BindGroup,
    texture: TextureId,
}

/// Device, queue and output format a renderer draws with. A window's
/// [`Context`] provides one, so can an offscreen device.
#[derive(Clone, Copy, Debug)]
pub struct Gpu<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub color_format: wgpu::TextureFormat,
    pub aspect: f32,
}

impl<'a> From<&'a Context> for Gpu<'a> {
    fn from(ctx: &'a Context) -> Self {
        Self {
            device: &ctx.device,
            queue: &ctx.queue,
            color_format: ctx.config.format,
            aspect: ctx.aspect_ratio(),
        }
    }
}

pub struct Renderer {
    pipeline: wgpu::RenderPipeline,
    layouts: HologramLayouts,
    // one bind group per texture in `assets`, indexed by `TextureId`
    material_bind_groups: Vec<wgpu::BindGroup>,
    clear_colour: wgpu::Color,
    assets: Assets,
    scene: Scene,
    camera: Camera,
    frame: FrameState,
}

impl Renderer {
    /// Loads the model and texture named in `config`, builds the scene and
    /// every immutable GPU object. Any failure here is fatal for the demo and
    /// is returned to the caller.
    pub async fn new(gpu: Gpu<'_>, config: &RendererConfig) -> anyhow::Result<Self> {
        let mut assets = Assets::new();
        let mesh = resources::load_model_obj(&config.model_file, gpu.device)
            .await
            .with_context(|| format!("Could not load model {}", config.model_file))?;
        let mesh = assets.add_mesh(mesh);
        let texture = resources::texture::load_texture(&config.texture_file, gpu.device, gpu.queue)
            .await
            .with_context(|| format!("Could not load texture {}", config.texture_file))?;
        let texture = assets.add_texture(texture);

        let scene = Scene::hologram(mesh, texture, &config.scene);
        Self::from_parts(gpu, config, assets, scene)
    }

    /// Builds a renderer for an already assembled scene. Every mesh and
    /// texture handle the scene draws with must exist in `assets`.
    ///
    /// The renderer owns the scene from here on and only exposes it read-only,
    /// so the handles checked here stay valid for every frame.
    pub fn from_parts(
        gpu: Gpu<'_>,
        config: &RendererConfig,
        assets: Assets,
        scene: Scene,
    ) -> anyhow::Result<Self> {
        for (mesh, texture) in scene.referenced_assets() {
            if assets.mesh(mesh).is_none() {
                bail!("Scene references missing mesh {:?}", mesh);
            }
            if assets.texture(texture).is_none() {
                bail!("Scene references missing texture {:?}", texture);
            }
        }

        let layouts = HologramLayouts::new(gpu.device);
        let pipeline = mk_hologram_pipeline(gpu.device, gpu.color_format, &layouts);
        let sampler = create_default_sampler(gpu.device);
        let material_bind_groups = assets
            .textures()
            .map(|(id, texture)| {
                gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &layouts.material,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(&texture.view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(&sampler),
                        },
                    ],
                    label: Some(&format!("material_bind_group_{}", id.0)),
                })
            })
            .collect();

        let camera = Camera::from(&config.camera);
        let mut renderer = Self {
            pipeline,
            layouts,
            material_bind_groups,
            clear_colour: config.clear_colour,
            assets,
            scene,
            camera,
            frame: FrameState::default(),
        };
        renderer.update(0.0, gpu.aspect);
        Ok(renderer)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn frame(&self) -> &FrameState {
        &self.frame
    }

    /// Advances time by `dt` seconds and refreshes the camera matrices and the
    /// time-varying shader parameters.
    pub fn update(&mut self, dt: f32, aspect: f32) {
        self.frame = self.frame.advance(dt, aspect, &self.camera);
        self.scene.frequency = self.frame.frequency();
        self.scene.camera_world_position = self.camera.world_position();
    }

    fn light_bind_group(&self, device: &wgpu::Device) -> wgpu::BindGroup {
        let point_lights = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Light Buffer"),
            contents: bytemuck::cast_slice(&point_lights_raw(&self.scene.point_lights)),
            usage: wgpu::BufferUsages::STORAGE,
        });
        let sun_lights = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sun Light Buffer"),
            contents: bytemuck::cast_slice(&sun_lights_raw(&self.scene.sun_lights)),
            usage: wgpu::BufferUsages::STORAGE,
        });
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.layouts.lights,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: point_lights.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: sun_lights.as_entire_binding(),
                },
            ],
            label: Some("light_bind_group"),
        })
    }

    fn draw_resources(&self, device: &wgpu::Device, record: &DrawRecord<'_>) -> DrawResources {
        let vertex_uniforms =
            VertexUniforms::new(&self.frame.view_projection(), &record.world_transform);
        let fragment_uniforms = FragmentUniforms::new(&self.scene, record);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Uniform Buffer"),
            contents: bytemuck::cast_slice(&[vertex_uniforms]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let fragment_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Fragment Uniform Buffer"),
            contents: bytemuck::cast_slice(&[fragment_uniforms]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.layouts.draw,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: vertex_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: fragment_buffer.as_entire_binding(),
                },
            ],
            label: Some("draw_bind_group"),
        });
        DrawResources {
            mesh: record.mesh,
            bind_group,
            texture: record.texture,
        }
    }

    /// Encodes and presents one frame to the window surface.
    pub fn render(&self, ctx: &Context) -> Result<(), wgpu::SurfaceError> {
        if !ctx.is_surface_configured() {
            return Ok(());
        }
        let output = ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self.encode(&ctx.device, &view, &ctx.depth_texture.view);
        ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Records one frame into `color` and `depth`. The caller submits the
    /// returned encoder, possibly after appending copies of its own.
    pub fn encode(
        &self,
        device: &wgpu::Device,
        color: &wgpu::TextureView,
        depth: &wgpu::TextureView,
    ) -> wgpu::CommandEncoder {
        let light_bind_group = self.light_bind_group(device);
        let draws: Vec<DrawResources> = self
            .scene
            .draw_records(Matrix4::identity())
            .iter()
            .map(|record| self.draw_resources(device, record))
            .collect();

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(LIGHT_GROUP, &light_bind_group, &[]);
            for draw in &draws {
                // the scene is not mutable from outside, so `from_parts` has
                // already checked every handle
                let (Some(mesh), Some(material)) = (
                    self.assets.mesh(draw.mesh),
                    self.material_bind_groups.get(draw.texture.0),
                ) else {
                    continue;
                };
                render_pass.set_bind_group(DRAW_GROUP, &draw.bind_group, &[]);
                render_pass.set_bind_group(MATERIAL_GROUP, material, &[]);
                render_pass.draw_mesh(mesh);
            }
        }
        encoder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SceneConfig, data_structures::light::LightLayout};
    use std::mem;

    #[test]
    fn uniform_blocks_match_wgsl_sizes() {
        assert_eq!(mem::size_of::<VertexUniforms>(), 176);
        assert_eq!(mem::size_of::<FragmentUniforms>(), 64);
    }

    #[test]
    fn vertex_uniforms_carry_normal_matrix() {
        let model = math::scale_nonuniform(2.0, 1.0, 1.0);
        let uniforms = VertexUniforms::new(&Matrix4::identity(), &model);
        assert_eq!(uniforms.normal[0], [0.5, 0.0, 0.0, 0.0]);
        assert_eq!(uniforms.model, math::to_cols4(&model));
    }

    #[test]
    fn fragment_uniforms_count_lights_and_copy_material() {
        let config = SceneConfig {
            lights: LightLayout::DoubleSlit(3),
            with_sun: false,
            ..Default::default()
        };
        let mut scene = Scene::hologram(MeshId(0), TextureId(0), &config);
        scene.frequency = 301.5;
        let records = scene.draw_records(Matrix4::identity());
        let uniforms = FragmentUniforms::new(&scene, &records[0]);

        assert_eq!(uniforms.point_light_count(), 8);
        assert_eq!(uniforms.sun_light_count(), 0);
        assert_eq!(uniforms.frequency, 301.5);
        assert_eq!(uniforms.specular_power, config.specular_power);
    }
}
