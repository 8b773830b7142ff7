use std::io::{BufReader, Cursor};

use anyhow::{Context, bail};

use crate::data_structures::{
    model::{self, MeshId},
    texture::{Texture, TextureId},
};

/**
 * This module contains all logic for loading meshes/textures from external files
 * and the store that owns them once they live on the GPU.
 */
pub mod mesh;
pub mod texture;

/// GPU meshes and textures, addressed by [`MeshId`] / [`TextureId`].
///
/// Scene nodes only keep handles; the store is the single owner of the GPU
/// memory and is never duplicated per node.
#[derive(Debug, Default)]
pub struct Assets {
    meshes: Vec<model::Mesh>,
    textures: Vec<Texture>,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: model::Mesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    pub fn add_texture(&mut self, texture: Texture) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() - 1)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&model::Mesh> {
        self.meshes.get(id.0)
    }

    pub fn texture(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0)
    }

    pub fn textures(&self) -> impl Iterator<Item = (TextureId, &Texture)> {
        self.textures
            .iter()
            .enumerate()
            .map(|(idx, texture)| (TextureId(idx), texture))
    }
}

/// Imports every object of an OBJ file below `assets/` as one GPU mesh.
///
/// Material libraries referenced by the file are ignored; the base color
/// texture is loaded separately by name.
pub async fn load_model_obj(file_name: &str, device: &wgpu::Device) -> anyhow::Result<model::Mesh> {
    let obj_text = texture::load_string(file_name).await?;
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));

    let (models, _) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| async move {
            let no_materials: tobj::MTLLoadResult = Ok(Default::default());
            no_materials
        },
    )
    .await
    .with_context(|| format!("Could not parse {file_name}"))?;

    let primitives = mesh::load_primitives(&models, file_name, device);
    if primitives.is_empty() {
        bail!("{file_name} contains no triangles");
    }
    log::info!("loaded {} with {} submeshes", file_name, primitives.len());

    Ok(model::Mesh {
        name: file_name.to_string(),
        primitives,
    })
}
