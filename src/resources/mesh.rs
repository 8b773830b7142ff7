use cgmath::{InnerSpace, Vector3};
use wgpu::util::DeviceExt;

use crate::data_structures::model;

/**
 * Flattens a tobj mesh into interleaved vertices.
 *
 * OBJ files may come without normals. In that case every vertex gets the
 * normalized sum of the face normals of the triangles it belongs to.
 */
pub fn to_vertices(mesh: &tobj::Mesh) -> Vec<model::ModelVertex> {
    let mut vertices = (0..mesh.positions.len() / 3)
        .map(|i| model::ModelVertex {
            position: [
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            ],
            normal: [
                mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
            ],
            tex_coords: [
                mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                // OBJ has v pointing up, wgpu samples with v pointing down
                1.0 - mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
            ],
        })
        .collect::<Vec<_>>();

    if mesh.normals.is_empty() {
        let mut accumulated = vec![Vector3::new(0.0f32, 0.0, 0.0); vertices.len()];
        for c in mesh.indices.chunks_exact(3) {
            let [a, b, d] = [c[0] as usize, c[1] as usize, c[2] as usize];
            if a >= vertices.len() || b >= vertices.len() || d >= vertices.len() {
                continue;
            }
            let p0: Vector3<f32> = vertices[a].position.into();
            let p1: Vector3<f32> = vertices[b].position.into();
            let p2: Vector3<f32> = vertices[d].position.into();
            let face = (p1 - p0).cross(p2 - p0);
            accumulated[a] += face;
            accumulated[b] += face;
            accumulated[d] += face;
        }
        for (vertex, normal) in vertices.iter_mut().zip(accumulated) {
            if normal.magnitude2() > 0.0 {
                vertex.normal = normal.normalize().into();
            }
        }
    }
    vertices
}

pub fn load_primitives(
    models: &[tobj::Model],
    file_name: &str,
    device: &wgpu::Device,
) -> Vec<model::Primitive> {
    models
        .iter()
        .filter(|m| !m.mesh.indices.is_empty())
        .map(|m| {
            let vertices = to_vertices(&m.mesh);
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{:?} {} Vertex Buffer", file_name, m.name)),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{:?} {} Index Buffer", file_name, m.name)),
                // The indices are for positions, texels, and normals because we set `single_index` to true
                contents: bytemuck::cast_slice(&m.mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

            model::Primitive {
                vertex_buffer,
                index_buffer,
                num_elements: m.mesh.indices.len() as u32,
            }
        })
        .collect()
}
