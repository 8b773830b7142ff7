use hologram_shader::{
    Vector3,
    data_structures::{
        material::Material,
        model::MeshId,
        scene_graph::{Node, NodeId, Scene},
        texture::TextureId,
    },
    math,
};

#[cfg(feature = "integration-tests")]
pub mod gpu;

pub struct TestTree {
    pub scene: Scene,
    pub group: NodeId,
    pub first: NodeId,
    pub nested: NodeId,
    pub second: NodeId,
}

/**
 * Root
 * ├── Group (translation, no mesh)
 * │   ├── First  (mesh 0, scale 2)
 * │   └── Nested (mesh 1, rotation)
 * └── Second (mesh 2, translation)
 */
pub fn test_tree() -> TestTree {
    let mut scene = Scene::new();
    let root = scene.root();
    let group = scene.add_node(
        root,
        Node::new("Group").with_transform(math::translation(Vector3::new(0.0, 1.0, 0.0))),
    );
    let first = scene.add_node(
        group,
        Node::new("First")
            .with_transform(math::scale(2.0))
            .with_mesh(MeshId(0), Material::with_texture(TextureId(0))),
    );
    let nested = scene.add_node(
        group,
        Node::new("Nested")
            .with_transform(math::rotation(Vector3::unit_y(), 0.5))
            .with_mesh(MeshId(1), Material::with_texture(TextureId(0))),
    );
    let second = scene.add_node(
        root,
        Node::new("Second")
            .with_transform(math::translation(Vector3::new(3.0, 0.0, 0.0)))
            .with_mesh(MeshId(2), Material::with_texture(TextureId(1))),
    );
    TestTree {
        scene,
        group,
        first,
        nested,
        second,
    }
}
