//! Scene graph and hierarchical scene organization.
//!
//! Nodes live in an arena owned by the [`Scene`]. Each node owns its ordered
//! list of child indices and keeps a non-owning parent index for upward
//! lookups. Dropping the scene drops the arena; the parent links are never
//! followed for destruction.

use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::{
    config::SceneConfig,
    data_structures::{
        light::{Light, SunLight},
        material::Material,
        model::MeshId,
        texture::TextureId,
    },
    math,
};

/// Index of a node inside its scene's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// An element of the transform hierarchy, optionally carrying a drawable mesh.
#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pub local_transform: Matrix4<f32>,
    pub mesh: Option<MeshId>,
    pub material: Material,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            local_transform: Matrix4::identity(),
            mesh: None,
            material: Material::default(),
        }
    }

    pub fn with_transform(mut self, local_transform: Matrix4<f32>) -> Self {
        self.local_transform = local_transform;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshId, material: Material) -> Self {
        self.mesh = Some(mesh);
        self.material = material;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A node that is submitted to the GPU this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawRecord<'a> {
    pub node: NodeId,
    pub world_transform: Matrix4<f32>,
    pub mesh: MeshId,
    pub material: &'a Material,
    pub texture: TextureId,
}

/// The root of the node tree plus everything the fragment stage shades with.
#[derive(Clone, Debug)]
pub struct Scene {
    nodes: Vec<Node>,
    root: NodeId,
    pub ambient_light_color: Vector3<f32>,
    pub point_lights: Vec<Light>,
    pub sun_lights: Vec<SunLight>,
    pub frequency: f32,
    pub camera_world_position: Vector3<f32>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// An empty scene with a single node named "Root".
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("Root")],
            root: NodeId(0),
            ambient_light_color: Vector3::new(0.0, 0.0, 0.0),
            point_lights: Vec::new(),
            sun_lights: Vec::new(),
            frequency: 0.0,
            camera_world_position: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    /// The demo scene: one textured plane facing +Z, lit by `config.lights`
    /// and an optional sun.
    pub fn hologram(mesh: MeshId, texture: TextureId, config: &SceneConfig) -> Self {
        let mut scene = Self::new();
        scene.ambient_light_color = config.ambient_light_color;
        scene.point_lights = config.lights.build();
        if config.with_sun {
            scene.sun_lights.push(SunLight {
                position: config.sun_position,
            });
        }

        let material = Material {
            specular_color: config.specular_color,
            specular_power: config.specular_power,
            base_color_texture: Some(texture),
        };
        let plane = Node::new("Plane")
            .with_transform(
                math::rotation(Vector3::unit_x(), std::f32::consts::FRAC_PI_2)
                    * math::scale(config.plane_scale),
            )
            .with_mesh(mesh, material);
        scene.add_node(scene.root(), plane);

        log::info!(
            "built hologram scene with {} point lights and {} sun lights",
            scene.point_lights.len(),
            scene.sun_lights.len()
        );
        scene
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Appends `node` as the last child of `parent` and returns its id.
    ///
    /// Any parent/children links already present on `node` are replaced, so a
    /// node can only ever enter the tree below an existing node and the tree
    /// stays acyclic. Panics if `parent` does not belong to this scene.
    pub fn add_node(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        assert!(parent.0 < self.nodes.len(), "unknown parent node {parent:?}");
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(NodeId)
    }

    /// Composes local transforms from the root down to `id` by walking the
    /// parent links upwards.
    pub fn world_transform(&self, id: NodeId) -> Option<Matrix4<f32>> {
        let mut node = self.node(id)?;
        let mut world = node.local_transform;
        while let Some(parent) = node.parent {
            node = &self.nodes[parent.0];
            world = node.local_transform * world;
        }
        Some(world)
    }

    /// Depth-first pre-order walk from the root in `children` order.
    ///
    /// `f` receives every node with its composed world transform
    /// `parent_world * node.local_transform`.
    pub fn visit<'s, F>(&'s self, parent_world: Matrix4<f32>, f: &mut F)
    where
        F: FnMut(NodeId, &'s Node, Matrix4<f32>),
    {
        self.visit_from(self.root, parent_world, f);
    }

    fn visit_from<'s, F>(&'s self, id: NodeId, parent_world: Matrix4<f32>, f: &mut F)
    where
        F: FnMut(NodeId, &'s Node, Matrix4<f32>),
    {
        let node = &self.nodes[id.0];
        let world = parent_world * node.local_transform;
        f(id, node, world);
        for child in &node.children {
            self.visit_from(*child, world, f);
        }
    }

    /// Every node with a mesh and a textured material, in traversal order.
    /// Group nodes contribute no record but their children are still visited.
    pub fn draw_records(&self, parent_world: Matrix4<f32>) -> Vec<DrawRecord<'_>> {
        let mut records = Vec::new();
        self.visit(parent_world, &mut |id, node, world| {
            if let (Some(mesh), Some(texture)) = (node.mesh, node.material.base_color_texture) {
                records.push(DrawRecord {
                    node: id,
                    world_transform: world,
                    mesh,
                    material: &node.material,
                    texture,
                });
            }
        });
        records
    }

    /// Mesh and texture handles referenced by drawable nodes.
    pub fn referenced_assets(&self) -> Vec<(MeshId, TextureId)> {
        self.draw_records(Matrix4::identity())
            .into_iter()
            .map(|record| (record.mesh, record.texture))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::light::LightLayout;

    #[test]
    fn new_scene_has_root() {
        let scene = Scene::new();
        let root = scene.node(scene.root()).unwrap();
        assert_eq!(root.name, "Root");
        assert_eq!(root.parent(), None);
        assert!(root.children().is_empty());
        assert_eq!(scene.find("Root"), Some(scene.root()));
    }

    #[test]
    fn add_node_links_parent_and_child() {
        let mut scene = Scene::new();
        let group = scene.add_node(scene.root(), Node::new("Group"));
        let leaf = scene.add_node(group, Node::new("Leaf"));

        assert_eq!(scene.node(leaf).unwrap().parent(), Some(group));
        assert_eq!(scene.node(group).unwrap().children(), &[leaf]);
        assert_eq!(scene.node(scene.root()).unwrap().children(), &[group]);
        assert_eq!(scene.find("Leaf"), Some(leaf));
    }

    #[test]
    fn world_transform_walks_parents() {
        let mut scene = Scene::new();
        let offset = Vector3::new(1.0, 2.0, 3.0);
        let group = scene.add_node(
            scene.root(),
            Node::new("Group").with_transform(math::translation(offset)),
        );
        let leaf = scene.add_node(group, Node::new("Leaf").with_transform(math::scale(2.0)));

        assert_eq!(
            scene.world_transform(leaf),
            Some(math::translation(offset) * math::scale(2.0))
        );
    }

    #[test]
    fn untextured_mesh_is_not_drawn() {
        let mut scene = Scene::new();
        scene.add_node(
            scene.root(),
            Node::new("Bare").with_mesh(MeshId(0), Material::default()),
        );
        assert!(scene.draw_records(Matrix4::identity()).is_empty());
    }

    #[test]
    fn hologram_scene_has_one_drawable_plane() {
        let config = SceneConfig {
            lights: LightLayout::Circle(6),
            with_sun: true,
            ..Default::default()
        };
        let scene = Scene::hologram(MeshId(3), TextureId(7), &config);

        assert_eq!(scene.point_lights.len(), 6);
        assert_eq!(scene.sun_lights.len(), 1);
        assert_eq!(scene.referenced_assets(), vec![(MeshId(3), TextureId(7))]);

        let plane = scene.find("Plane").unwrap();
        assert_eq!(scene.node(plane).unwrap().parent(), Some(scene.root()));
    }
}
