mod common;

use common::test_tree;
use hologram_shader::{
    Matrix4, SquareMatrix, Vector3,
    config::SceneConfig,
    data_structures::{
        light::LightLayout,
        material::Material,
        model::MeshId,
        scene_graph::{Node, Scene},
        texture::TextureId,
    },
    math,
};

#[test]
fn traversal_is_pre_order_in_child_order() {
    let tree = test_tree();
    let records = tree.scene.draw_records(Matrix4::identity());
    let nodes: Vec<_> = records.iter().map(|r| r.node).collect();
    assert_eq!(nodes, vec![tree.first, tree.nested, tree.second]);

    let meshes: Vec<_> = records.iter().map(|r| r.mesh).collect();
    assert_eq!(meshes, vec![MeshId(0), MeshId(1), MeshId(2)]);
}

#[test]
fn repeated_traversals_are_identical() {
    let tree = test_tree();
    let parent = math::translation(Vector3::new(0.0, 0.0, -4.0));
    let first = tree.scene.draw_records(parent);
    let second = tree.scene.draw_records(parent);
    assert_eq!(first, second);
}

#[test]
fn group_node_emits_nothing_but_composes_children() {
    let tree = test_tree();
    let records = tree.scene.draw_records(Matrix4::identity());
    assert!(records.iter().all(|r| r.node != tree.group));

    let group_world = math::translation(Vector3::new(0.0, 1.0, 0.0));
    let first = records.iter().find(|r| r.node == tree.first).unwrap();
    assert_eq!(first.world_transform, group_world * math::scale(2.0));
    let nested = records.iter().find(|r| r.node == tree.nested).unwrap();
    assert_eq!(
        nested.world_transform,
        group_world * math::rotation(Vector3::unit_y(), 0.5)
    );
}

#[test]
fn parent_transform_is_applied_first() {
    let tree = test_tree();
    let parent = math::scale(3.0);
    let records = tree.scene.draw_records(parent);
    let second = records.iter().find(|r| r.node == tree.second).unwrap();
    assert_eq!(
        second.world_transform,
        parent * math::translation(Vector3::new(3.0, 0.0, 0.0))
    );
}

#[test]
fn upward_lookup_matches_traversal() {
    let tree = test_tree();
    let records = tree.scene.draw_records(Matrix4::identity());
    for record in &records {
        assert_eq!(
            tree.scene.world_transform(record.node),
            Some(record.world_transform)
        );
    }
}

#[test]
fn visit_reaches_every_node_once() {
    let tree = test_tree();
    let mut names = Vec::new();
    tree.scene
        .visit(Matrix4::identity(), &mut |_, node, _| names.push(node.name.clone()));
    assert_eq!(names, vec!["Root", "Group", "First", "Nested", "Second"]);
}

#[test]
fn mesh_without_texture_is_skipped_but_children_are_drawn() {
    let mut scene = Scene::new();
    let bare = scene.add_node(
        scene.root(),
        Node::new("Bare").with_mesh(MeshId(0), Material::default()),
    );
    let child = scene.add_node(
        bare,
        Node::new("Child").with_mesh(MeshId(1), Material::with_texture(TextureId(0))),
    );
    let records = scene.draw_records(Matrix4::identity());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].node, child);
}

#[test]
fn hologram_scene_plane_faces_the_lights() {
    let config = SceneConfig {
        lights: LightLayout::DoubleSlit(2),
        with_sun: false,
        ..Default::default()
    };
    let scene = Scene::hologram(MeshId(0), TextureId(0), &config);
    assert_eq!(scene.point_lights.len(), 6);
    assert!(scene.sun_lights.is_empty());

    let records = scene.draw_records(Matrix4::identity());
    assert_eq!(records.len(), 1);
    let normal = math::normal_matrix(&records[0].world_transform) * Vector3::unit_y();
    assert!(normal.z > 0.0);
    assert!(normal.x.abs() < 1e-5 && normal.y.abs() < 1e-5);
}

#[test]
fn empty_scene_draws_nothing() {
    let scene = Scene::new();
    assert!(scene.draw_records(Matrix4::identity()).is_empty());
    assert_eq!(scene.world_transform(scene.root()), Some(Matrix4::identity()));
}
