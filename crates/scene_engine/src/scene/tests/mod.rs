//! Scene graph integration tests: hierarchy, integration, collision
//! response, overlap events and drawing working together.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use approx::assert_relative_eq;

use crate::assets::{MeshData, Model, Resource, ShaderData};
use crate::config::EngineConfig;
use crate::events::{OverlapEvent, OverlapPhase};
use crate::foundation::collections::GameObjectId;
use crate::foundation::math::{Mat4, Vec3};
use crate::input::{InputButtons, InputSnapshot};
use crate::physics::{ColliderShape, Rigidbody, ShapeKind};
use super::*;

const DT: f32 = 1.0 / 60.0;

fn scene() -> Scene {
    Scene::new("Test", SceneType::Game, &EngineConfig::default())
}

fn add(scene: &mut Scene, name: &str, position: Vec3) -> GameObjectId {
    scene
        .add_game_object(GameObject::new(name, Transform::from_position(position)), GameObjectKind::Default)
        .unwrap()
}

fn add_body(scene: &mut Scene, name: &str, position: Vec3, gravity: bool) -> GameObjectId {
    let object = GameObject::new(name, Transform::from_position(position))
        .with_rigidbody(Rigidbody::new().with_gravity(gravity));
    scene.add_game_object(object, GameObjectKind::Default).unwrap()
}

fn loaded_model() -> Model {
    Model::new(
        Arc::new(Resource::loaded("mesh", MeshData::default())),
        Arc::new(Resource::loaded("shader", ShaderData::default())),
    )
}

fn phases(events: &[OverlapEvent]) -> Vec<OverlapPhase> {
    events.iter().map(|event| event.phase).collect()
}

#[test]
fn test_world_position_through_five_levels() {
    let mut scene = scene();
    let root = scene
        .add_game_object(
            GameObject::new(
                "N0",
                Transform::from_position(Vec3::new(1.0, 2.0, 3.0)).with_scale(Vec3::repeat(2.0)),
            ),
            GameObjectKind::Default,
        )
        .unwrap();
    let mut ids = vec![root];
    for level in 1..5 {
        ids.push(add(&mut scene, &format!("N{level}"), Vec3::new(1.0, 0.0, 0.0)));
        scene.set_parent(&format!("N{}", level - 1), &format!("N{level}")).unwrap();
    }

    // Each level adds one local unit along X, doubled by the root scale
    let deepest = scene.world_position(ids[4]).unwrap();
    assert_relative_eq!(deepest, Vec3::new(9.0, 2.0, 3.0), epsilon = 1e-5);

    // Rotating a middle node swings everything below it
    scene.get_mut(ids[2]).unwrap().transform.euler_rotation = Vec3::new(0.0, 90.0, 0.0);
    let expected = ids
        .iter()
        .map(|id| scene.get(*id).unwrap().transform.local_matrix())
        .fold(Mat4::identity(), |world, local| world * local);
    assert_relative_eq!(scene.world_matrix(ids[4]).unwrap(), expected, epsilon = 1e-5);
    assert_relative_eq!(scene.world_position(ids[4]).unwrap(), Vec3::new(5.0, 2.0, -1.0), epsilon = 1e-5);
}

#[test]
fn test_gravity_from_rest() {
    let mut scene = scene();
    let id = add_body(&mut scene, "Ball", Vec3::new(0.0, 100.0, 0.0), true);

    let steps = 30;
    for _ in 0..steps {
        scene.update(&InputSnapshot::new(), DT);
    }

    let body = scene.rigidbody_mut(id).unwrap();
    assert_relative_eq!(body.velocity.y, -9.81 * steps as f32 * DT, epsilon = 1e-4);
}

#[test]
fn test_parent_cycle_rejected() {
    let mut scene = scene();
    add(&mut scene, "Player", Vec3::zeros());
    add(&mut scene, "Camera", Vec3::zeros());

    scene.set_parent("Player", "Camera").unwrap();
    let err = scene.set_parent("Camera", "Player").unwrap_err();
    assert!(matches!(err, SceneError::InvalidHierarchy { .. }));

    assert!(matches!(scene.set_parent("Player", "Player"), Err(SceneError::InvalidHierarchy { .. })));
    assert!(matches!(scene.set_parent("Ghost", "Player"), Err(SceneError::InvalidHierarchy { .. })));

    // The rejected calls left the original link in place
    let player = scene.find("Player").unwrap();
    let camera = scene.get_by_name("Camera").unwrap();
    assert_eq!(camera.parent(), Some(player));
    assert_eq!(scene.get(player).unwrap().children(), &[scene.find("Camera").unwrap()]);
}

#[test]
fn test_reparent_moves_child() {
    let mut scene = scene();
    add(&mut scene, "A", Vec3::new(10.0, 0.0, 0.0));
    add(&mut scene, "B", Vec3::new(-10.0, 0.0, 0.0));
    let child = add(&mut scene, "C", Vec3::new(0.0, 1.0, 0.0));

    scene.set_parent("A", "C").unwrap();
    scene.set_parent("B", "C").unwrap();
    assert!(scene.get_by_name("A").unwrap().children().is_empty());
    assert_relative_eq!(scene.world_position(child).unwrap(), Vec3::new(-10.0, 1.0, 0.0));

    scene.clear_parent("C").unwrap();
    assert!(scene.get(child).unwrap().parent().is_none());
    assert_relative_eq!(scene.world_position(child).unwrap(), Vec3::new(0.0, 1.0, 0.0));
}

#[test]
fn test_sphere_comes_to_rest_on_box() {
    let mut scene = scene();
    let floor = add(&mut scene, "Floor", Vec3::zeros());
    let floor_collider = scene.create_collider(ShapeKind::Box, None, true);
    scene.set_collider(floor, floor_collider).unwrap();

    let ball = add_body(&mut scene, "Ball", Vec3::new(0.0, 5.0, 0.0), true);
    let ball_collider = scene.create_collider(ColliderShape::sphere(Vec3::zeros(), 0.5), None, false);
    scene.set_collider(ball, ball_collider).unwrap();

    for _ in 0..240 {
        scene.update(&InputSnapshot::new(), DT);
    }

    let position = scene.get(ball).unwrap().transform.position;
    assert_relative_eq!(position.y, 1.5, epsilon = 1e-3);
    let body = scene.rigidbody_mut(ball).unwrap();
    assert_relative_eq!(body.velocity.y, 0.0, epsilon = 1e-4);
    assert!(body.grounded);

    // The static floor never moves
    assert_eq!(scene.get(floor).unwrap().transform.position, Vec3::zeros());
    assert!(scene.collider(floor_collider).unwrap().is_colliding());
}

#[test]
fn test_seam_between_boxes_pushes_once() {
    let mut scene = scene();
    for (name, x) in [("Left", -1.0), ("Right", 1.0)] {
        let id = add(&mut scene, name, Vec3::new(x, -1.0, 0.0));
        let handle = scene.create_collider(ShapeKind::Box, None, true);
        scene.set_collider(id, handle).unwrap();
    }
    let ball = add_body(&mut scene, "Ball", Vec3::new(0.0, 0.4, 0.0), false);
    let handle = scene.create_collider(ColliderShape::sphere(Vec3::zeros(), 0.5), None, false);
    scene.set_collider(ball, handle).unwrap();

    scene.update(&InputSnapshot::new(), DT);

    // Both boxes report 0.1 of overlap along +Y; one push covers both
    assert_relative_eq!(scene.get(ball).unwrap().transform.position, Vec3::new(0.0, 0.5, 0.0), epsilon = 1e-5);
    assert!(scene.rigidbody_mut(ball).unwrap().grounded);
}

#[test]
fn test_attachments_do_not_push_their_holder() {
    let mut scene = scene();
    let player = add_body(&mut scene, "Player", Vec3::zeros(), false);
    let handle = scene.create_collider(ColliderShape::sphere(Vec3::zeros(), 0.5), None, false);
    scene.set_collider(player, handle).unwrap();

    let pistol = add(&mut scene, "Pistol", Vec3::new(0.3, 0.0, 0.0));
    let handle = scene.create_collider(ColliderShape::sphere(Vec3::zeros(), 0.2), None, false);
    scene.set_collider(pistol, handle).unwrap();
    scene.set_parent("Player", "Pistol").unwrap();

    for _ in 0..60 {
        scene.update(&InputSnapshot::new(), DT);
    }

    assert_relative_eq!(scene.get(player).unwrap().transform.position, Vec3::zeros());
    assert_relative_eq!(scene.world_position(pistol).unwrap(), Vec3::new(0.3, 0.0, 0.0));
    assert!(scene.drain_events().is_empty());

    // A loose crate at the same spot still collides with the player
    let loose = add(&mut scene, "Crate", Vec3::new(0.3, 0.0, 0.0));
    let handle = scene.create_collider(ColliderShape::sphere(Vec3::zeros(), 0.2), None, false);
    scene.set_collider(loose, handle).unwrap();
    scene.update(&InputSnapshot::new(), DT);
    assert!(scene.get(player).unwrap().transform.position.x < 0.0);
}

#[test]
fn test_two_bodies_split_penetration() {
    let mut scene = scene();
    let a = add_body(&mut scene, "A", Vec3::zeros(), false);
    let b = add_body(&mut scene, "B", Vec3::new(0.5, 0.0, 0.0), false);
    for id in [a, b] {
        let handle = scene.create_collider(ColliderShape::sphere(Vec3::zeros(), 0.5), None, false);
        scene.set_collider(id, handle).unwrap();
    }

    scene.update(&InputSnapshot::new(), DT);

    let pa = scene.get(a).unwrap().transform.position;
    let pb = scene.get(b).unwrap().transform.position;
    assert_relative_eq!(pa.x, -0.25, epsilon = 1e-5);
    assert_relative_eq!(pb.x, 0.75, epsilon = 1e-5);
}

#[test]
fn test_trigger_enter_stay_exit() {
    let mut scene = scene();
    let zone = add(&mut scene, "Zone", Vec3::zeros());
    let trigger = scene.create_collider(ShapeKind::Box, None, true);
    scene.collider_mut(trigger).unwrap().is_trigger = true;
    scene.set_collider(zone, trigger).unwrap();

    let mover = add(&mut scene, "Mover", Vec3::new(-5.0, 0.0, 0.0));
    let handle = scene.create_collider(ColliderShape::sphere(Vec3::zeros(), 0.5), None, false);
    scene.set_collider(mover, handle).unwrap();

    let entered = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&entered);
    scene.register_handler(OverlapPhase::Enter, move |event: &OverlapEvent| {
        sink.borrow_mut().push(event.other("Zone").map(str::to_string));
        false
    });

    let step = |scene: &mut Scene, x: f32| {
        scene.get_mut(mover).unwrap().transform.position.x = x;
        scene.update(&InputSnapshot::new(), DT);
        scene.drain_events()
    };

    assert!(step(&mut scene, -5.0).is_empty());

    let events = step(&mut scene, 0.0);
    assert_eq!(phases(&events), vec![OverlapPhase::Enter]);
    assert!(events[0].trigger);
    assert!(events[0].involves("Mover"));

    assert_eq!(phases(&step(&mut scene, 0.2)), vec![OverlapPhase::Stay]);
    assert_eq!(phases(&step(&mut scene, 0.4)), vec![OverlapPhase::Stay]);
    assert_eq!(phases(&step(&mut scene, 5.0)), vec![OverlapPhase::Exit]);
    assert!(step(&mut scene, 5.0).is_empty());

    // Triggers report but never push
    assert_eq!(scene.get(mover).unwrap().transform.position.x, 5.0);
    assert_eq!(*entered.borrow(), vec![Some("Mover".to_string())]);
}

#[test]
fn test_removed_object_exits() {
    let mut scene = scene();
    let a = add(&mut scene, "A", Vec3::zeros());
    let b = add(&mut scene, "B", Vec3::new(0.5, 0.0, 0.0));
    for id in [a, b] {
        let handle = scene.create_collider(ShapeKind::Sphere, None, false);
        scene.set_collider(id, handle).unwrap();
    }

    scene.update(&InputSnapshot::new(), DT);
    assert_eq!(phases(&scene.drain_events()), vec![OverlapPhase::Enter]);

    let removed = scene.remove_game_object(b).unwrap();
    assert_eq!(removed.name(), "B");
    scene.update(&InputSnapshot::new(), DT);

    let events = scene.drain_events();
    assert_eq!(phases(&events), vec![OverlapPhase::Exit]);
    assert_eq!(events[0].other("A"), Some("B"));
    assert!(scene.find("B").is_err());
    assert_eq!(scene.colliders().count(), 1);
}

#[test]
fn test_static_pairs_are_skipped() {
    let mut scene = scene();
    for (name, x) in [("Left", 0.0), ("Right", 0.5)] {
        let id = add(&mut scene, name, Vec3::new(x, 0.0, 0.0));
        let handle = scene.create_collider(ShapeKind::Box, None, true);
        scene.set_collider(id, handle).unwrap();
    }

    scene.update(&InputSnapshot::new(), DT);
    assert!(scene.drain_events().is_empty());
    assert!(scene.colliders().all(|(_, collider)| !collider.is_colliding()));
}

#[test]
fn test_unsupported_pair_is_skipped() {
    let mut scene = scene();
    let crate_id = add(&mut scene, "Crate", Vec3::zeros());
    let handle = scene.create_collider(ShapeKind::Box, None, false);
    scene.set_collider(crate_id, handle).unwrap();

    let ramp = add(&mut scene, "Ramp", Vec3::zeros());
    let vertices = [Vec3::new(-2.0, 0.0, -2.0), Vec3::new(2.0, 0.0, -2.0), Vec3::new(0.0, 0.0, 2.0)];
    let handle = scene.create_collider(ColliderShape::mesh(&vertices, &[0, 1, 2]), None, true);
    scene.set_collider(ramp, handle).unwrap();

    scene.update(&InputSnapshot::new(), DT);
    scene.update(&InputSnapshot::new(), DT);
    assert!(scene.drain_events().is_empty());
}

#[test]
fn test_children_are_not_integrated() {
    let mut scene = scene();
    add(&mut scene, "Parent", Vec3::new(0.0, 10.0, 0.0));
    let child = add_body(&mut scene, "Child", Vec3::new(1.0, 0.0, 0.0), true);
    scene.set_parent("Parent", "Child").unwrap();

    for _ in 0..10 {
        scene.update(&InputSnapshot::new(), DT);
    }

    assert_eq!(scene.get(child).unwrap().transform.position, Vec3::new(1.0, 0.0, 0.0));
    assert_relative_eq!(scene.get(child).unwrap().world_position(), Vec3::new(1.0, 10.0, 0.0));
}

#[test]
fn test_player_moves_along_yaw() {
    let mut scene = scene();
    let player = scene
        .add_game_object(
            GameObject::new("Player", Transform::identity())
                .with_rigidbody(Rigidbody::new().with_gravity(false))
                .with_player_controller(true),
            GameObjectKind::Player,
        )
        .unwrap();

    scene.update(&InputSnapshot::new().with_move(0.0, 1.0), DT);
    assert_relative_eq!(scene.rigidbody_mut(player).unwrap().velocity, Vec3::new(0.0, 0.0, -5.0), epsilon = 1e-5);

    // Turning left by 90 degrees makes forward point down -X
    scene.update(&InputSnapshot::new().with_move(0.0, 1.0).with_look(-900.0, 0.0), DT);
    assert_relative_eq!(scene.rigidbody_mut(player).unwrap().velocity, Vec3::new(-5.0, 0.0, 0.0), epsilon = 1e-4);
    assert_eq!(scene.get(player).unwrap().kind(), GameObjectKind::Player);
}

#[test]
fn test_player_jumps_only_when_grounded() {
    let mut scene = scene();
    let floor = add(&mut scene, "Floor", Vec3::zeros());
    let handle = scene.create_collider(ShapeKind::Box, None, true);
    scene.set_collider(floor, handle).unwrap();

    let player = scene
        .add_game_object(
            GameObject::new("Player", Transform::from_position(Vec3::new(0.0, 3.0, 0.0)))
                .with_rigidbody(Rigidbody::new())
                .with_player_controller(true),
            GameObjectKind::Player,
        )
        .unwrap();
    let handle = scene.create_collider(ColliderShape::sphere(Vec3::zeros(), 0.5), None, false);
    scene.set_collider(player, handle).unwrap();

    let jump = InputSnapshot::new().with_buttons(InputButtons::JUMP);
    // Airborne: jump is ignored
    scene.update(&jump, DT);
    assert!(scene.rigidbody_mut(player).unwrap().velocity.y < 0.0);

    for _ in 0..120 {
        scene.update(&InputSnapshot::new(), DT);
    }
    assert!(scene.rigidbody_mut(player).unwrap().grounded);

    scene.update(&jump, DT);
    assert!(scene.rigidbody_mut(player).unwrap().velocity.y > 0.0);
    assert!(scene.get(player).unwrap().transform.position.y > 1.5);
}

#[test]
fn test_behaviors_run_each_tick() {
    let mut scene = scene();
    let id = scene
        .add_game_object(
            GameObject::new("Fan", Transform::identity()).with_behavior(Spin::new(Vec3::new(0.0, 60.0, 0.0))),
            GameObjectKind::Default,
        )
        .unwrap();

    for _ in 0..30 {
        scene.update(&InputSnapshot::new(), DT);
    }
    assert_relative_eq!(scene.get(id).unwrap().transform.euler_rotation.y, 30.0, epsilon = 1e-3);
}

#[test]
fn test_collider_ownership_errors() {
    let mut scene = scene();
    let a = add(&mut scene, "A", Vec3::zeros());
    let b = add(&mut scene, "B", Vec3::zeros());
    let handle = scene.create_collider(ShapeKind::Capsule, None, false);

    scene.set_collider(a, handle).unwrap();
    // Re-attaching to the same owner is fine
    scene.set_collider(a, handle).unwrap();
    assert!(matches!(scene.set_collider(b, handle), Err(SceneError::ColliderInUse { .. })));

    // Replacing a collider frees the old one
    let other = scene.create_collider(ShapeKind::Sphere, None, false);
    scene.set_collider(a, other).unwrap();
    assert!(scene.collider(handle).unwrap().owner().is_none());
    scene.set_collider(b, handle).unwrap();

    scene.remove_game_object(b).unwrap();
    assert!(matches!(scene.set_collider(a, handle), Err(SceneError::UnknownCollider(_))));
    assert!(matches!(scene.set_collider(b, other), Err(SceneError::UnknownGameObject(_))));
}

#[test]
fn test_duplicate_names_rejected() {
    let mut scene = scene();
    add(&mut scene, "Box1", Vec3::zeros());
    let err = scene
        .add_game_object(GameObject::new("Box1", Transform::identity()), GameObjectKind::Default)
        .unwrap_err();
    assert_eq!(err, SceneError::DuplicateName("Box1".to_string()));
    assert!(matches!(scene.find("Box2"), Err(SceneError::UnknownGameObject(_))));
}

#[test]
fn test_draw_skips_unloaded_models() {
    let mut scene = scene();
    scene.add_directional_light(LightFactory::directional(Vec3::z(), LightColors::default()));

    let ready = scene
        .add_game_object(
            GameObject::new("Ready", Transform::from_position(Vec3::new(1.0, 0.0, 0.0))).with_model(loaded_model()),
            GameObjectKind::Default,
        )
        .unwrap();
    let shader = Arc::new(Resource::loaded("shader", ShaderData::default()));
    let pending = Model::new(Arc::new(Resource::new("pending")), shader);
    scene
        .add_game_object(GameObject::new("Pending", Transform::identity()).with_model(pending), GameObjectKind::Default)
        .unwrap();
    let handle = scene.create_collider(ShapeKind::Box, Some(loaded_model()), true);
    scene.set_collider(ready, handle).unwrap();

    let mut list = DrawList::new();
    scene.draw(&mut list);
    assert_eq!(list.light_count, 1);
    let names: Vec<_> = list.objects().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["Ready"]);
    assert_eq!(list.colliders().count(), 0);

    scene.set_debug_draw(true);
    scene.draw(&mut list);
    let proxy = list.colliders().next().unwrap();
    assert_eq!(proxy.name, "Ready");
    assert_eq!(proxy.layer, DrawLayer::Collider { colliding: false });
    assert_relative_eq!(proxy.world_matrix, Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0)));
}
