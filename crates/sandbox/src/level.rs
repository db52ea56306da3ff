//! Scene1: the sandbox level
//!
//! A floor slab, a few platforms, a static ball, some props and a player
//! with a camera, a pistol and a frying pan attached. Model meshes are
//! generated procedurally on the loader threads; collider proxy meshes are
//! built up front.

use scene_engine::assets::primitives;
use scene_engine::prelude::*;
use scene_engine::scene::{Bob, Spin};

const BASIC_VERTEX: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
layout (location = 1) in vec3 aNormal;
uniform mat4 model;
uniform mat4 viewProj;
out vec3 normal;
void main() {
    normal = mat3(model) * aNormal;
    gl_Position = viewProj * model * vec4(aPos, 1.0);
}
";

const BASIC_FRAGMENT: &str = "#version 330 core
in vec3 normal;
out vec4 color;
void main() {
    color = vec4(normalize(normal) * 0.5 + 0.5, 1.0);
}
";

const COLLIDER_VERTEX: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
uniform mat4 model;
uniform mat4 viewProj;
void main() {
    gl_Position = viewProj * model * vec4(aPos, 1.0);
}
";

const COLLIDER_FRAGMENT: &str = "#version 330 core
uniform bool colliding;
out vec4 color;
void main() {
    color = colliding ? vec4(1.0, 0.0, 0.0, 1.0) : vec4(0.0, 1.0, 0.0, 1.0);
}
";

/// Stand-in geometry for each model mesh
#[derive(Debug, Clone, Copy)]
enum MeshSource {
    Cube,
    Sphere(f32),
    Capsule(f32, f32),
}

impl MeshSource {
    fn build(self) -> MeshData {
        match self {
            Self::Cube => primitives::cube(Vec3::repeat(1.0)),
            Self::Sphere(radius) => primitives::uv_sphere(radius, 24, 16),
            Self::Capsule(radius, height) => primitives::capsule(radius, height, 16, 12),
        }
    }
}

const MESHES: [(&str, MeshSource); 9] = [
    ("Patrick", MeshSource::Capsule(0.35, 1.0)),
    ("Cube", MeshSource::Cube),
    ("Sphere", MeshSource::Sphere(1.0)),
    ("Slime", MeshSource::Sphere(0.8)),
    ("FryingPan", MeshSource::Sphere(0.5)),
    ("Pistol", MeshSource::Capsule(0.2, 1.0)),
    ("Companion", MeshSource::Cube),
    ("PotatOS", MeshSource::Sphere(0.6)),
    ("Chocobo", MeshSource::Capsule(0.5, 2.0)),
];

const TEXTURES: [(&str, [u8; 4]); 9] = [
    ("PatrickText", [255, 140, 170, 255]),
    ("Wall", [128, 128, 128, 255]),
    ("Sample", [255, 255, 255, 255]),
    ("SlimeText", [60, 200, 90, 255]),
    ("FryingPanText", [40, 40, 40, 255]),
    ("PistolText", [90, 90, 110, 255]),
    ("CompanionText", [230, 120, 200, 255]),
    ("PotatOSText", [200, 170, 90, 255]),
    ("ChocoboText", [250, 210, 60, 255]),
];

/// Builds Scene1 and everything it loads
#[derive(Debug, Default)]
pub struct Scene1Level;

impl Scene1Level {
    fn model(resources: &ResourceManager, mesh: &str, texture: &str) -> Result<Model, AppError> {
        let model = Model::new(resources.mesh(mesh)?, resources.shader("BasicShader")?);
        Ok(model.with_texture(resources.texture(texture)?))
    }

    fn collider_model(resources: &ResourceManager, mesh: &str) -> Result<Model, AppError> {
        Ok(Model::new(resources.mesh(mesh)?, resources.shader("ColliderShader")?))
    }

    fn add_box(
        scene: &mut Scene,
        resources: &ResourceManager,
        name: &str,
        position: Vec3,
        scale: Vec3,
    ) -> Result<(), AppError> {
        let object = GameObject::new(name, Transform::from_position(position).with_scale(scale))
            .with_model(Self::model(resources, "Cube", "Wall")?);
        let id = scene.add_game_object(object, GameObjectKind::Default)?;
        let debug_model = Self::collider_model(resources, "BoxCollider")?;
        let collider = scene.create_collider(ShapeKind::Box, Some(debug_model), true);
        scene.set_collider(id, collider)?;
        Ok(())
    }

    fn add_prop(
        scene: &mut Scene,
        object: GameObject,
        parent: Option<&str>,
    ) -> Result<GameObjectId, AppError> {
        let name = object.name().to_string();
        let id = scene.add_game_object(object, GameObjectKind::Default)?;
        if let Some(parent) = parent {
            scene.set_parent(parent, &name)?;
        }
        Ok(id)
    }

    fn add_lights(scene: &mut Scene) {
        let colors = LightColors::new(
            Vec4::new(0.3, 0.3, 0.3, 1.0),
            Vec4::new(1.0, 0.0, 0.0, 1.0),
            Vec4::new(0.9, 0.9, 0.9, 1.0),
        );
        scene.add_directional_light(LightFactory::directional(Vec3::new(0.0, 0.0, 1.0), colors));
        scene.add_point_light(LightFactory::point(Vec3::new(2.0, 1.0, 0.0), colors, 1.0, 0.09, 0.032));
        scene.add_spot_light(LightFactory::spot(
            Vec3::new(-2.0, 8.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            colors,
            12.5,
            17.5,
        ));
    }
}

impl LevelFactory for Scene1Level {
    fn create_resources(&mut self, resources: &mut ResourceManager, loader: &LoaderPool) -> Result<(), AppError> {
        for (name, vertex, fragment) in [
            ("BasicShader", BASIC_VERTEX, BASIC_FRAGMENT),
            ("ColliderShader", COLLIDER_VERTEX, COLLIDER_FRAGMENT),
        ] {
            let handle = resources.register_shader(name);
            loader.enqueue(&handle, move || Ok(ShaderData::new(vertex, fragment)));
        }

        for (name, source) in MESHES {
            let handle = resources.register_mesh(name);
            loader.enqueue(&handle, move || Ok(source.build()));
        }

        for (name, rgba) in TEXTURES {
            let handle = resources.register_texture(name);
            loader.enqueue(&handle, move || Ok(TextureData::checker(64, 8, rgba, [0, 0, 0, 255])));
        }

        // Proxy meshes match the default collider sizes
        resources.insert_loaded_mesh("BoxCollider", primitives::cube(Vec3::repeat(1.0)));
        resources.insert_loaded_mesh("SphereCollider", primitives::uv_sphere(1.0, 16, 12));
        resources.insert_loaded_mesh("CapsuleCollider", primitives::capsule(0.5, 2.0, 16, 12));

        log::debug!("Scene1 registered {} resources", resources.len());
        Ok(())
    }

    fn build_scene(
        &mut self,
        name: &str,
        resources: &ResourceManager,
        config: &EngineConfig,
    ) -> Result<Scene, AppError> {
        let mut scene = Scene::new(name, SceneType::Game, config);

        // Static ball
        let sphere = GameObject::new(
            "Sphere1",
            Transform::from_position(Vec3::new(-21.0, 4.0, -11.0)).with_scale(Vec3::repeat(4.0)),
        )
        .with_model(Self::model(resources, "Sphere", "Wall")?)
        .with_rigidbody(Rigidbody::new().with_gravity(false));
        let sphere = scene.add_game_object(sphere, GameObjectKind::Default)?;
        let collider = scene.create_collider(
            ColliderShape::sphere(Vec3::zeros(), 1.46),
            Some(Self::collider_model(resources, "SphereCollider")?),
            true,
        );
        scene.set_collider(sphere, collider)?;

        // Player and camera
        scene.add_game_object(
            GameObject::new("Camera", Transform::from_position(Vec3::new(0.0, 0.75, 0.0))),
            GameObjectKind::Camera,
        )?;
        let player = GameObject::new(
            "Player",
            Transform::from_position(Vec3::new(7.0, 1.0, 0.0)).with_scale(Vec3::repeat(2.0)),
        )
        .with_model(Self::model(resources, "Patrick", "PatrickText")?)
        .with_rigidbody(Rigidbody::new())
        .with_player_controller(true);
        let player = scene.add_game_object(player, GameObjectKind::Player)?;
        let collider = scene.create_collider(
            ColliderShape::sphere(Vec3::new(0.0, 0.5, 0.0), 0.5),
            Some(Self::collider_model(resources, "SphereCollider")?),
            false,
        );
        scene.set_collider(player, collider)?;
        scene.set_parent("Player", "Camera")?;

        // Floor and platforms
        let boxes = [
            ("Box1", Vec3::new(0.0, -5.0, 0.0), Vec3::new(15.0, 1.0, 10.0)),
            ("Box3", Vec3::new(0.0, -3.0, 0.0), Vec3::new(1.0, 1.0, 1.0)),
            ("Box5", Vec3::new(-6.0, 0.0, 1.0), Vec3::new(1.0, 1.0, 1.0)),
            ("Box6", Vec3::new(-9.0, 2.0, -5.0), Vec3::new(2.0, 0.5, 3.0)),
            ("Box7", Vec3::new(-15.0, 2.0, 6.0), Vec3::new(2.0, 0.5, 3.0)),
            ("Box8", Vec3::new(-25.0, 2.0, 0.0), Vec3::new(1.5, 0.5, 1.5)),
            ("Box9", Vec3::new(-20.0, -2.0, 0.0), Vec3::new(1.5, 0.5, 1.5)),
            ("Box10", Vec3::new(-20.0, -2.0, 4.0), Vec3::new(1.5, 0.5, 1.5)),
        ];
        for (box_name, position, scale) in boxes {
            Self::add_box(&mut scene, resources, box_name, position, scale)?;
        }

        // Props
        let prop = |name: &str, mesh: &str, texture: &str, position: Vec3, scale: f32, rotation: Vec3| {
            Ok::<_, AppError>(
                GameObject::new(
                    name,
                    Transform::new(position, Vec3::repeat(scale), rotation),
                )
                .with_model(Self::model(resources, mesh, texture)?),
            )
        };
        Self::add_prop(
            &mut scene,
            prop("Pistol", "Pistol", "PistolText", Vec3::new(0.25, 0.3, -0.1), 0.1, Vec3::new(0.0, 0.0, -35.0))?,
            Some("Player"),
        )?;
        Self::add_prop(
            &mut scene,
            prop("Slime", "Slime", "SlimeText", Vec3::new(-23.0, 4.0, 11.0), 1.0, Vec3::new(0.0, 25.0, -22.0))?
                .with_behavior(Bob::new(0.25, 0.5)),
            None,
        )?;
        Self::add_prop(
            &mut scene,
            prop("Companion", "Companion", "CompanionText", Vec3::new(-5.0, 3.0, 6.0), 0.1, Vec3::zeros())?,
            None,
        )?;
        Self::add_prop(
            &mut scene,
            prop("PotatOS", "PotatOS", "PotatOSText", Vec3::new(-1.0, -2.0, -5.0), 0.2, Vec3::new(0.0, 45.0, 0.0))?
                .with_behavior(Spin::new(Vec3::new(0.0, 30.0, 0.0))),
            None,
        )?;
        Self::add_prop(
            &mut scene,
            prop("Chocobo", "Chocobo", "ChocoboText", Vec3::new(6.0, -4.0, 4.0), 0.02, Vec3::new(0.0, 150.0, -180.0))?,
            None,
        )?;
        Self::add_prop(
            &mut scene,
            prop(
                "FryingPan",
                "FryingPan",
                "FryingPanText",
                Vec3::new(-0.35, 0.45, -0.1),
                0.025,
                Vec3::new(45.0, 90.0, 135.0),
            )?,
            Some("Player"),
        )?;

        Self::add_lights(&mut scene);
        log::info!("Built {name}: {} objects", scene.game_object_count());
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_level() -> (ResourceManager, Scene) {
        let config = EngineConfig::default().with_multithread(false);
        let loader = LoaderPool::from_config(&config.loader).unwrap();
        let mut resources = ResourceManager::new();
        let mut level = Scene1Level;
        level.create_resources(&mut resources, &loader).unwrap();
        let scene = level.build_scene("Scene1", &resources, &config).unwrap();
        (resources, scene)
    }

    #[test]
    fn test_level_loads_everything_inline() {
        let (resources, scene) = loaded_level();
        assert!(resources.all_loaded());
        assert_eq!(resources.len(), 2 + MESHES.len() + TEXTURES.len() + 3);
        assert_eq!(scene.lights().len(), 3);
        assert!(scene.find("Box10").is_ok());
    }

    #[test]
    fn test_attachments_follow_player() {
        let (_, scene) = loaded_level();
        let player = scene.find("Player").unwrap();
        for child in ["Camera", "Pistol", "FryingPan"] {
            assert_eq!(scene.get_by_name(child).unwrap().parent(), Some(player));
        }
    }

    #[test]
    fn test_player_lands_on_floor() {
        let (_, mut scene) = loaded_level();
        for _ in 0..180 {
            scene.update(&InputSnapshot::new(), 1.0 / 60.0);
        }
        // Floor top is at y = -4; the scaled sphere collider sits on it
        let player = scene.get_by_name("Player").unwrap();
        assert!((player.transform.position.y + 4.0).abs() < 1e-2);
        assert!(player.rigidbody.as_ref().unwrap().grounded);
    }
}
