//! Scene container
//!
//! Game objects and colliders live in slot maps and are walked in insertion
//! order, so a tick always visits them in the order they were authored.
//! Parent links are plain ids; a child's transform is local to its parent
//! and world matrices are composed up the chain.

use std::collections::HashMap;

use slotmap::SecondaryMap;

use crate::assets::Model;
use crate::config::EngineConfig;
use crate::events::{EventHandler, EventSystem, OverlapEvent, OverlapPhase};
use crate::foundation::collections::{ColliderHandle, GameObjectId, SlotMap};
use crate::foundation::math::{utils, Mat4, Vec3};
use crate::input::InputSnapshot;
use crate::physics::{
    Collider, ColliderEntry, ColliderShape, ContactPair, PairTransition, PhysicsCollisionSystem, Rigidbody,
    WorldShape,
};
use super::{
    DirectionalLight, DrawItem, DrawLayer, GameObject, GameObjectKind, Lights, PointLight, RenderSink, SceneError,
    SceneType, SpotLight,
};

/// Radius and height of the procedural capsule used as collider proxy mesh
const PROXY_CAPSULE_RADIUS: f32 = 0.5;
const PROXY_CAPSULE_HEIGHT: f32 = 2.0;

/// A scene: game objects, colliders, lights and overlap events
pub struct Scene {
    name: String,
    scene_type: SceneType,
    config: EngineConfig,
    objects: SlotMap<GameObjectId, GameObject>,
    object_order: Vec<GameObjectId>,
    names: HashMap<String, GameObjectId>,
    colliders: SlotMap<ColliderHandle, Collider>,
    collider_order: Vec<ColliderHandle>,
    /// Debug proxy world matrix per collider
    proxies: SecondaryMap<ColliderHandle, Mat4>,
    lights: Lights,
    collision_system: PhysicsCollisionSystem,
    events: EventSystem,
    debug_draw: bool,
}

impl Scene {
    /// Create an empty scene
    pub fn new(name: impl Into<String>, scene_type: SceneType, config: &EngineConfig) -> Self {
        let mut collision_system = PhysicsCollisionSystem::new();
        collision_system.debug_enabled = config.debug.log_overlap_events;

        Self {
            name: name.into(),
            scene_type,
            config: config.clone(),
            objects: SlotMap::with_key(),
            object_order: Vec::new(),
            names: HashMap::new(),
            colliders: SlotMap::with_key(),
            collider_order: Vec::new(),
            proxies: SecondaryMap::new(),
            lights: Lights::default(),
            collision_system,
            events: EventSystem::new(),
            debug_draw: config.debug.draw_colliders,
        }
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scene type
    pub fn scene_type(&self) -> SceneType {
        self.scene_type
    }

    /// Settings the scene was created with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ---- Game objects ----

    /// Add a game object; names must be unique
    pub fn add_game_object(
        &mut self,
        mut object: GameObject,
        kind: GameObjectKind,
    ) -> Result<GameObjectId, SceneError> {
        if self.names.contains_key(object.name()) {
            log::warn!("Game object name already in use: {}", object.name());
            return Err(SceneError::DuplicateName(object.name().to_string()));
        }

        object.set_kind(kind);
        object.world_matrix = object.transform.local_matrix();
        let name = object.name().to_string();
        let id = self.objects.insert(object);
        self.object_order.push(id);
        log::debug!("Scene {}: added {name} ({kind:?})", self.name);
        self.names.insert(name, id);
        Ok(id)
    }

    /// Id of the object called `name`
    pub fn find(&self, name: &str) -> Result<GameObjectId, SceneError> {
        self.names.get(name).copied().ok_or_else(|| {
            log::warn!("Scene {}: unknown game object {name}", self.name);
            SceneError::UnknownGameObject(name.to_string())
        })
    }

    /// Object by id
    pub fn get(&self, id: GameObjectId) -> Option<&GameObject> {
        self.objects.get(id)
    }

    /// Mutable object by id
    pub fn get_mut(&mut self, id: GameObjectId) -> Option<&mut GameObject> {
        self.objects.get_mut(id)
    }

    /// Object by name
    pub fn get_by_name(&self, name: &str) -> Option<&GameObject> {
        self.names.get(name).and_then(|id| self.objects.get(*id))
    }

    /// Mutable object by name
    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut GameObject> {
        let id = *self.names.get(name)?;
        self.objects.get_mut(id)
    }

    /// Rigid body of an object, if it has one
    pub fn rigidbody_mut(&mut self, id: GameObjectId) -> Option<&mut Rigidbody> {
        self.objects.get_mut(id)?.rigidbody.as_mut()
    }

    /// Objects in insertion order
    pub fn game_objects(&self) -> impl Iterator<Item = (GameObjectId, &GameObject)> + '_ {
        self.object_order
            .iter()
            .filter_map(move |id| self.objects.get(*id).map(|object| (*id, object)))
    }

    /// Number of game objects
    pub fn game_object_count(&self) -> usize {
        self.objects.len()
    }

    /// Remove an object with its collider
    ///
    /// Children are detached and become roots. Overlaps the object took part
    /// in end with an Exit event.
    pub fn remove_game_object(&mut self, id: GameObjectId) -> Result<GameObject, SceneError> {
        let Some(mut object) = self.objects.remove(id) else {
            log::warn!("Scene {}: cannot remove unknown object {id:?}", self.name);
            return Err(SceneError::UnknownGameObject(format!("{id:?}")));
        };

        self.object_order.retain(|other| *other != id);
        self.names.remove(object.name());

        if let Some(parent) = object.parent.take() {
            if let Some(parent) = self.objects.get_mut(parent) {
                parent.children.retain(|child| *child != id);
            }
        }
        for child in object.children.drain(..) {
            if let Some(child) = self.objects.get_mut(child) {
                child.parent = None;
            }
        }
        if let Some(handle) = object.collider.take() {
            self.colliders.remove(handle);
            self.proxies.remove(handle);
            self.collider_order.retain(|other| *other != handle);
        }

        for transition in self.collision_system.forget_object(id) {
            let event = self.overlap_event(&transition, Some((id, object.name())));
            self.events.send(event);
        }

        self.refresh_world_matrices();
        log::debug!("Scene {}: removed {}", self.name, object.name());
        Ok(object)
    }

    // ---- Colliders ----

    /// Create an unattached collider and its debug proxy
    pub fn create_collider(
        &mut self,
        shape: impl Into<ColliderShape>,
        debug_model: Option<Model>,
        is_static: bool,
    ) -> ColliderHandle {
        self.add_collider(Collider::new(shape, debug_model, is_static))
    }

    /// Take ownership of a prepared collider
    pub fn add_collider(&mut self, mut collider: Collider) -> ColliderHandle {
        collider.set_owner(None);
        let handle = self.colliders.insert(collider);
        self.collider_order.push(handle);
        self.proxies.insert(handle, Mat4::identity());
        handle
    }

    /// Attach a collider to an object, replacing its previous one
    pub fn set_collider(&mut self, object: GameObjectId, handle: ColliderHandle) -> Result<(), SceneError> {
        if !self.objects.contains_key(object) {
            log::warn!("Scene {}: cannot attach collider to unknown object {object:?}", self.name);
            return Err(SceneError::UnknownGameObject(format!("{object:?}")));
        }
        let Some(collider) = self.colliders.get(handle) else {
            log::warn!("Scene {}: unknown collider {handle:?}", self.name);
            return Err(SceneError::UnknownCollider(handle));
        };
        if let Some(owner) = collider.owner().filter(|owner| *owner != object) {
            let owner = self.objects.get(owner).map(|o| o.name().to_string()).unwrap_or_default();
            log::warn!("Scene {}: collider {handle:?} already attached to {owner}", self.name);
            return Err(SceneError::ColliderInUse { handle, owner });
        }

        let previous = self.objects.get_mut(object).and_then(|o| o.collider.replace(handle));
        if let Some(previous) = previous.filter(|previous| *previous != handle) {
            if let Some(previous) = self.colliders.get_mut(previous) {
                previous.set_owner(None);
            }
        }
        if let Some(collider) = self.colliders.get_mut(handle) {
            collider.set_owner(Some(object));
        }
        self.refresh_proxy(handle);
        Ok(())
    }

    /// Collider by handle
    pub fn collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle)
    }

    /// Mutable collider by handle
    pub fn collider_mut(&mut self, handle: ColliderHandle) -> Option<&mut Collider> {
        self.colliders.get_mut(handle)
    }

    /// Colliders in creation order
    pub fn colliders(&self) -> impl Iterator<Item = (ColliderHandle, &Collider)> + '_ {
        self.collider_order
            .iter()
            .filter_map(move |handle| self.colliders.get(*handle).map(|collider| (*handle, collider)))
    }

    /// World matrix of a collider's debug proxy
    pub fn collider_proxy(&self, handle: ColliderHandle) -> Option<&Mat4> {
        self.proxies.get(handle)
    }

    /// Collision pass state (overlap queries)
    pub fn collision_system(&self) -> &PhysicsCollisionSystem {
        &self.collision_system
    }

    // ---- Hierarchy ----

    /// Make `child` follow `parent`
    ///
    /// The child's transform is kept and read relative to the parent from
    /// now on. Any previous parent link is replaced.
    pub fn set_parent(&mut self, parent: &str, child: &str) -> Result<(), SceneError> {
        let result = self.link(parent, child);
        match &result {
            Ok(()) => self.refresh_world_matrices(),
            Err(err) => log::warn!("Scene {}: {err}", self.name),
        }
        result
    }

    fn link(&mut self, parent: &str, child: &str) -> Result<(), SceneError> {
        let invalid = |reason: &str| SceneError::InvalidHierarchy {
            parent: parent.to_string(),
            child: child.to_string(),
            reason: reason.to_string(),
        };

        let parent_id = self.names.get(parent).copied().ok_or_else(|| invalid("unknown parent"))?;
        let child_id = self.names.get(child).copied().ok_or_else(|| invalid("unknown child"))?;
        if parent_id == child_id {
            return Err(invalid("an object cannot parent itself"));
        }
        if self.is_ancestor(child_id, parent_id) {
            return Err(invalid("child is an ancestor of parent"));
        }

        self.detach(child_id);
        if let Some(object) = self.objects.get_mut(child_id) {
            object.parent = Some(parent_id);
        }
        if let Some(object) = self.objects.get_mut(parent_id) {
            object.children.push(child_id);
        }
        Ok(())
    }

    /// Detach `child` from its parent; it becomes a root
    pub fn clear_parent(&mut self, child: &str) -> Result<(), SceneError> {
        let child_id = self.find(child)?;
        self.detach(child_id);
        self.refresh_world_matrices();
        Ok(())
    }

    fn detach(&mut self, child: GameObjectId) {
        let previous = self.objects.get_mut(child).and_then(|object| object.parent.take());
        if let Some(parent) = previous.and_then(|parent| self.objects.get_mut(parent)) {
            parent.children.retain(|id| *id != child);
        }
    }

    /// Whether `ancestor` is somewhere above `object`
    fn is_ancestor(&self, ancestor: GameObjectId, object: GameObjectId) -> bool {
        self.ancestors(object).contains(&ancestor)
    }

    /// Parent chain of `object`, nearest first
    fn ancestors(&self, object: GameObjectId) -> Vec<GameObjectId> {
        let mut chain = Vec::new();
        let mut current = self.objects.get(object).and_then(|o| o.parent);
        while let Some(id) = current {
            chain.push(id);
            current = self.objects.get(id).and_then(|o| o.parent);
        }
        chain
    }

    /// World matrix composed up the parent chain
    pub fn world_matrix(&self, id: GameObjectId) -> Option<Mat4> {
        let mut object = self.objects.get(id)?;
        let mut matrix = object.transform.local_matrix();
        while let Some(parent) = object.parent.and_then(|parent| self.objects.get(parent)) {
            matrix = parent.transform.local_matrix() * matrix;
            object = parent;
        }
        Some(matrix)
    }

    /// World position composed up the parent chain
    pub fn world_position(&self, id: GameObjectId) -> Option<Vec3> {
        self.world_matrix(id).map(|matrix| utils::extract_translation(&matrix))
    }

    // ---- Lights ----

    /// Add a directional light
    pub fn add_directional_light(&mut self, light: DirectionalLight) {
        self.lights.directional.push(light);
    }

    /// Add a point light
    pub fn add_point_light(&mut self, light: PointLight) {
        self.lights.point.push(light);
    }

    /// Add a spot light
    pub fn add_spot_light(&mut self, light: SpotLight) {
        self.lights.spot.push(light);
    }

    /// Every light of the scene
    pub fn lights(&self) -> &Lights {
        &self.lights
    }

    // ---- Events ----

    /// Observe overlap events of one phase
    pub fn register_handler(&mut self, phase: OverlapPhase, handler: impl EventHandler + 'static) {
        self.events.register_handler(phase, Box::new(handler));
    }

    /// Take the overlap events delivered by the last `update`
    ///
    /// Each `update` replaces events left undrained by the previous one.
    pub fn drain_events(&mut self) -> Vec<OverlapEvent> {
        self.events.drain()
    }

    /// Overlap events delivered by the last `update` and not drained yet
    pub fn undrained_event_count(&self) -> usize {
        self.events.undrained()
    }

    // ---- Debug drawing ----

    /// Draw collider proxies
    pub fn set_debug_draw(&mut self, enabled: bool) {
        self.debug_draw = enabled;
    }

    /// Whether collider proxies are drawn
    pub fn debug_draw(&self) -> bool {
        self.debug_draw
    }

    // ---- Tick ----

    /// Advance the scene by `dt` seconds
    pub fn update(&mut self, input: &InputSnapshot, dt: f32) {
        let dt = dt.clamp(0.0, self.config.physics.max_delta_time.max(0.0));

        self.apply_player_input(input, dt);
        self.integrate_bodies(dt);
        self.refresh_world_matrices();
        self.resolve_collisions();
        self.run_behaviors(dt);
        self.refresh_world_matrices();
        log::trace!("Scene {}: dispatching {} overlap events", self.name, self.events.pending());
        self.events.dispatch();
    }

    /// Yaw from the look delta, planar velocity from the move axes, jump
    fn apply_player_input(&mut self, input: &InputSnapshot, dt: f32) {
        let player = &self.config.player;
        for id in &self.object_order {
            let Some(object) = self.objects.get_mut(*id) else { continue };
            if !object.player_controller {
                continue;
            }

            object.transform.euler_rotation.y -= input.look_delta.x * player.look_sensitivity;
            let yaw = utils::deg_to_rad(object.transform.euler_rotation.y);
            let forward = Vec3::new(-yaw.sin(), 0.0, -yaw.cos());
            let right = Vec3::new(yaw.cos(), 0.0, -yaw.sin());

            let mut wish = right * input.move_axes.x + forward * input.move_axes.y;
            if wish.norm_squared() > 1.0 {
                wish.normalize_mut();
            }
            let planar = wish * player.move_speed;

            match object.rigidbody.as_mut() {
                Some(body) => {
                    body.velocity.x = planar.x;
                    body.velocity.z = planar.z;
                    if input.jump() && body.grounded {
                        body.velocity.y = player.jump_speed;
                        body.grounded = false;
                    }
                }
                None => object.transform.position += planar * dt,
            }
        }
    }

    /// Gravity and velocity for root bodies without a static collider
    fn integrate_bodies(&mut self, dt: f32) {
        let gravity = self.config.physics.gravity;
        for id in &self.object_order {
            let Some(object) = self.objects.get_mut(*id) else { continue };
            if object.parent.is_some() {
                continue;
            }
            let is_static = object
                .collider
                .and_then(|handle| self.colliders.get(handle))
                .is_some_and(|collider| collider.is_static);
            if is_static {
                continue;
            }
            if let Some(body) = object.rigidbody.as_mut() {
                body.grounded = false;
                body.integrate(&mut object.transform.position, &gravity, dt);
            }
        }
    }

    /// Recompute cached world matrices and collider proxies
    fn refresh_world_matrices(&mut self) {
        for index in 0..self.object_order.len() {
            let id = self.object_order[index];
            if let Some(matrix) = self.world_matrix(id) {
                if let Some(object) = self.objects.get_mut(id) {
                    object.world_matrix = matrix;
                }
            }
        }
        for index in 0..self.collider_order.len() {
            self.refresh_proxy(self.collider_order[index]);
        }
    }

    fn refresh_proxy(&mut self, handle: ColliderHandle) {
        let Some(collider) = self.colliders.get(handle) else { return };
        let owner_world = collider
            .owner()
            .and_then(|owner| self.objects.get(owner))
            .map(|object| object.world_matrix);
        let matrix = match owner_world {
            Some(world) => proxy_matrix(collider, &world),
            None => Mat4::identity(),
        };
        self.proxies.insert(handle, matrix);
    }

    fn resolve_collisions(&mut self) {
        let entries: Vec<ColliderEntry> = self
            .collider_order
            .iter()
            .filter_map(|&handle| {
                let collider = self.colliders.get(handle)?;
                let owner = collider.owner()?;
                let object = self.objects.get(owner)?;
                Some(ColliderEntry {
                    handle,
                    owner,
                    ancestors: self.ancestors(owner),
                    shape: collider.world_shape(&object.world_matrix),
                    is_static: collider.is_static,
                    is_trigger: collider.is_trigger,
                    layer: collider.layer,
                    mask: collider.mask,
                })
            })
            .collect();

        for collider in self.colliders.values_mut() {
            collider.set_colliding(false);
        }

        let report = self.collision_system.detect_collisions(&entries);
        let mut pushed = SecondaryMap::new();
        for contact in &report.contacts {
            for handle in [contact.a, contact.b] {
                if let Some(collider) = self.colliders.get_mut(handle) {
                    collider.set_colliding(true);
                }
            }
            if !contact.is_trigger {
                self.respond(contact, &mut pushed);
            }
        }

        for transition in self.collision_system.transitions() {
            let event = self.overlap_event(&transition, None);
            if self.config.debug.log_overlap_events {
                log::debug!("{:?}: {} / {}", event.phase, event.a_name, event.b_name);
            }
            self.events.send(event);
        }
    }

    /// A participant moves when it is a root with a body and a dynamic collider
    fn is_movable(&self, owner: GameObjectId, handle: ColliderHandle) -> bool {
        let dynamic = self.colliders.get(handle).is_some_and(|collider| !collider.is_static);
        let free_body = self
            .objects
            .get(owner)
            .is_some_and(|object| object.rigidbody.is_some() && object.parent.is_none());
        dynamic && free_body
    }

    fn respond(&mut self, pair: &ContactPair, pushed: &mut SecondaryMap<GameObjectId, Vec3>) {
        let (share_a, share_b) = match (self.is_movable(pair.owner_a, pair.a), self.is_movable(pair.owner_b, pair.b)) {
            (true, true) => (0.5, 0.5),
            (true, false) => (1.0, 0.0),
            (false, true) => (0.0, 1.0),
            (false, false) => return,
        };

        let normal = pair.contact.normal;
        let depth = pair.contact.depth;
        if share_a > 0.0 {
            self.push_out(pair.owner_a, normal, depth * share_a, pushed);
        }
        if share_b > 0.0 {
            self.push_out(pair.owner_b, -normal, depth * share_b, pushed);
        }
    }

    /// Move a body along `normal` and drop its velocity into the surface
    ///
    /// Depths are measured before any push, so only the part of `distance`
    /// not already covered by this tick's earlier pushes along `normal` is
    /// applied.
    fn push_out(
        &mut self,
        id: GameObjectId,
        normal: Vec3,
        distance: f32,
        pushed: &mut SecondaryMap<GameObjectId, Vec3>,
    ) {
        let threshold = self.config.physics.ground_normal_threshold;
        let covered = pushed.get(id).map_or(0.0, |offset| offset.dot(&normal).max(0.0));
        let step = normal * (distance - covered).max(0.0);
        if let Some(offset) = pushed.entry(id) {
            *offset.or_insert_with(Vec3::zeros) += step;
        }
        if let Some(object) = self.objects.get_mut(id) {
            object.transform.position += step;
            if let Some(body) = object.rigidbody.as_mut() {
                body.resolve_contact(&normal, threshold);
            }
        }
    }

    fn run_behaviors(&mut self, dt: f32) {
        for id in &self.object_order {
            let Some(object) = self.objects.get_mut(*id) else { continue };
            if let Some(behavior) = object.behavior.as_mut() {
                behavior.update(&mut object.transform, dt);
            }
        }
    }

    fn overlap_event(&self, transition: &PairTransition, removed: Option<(GameObjectId, &str)>) -> OverlapEvent {
        let name_of = |id: GameObjectId| match removed {
            Some((removed_id, name)) if removed_id == id => name.to_string(),
            _ => self.objects.get(id).map(|o| o.name().to_string()).unwrap_or_default(),
        };
        OverlapEvent {
            phase: transition.phase,
            a: transition.pair.object_a,
            b: transition.pair.object_b,
            a_name: name_of(transition.pair.object_a),
            b_name: name_of(transition.pair.object_b),
            trigger: transition.is_trigger,
        }
    }

    // ---- Drawing ----

    /// Push lights, ready models and (optionally) collider proxies
    pub fn draw(&self, sink: &mut dyn RenderSink) {
        sink.submit_lights(&self.lights);

        for (_, object) in self.game_objects() {
            let Some(model) = &object.model else { continue };
            if let Err(err) = model.ensure_ready() {
                log::trace!("Skipping {}: {err}", object.name());
                continue;
            }
            sink.submit(DrawItem {
                name: object.name(),
                world_matrix: object.world_matrix,
                model,
                layer: DrawLayer::Object,
            });
        }

        if !self.debug_draw {
            return;
        }
        for (handle, collider) in self.colliders() {
            let (Some(model), Some(owner)) = (&collider.debug_model, collider.owner()) else { continue };
            let (Some(object), Some(matrix)) = (self.objects.get(owner), self.proxies.get(handle)) else { continue };
            if let Err(err) = model.ensure_ready() {
                log::trace!("Skipping collider of {}: {err}", object.name());
                continue;
            }
            sink.submit(DrawItem {
                name: object.name(),
                world_matrix: *matrix,
                model,
                layer: DrawLayer::Collider { colliding: collider.is_colliding() },
            });
        }
    }
}

/// Proxy placement for the unit debug meshes
///
/// Sphere proxies are unit spheres, box proxies are cubes with half extent
/// 1 and capsule proxies are capsules of radius 0.5 and height 2. Mesh
/// colliders reuse the owner's matrix.
fn proxy_matrix(collider: &Collider, owner_world: &Mat4) -> Mat4 {
    if let ColliderShape::Mesh(_) = collider.shape {
        return *owner_world;
    }
    match collider.world_shape(owner_world) {
        WorldShape::Sphere(sphere) => Mat4::new_translation(&sphere.center) * Mat4::new_scaling(sphere.radius),
        WorldShape::Box(aabb) => {
            Mat4::new_translation(&aabb.center()) * Mat4::new_nonuniform_scaling(&aabb.extents())
        }
        WorldShape::Capsule(capsule) => {
            let center = (capsule.segment.start + capsule.segment.end) * 0.5;
            let height = (capsule.segment.end.y - capsule.segment.start.y) + 2.0 * capsule.radius;
            let radial = capsule.radius / PROXY_CAPSULE_RADIUS;
            Mat4::new_translation(&center)
                * Mat4::new_nonuniform_scaling(&Vec3::new(radial, height / PROXY_CAPSULE_HEIGHT, radial))
        }
        WorldShape::Mesh(_) => *owner_world,
    }
}
