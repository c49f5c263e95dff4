use std::collections::HashMap;
use std::sync::Mutex;
use glam::Vec2;
use rapier2d::prelude::*;

use crate::api::types::ObjectId;
use crate::components::object::SceneObject;
use crate::components::physics_body::{BodyType, PhysicsBody, ShapeType};

/// Pixels per physics meter.
pub const PHYSICS_SCALE: f32 = 32.0;

/// Convert a pixel-space vector to meters.
pub fn px_to_m(v: Vec2) -> Vec2 {
    v / PHYSICS_SCALE
}

/// Convert a meter-space vector to pixels.
pub fn m_to_px(v: Vec2) -> Vec2 {
    v * PHYSICS_SCALE
}

// ---------------------------------------------------------------------------
// Conversion helpers between glam and nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn na_iso_to_pos_rot(iso: &nalgebra::Isometry2<f32>) -> (Vec2, f32) {
    let pos = Vec2::new(iso.translation.x, iso.translation.y);
    let rot = iso.rotation.angle();
    (pos, rot)
}

fn body_type_to_rapier(body_type: BodyType) -> RigidBodyType {
    match body_type {
        BodyType::Static => RigidBodyType::Fixed,
        BodyType::Dynamic => RigidBodyType::Dynamic,
        BodyType::Kinematic => RigidBodyType::KinematicVelocityBased,
    }
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Collider geometry, in whatever unit space the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    Ball { radius: f32 },
    Cuboid { half_width: f32, half_height: f32 },
}

impl ColliderShape {
    fn scaled(self, factor: f32) -> Self {
        match self {
            ColliderShape::Ball { radius } => ColliderShape::Ball { radius: radius * factor },
            ColliderShape::Cuboid { half_width, half_height } => ColliderShape::Cuboid {
                half_width: half_width * factor,
                half_height: half_height * factor,
            },
        }
    }
}

/// Handle pair referencing Rapier internals for one scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsHandle {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// A collision event between two scene objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub object_a: ObjectId,
    pub object_b: ObjectId,
    /// `true` when the contact just started, `false` when it ended.
    pub started: bool,
}

/// Pixel-space collider placement, used for debug drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderPose {
    pub object: ObjectId,
    pub position: Vec2,
    pub rotation: f32,
    pub shape: ColliderShape,
}

// ---------------------------------------------------------------------------
// Event collector
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        let mut guard = self.collisions.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *guard)
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        self.collisions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps all Rapier2D boilerplate into a single struct. Works in meters.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
}

impl PhysicsWorld {
    /// Create a new physics world with gravity in m/s².
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: vec2_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
        }
    }

    pub fn gravity(&self) -> Vec2 {
        na_to_vec2(&self.gravity)
    }

    /// Create a rigid body + collider from a descriptor whose position,
    /// rotation and dimensions are already in meters.
    /// The object id is stored in the body's `user_data` for collision lookups.
    pub fn create_body(
        &mut self,
        object: ObjectId,
        desc: &PhysicsBody,
        position: Vec2,
        rotation: f32,
        shape: ColliderShape,
    ) -> PhysicsHandle {
        let rb = RigidBodyBuilder::new(body_type_to_rapier(desc.body_type))
            .translation(vec2_to_na(position))
            .rotation(rotation)
            .locked_axes(if desc.fixed_rotation {
                LockedAxes::ROTATION_LOCKED
            } else {
                LockedAxes::empty()
            })
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .user_data(object.0 as u128)
            .build();

        let body_handle = self.bodies.insert(rb);

        let builder = match shape {
            ColliderShape::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderShape::Cuboid { half_width, half_height } => {
                ColliderBuilder::cuboid(half_width, half_height)
            }
        };
        let collider = builder
            .restitution(desc.material.bounciness)
            .friction(desc.material.friction)
            .density(desc.material.density)
            .sensor(desc.is_sensor)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();

        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);

        PhysicsHandle {
            body_handle,
            collider_handle,
        }
    }

    /// Remove a body and all its colliders from the simulation.
    pub fn remove_body(&mut self, handle: &PhysicsHandle) {
        self.bodies.remove(
            handle.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Advance the simulation by `dt` seconds and collect collision events.
    pub fn step_into(&mut self, dt: f32, collision_events: &mut Vec<CollisionPair>) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        for event in self.event_collector.drain_collisions() {
            let (h1, h2, started) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };

            // Collider handles → body handles → object ids
            let object_a = self.collider_to_object(h1);
            let object_b = self.collider_to_object(h2);

            if let (Some(a), Some(b)) = (object_a, object_b) {
                collision_events.push(CollisionPair {
                    object_a: a,
                    object_b: b,
                    started,
                });
            }
        }
    }

    /// Current position (m) and rotation (rad) of a body.
    pub fn body_position(&self, handle: &PhysicsHandle) -> Option<(Vec2, f32)> {
        self.bodies
            .get(handle.body_handle)
            .map(|rb| na_iso_to_pos_rot(rb.position()))
    }

    /// Teleport a body. Position-based kinematic bodies are moved through
    /// their next kinematic position so contacts see the motion; velocity-based
    /// ones would have that overwritten by integration and are teleported.
    pub fn set_body_position(&mut self, handle: &PhysicsHandle, position: Vec2, rotation: f32) {
        if let Some(rb) = self.bodies.get_mut(handle.body_handle) {
            let iso = nalgebra::Isometry2::new(vec2_to_na(position), rotation);
            if rb.body_type() == RigidBodyType::KinematicPositionBased {
                rb.set_next_kinematic_position(iso);
            } else {
                rb.set_position(iso, true);
            }
        }
    }

    /// Linear velocity in m/s.
    pub fn velocity(&self, handle: &PhysicsHandle) -> Vec2 {
        self.bodies
            .get(handle.body_handle)
            .map(|rb| na_to_vec2(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn set_velocity(&mut self, handle: &PhysicsHandle, vel: Vec2) {
        if let Some(rb) = self.bodies.get_mut(handle.body_handle) {
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }

    pub fn apply_impulse(&mut self, handle: &PhysicsHandle, impulse: Vec2) {
        if let Some(rb) = self.bodies.get_mut(handle.body_handle) {
            rb.apply_impulse(vec2_to_na(impulse), true);
        }
    }

    /// Body type as Rapier sees it, mapped back to the descriptor enum.
    pub fn body_type(&self, handle: &PhysicsHandle) -> Option<BodyType> {
        let rb = self.bodies.get(handle.body_handle)?;
        Some(match rb.body_type() {
            RigidBodyType::Dynamic => BodyType::Dynamic,
            RigidBodyType::Fixed => BodyType::Static,
            RigidBodyType::KinematicPositionBased | RigidBodyType::KinematicVelocityBased => {
                BodyType::Kinematic
            }
        })
    }

    /// Query the collider shape of a body, in meters.
    pub fn collider_shape(&self, handle: &PhysicsHandle) -> Option<ColliderShape> {
        let collider = self.colliders.get(handle.collider_handle)?;
        let shape = collider.shape();
        if let Some(ball) = shape.as_ball() {
            Some(ColliderShape::Ball { radius: ball.radius })
        } else {
            shape.as_cuboid().map(|cuboid| ColliderShape::Cuboid {
                half_width: cuboid.half_extents.x,
                half_height: cuboid.half_extents.y,
            })
        }
    }

    /// Collider material as stored in Rapier: (friction, restitution, density, sensor).
    pub fn collider_material(&self, handle: &PhysicsHandle) -> Option<(f32, f32, f32, bool)> {
        let c = self.colliders.get(handle.collider_handle)?;
        Some((c.friction(), c.restitution(), c.density(), c.is_sensor()))
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn collider_to_object(&self, collider_handle: ColliderHandle) -> Option<ObjectId> {
        let collider = self.colliders.get(collider_handle)?;
        let body_handle = collider.parent()?;
        let body = self.bodies.get(body_handle)?;
        Some(ObjectId(body.user_data as u32))
    }
}

// ---------------------------------------------------------------------------
// PhysicsSystem
// ---------------------------------------------------------------------------

/// Bridges pixel-space scene objects and the meter-space physics world.
///
/// Holds exactly one body per object whose physics descriptor was enabled when
/// the object was added.
pub struct PhysicsSystem {
    world: PhysicsWorld,
    body_map: HashMap<ObjectId, PhysicsHandle>,
    collisions: Vec<CollisionPair>,
}

impl PhysicsSystem {
    /// Create a system with gravity in m/s².
    pub fn new(gravity: Vec2) -> Self {
        Self {
            world: PhysicsWorld::new(gravity),
            body_map: HashMap::new(),
            collisions: Vec::new(),
        }
    }

    /// Create a body for every enabled object that does not have one yet.
    pub fn add_objects(&mut self, objects: &[SceneObject]) {
        for obj in objects {
            self.add_object(obj);
        }
    }

    /// Create a body for one object. Returns `None` when physics is disabled
    /// for the object or it already has a body.
    pub fn add_object(&mut self, obj: &SceneObject) -> Option<PhysicsHandle> {
        if !obj.physics.enabled || self.body_map.contains_key(&obj.id) {
            return None;
        }

        let desc = &obj.physics;
        let shape_px = match desc.shape_type {
            ShapeType::Box => ColliderShape::Cuboid {
                half_width: desc.size.x * 0.5,
                half_height: desc.size.y * 0.5,
            },
            ShapeType::Circle => ColliderShape::Ball { radius: desc.radius },
        };
        let handle = self.world.create_body(
            obj.id,
            desc,
            px_to_m(obj.position),
            obj.rotation,
            shape_px.scaled(1.0 / PHYSICS_SCALE),
        );

        match desc.shape_type {
            ShapeType::Box => log::debug!(
                "physics: box body for {} | type {:?} | density {} | size ({}, {})",
                obj.name, desc.body_type, desc.material.density, desc.size.x, desc.size.y
            ),
            ShapeType::Circle => log::debug!(
                "physics: circle body for {} | type {:?} | density {} | radius {}",
                obj.name, desc.body_type, desc.material.density, desc.radius
            ),
        }

        self.body_map.insert(obj.id, handle);
        Some(handle)
    }

    /// Advance the simulation. Non-positive or non-finite steps are ignored.
    pub fn step(&mut self, dt: f32) {
        self.collisions.clear();
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.world.step_into(dt, &mut self.collisions);
    }

    /// Copy body transforms back onto their objects (meters → pixels).
    pub fn sync_to_objects(&self, objects: &mut [SceneObject]) {
        for obj in objects.iter_mut() {
            if !obj.physics.enabled {
                continue;
            }
            let Some(handle) = self.body_map.get(&obj.id) else {
                continue;
            };
            if let Some((pos, rot)) = self.world.body_position(handle) {
                obj.position = m_to_px(pos);
                obj.rotation = rot;
            }
        }
    }

    /// Move bodies to their objects' current transforms (pixels → meters).
    /// Used when an object is edited while the simulation is live.
    pub fn push_from_objects(&mut self, objects: &[SceneObject]) {
        for obj in objects {
            self.push_object(obj);
        }
    }

    /// Move one object's body to the object's transform.
    pub fn push_object(&mut self, obj: &SceneObject) {
        if let Some(handle) = self.body_map.get(&obj.id) {
            self.world
                .set_body_position(handle, px_to_m(obj.position), obj.rotation);
        }
    }

    /// Destroy the body of one object. Returns whether a body existed.
    pub fn remove_object(&mut self, id: ObjectId) -> bool {
        match self.body_map.remove(&id) {
            Some(handle) => {
                self.world.remove_body(&handle);
                true
            }
            None => false,
        }
    }

    /// Destroy every body.
    pub fn clear(&mut self) {
        for (_, handle) in self.body_map.drain() {
            self.world.remove_body(&handle);
        }
        self.collisions.clear();
    }

    pub fn body_for(&self, id: ObjectId) -> Option<PhysicsHandle> {
        self.body_map.get(&id).copied()
    }

    pub fn body_count(&self) -> usize {
        self.body_map.len()
    }

    /// Collision events from the most recent step.
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collisions
    }

    /// Linear velocity of an object's body in px/s.
    pub fn velocity_px(&self, id: ObjectId) -> Vec2 {
        self.body_map
            .get(&id)
            .map(|h| m_to_px(self.world.velocity(h)))
            .unwrap_or(Vec2::ZERO)
    }

    /// Set the linear velocity of an object's body in px/s.
    pub fn set_velocity_px(&mut self, id: ObjectId, vel: Vec2) {
        if let Some(handle) = self.body_map.get(&id) {
            self.world.set_velocity(handle, px_to_m(vel));
        }
    }

    /// Apply an impulse in kg·m/s.
    pub fn apply_impulse(&mut self, id: ObjectId, impulse: Vec2) {
        if let Some(handle) = self.body_map.get(&id) {
            self.world.apply_impulse(handle, impulse);
        }
    }

    /// Every collider in pixel space, sorted by object id.
    pub fn collider_poses(&self) -> Vec<ColliderPose> {
        let mut poses: Vec<ColliderPose> = self
            .body_map
            .iter()
            .filter_map(|(&object, handle)| {
                let (pos, rot) = self.world.body_position(handle)?;
                let shape = self.world.collider_shape(handle)?;
                Some(ColliderPose {
                    object,
                    position: m_to_px(pos),
                    rotation: rot,
                    shape: shape.scaled(PHYSICS_SCALE),
                })
            })
            .collect();
        poses.sort_by_key(|p| p.object);
        poses
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
