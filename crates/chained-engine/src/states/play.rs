use std::path::Path;
use glam::Vec2;

use crate::api::state::{EngineContext, GameState, Transition};
use crate::api::types::ObjectId;
use crate::core::scene::Scene;
use crate::core::scene_file;
use crate::input::queue::{InputEvent, InputQueue, Key};
use crate::renderer::camera::{Camera, CameraState};
use crate::renderer::instance::FrameBuffer;
use crate::systems::render::push_object_sprites;
#[cfg(feature = "physics")]
use crate::components::physics_body::BodyType;
#[cfg(feature = "physics")]
use crate::core::physics::PhysicsSystem;
#[cfg(feature = "physics")]
use crate::systems::debug::{debug_draw_colliders, COLLIDER_COLOR};

/// Runs a scene: physics, player steering, rendering.
pub struct PlayState {
    scene: Scene,
    scene_name: String,
    camera: Camera,
    player: Option<ObjectId>,
    #[cfg(feature = "physics")]
    physics: PhysicsSystem,
}

impl PlayState {
    /// Load a scene file. A file that cannot be read is logged and plays as an
    /// empty scene.
    pub fn load(ctx: &EngineContext, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match scene_file::load(path) {
            Ok(loaded) => Self::from_scene(ctx, loaded.scene, loaded.camera, loaded.name),
            Err(e) => {
                log::error!("could not load scene {}: {}", path.display(), e);
                Self::from_scene(ctx, Scene::new(), None, scene_file::scene_name_from_path(path))
            }
        }
    }

    pub fn from_scene(
        ctx: &EngineContext,
        scene: Scene,
        camera: Option<CameraState>,
        scene_name: String,
    ) -> Self {
        let screen = ctx.screen();
        let mut cam = Camera::new(screen.x, screen.y);
        if let Some(state) = camera {
            cam.apply_state(state);
        }

        let player = scene.find_by_name(&ctx.config.player_name).map(|o| o.id);
        if player.is_none() {
            log::debug!("scene {} has no `{}` object", scene_name, ctx.config.player_name);
        }

        #[cfg(feature = "physics")]
        let physics = {
            let mut physics = PhysicsSystem::new(ctx.config.gravity);
            physics.add_objects(scene.objects());
            log::info!("scene {}: {} objects, {} bodies", scene_name, scene.len(), physics.body_count());
            physics
        };

        Self {
            scene,
            scene_name,
            camera: cam,
            player,
            #[cfg(feature = "physics")]
            physics,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_name(&self) -> &str {
        &self.scene_name
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn player(&self) -> Option<ObjectId> {
        self.player
    }

    #[cfg(feature = "physics")]
    pub fn physics(&self) -> &PhysicsSystem {
        &self.physics
    }

    fn move_player(&mut self, axis: Vec2, speed: f32, dt: f32) {
        let Some(id) = self.player else {
            return;
        };
        if self.steer_body(id, axis, speed) || axis == Vec2::ZERO {
            return;
        }
        if let Some(obj) = self.scene.get_mut(id) {
            obj.position += axis * speed * dt;
        }
        self.push_body(id);
    }

    /// Dynamic bodies are steered through their velocity. Vertical velocity is
    /// left to gravity unless W or S is held.
    #[cfg(feature = "physics")]
    fn steer_body(&mut self, id: ObjectId, axis: Vec2, speed: f32) -> bool {
        let dynamic = self
            .scene
            .get(id)
            .is_some_and(|o| o.physics.enabled && o.physics.body_type == BodyType::Dynamic);
        if !dynamic || self.physics.body_for(id).is_none() {
            return false;
        }
        let current = self.physics.velocity_px(id);
        let vy = if axis.y != 0.0 { axis.y * speed } else { current.y };
        self.physics.set_velocity_px(id, Vec2::new(axis.x * speed, vy));
        true
    }

    #[cfg(not(feature = "physics"))]
    fn steer_body(&mut self, _id: ObjectId, _axis: Vec2, _speed: f32) -> bool {
        false
    }

    #[cfg(feature = "physics")]
    fn push_body(&mut self, id: ObjectId) {
        if let Some(obj) = self.scene.get(id) {
            self.physics.push_object(obj);
        }
    }

    #[cfg(not(feature = "physics"))]
    fn push_body(&mut self, _id: ObjectId) {}

    #[cfg(feature = "physics")]
    fn step_physics(&mut self, dt: f32) {
        self.physics.step(dt);
        self.physics.sync_to_objects(self.scene.objects_mut());
    }

    #[cfg(not(feature = "physics"))]
    fn step_physics(&mut self, _dt: f32) {}

    #[cfg(feature = "physics")]
    fn draw_colliders(&self, frame: &mut FrameBuffer) {
        debug_draw_colliders(&self.physics, frame, COLLIDER_COLOR);
    }

    #[cfg(not(feature = "physics"))]
    fn draw_colliders(&self, _frame: &mut FrameBuffer) {}
}

impl GameState for PlayState {
    fn name(&self) -> &str {
        "play"
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue, dt: f32) -> Transition {
        let mut transition = Transition::None;
        for event in input.iter() {
            match *event {
                InputEvent::KeyDown { key: Key::Escape } => transition = Transition::Pop,
                InputEvent::Resize { width, height } => self.camera.set_viewport(width, height),
                _ => {}
            }
        }

        let axis = ctx.input.wasd_axis_over(input.iter());
        self.move_player(axis, ctx.config.player_speed, dt);
        self.step_physics(dt);
        transition
    }

    fn render(&self, ctx: &EngineContext, frame: &mut FrameBuffer) {
        frame.set_projection(self.camera.projection_matrix());
        push_object_sprites(self.scene.iter(), &ctx.palette, None, frame);
        if ctx.config.debug_physics {
            self.draw_colliders(frame);
        }
    }

    fn scene(&self) -> Option<&Scene> {
        Some(&self.scene)
    }
}
