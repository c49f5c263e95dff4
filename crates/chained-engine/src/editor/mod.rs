//! Level editor model: object placement, selection, camera navigation and
//! scene persistence. Input wiring lives in [`state::EditorState`].

pub mod state;

use std::path::{Path, PathBuf};
use glam::{Vec2, Vec4};

use crate::api::types::ObjectId;
use crate::assets::palette::AssetPalette;
use crate::components::object::SceneObject;
use crate::components::physics_body::PhysicsBody;
use crate::core::scene::Scene;
use crate::core::scene_file;
use crate::error::{EngineError, Result};
use crate::renderer::camera::Camera;
use crate::renderer::instance::FrameBuffer;
use crate::systems::debug::{draw_camera_bounds, CAMERA_BOUNDS_COLOR};
use crate::systems::render::{object_sprite, push_object_sprites};

/// Zoom factor per wheel notch.
pub const ZOOM_STEP_IN: f32 = 1.1;
pub const ZOOM_STEP_OUT: f32 = 0.9;

const PREVIEW_TINT: Vec4 = Vec4::new(1.0, 1.0, 1.0, 0.5);

/// What a left click in the scene did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Selected(ObjectId),
    Placed(ObjectId),
    Deselected,
}

pub struct Editor {
    scene: Scene,
    palette: AssetPalette,
    camera: Camera,
    selected_asset: Option<usize>,
    selected_object: Option<ObjectId>,
    placement_mode: bool,
    placement_preview: Option<Vec2>,
    current_scene_name: String,
    scenes_dir: PathBuf,
    /// Physics descriptor given to newly placed objects.
    default_physics: PhysicsBody,
}

impl Editor {
    pub fn new(palette: AssetPalette, scenes_dir: impl Into<PathBuf>, viewport: Vec2) -> Self {
        Self {
            scene: Scene::new(),
            palette,
            camera: Camera::new(viewport.x, viewport.y),
            selected_asset: None,
            selected_object: None,
            placement_mode: false,
            placement_preview: None,
            current_scene_name: String::new(),
            scenes_dir: scenes_dir.into(),
            default_physics: PhysicsBody::default(),
        }
    }

    pub fn with_default_physics(mut self, physics: PhysicsBody) -> Self {
        self.default_physics = physics;
        self
    }

    // -- Accessors --

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn palette(&self) -> &AssetPalette {
        &self.palette
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn selected_asset(&self) -> Option<usize> {
        self.selected_asset
    }

    pub fn selected_object(&self) -> Option<ObjectId> {
        self.selected_object
    }

    pub fn selected(&self) -> Option<&SceneObject> {
        self.selected_object.and_then(|id| self.scene.get(id))
    }

    pub fn placement_mode(&self) -> bool {
        self.placement_mode
    }

    /// World position of the placement ghost, if the pointer has moved while placing.
    pub fn placement_preview(&self) -> Option<Vec2> {
        self.placement_preview
    }

    pub fn current_scene_name(&self) -> &str {
        &self.current_scene_name
    }

    pub fn scenes_dir(&self) -> &Path {
        &self.scenes_dir
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.camera.set_viewport(width, height);
    }

    // -- Coordinates --

    /// Window pixels (y-down) to camera screen space (y-up).
    pub fn window_to_screen(&self, window: Vec2) -> Vec2 {
        Vec2::new(window.x, self.camera.viewport().y - window.y)
    }

    pub fn window_to_world(&self, window: Vec2) -> Vec2 {
        self.camera.screen_to_world(self.window_to_screen(window))
    }

    // -- Palette and placement --

    /// Pick an asset from the palette. Picking the asset that is already armed
    /// for placement disarms it.
    pub fn select_asset(&mut self, id: usize) -> Result<()> {
        if id >= self.palette.len() {
            return Err(EngineError::InvalidAssetId { id, len: self.palette.len() });
        }
        if self.placement_mode && self.selected_asset == Some(id) {
            self.exit_placement();
        } else {
            self.selected_asset = Some(id);
            self.placement_mode = true;
        }
        Ok(())
    }

    fn exit_placement(&mut self) {
        self.placement_mode = false;
        self.selected_asset = None;
        self.placement_preview = None;
    }

    /// Track the pointer for the placement ghost.
    pub fn move_pointer(&mut self, window: Vec2) {
        if self.placement_mode {
            self.placement_preview = Some(self.window_to_world(window));
        }
    }

    /// Left click: select the topmost object under the cursor, otherwise place
    /// the armed asset, otherwise deselect.
    pub fn click(&mut self, window: Vec2) -> ClickOutcome {
        let world = self.window_to_world(window);
        if let Some(id) = self.object_under(world) {
            self.selected_object = Some(id);
            return ClickOutcome::Selected(id);
        }
        if self.placement_mode {
            if let Some(id) = self.place_at(world) {
                return ClickOutcome::Placed(id);
            }
        }
        self.selected_object = None;
        ClickOutcome::Deselected
    }

    /// Place the armed asset centered on `world`, even over other objects.
    /// Leaves placement mode and clears the selection.
    pub fn place_at(&mut self, world: Vec2) -> Option<ObjectId> {
        let asset_id = self.selected_asset?;
        let entry = self.palette.get(asset_id)?;
        let size = entry.frame.size_px;

        let mut physics = self.default_physics;
        physics.size = size;
        physics.radius = 0.5 * size.x.min(size.y);

        let id = self.scene.next_id();
        self.scene.push(
            SceneObject::new(id, entry.name.clone(), asset_id)
                .with_position(world)
                .with_physics(physics),
        );
        log::debug!("placed {} #{} at ({}, {})", entry.name, id.0, world.x, world.y);

        self.placement_mode = false;
        self.placement_preview = None;
        self.selected_object = None;
        Some(id)
    }

    /// Topmost object whose sprite covers `world`.
    pub fn object_under(&self, world: Vec2) -> Option<ObjectId> {
        self.scene
            .iter()
            .rev()
            .find(|obj| {
                self.palette
                    .sprite_size(obj.asset_id)
                    .is_some_and(|size| obj.contains_point(size, world))
            })
            .map(|obj| obj.id)
    }

    /// Escape: leave placement mode, or else drop the selection.
    /// Returns `false` when there was nothing to cancel.
    pub fn cancel(&mut self) -> bool {
        if self.placement_mode {
            self.exit_placement();
            true
        } else {
            self.selected_object.take().is_some()
        }
    }

    pub fn delete_selected(&mut self) -> Option<SceneObject> {
        let id = self.selected_object.take()?;
        let removed = self.scene.despawn(id);
        if let Some(obj) = &removed {
            log::debug!("deleted {} #{}", obj.name, id.0);
        }
        removed
    }

    pub fn clear_scene(&mut self) {
        self.scene.clear();
        self.selected_object = None;
        log::info!("scene cleared");
    }

    // -- Camera --

    /// Pan by a pointer drag measured in window pixels; the scene follows the cursor.
    pub fn pan_by_drag(&mut self, delta_window: Vec2) {
        self.camera.pan(Vec2::new(-delta_window.x, delta_window.y));
    }

    /// Zoom one wheel step around the cursor.
    pub fn zoom_wheel(&mut self, delta: f32, window: Vec2) {
        let factor = if delta > 0.0 {
            ZOOM_STEP_IN
        } else if delta < 0.0 {
            ZOOM_STEP_OUT
        } else {
            return;
        };
        let screen = self.window_to_screen(window);
        self.camera.zoom_at_screen(factor, screen);
    }

    // -- Property editing --

    fn object_mut(&mut self, id: ObjectId) -> Result<&mut SceneObject> {
        self.scene.get_mut(id).ok_or(EngineError::UnknownObject(id.0))
    }

    pub fn set_position(&mut self, id: ObjectId, position: Vec2) -> Result<()> {
        self.object_mut(id)?.position = position;
        Ok(())
    }

    pub fn set_rotation(&mut self, id: ObjectId, rotation: f32) -> Result<()> {
        self.object_mut(id)?.rotation = rotation;
        Ok(())
    }

    pub fn set_scale(&mut self, id: ObjectId, scale: Vec2) -> Result<()> {
        self.object_mut(id)?.scale = scale;
        Ok(())
    }

    pub fn rename(&mut self, id: ObjectId, name: impl Into<String>) -> Result<()> {
        self.object_mut(id)?.name = name.into();
        Ok(())
    }

    pub fn set_physics(&mut self, id: ObjectId, physics: PhysicsBody) -> Result<()> {
        self.object_mut(id)?.physics = physics;
        Ok(())
    }

    // -- Persistence --

    /// Save under `name` in the scenes directory and make it the current scene.
    pub fn save_scene(&mut self, name: &str) -> Result<PathBuf> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::EmptySceneName);
        }
        let written = self.save_to(self.scenes_dir.join(name))?;
        self.current_scene_name = scene_file::scene_name_from_path(&written);
        Ok(written)
    }

    /// Save to an explicit path without changing the current scene name.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        scene_file::save(path, self.scene.objects(), Some(self.camera.state()))
    }

    /// Replace the scene with `name` from the scenes directory.
    /// Restores the saved camera if the file has one.
    pub fn load_scene(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::EmptySceneName);
        }
        let path = self.scenes_dir.join(scene_file::scene_name_from_path(name));
        let loaded = scene_file::load(&path)?;
        self.scene = loaded.scene;
        if let Some(camera) = loaded.camera {
            self.camera.apply_state(camera);
        }
        self.current_scene_name = loaded.name;
        self.selected_object = None;
        self.exit_placement();
        Ok(())
    }

    /// Scene files available in the scenes directory.
    pub fn list_scenes(&self) -> Result<Vec<String>> {
        scene_file::list_scenes(&self.scenes_dir)
    }

    // -- Rendering --

    pub fn render(&self, frame: &mut FrameBuffer) {
        frame.set_projection(self.camera.projection_matrix());
        push_object_sprites(self.scene.iter(), &self.palette, self.selected_object, frame);

        if let (Some(pos), Some(asset_id)) = (self.placement_preview, self.selected_asset) {
            let ghost = SceneObject::new(ObjectId(0), "", asset_id).with_position(pos);
            if let Some(sprite) = object_sprite(&ghost, &self.palette) {
                frame.push_sprite(sprite.with_tint(PREVIEW_TINT));
            }
        }

        draw_camera_bounds(&self.camera, frame, CAMERA_BOUNDS_COLOR);
    }
}
