pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod assets;
pub mod editor;
pub mod states;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::config::EngineConfig;
pub use api::state::{EngineContext, GameState, StateStack, Transition};
pub use api::types::ObjectId;
pub use assets::atlas::{AtlasFrame, SpriteAtlas};
pub use assets::palette::{AssetEntry, AssetPalette};
pub use components::object::SceneObject;
pub use components::physics_body::{BodyType, PhysicsBody, PhysicsMaterial, ShapeType};
pub use core::scene::Scene;
pub use core::scene_file::LoadedScene;
pub use core::time::FixedTimestep;
pub use editor::{ClickOutcome, Editor};
pub use editor::state::EditorState;
pub use error::{EngineError, Result};
pub use input::queue::{InputEvent, InputQueue, InputState, Key, MouseButton};
pub use renderer::camera::{Camera, CameraState, CameraUniform};
pub use renderer::instance::{DebugLine, FrameBuffer, SpriteInstance};
pub use renderer::traits::{DrawTiming, Renderer};
pub use states::menu::MainMenu;
pub use states::play::PlayState;

#[cfg(feature = "physics")]
pub use core::physics::{
    PhysicsSystem, PhysicsWorld, PhysicsHandle, ColliderShape, ColliderPose, CollisionPair,
    PHYSICS_SCALE, px_to_m, m_to_px,
};
#[cfg(feature = "physics")]
pub use systems::debug::debug_draw_colliders;
