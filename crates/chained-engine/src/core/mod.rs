#[cfg(feature = "physics")]
pub mod physics;
pub mod scene;
pub mod scene_file;
pub mod time;
