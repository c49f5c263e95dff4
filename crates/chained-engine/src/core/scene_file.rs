//! Scene files: the JSON document the editor saves and the play state loads.
//!
//! ```json
//! {
//!   "objects": [
//!     { "name": "crate", "position": [64, 32], "rotation": 0, "scale": [1, 1],
//!       "assetId": 2, "physics": { "enabled": true, "bodyType": "Dynamic" } }
//!   ],
//!   "camera": { "pos": [0, 0], "zoom": 1 }
//! }
//! ```
//!
//! Object ids are not stored; loading assigns fresh ids in file order.

use std::path::{Path, PathBuf};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::object::SceneObject;
use crate::components::physics_body::PhysicsBody;
use crate::core::scene::Scene;
use crate::error::{EngineError, Result};
use crate::renderer::camera::CameraState;

const SCENE_EXTENSION: &str = "json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SceneDocument {
    #[serde(default)]
    objects: Vec<ObjectRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    camera: Option<CameraState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ObjectRecord {
    name: String,
    position: Vec2,
    #[serde(default)]
    rotation: f32,
    #[serde(default = "unit_scale")]
    scale: Vec2,
    #[serde(rename = "assetId", default)]
    asset_id: usize,
    #[serde(default)]
    physics: PhysicsBody,
}

fn unit_scale() -> Vec2 {
    Vec2::ONE
}

impl From<&SceneObject> for ObjectRecord {
    fn from(obj: &SceneObject) -> Self {
        Self {
            name: obj.name.clone(),
            position: obj.position,
            rotation: obj.rotation,
            scale: obj.scale,
            asset_id: obj.asset_id,
            physics: obj.physics,
        }
    }
}

/// A scene read back from disk.
#[derive(Default)]
pub struct LoadedScene {
    pub scene: Scene,
    pub camera: Option<CameraState>,
    /// File name of the scene, including the `.json` extension.
    pub name: String,
}

/// Serialize objects and an optional camera to a JSON string.
pub fn to_json(objects: &[SceneObject], camera: Option<CameraState>) -> String {
    let doc = SceneDocument {
        objects: objects.iter().map(ObjectRecord::from).collect(),
        camera,
    };
    // Plain structs of numbers and strings always serialize.
    serde_json::to_string_pretty(&doc).unwrap_or_default()
}

/// Parse a scene document, assigning fresh ids in file order.
pub fn from_json(json: &str) -> std::result::Result<(Scene, Option<CameraState>), serde_json::Error> {
    let doc: SceneDocument = serde_json::from_str(json)?;
    let mut scene = Scene::new();
    for record in doc.objects {
        let id = scene.next_id();
        scene.push(
            SceneObject::new(id, record.name, record.asset_id)
                .with_position(record.position)
                .with_rotation(record.rotation)
                .with_scale(record.scale)
                .with_physics(record.physics),
        );
    }
    Ok((scene, doc.camera))
}

/// Write a scene file. The path always gets a `.json` extension and missing
/// parent directories are created. The document is written to a temporary
/// sibling and renamed into place, so readers never see a partial file.
/// Returns the path actually written.
pub fn save(path: impl AsRef<Path>, objects: &[SceneObject], camera: Option<CameraState>) -> Result<PathBuf> {
    let mut path = path.as_ref().to_path_buf();
    if path.extension().and_then(|e| e.to_str()) != Some(SCENE_EXTENSION) {
        path.set_extension(SCENE_EXTENSION);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| EngineError::io(parent, e))?;
    }

    let mut tmp = path.clone().into_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, to_json(objects, camera)).map_err(|e| EngineError::io(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| EngineError::io(&path, e))?;

    log::info!("scene saved to {} ({} objects)", path.display(), objects.len());
    Ok(path)
}

/// Read a scene file.
pub fn load(path: impl AsRef<Path>) -> Result<LoadedScene> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
    let (scene, camera) = from_json(&text).map_err(|e| EngineError::json(path, e))?;
    log::info!("loaded scene from {} with {} objects", path.display(), scene.len());
    Ok(LoadedScene {
        scene,
        camera,
        name: scene_name_from_path(path),
    })
}

/// File names of the `.json` scene files in `dir`, sorted alphabetically.
/// A missing directory has no scenes.
pub fn list_scenes(dir: impl AsRef<Path>) -> Result<Vec<String>> {
    let dir = dir.as_ref();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(EngineError::io(dir, e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| EngineError::io(dir, e))?;
        let path = entry.path();
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if is_file && path.extension().and_then(|e| e.to_str()) == Some(SCENE_EXTENSION) {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Scene name shown in the editor: the file name with a `.json` extension.
pub fn scene_name_from_path(path: impl AsRef<Path>) -> String {
    let name = path
        .as_ref()
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    if name.ends_with(".json") {
        name
    } else {
        format!("{}.json", name)
    }
}
