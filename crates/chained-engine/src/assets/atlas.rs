use std::collections::BTreeMap;
use std::path::Path;
use glam::{Vec2, Vec4};
use serde::de::Error as _;
use serde::Deserialize;
use crate::error::{EngineError, Result};

/// A rectangle in an atlas, in UV space and in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasFrame {
    /// (x, y, w, h) in UV space with a bottom-left origin.
    pub uv_rect: Vec4,
    /// Width and height in atlas pixels.
    pub size_px: Vec2,
    /// Frame duration in milliseconds (0 for slices).
    pub duration: u32,
}

impl AtlasFrame {
    /// UV rect with a top-left origin, as image-space samplers expect.
    pub fn uv_rect_top_left(&self) -> Vec4 {
        let uv = self.uv_rect;
        Vec4::new(uv.x, 1.0 - uv.y - uv.w, uv.z, uv.w)
    }
}

// ---------------------------------------------------------------------------
// Aseprite JSON shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct AtlasDocument {
    frames: FrameList,
    meta: Meta,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FrameList {
    Map(BTreeMap<String, FrameRecord>),
    List(Vec<NamedFrameRecord>),
}

#[derive(Debug, Deserialize)]
struct FrameRecord {
    frame: Rect,
    #[serde(default)]
    duration: u32,
}

#[derive(Debug, Deserialize)]
struct NamedFrameRecord {
    filename: String,
    frame: Rect,
    #[serde(default)]
    duration: u32,
}

#[derive(Debug, Deserialize)]
struct Meta {
    #[serde(default)]
    image: String,
    size: Size,
    #[serde(default)]
    slices: Vec<SliceRecord>,
}

#[derive(Debug, Deserialize)]
struct Size {
    w: f32,
    h: f32,
}

#[derive(Debug, Deserialize, Clone, Copy)]
struct Rect {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

#[derive(Debug, Deserialize)]
struct SliceRecord {
    #[serde(default)]
    name: String,
    #[serde(default)]
    keys: Vec<SliceKey>,
}

#[derive(Debug, Deserialize)]
struct SliceKey {
    bounds: Rect,
}

// ---------------------------------------------------------------------------
// SpriteAtlas
// ---------------------------------------------------------------------------

/// Named frames and slices of one texture atlas exported by Aseprite.
/// The texture itself is loaded by the renderer from `image()`.
#[derive(Debug, Clone)]
pub struct SpriteAtlas {
    image: String,
    size: Vec2,
    frames: BTreeMap<String, AtlasFrame>,
    slices: BTreeMap<String, AtlasFrame>,
}

impl SpriteAtlas {
    /// Parse an atlas from Aseprite JSON (hash or array frame layout).
    /// The atlas size must be positive in both axes.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let doc: AtlasDocument = serde_json::from_str(json)?;
        let size = Vec2::new(doc.meta.size.w, doc.meta.size.h);
        if !(size.x > 0.0 && size.y > 0.0) {
            return Err(serde_json::Error::custom(format!(
                "atlas size {}x{} is not positive",
                size.x, size.y
            )));
        }

        let frames = match doc.frames {
            FrameList::Map(map) => map
                .into_iter()
                .map(|(name, f)| (name, to_frame(f.frame, size, f.duration)))
                .collect(),
            FrameList::List(list) => list
                .into_iter()
                .map(|f| (f.filename, to_frame(f.frame, size, f.duration)))
                .collect(),
        };

        let slices = doc
            .meta
            .slices
            .into_iter()
            .filter(|s| !s.name.is_empty())
            .filter_map(|s| {
                let key = s.keys.first()?;
                Some((s.name, to_frame(key.bounds, size, 0)))
            })
            .collect();

        Ok(Self {
            image: doc.meta.image,
            size,
            frames,
            slices,
        })
    }

    /// Load an atlas description from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
        let atlas = Self::from_json(&text).map_err(|e| EngineError::json(path, e))?;
        log::info!(
            "atlas {}: {} frames, {} slices",
            path.display(),
            atlas.frames.len(),
            atlas.slices.len()
        );
        Ok(atlas)
    }

    /// Image file the atlas was exported from.
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Atlas size in pixels.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn frame(&self, name: &str) -> Option<&AtlasFrame> {
        self.frames.get(name)
    }

    pub fn slice(&self, name: &str) -> Option<&AtlasFrame> {
        self.slices.get(name)
    }

    /// Frames sorted by name.
    pub fn frames(&self) -> impl Iterator<Item = (&str, &AtlasFrame)> {
        self.frames.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Slices sorted by name.
    pub fn slices(&self) -> impl Iterator<Item = (&str, &AtlasFrame)> {
        self.slices.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn to_frame(rect: Rect, atlas: Vec2, duration: u32) -> AtlasFrame {
    AtlasFrame {
        uv_rect: Vec4::new(
            rect.x / atlas.x,
            (atlas.y - rect.y - rect.h) / atlas.y, // flip to bottom-left origin
            rect.w / atlas.x,
            rect.h / atlas.y,
        ),
        size_px: Vec2::new(rect.w, rect.h),
        duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH_ATLAS: &str = r##"{
        "frames": {
            "idle 0.aseprite": { "frame": { "x": 0, "y": 0, "w": 32, "h": 32 }, "duration": 100 },
            "idle 1.aseprite": { "frame": { "x": 32, "y": 0, "w": 32, "h": 32 }, "duration": 120 }
        },
        "meta": {
            "image": "sprites.png",
            "size": { "w": 128, "h": 64 },
            "slices": [
                { "name": "crate", "color": "#0000ffff", "keys": [{ "frame": 0, "bounds": { "x": 64, "y": 0, "w": 32, "h": 16 } }] },
                { "name": "", "keys": [{ "frame": 0, "bounds": { "x": 0, "y": 0, "w": 1, "h": 1 } }] },
                { "name": "nokeys", "keys": [] },
                { "name": "play_btn", "keys": [{ "frame": 0, "bounds": { "x": 0, "y": 32, "w": 64, "h": 32 } }] }
            ]
        }
    }"##;

    #[test]
    fn parses_hash_frames() {
        let atlas = SpriteAtlas::from_json(HASH_ATLAS).unwrap();
        assert_eq!(atlas.image(), "sprites.png");
        assert_eq!(atlas.size(), Vec2::new(128.0, 64.0));
        let f = atlas.frame("idle 1.aseprite").unwrap();
        assert_eq!(f.duration, 120);
        assert_eq!(f.size_px, Vec2::new(32.0, 32.0));
        assert!((f.uv_rect.x - 0.25).abs() < 1e-6);
        // Top row of the image ends up at the top of UV space.
        assert!((f.uv_rect.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn parses_array_frames() {
        let json = r#"{
            "frames": [
                { "filename": "walk 0", "frame": { "x": 0, "y": 0, "w": 16, "h": 16 }, "duration": 80 }
            ],
            "meta": { "image": "walk.png", "size": { "w": 16, "h": 16 } }
        }"#;
        let atlas = SpriteAtlas::from_json(json).unwrap();
        assert_eq!(atlas.frame("walk 0").unwrap().duration, 80);
        assert_eq!(atlas.slices().count(), 0);
    }

    #[test]
    fn skips_unnamed_and_keyless_slices() {
        let atlas = SpriteAtlas::from_json(HASH_ATLAS).unwrap();
        let names: Vec<_> = atlas.slices().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["crate", "play_btn"]);
    }

    #[test]
    fn slice_uv_flips_y() {
        let atlas = SpriteAtlas::from_json(HASH_ATLAS).unwrap();
        let s = atlas.slice("crate").unwrap();
        assert!((s.uv_rect.x - 0.5).abs() < 1e-6);
        assert!((s.uv_rect.y - 0.75).abs() < 1e-6);
        assert!((s.uv_rect.z - 0.25).abs() < 1e-6);
        assert!((s.uv_rect.w - 0.25).abs() < 1e-6);
        assert_eq!(s.size_px, Vec2::new(32.0, 16.0));
        let tl = s.uv_rect_top_left();
        assert!(tl.y.abs() < 1e-6);
    }

    #[test]
    fn rejects_zero_atlas_size() {
        let json = r#"{
            "frames": {},
            "meta": { "image": "empty.png", "size": { "w": 0, "h": 64 } }
        }"#;
        let err = SpriteAtlas::from_json(json).unwrap_err();
        assert!(err.to_string().contains("not positive"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, json).unwrap();
        assert!(matches!(SpriteAtlas::load(&path).unwrap_err(), EngineError::Json { .. }));
    }

    #[test]
    fn load_reports_path_on_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprites.json");
        std::fs::write(&path, r#"{ "frames": {} }"#).unwrap();
        let err = SpriteAtlas::load(&path).unwrap_err();
        assert!(matches!(err, EngineError::Json { .. }));
    }
}
