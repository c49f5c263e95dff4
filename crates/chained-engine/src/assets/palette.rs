use glam::Vec2;
use crate::assets::atlas::{AtlasFrame, SpriteAtlas};
use crate::error::{EngineError, Result};

/// One placeable asset: a named atlas slice.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetEntry {
    pub name: String,
    pub frame: AtlasFrame,
}

/// Ordered list of placeable assets. A scene object's `asset_id` indexes it.
///
/// Entries are sorted by slice name, so ids stay stable across runs as long as
/// the atlas keeps the same slices.
#[derive(Debug, Clone, Default)]
pub struct AssetPalette {
    entries: Vec<AssetEntry>,
}

impl AssetPalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the palette from every named slice in an atlas.
    pub fn from_atlas(atlas: &SpriteAtlas) -> Self {
        let entries = atlas
            .slices()
            .map(|(name, frame)| AssetEntry {
                name: name.to_string(),
                frame: *frame,
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, id: usize) -> Option<&AssetEntry> {
        self.entries.get(id)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Look up an entry by slice name, failing with `UnknownSlice`.
    pub fn require(&self, name: &str) -> Result<&AssetEntry> {
        self.iter()
            .find(|e| e.name == name)
            .ok_or_else(|| EngineError::UnknownSlice(name.to_string()))
    }

    /// Unscaled sprite size in pixels.
    pub fn sprite_size(&self, id: usize) -> Option<Vec2> {
        self.get(id).map(|e| e.frame.size_px)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atlas() -> SpriteAtlas {
        SpriteAtlas::from_json(r#"{
            "frames": {},
            "meta": {
                "image": "sprites.png",
                "size": { "w": 64, "h": 64 },
                "slices": [
                    { "name": "zombie", "keys": [{ "bounds": { "x": 0, "y": 0, "w": 16, "h": 24 } }] },
                    { "name": "crate", "keys": [{ "bounds": { "x": 16, "y": 0, "w": 32, "h": 32 } }] }
                ]
            }
        }"#).unwrap()
    }

    #[test]
    fn entries_sorted_by_name() {
        let palette = AssetPalette::from_atlas(&atlas());
        let names: Vec<_> = palette.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["crate", "zombie"]);
        assert_eq!(palette.index_of("zombie"), Some(1));
    }

    #[test]
    fn sprite_size_by_id() {
        let palette = AssetPalette::from_atlas(&atlas());
        assert_eq!(palette.sprite_size(1), Some(Vec2::new(16.0, 24.0)));
        assert_eq!(palette.sprite_size(2), None);
    }

    #[test]
    fn require_names_missing_slice() {
        let palette = AssetPalette::from_atlas(&atlas());
        assert_eq!(palette.require("crate").unwrap().frame.size_px, Vec2::new(32.0, 32.0));
        let err = palette.require("exit_btn").unwrap_err();
        assert!(matches!(err, EngineError::UnknownSlice(ref n) if n == "exit_btn"));
    }

    #[test]
    fn empty_palette() {
        let palette = AssetPalette::new();
        assert!(palette.is_empty());
        assert!(palette.get(0).is_none());
    }
}
