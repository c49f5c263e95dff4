use glam::Vec4;

use crate::api::types::ObjectId;
use crate::assets::palette::AssetPalette;
use crate::components::object::SceneObject;
use crate::renderer::instance::{FrameBuffer, SpriteInstance};

/// Tint applied to the selected object in the editor.
pub const SELECTED_TINT: Vec4 = Vec4::new(1.0, 1.0, 0.0, 1.0);

/// Push one sprite per object, in draw order.
/// Objects whose asset id is not in the palette are skipped.
pub fn push_object_sprites<'a>(
    objects: impl Iterator<Item = &'a SceneObject>,
    palette: &AssetPalette,
    selected: Option<ObjectId>,
    frame: &mut FrameBuffer,
) {
    for obj in objects {
        let Some(sprite) = object_sprite(obj, palette) else {
            continue;
        };
        let sprite = if Some(obj.id) == selected {
            sprite.with_tint(SELECTED_TINT)
        } else {
            sprite
        };
        frame.push_sprite(sprite);
    }
}

/// The sprite for one object, sized from its slice and scale.
/// Negative scale components mirror the sprite.
pub fn object_sprite(obj: &SceneObject, palette: &AssetPalette) -> Option<SpriteInstance> {
    let entry = palette.get(obj.asset_id)?;
    Some(SpriteInstance::new(
        obj.position,
        entry.frame.size_px * obj.scale,
        obj.rotation,
        &entry.frame,
    ))
}
