use glam::Vec2;
use crate::api::types::ObjectId;
use crate::components::physics_body::PhysicsBody;

/// A placed object in a scene: a transform, an atlas asset and a physics descriptor.
///
/// `position` is the object's center in world pixels (y-up). `rotation` is in radians.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
    /// Index into the asset palette.
    pub asset_id: usize,
    pub physics: PhysicsBody,
}

impl SceneObject {
    /// Create an object at the origin with unit scale and physics disabled.
    pub fn new(id: ObjectId, name: impl Into<String>, asset_id: usize) -> Self {
        Self {
            id,
            name: name.into(),
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            asset_id,
            physics: PhysicsBody::default(),
        }
    }

    // -- Builder pattern --

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_physics(mut self, physics: PhysicsBody) -> Self {
        self.physics = physics;
        self
    }

    /// Whether a world-space point lies inside the object's sprite rectangle.
    ///
    /// `sprite_size` is the unscaled sprite size in pixels. The test runs in the
    /// object's local frame, so rotation and negative (mirrored) scale are honoured.
    pub fn contains_point(&self, sprite_size: Vec2, world: Vec2) -> bool {
        let half = 0.5 * sprite_size * self.scale.abs();
        let local = Vec2::from_angle(-self.rotation).rotate(world - self.position);
        local.x.abs() <= half.x && local.y.abs() <= half.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_object_has_identity_transform() {
        let obj = SceneObject::new(ObjectId(3), "crate", 2);
        assert_eq!(obj.position, Vec2::ZERO);
        assert_eq!(obj.scale, Vec2::ONE);
        assert_eq!(obj.rotation, 0.0);
        assert!(!obj.physics.enabled);
    }

    #[test]
    fn contains_point_axis_aligned() {
        let obj = SceneObject::new(ObjectId(1), "box", 0).with_position(Vec2::new(100.0, 100.0));
        let size = Vec2::new(40.0, 20.0);
        assert!(obj.contains_point(size, Vec2::new(100.0, 100.0)));
        assert!(obj.contains_point(size, Vec2::new(119.0, 109.0)));
        assert!(!obj.contains_point(size, Vec2::new(121.0, 100.0)));
        assert!(!obj.contains_point(size, Vec2::new(100.0, 111.0)));
    }

    #[test]
    fn contains_point_honours_scale() {
        let obj = SceneObject::new(ObjectId(1), "box", 0).with_scale(Vec2::new(2.0, -1.0));
        let size = Vec2::new(10.0, 10.0);
        assert!(obj.contains_point(size, Vec2::new(9.0, 4.0)));
        assert!(!obj.contains_point(size, Vec2::new(11.0, 0.0)));
    }

    #[test]
    fn contains_point_honours_rotation() {
        // 40x10 bar rotated a quarter turn becomes 10x40.
        let obj = SceneObject::new(ObjectId(1), "bar", 0)
            .with_rotation(std::f32::consts::FRAC_PI_2);
        let size = Vec2::new(40.0, 10.0);
        assert!(obj.contains_point(size, Vec2::new(0.0, 18.0)));
        assert!(!obj.contains_point(size, Vec2::new(18.0, 0.0)));
    }
}
