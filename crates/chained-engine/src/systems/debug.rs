//! Debug drawing: collider outlines and rectangles as polylines in the frame buffer.

use glam::{Vec2, Vec4};

#[cfg(feature = "physics")]
use crate::core::physics::{ColliderPose, ColliderShape, PhysicsSystem};
use crate::renderer::camera::Camera;
use crate::renderer::instance::FrameBuffer;

pub const COLLIDER_COLOR: Vec4 = Vec4::new(0.0, 1.0, 0.0, 1.0);
pub const CAMERA_BOUNDS_COLOR: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);

#[cfg(feature = "physics")]
const CIRCLE_SEGMENTS: usize = 24;

/// Outline every collider the physics system knows about.
#[cfg(feature = "physics")]
pub fn debug_draw_colliders(physics: &PhysicsSystem, frame: &mut FrameBuffer, color: Vec4) {
    for pose in physics.collider_poses() {
        frame.push_line(collider_outline(&pose), color);
    }
}

/// Closed outline of a collider in world pixels.
#[cfg(feature = "physics")]
pub fn collider_outline(pose: &ColliderPose) -> Vec<Vec2> {
    let center = pose.position;
    let rot = Vec2::from_angle(pose.rotation);
    match pose.shape {
        ColliderShape::Ball { radius } => (0..=CIRCLE_SEGMENTS)
            .map(|i| {
                // Start at the body's local +x so the rotation is visible.
                let angle = pose.rotation + (i as f32 / CIRCLE_SEGMENTS as f32) * std::f32::consts::TAU;
                center + Vec2::from_angle(angle) * radius
            })
            .collect(),
        ColliderShape::Cuboid { half_width, half_height } => {
            let corners = [
                Vec2::new(-half_width, -half_height),
                Vec2::new(half_width, -half_height),
                Vec2::new(half_width, half_height),
                Vec2::new(-half_width, half_height),
            ];
            let mut points: Vec<Vec2> = corners.iter().map(|c| center + rot.rotate(*c)).collect();
            points.push(points[0]);
            points
        }
    }
}

/// Closed axis-aligned rectangle.
pub fn rect_outline(min: Vec2, max: Vec2) -> Vec<Vec2> {
    vec![
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
        min,
    ]
}

/// Outline the camera's visible world rectangle.
pub fn draw_camera_bounds(camera: &Camera, frame: &mut FrameBuffer, color: Vec4) {
    let (min, max) = camera.visible_rect();
    frame.push_line(rect_outline(min, max), color);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn rect_outline_is_closed() {
        let pts = rect_outline(Vec2::ZERO, Vec2::new(4.0, 2.0));
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], pts[4]);
        assert_eq!(pts[2], Vec2::new(4.0, 2.0));
    }

    #[test]
    fn camera_bounds_follow_zoom() {
        let mut cam = Camera::new(800.0, 600.0);
        cam.set_zoom(2.0);
        let mut frame = FrameBuffer::new();
        draw_camera_bounds(&cam, &mut frame, CAMERA_BOUNDS_COLOR);
        assert_eq!(frame.debug_lines.len(), 1);
        assert_eq!(frame.debug_lines[0].points[2], Vec2::new(400.0, 300.0));
    }

    #[cfg(feature = "physics")]
    #[test]
    fn rotated_box_outline() {
        use crate::api::types::ObjectId;
        let pose = ColliderPose {
            object: ObjectId(1),
            position: Vec2::new(10.0, 10.0),
            rotation: std::f32::consts::FRAC_PI_2,
            shape: ColliderShape::Cuboid { half_width: 2.0, half_height: 1.0 },
        };
        let pts = collider_outline(&pose);
        assert_eq!(pts.len(), 5);
        // (-2, -1) rotated a quarter turn is (1, -2).
        assert!(approx(pts[0], Vec2::new(11.0, 8.0)));
        assert!(approx(pts[0], pts[4]));
    }

    #[cfg(feature = "physics")]
    #[test]
    fn ball_outline_points_on_radius() {
        use crate::api::types::ObjectId;
        let pose = ColliderPose {
            object: ObjectId(1),
            position: Vec2::new(-5.0, 3.0),
            rotation: 0.3,
            shape: ColliderShape::Ball { radius: 16.0 },
        };
        let pts = collider_outline(&pose);
        assert_eq!(pts.len(), CIRCLE_SEGMENTS + 1);
        for p in &pts {
            assert!(((*p - pose.position).length() - 16.0).abs() < 1e-3);
        }
    }

    #[cfg(feature = "physics")]
    #[test]
    fn draws_one_line_per_body() {
        use crate::components::object::SceneObject;
        use crate::components::physics_body::PhysicsBody;
        use crate::api::types::ObjectId;

        let mut physics = PhysicsSystem::new(Vec2::ZERO);
        let objects = vec![
            SceneObject::new(ObjectId(1), "a", 0).with_physics(PhysicsBody::dynamic_box(Vec2::splat(32.0))),
            SceneObject::new(ObjectId(2), "b", 0),
            SceneObject::new(ObjectId(3), "c", 0)
                .with_position(Vec2::new(100.0, 0.0))
                .with_physics(PhysicsBody::dynamic_circle(8.0)),
        ];
        physics.add_objects(&objects);
        let mut frame = FrameBuffer::new();
        debug_draw_colliders(&physics, &mut frame, COLLIDER_COLOR);
        assert_eq!(frame.debug_lines.len(), 2);
    }
}
