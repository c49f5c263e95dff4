use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How a body participates in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyType {
    /// Never moves; infinite mass.
    #[default]
    Static,
    /// Moved by forces, gravity and contacts.
    Dynamic,
    /// Moved only by its velocity; unaffected by contacts.
    Kinematic,
}

/// Collider shape attached to the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeType {
    #[default]
    Box,
    Circle,
}

/// Surface and mass properties of a collider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsMaterial {
    pub friction: f32,
    /// Restitution: 0.0 = no bounce, 1.0 = perfectly elastic.
    pub bounciness: f32,
    pub density: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            friction: 0.5,
            bounciness: 0.0,
            density: 1.0,
        }
    }
}

/// Physics descriptor carried by every scene object.
///
/// Sizes are in pixels; the physics system converts them to meters when the
/// body is created. A body is only created when `enabled` is set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhysicsBody {
    pub enabled: bool,
    pub body_type: BodyType,
    pub shape_type: ShapeType,
    pub material: PhysicsMaterial,
    /// Full box extents in pixels (Box shape).
    pub size: Vec2,
    /// Circle radius in pixels (Circle shape).
    pub radius: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub is_sensor: bool,
    pub fixed_rotation: bool,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            enabled: false,
            body_type: BodyType::Static,
            shape_type: ShapeType::Box,
            material: PhysicsMaterial::default(),
            size: Vec2::splat(32.0),
            radius: 16.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            is_sensor: false,
            fixed_rotation: false,
        }
    }
}

impl PhysicsBody {
    /// An enabled dynamic box of the given pixel size.
    pub fn dynamic_box(size: Vec2) -> Self {
        Self {
            enabled: true,
            body_type: BodyType::Dynamic,
            shape_type: ShapeType::Box,
            size,
            ..Default::default()
        }
    }

    /// An enabled static box of the given pixel size.
    pub fn static_box(size: Vec2) -> Self {
        Self {
            enabled: true,
            body_type: BodyType::Static,
            shape_type: ShapeType::Box,
            size,
            ..Default::default()
        }
    }

    /// An enabled dynamic circle of the given pixel radius.
    pub fn dynamic_circle(radius: f32) -> Self {
        Self {
            enabled: true,
            body_type: BodyType::Dynamic,
            shape_type: ShapeType::Circle,
            radius,
            ..Default::default()
        }
    }

    pub fn with_body_type(mut self, body_type: BodyType) -> Self {
        self.body_type = body_type;
        self
    }

    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn with_sensor(mut self, is_sensor: bool) -> Self {
        self.is_sensor = is_sensor;
        self
    }

    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        self.fixed_rotation = fixed;
        self
    }
}
