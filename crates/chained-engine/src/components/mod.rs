pub mod object;
pub mod physics_body;
