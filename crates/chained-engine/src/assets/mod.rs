pub mod atlas;
pub mod palette;
