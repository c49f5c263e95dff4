pub mod menu;
pub mod play;
