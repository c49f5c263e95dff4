//! Fixed-timestep host loop for the Chained engine, plus the headless
//! commands the `chained` binary exposes.

pub mod commands;
pub mod headless;
pub mod runner;

pub use headless::HeadlessRenderer;
pub use runner::{load_palette, Runner};
