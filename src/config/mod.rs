pub mod duration;
pub mod loader;
pub mod settings;
