pub mod backend;
pub mod components;
pub mod config;
pub mod systems;
pub mod utils;

pub use backend::GlBackend;
pub use config::AppConfig;
