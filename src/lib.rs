//! OpenGL tutorial chapters built on a small set of RAII helpers: shader
//! programs, textures and indexed meshes over a `glow` context.

pub mod chapters;
pub mod engine;
