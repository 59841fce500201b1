//! The tutorial chapters.
//!
//! A chapter owns its GPU resources and draws one frame at a time. It never
//! sees the window or the event loop: the runner hands it the elapsed time and
//! the [`InputAction`]s gathered since the previous frame.

use std::path::Path;
use std::rc::Rc;

use glow::HasContext;
use image::DynamicImage;

use crate::engine::components::camera::FpsCamera;
use crate::engine::components::shader::{ ShaderError, ShaderProgram };
use crate::engine::components::texture::{ checkerboard, Texture2D, TextureError, TextureOptions };
use crate::engine::components::mesh::MeshError;
use crate::engine::config::{ AppConfig, ConfigError };

pub use crate::engine::systems::input_system::InputAction;

pub mod geometry;
mod hello_triangle;
mod hello_window;
mod lighting;
mod mesh;
mod textured_cube;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopFeedback {
    Continue,
    Exit,
}

pub trait Chapter {
    /// Draws one frame. `time` is in seconds since the chapter started.
    fn render_frame(&mut self, time: f32, actions: &[InputAction]) -> LoopFeedback;
}

#[derive(Debug, thiserror::Error)]
pub enum ChapterError {
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("unknown chapter `{0}`, run with --list to see them all")]
    UnknownChapter(String),
}

pub type Bootstrap = fn(Rc<glow::Context>, &AppConfig) -> Result<Box<dyn Chapter>, ChapterError>;

pub struct ChapterEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub bootstrap: Bootstrap,
}

pub const CHAPTERS: &[ChapterEntry] = &[
    ChapterEntry {
        name: "hello-window",
        description: "Open a window and clear it every frame",
        bootstrap: hello_window::bootstrap,
    },
    ChapterEntry {
        name: "hello-triangle",
        description: "One triangle from inline GLSL",
        bootstrap: hello_triangle::bootstrap,
    },
    ChapterEntry {
        name: "textured-cube",
        description: "Ten spinning cubes blending two textures, with a fly camera",
        bootstrap: textured_cube::bootstrap,
    },
    ChapterEntry {
        name: "lighting",
        description: "Phong-lit cube around an orbiting lamp",
        bootstrap: lighting::bootstrap,
    },
    ChapterEntry {
        name: "mesh",
        description: "Mesh with diffuse and specular maps bound through material samplers",
        bootstrap: mesh::bootstrap,
    },
];

pub fn find(name: &str) -> Result<&'static ChapterEntry, ChapterError> {
    CHAPTERS.iter()
        .find(|entry| entry.name == name)
        .ok_or_else(|| ChapterError::UnknownChapter(name.to_string()))
}

/// Drawable area in pixels, kept in sync with `Resized` actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(config: &AppConfig) -> Self {
        Self { width: config.window.width, height: config.window.height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        (self.width as f32) / (self.height.max(1) as f32)
    }

    /// Applies resizes and reports whether the chapter should stop.
    pub fn handle_actions(&mut self, gl: &glow::Context, actions: &[InputAction]) -> LoopFeedback {
        let mut feedback = LoopFeedback::Continue;
        for action in actions {
            match *action {
                InputAction::Quit => {
                    feedback = LoopFeedback::Exit;
                }
                InputAction::Resized { width, height } => {
                    self.width = width;
                    self.height = height;
                    unsafe {
                        gl.viewport(0, 0, width as i32, height as i32);
                    }
                }
                _ => {}
            }
        }
        feedback
    }
}

/// The chapters' fly camera, three units back from the origin.
pub(crate) fn camera_from_config(config: &AppConfig) -> Result<FpsCamera, ChapterError> {
    config.validate()?;
    Ok(FpsCamera::new([0.0, 0.0, 3.0], config.camera))
}

/// Feeds movement, mouse look and zoom to the camera.
pub(crate) fn drive_camera(camera: &mut FpsCamera, actions: &[InputAction], dt: f32) {
    for action in actions {
        match *action {
            InputAction::Move(direction, pace) => camera.process_movement(direction, pace, dt),
            InputAction::CursorMoved { x, y } => camera.process_mouse(x, y),
            InputAction::Scrolled(lines) => camera.process_scroll(lines),
            InputAction::CursorCaptured(true) => camera.reset_mouse(),
            _ => {}
        }
    }
}

pub(crate) fn load_shader(
    gl: &Rc<glow::Context>,
    config: &AppConfig,
    vertex: &str,
    fragment: &str
) -> Result<ShaderProgram, ChapterError> {
    let program = ShaderProgram::create(
        gl.clone(),
        config.assets.shader_path(vertex),
        config.assets.shader_path(fragment)
    )?;
    Ok(program.with_missing_uniforms(config.missing_uniforms))
}

/// Loads `path` when configured, otherwise uploads a checkerboard in the two
/// given colors.
pub(crate) fn load_texture_or_checkerboard(
    gl: &Rc<glow::Context>,
    path: Option<&Path>,
    colors: ([u8; 4], [u8; 4])
) -> Result<Texture2D, ChapterError> {
    let options = TextureOptions::default();
    let texture = match path {
        Some(path) => Texture2D::load(gl.clone(), path, &options)?,
        None => {
            log::info!("no texture configured, using a checkerboard");
            let image = DynamicImage::ImageRgba8(checkerboard(256, 8, colors.0, colors.1));
            Texture2D::from_image(gl.clone(), &image, &options)?
        }
    };
    Ok(texture)
}

pub(crate) fn clear(gl: &glow::Context, color: [f32; 3], depth: bool) {
    unsafe {
        gl.clear_color(color[0], color[1], color[2], 1.0);
        let mut mask = glow::COLOR_BUFFER_BIT;
        if depth {
            mask |= glow::DEPTH_BUFFER_BIT;
        }
        gl.clear(mask);
    }
}

/// Seconds elapsed since the previous frame.
#[derive(Debug, Default)]
pub(crate) struct FrameClock {
    last_time: Option<f32>,
}

impl FrameClock {
    pub fn tick(&mut self, time: f32) -> f32 {
        let dt = self.last_time.map_or(0.0, |last| (time - last).max(0.0));
        self.last_time = Some(time);
        dt
    }
}
