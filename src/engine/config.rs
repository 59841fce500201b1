//! Runner configuration, read from an optional JSON file. Every field has a
//! default, so a partial file only overrides what it names.

use std::path::{ Path, PathBuf };

use serde::{ Deserialize, Serialize };

use crate::engine::components::camera::CameraSettings;
use crate::engine::components::shader::MissingUniformPolicy;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    /// Defaults to the chapter name.
    pub title: Option<String>,
    pub gl_version: [u8; 2],
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: None,
            gl_version: [3, 3],
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub shader_dir: PathBuf,
    pub wall_texture: Option<PathBuf>,
    pub face_texture: Option<PathBuf>,
    pub diffuse_texture: Option<PathBuf>,
    pub specular_texture: Option<PathBuf>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            shader_dir: PathBuf::from("assets/shaders"),
            wall_texture: None,
            face_texture: None,
            diffuse_texture: None,
            specular_texture: None,
        }
    }
}

impl AssetConfig {
    pub fn shader_path(&self, file_name: &str) -> PathBuf {
        self.shader_dir.join(file_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub assets: AssetConfig,
    pub camera: CameraSettings,
    pub missing_uniforms: MissingUniformPolicy,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that parse but cannot drive a window or a camera.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(
                ConfigError::Invalid(format!("window size {}x{} has a zero side", self.window.width, self.window.height))
            );
        }

        let camera = &self.camera;
        let bounds_ok = camera.min_fov > 0.0 && camera.max_fov < 180.0 && camera.min_fov <= camera.max_fov;
        if !bounds_ok {
            return Err(
                ConfigError::Invalid(
                    format!(
                        "camera fov bounds must satisfy 0 < min_fov <= max_fov < 180, got min_fov {} and max_fov {}",
                        camera.min_fov,
                        camera.max_fov
                    )
                )
            );
        }
        if !camera.fov.is_finite() {
            return Err(ConfigError::Invalid(format!("camera fov {} is not a number", camera.fov)));
        }
        Ok(())
    }
}
