pub mod camera;
pub mod mesh;
pub mod shader;
pub mod texture;
pub mod uniform;

pub use camera::{ CameraMovement, CameraSettings, FpsCamera, MovementPace };
pub use mesh::{ Mesh, MeshData, MeshError, Vertex };
pub use shader::{ MissingUniformPolicy, ShaderError, ShaderProgram, ShaderStage };
pub use texture::{ MeshTexture, Texture2D, TextureError, TextureKind, TextureOptions };
pub use uniform::UniformValue;
