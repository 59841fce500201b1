use std::fmt;
use std::mem::{ offset_of, size_of };
use std::rc::Rc;

use crate::engine::backend::GlBackend;
use crate::engine::components::shader::ShaderProgram;
use crate::engine::components::texture::{ sampler_names, MeshTexture };

/// Interleaved vertex layout shared by every mesh: attribute 0 is the
/// position, 1 the normal, 2 the texture coordinates.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self { position, normal, tex_coords }
    }
}

// (location, component count, byte offset)
const VERTEX_ATTRIBUTES: [(u32, i32, usize); 3] = [
    (0, 3, offset_of!(Vertex, position)),
    (1, 3, offset_of!(Vertex, normal)),
    (2, 2, offset_of!(Vertex, tex_coords)),
];

/// Minimum number of fragment texture units an OpenGL 3.3 driver provides.
pub const MAX_MESH_TEXTURES: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("driver refused to create a mesh object: {0}")]
    ObjectCreation(String),
    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        index: u32,
        vertex_count: usize,
    },
    #[error("{count} textures exceed the {max} available texture units")]
    TooManyTextures {
        count: usize,
        max: usize,
    },
}

/// Mesh contents that have not been uploaded yet.
pub struct MeshData<G: GlBackend = glow::Context> {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub textures: Vec<MeshTexture<G>>,
}

impl<G: GlBackend> MeshData<G> {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>, textures: Vec<MeshTexture<G>>) -> Self {
        Self { vertices, indices, textures }
    }

    fn validate(&self) -> Result<(), MeshError> {
        if self.textures.len() > MAX_MESH_TEXTURES {
            return Err(MeshError::TooManyTextures {
                count: self.textures.len(),
                max: MAX_MESH_TEXTURES,
            });
        }
        if let Some(&index) = self.indices.iter().find(|&&i| (i as usize) >= self.vertices.len()) {
            return Err(MeshError::IndexOutOfRange { index, vertex_count: self.vertices.len() });
        }
        Ok(())
    }

    /// Creates the vertex array and both buffers and fills them.
    pub fn upload(self, gl: Rc<G>) -> Result<Mesh<G>, MeshError> {
        self.validate()?;

        let (vao, vbo, ebo) = unsafe {
            let vao = gl.create_vertex_array().map_err(MeshError::ObjectCreation)?;
            let vbo = match gl.create_buffer() {
                Ok(vbo) => vbo,
                Err(err) => {
                    gl.delete_vertex_array(vao);
                    return Err(MeshError::ObjectCreation(err));
                }
            };
            let ebo = match gl.create_buffer() {
                Ok(ebo) => ebo,
                Err(err) => {
                    gl.delete_buffer(vbo);
                    gl.delete_vertex_array(vao);
                    return Err(MeshError::ObjectCreation(err));
                }
            };
            (vao, vbo, ebo)
        };

        unsafe {
            gl.bind_vertex_array(Some(vao));

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&self.vertices),
                glow::STATIC_DRAW
            );

            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&self.indices),
                glow::STATIC_DRAW
            );

            let stride = size_of::<Vertex>() as i32;
            for (location, size, offset) in VERTEX_ATTRIBUTES {
                gl.enable_vertex_attrib_array(location);
                gl.vertex_attrib_pointer_f32(location, size, glow::FLOAT, false, stride, offset as i32);
            }

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }

        log::info!(
            "uploaded mesh {:?}: {} vertices, {} indices, {} textures",
            vao,
            self.vertices.len(),
            self.indices.len(),
            self.textures.len()
        );

        let sampler_names = sampler_names(self.textures.iter().map(|t| &t.kind));
        Ok(Mesh {
            gl,
            vertices: self.vertices,
            indices: self.indices,
            textures: self.textures,
            sampler_names,
            vao,
            vbo,
            ebo,
        })
    }
}

/// Uploaded geometry plus the textures bound when it is drawn.
pub struct Mesh<G: GlBackend = glow::Context> {
    gl: Rc<G>,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    textures: Vec<MeshTexture<G>>,
    sampler_names: Vec<String>,
    vao: G::VertexArray,
    vbo: G::Buffer,
    ebo: G::Buffer,
}

impl<G: GlBackend> Mesh<G> {
    pub fn new(
        gl: Rc<G>,
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        textures: Vec<MeshTexture<G>>
    ) -> Result<Self, MeshError> {
        MeshData::new(vertices, indices, textures).upload(gl)
    }

    /// Binds every texture to its own unit, points the matching
    /// `material.*` sampler at it and draws all indices as triangles.
    pub fn draw(&self, shader: &ShaderProgram<G>) {
        shader.use_program();

        for (unit, (texture, sampler)) in self.textures.iter().zip(&self.sampler_names).enumerate() {
            unsafe {
                self.gl.active_texture(glow::TEXTURE0 + unit as u32);
            }
            shader.set_uniform(sampler, unit as i32);
            unsafe {
                self.gl.bind_texture(glow::TEXTURE_2D, Some(texture.texture.handle()));
            }
        }

        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl.draw_elements(glow::TRIANGLES, self.index_count() as i32, glow::UNSIGNED_INT, 0);
            self.gl.active_texture(glow::TEXTURE0);
            self.gl.bind_vertex_array(None);
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn textures(&self) -> &[MeshTexture<G>] {
        &self.textures
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn vertex_array(&self) -> G::VertexArray {
        self.vao
    }
}

impl<G: GlBackend> fmt::Debug for Mesh<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("vao", &self.vao)
            .field("vertices", &self.vertices.len())
            .field("indices", &self.indices.len())
            .field("textures", &self.textures)
            .finish()
    }
}

impl<G: GlBackend> Drop for Mesh<G> {
    fn drop(&mut self) {
        log::debug!("deleting mesh {:?}", self.vao);
        unsafe {
            self.gl.delete_vertex_array(self.vao);
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_buffer(self.ebo);
        }
    }
}
