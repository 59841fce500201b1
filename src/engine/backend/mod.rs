//! The graphics-API boundary.
//!
//! `GlBackend` covers exactly the OpenGL calls made by shader programs, meshes
//! and textures. `glow::Context` implements it for real rendering; the unit
//! tests implement it with a recording double.

mod glow_backend;

#[cfg(test)]
pub(crate) mod recording;

use std::fmt::Debug;

use crate::engine::components::UniformValue;

pub trait GlBackend {
    type Shader: Copy + Debug + Eq;
    type Program: Copy + Debug + Eq;
    type Buffer: Copy + Debug + Eq;
    type VertexArray: Copy + Debug + Eq;
    type Texture: Copy + Debug + Eq;
    type UniformLocation: Clone + Debug;

    unsafe fn create_shader(&self, stage: u32) -> Result<Self::Shader, String>;
    unsafe fn shader_source(&self, shader: Self::Shader, source: &str);
    unsafe fn compile_shader(&self, shader: Self::Shader);
    unsafe fn get_shader_compile_status(&self, shader: Self::Shader) -> bool;
    unsafe fn get_shader_info_log(&self, shader: Self::Shader) -> String;
    unsafe fn delete_shader(&self, shader: Self::Shader);

    unsafe fn create_program(&self) -> Result<Self::Program, String>;
    unsafe fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    unsafe fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    unsafe fn link_program(&self, program: Self::Program);
    unsafe fn get_program_link_status(&self, program: Self::Program) -> bool;
    unsafe fn get_program_info_log(&self, program: Self::Program) -> String;
    unsafe fn delete_program(&self, program: Self::Program);
    unsafe fn use_program(&self, program: Option<Self::Program>);
    unsafe fn current_program(&self) -> Option<Self::Program>;

    unsafe fn get_uniform_location(
        &self,
        program: Self::Program,
        name: &str
    ) -> Option<Self::UniformLocation>;

    /// Writes `value` to `location` of the active program with the matching
    /// `glUniform*` call.
    unsafe fn upload_uniform(&self, location: &Self::UniformLocation, value: &UniformValue<'_>);

    unsafe fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    unsafe fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);
    unsafe fn delete_vertex_array(&self, vertex_array: Self::VertexArray);

    unsafe fn create_buffer(&self) -> Result<Self::Buffer, String>;
    unsafe fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>);
    unsafe fn buffer_data_u8_slice(&self, target: u32, data: &[u8], usage: u32);
    unsafe fn delete_buffer(&self, buffer: Self::Buffer);

    unsafe fn enable_vertex_attrib_array(&self, index: u32);
    unsafe fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32
    );

    unsafe fn create_texture(&self) -> Result<Self::Texture, String>;
    unsafe fn active_texture(&self, unit: u32);
    unsafe fn bind_texture(&self, target: u32, texture: Option<Self::Texture>);
    unsafe fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32);
    #[allow(clippy::too_many_arguments)]
    unsafe fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>
    );
    unsafe fn generate_mipmap(&self, target: u32);
    unsafe fn delete_texture(&self, texture: Self::Texture);

    unsafe fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32);

    unsafe fn get_error(&self) -> u32;
}

// A lost context can report the same error forever.
const MAX_REPORTED_ERRORS: usize = 32;

/// Drains the driver error queue, logging every code. Returns the codes seen.
pub fn report_errors<G: GlBackend>(gl: &G) -> Vec<u32> {
    let mut codes = Vec::new();
    while codes.len() < MAX_REPORTED_ERRORS {
        let code = unsafe { gl.get_error() };
        if code == glow::NO_ERROR {
            break;
        }
        log::error!("OpenGL error code: {:#06x}", code);
        codes.push(code);
    }
    codes
}
