use std::num::NonZeroU32;

use glow::HasContext;

use super::GlBackend;
use crate::engine::components::UniformValue;

impl GlBackend for glow::Context {
    type Shader = <glow::Context as HasContext>::Shader;
    type Program = <glow::Context as HasContext>::Program;
    type Buffer = <glow::Context as HasContext>::Buffer;
    type VertexArray = <glow::Context as HasContext>::VertexArray;
    type Texture = <glow::Context as HasContext>::Texture;
    type UniformLocation = <glow::Context as HasContext>::UniformLocation;

    unsafe fn create_shader(&self, stage: u32) -> Result<Self::Shader, String> {
        HasContext::create_shader(self, stage)
    }

    unsafe fn shader_source(&self, shader: Self::Shader, source: &str) {
        HasContext::shader_source(self, shader, source)
    }

    unsafe fn compile_shader(&self, shader: Self::Shader) {
        HasContext::compile_shader(self, shader)
    }

    unsafe fn get_shader_compile_status(&self, shader: Self::Shader) -> bool {
        HasContext::get_shader_compile_status(self, shader)
    }

    unsafe fn get_shader_info_log(&self, shader: Self::Shader) -> String {
        HasContext::get_shader_info_log(self, shader)
    }

    unsafe fn delete_shader(&self, shader: Self::Shader) {
        HasContext::delete_shader(self, shader)
    }

    unsafe fn create_program(&self) -> Result<Self::Program, String> {
        HasContext::create_program(self)
    }

    unsafe fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        HasContext::attach_shader(self, program, shader)
    }

    unsafe fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        HasContext::detach_shader(self, program, shader)
    }

    unsafe fn link_program(&self, program: Self::Program) {
        HasContext::link_program(self, program)
    }

    unsafe fn get_program_link_status(&self, program: Self::Program) -> bool {
        HasContext::get_program_link_status(self, program)
    }

    unsafe fn get_program_info_log(&self, program: Self::Program) -> String {
        HasContext::get_program_info_log(self, program)
    }

    unsafe fn delete_program(&self, program: Self::Program) {
        HasContext::delete_program(self, program)
    }

    unsafe fn use_program(&self, program: Option<Self::Program>) {
        HasContext::use_program(self, program)
    }

    unsafe fn current_program(&self) -> Option<Self::Program> {
        let name = HasContext::get_parameter_i32(self, glow::CURRENT_PROGRAM);
        NonZeroU32::new(name as u32).map(glow::NativeProgram)
    }

    unsafe fn get_uniform_location(
        &self,
        program: Self::Program,
        name: &str
    ) -> Option<Self::UniformLocation> {
        HasContext::get_uniform_location(self, program, name)
    }

    unsafe fn upload_uniform(&self, location: &Self::UniformLocation, value: &UniformValue<'_>) {
        let loc = Some(location);
        match *value {
            UniformValue::Bool(v) => self.uniform_1_i32(loc, v as i32),
            UniformValue::Int(x) => self.uniform_1_i32(loc, x),
            UniformValue::Int2([x, y]) => self.uniform_2_i32(loc, x, y),
            UniformValue::Int3([x, y, z]) => self.uniform_3_i32(loc, x, y, z),
            UniformValue::Int4([x, y, z, w]) => self.uniform_4_i32(loc, x, y, z, w),
            UniformValue::UInt(x) => self.uniform_1_u32(loc, x),
            UniformValue::UInt2([x, y]) => self.uniform_2_u32(loc, x, y),
            UniformValue::UInt3([x, y, z]) => self.uniform_3_u32(loc, x, y, z),
            UniformValue::UInt4([x, y, z, w]) => self.uniform_4_u32(loc, x, y, z, w),
            UniformValue::Float(x) => self.uniform_1_f32(loc, x),
            UniformValue::Float2([x, y]) => self.uniform_2_f32(loc, x, y),
            UniformValue::Float3([x, y, z]) => self.uniform_3_f32(loc, x, y, z),
            UniformValue::Float4([x, y, z, w]) => self.uniform_4_f32(loc, x, y, z, w),
            UniformValue::IntArray(v) => self.uniform_1_i32_slice(loc, v),
            UniformValue::Int2Array(v) => self.uniform_2_i32_slice(loc, bytemuck::cast_slice(v)),
            UniformValue::Int3Array(v) => self.uniform_3_i32_slice(loc, bytemuck::cast_slice(v)),
            UniformValue::Int4Array(v) => self.uniform_4_i32_slice(loc, bytemuck::cast_slice(v)),
            UniformValue::UIntArray(v) => self.uniform_1_u32_slice(loc, v),
            UniformValue::UInt2Array(v) => self.uniform_2_u32_slice(loc, bytemuck::cast_slice(v)),
            UniformValue::UInt3Array(v) => self.uniform_3_u32_slice(loc, bytemuck::cast_slice(v)),
            UniformValue::UInt4Array(v) => self.uniform_4_u32_slice(loc, bytemuck::cast_slice(v)),
            UniformValue::FloatArray(v) => self.uniform_1_f32_slice(loc, v),
            UniformValue::Float2Array(v) => self.uniform_2_f32_slice(loc, bytemuck::cast_slice(v)),
            UniformValue::Float3Array(v) => self.uniform_3_f32_slice(loc, bytemuck::cast_slice(v)),
            UniformValue::Float4Array(v) => self.uniform_4_f32_slice(loc, bytemuck::cast_slice(v)),
            UniformValue::Mat3 { values, transpose } => {
                self.uniform_matrix_3_f32_slice(loc, transpose, bytemuck::cast_slice(values))
            }
            UniformValue::Mat4 { values, transpose } => {
                self.uniform_matrix_4_f32_slice(loc, transpose, bytemuck::cast_slice(values))
            }
        }
    }

    unsafe fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        HasContext::create_vertex_array(self)
    }

    unsafe fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>) {
        HasContext::bind_vertex_array(self, vertex_array)
    }

    unsafe fn delete_vertex_array(&self, vertex_array: Self::VertexArray) {
        HasContext::delete_vertex_array(self, vertex_array)
    }

    unsafe fn create_buffer(&self) -> Result<Self::Buffer, String> {
        HasContext::create_buffer(self)
    }

    unsafe fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>) {
        HasContext::bind_buffer(self, target, buffer)
    }

    unsafe fn buffer_data_u8_slice(&self, target: u32, data: &[u8], usage: u32) {
        HasContext::buffer_data_u8_slice(self, target, data, usage)
    }

    unsafe fn delete_buffer(&self, buffer: Self::Buffer) {
        HasContext::delete_buffer(self, buffer)
    }

    unsafe fn enable_vertex_attrib_array(&self, index: u32) {
        HasContext::enable_vertex_attrib_array(self, index)
    }

    unsafe fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32
    ) {
        HasContext::vertex_attrib_pointer_f32(self, index, size, data_type, normalized, stride, offset)
    }

    unsafe fn create_texture(&self) -> Result<Self::Texture, String> {
        HasContext::create_texture(self)
    }

    unsafe fn active_texture(&self, unit: u32) {
        HasContext::active_texture(self, unit)
    }

    unsafe fn bind_texture(&self, target: u32, texture: Option<Self::Texture>) {
        HasContext::bind_texture(self, target, texture)
    }

    unsafe fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        HasContext::tex_parameter_i32(self, target, parameter, value)
    }

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
    ) {
        HasContext::tex_image_2d(
            self,
            target,
            level,
            internal_format,
            width,
            height,
            0,
            format,
            ty,
            glow::PixelUnpackData::Slice(pixels)
        )
    }

    unsafe fn generate_mipmap(&self, target: u32) {
        HasContext::generate_mipmap(self, target)
    }

    unsafe fn delete_texture(&self, texture: Self::Texture) {
        HasContext::delete_texture(self, texture)
    }

    unsafe fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32) {
        HasContext::draw_elements(self, mode, count, element_type, offset)
    }

    unsafe fn get_error(&self) -> u32 {
        HasContext::get_error(self)
    }
}
