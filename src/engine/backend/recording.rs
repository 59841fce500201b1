//! Recording stand-in for the OpenGL driver, used by unit tests.
//!
//! It keeps enough driver state to answer the questions the tests ask: what a
//! buffer holds, which uniform has which value, which texture is bound to which
//! unit, which objects are still alive and which error codes were raised. GLSL
//! is checked just deeply enough to produce compile errors for unbalanced or
//! unterminated code and link errors for mismatched stage interfaces.

use std::cell::RefCell;
use std::collections::{ BTreeMap, HashMap, HashSet };

use super::GlBackend;
use crate::engine::components::UniformValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Object {
    Shader(u32),
    Program(u32),
    Buffer(u32),
    VertexArray(u32),
    Texture(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    UseProgram(Option<u32>),
    ActiveTexture(u32),
    BindTexture {
        unit: u32,
        texture: Option<u32>,
    },
    BindVertexArray(Option<u32>),
    DrawElements {
        mode: u32,
        count: i32,
        element_type: u32,
        offset: i32,
    },
    Delete(Object),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RecordedUniform {
    Ints(Vec<i32>),
    UInts(Vec<u32>),
    Floats(Vec<f32>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedLocation {
    program: u32,
    name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AttribPointer {
    pub size: i32,
    pub data_type: u32,
    pub normalized: bool,
    pub stride: i32,
    pub offset: i32,
    pub buffer: Option<u32>,
    pub enabled: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RecordedTexture {
    pub width: i32,
    pub height: i32,
    pub internal_format: i32,
    pub pixels: Vec<u8>,
    pub parameters: HashMap<u32, i32>,
    pub mipmapped: bool,
}

#[derive(Default)]
struct VertexArrayState {
    attribs: BTreeMap<u32, AttribPointer>,
    enabled: HashSet<u32>,
    element_buffer: Option<u32>,
}

struct ShaderState {
    stage: u32,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Default)]
struct ProgramState {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    uniforms: HashSet<String>,
}

#[derive(Default)]
struct State {
    next_name: u32,
    creations_left: Option<usize>,
    live: HashSet<Object>,
    shaders: HashMap<u32, ShaderState>,
    programs: HashMap<u32, ProgramState>,
    current_program: Option<u32>,
    uniforms: HashMap<(u32, String), RecordedUniform>,
    buffers: HashMap<u32, Vec<u8>>,
    array_buffer: Option<u32>,
    vertex_arrays: HashMap<u32, VertexArrayState>,
    bound_vertex_array: Option<u32>,
    textures: HashMap<u32, RecordedTexture>,
    active_unit: u32,
    unit_bindings: BTreeMap<u32, u32>,
    errors: Vec<u32>,
    calls: Vec<Call>,
}

impl State {
    fn create(&mut self, make: impl FnOnce(u32) -> Object) -> Result<u32, String> {
        if let Some(left) = self.creations_left.as_mut() {
            if *left == 0 {
                self.errors.push(glow::OUT_OF_MEMORY);
                return Err("out of memory".to_string());
            }
            *left -= 1;
        }
        self.next_name += 1;
        let name = self.next_name;
        self.live.insert(make(name));
        Ok(name)
    }

    fn delete(&mut self, object: Object) {
        self.calls.push(Call::Delete(object));
        if !self.live.remove(&object) {
            self.errors.push(glow::INVALID_VALUE);
        }
    }

    fn current_vertex_array(&mut self) -> Option<&mut VertexArrayState> {
        let vao = self.bound_vertex_array?;
        self.vertex_arrays.get_mut(&vao)
    }
}

#[derive(Default)]
pub(crate) struct RecordingBackend {
    state: RefCell<State>,
}

impl RecordingBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Every object creation after the next `count` ones fails.
    pub(crate) fn refuse_creation_after(&self, count: usize) {
        self.state.borrow_mut().creations_left = Some(count);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub(crate) fn live_objects(&self) -> usize {
        self.state.borrow().live.len()
    }

    pub(crate) fn is_live(&self, object: Object) -> bool {
        self.state.borrow().live.contains(&object)
    }

    pub(crate) fn current_program(&self) -> Option<u32> {
        self.state.borrow().current_program
    }

    pub(crate) fn uniform(&self, program: u32, name: &str) -> Option<RecordedUniform> {
        self.state.borrow().uniforms.get(&(program, name.to_string())).cloned()
    }

    pub(crate) fn uniform_count(&self, program: u32) -> usize {
        self.state.borrow().uniforms.keys().filter(|(p, _)| *p == program).count()
    }

    pub(crate) fn buffer_data(&self, buffer: u32) -> Option<Vec<u8>> {
        self.state.borrow().buffers.get(&buffer).cloned()
    }

    pub(crate) fn attrib_pointer(&self, vertex_array: u32, index: u32) -> Option<AttribPointer> {
        let state = self.state.borrow();
        let vao = state.vertex_arrays.get(&vertex_array)?;
        let mut pointer = *vao.attribs.get(&index)?;
        pointer.enabled = vao.enabled.contains(&index);
        Some(pointer)
    }

    pub(crate) fn element_buffer(&self, vertex_array: u32) -> Option<u32> {
        self.state.borrow().vertex_arrays.get(&vertex_array)?.element_buffer
    }

    pub(crate) fn bound_vertex_array(&self) -> Option<u32> {
        self.state.borrow().bound_vertex_array
    }

    pub(crate) fn active_unit(&self) -> u32 {
        self.state.borrow().active_unit
    }

    pub(crate) fn texture(&self, texture: u32) -> Option<RecordedTexture> {
        self.state.borrow().textures.get(&texture).cloned()
    }

    pub(crate) fn texture_on_unit(&self, unit: u32) -> Option<u32> {
        self.state.borrow().unit_bindings.get(&unit).copied()
    }
}

fn flatten(value: &UniformValue<'_>) -> RecordedUniform {
    use RecordedUniform::*;

    match *value {
        UniformValue::Bool(v) => Ints(vec![v as i32]),
        UniformValue::Int(x) => Ints(vec![x]),
        UniformValue::Int2(v) => Ints(v.to_vec()),
        UniformValue::Int3(v) => Ints(v.to_vec()),
        UniformValue::Int4(v) => Ints(v.to_vec()),
        UniformValue::UInt(x) => UInts(vec![x]),
        UniformValue::UInt2(v) => UInts(v.to_vec()),
        UniformValue::UInt3(v) => UInts(v.to_vec()),
        UniformValue::UInt4(v) => UInts(v.to_vec()),
        UniformValue::Float(x) => Floats(vec![x]),
        UniformValue::Float2(v) => Floats(v.to_vec()),
        UniformValue::Float3(v) => Floats(v.to_vec()),
        UniformValue::Float4(v) => Floats(v.to_vec()),
        UniformValue::IntArray(v) => Ints(v.to_vec()),
        UniformValue::Int2Array(v) => Ints(bytemuck::cast_slice::<_, i32>(v).to_vec()),
        UniformValue::Int3Array(v) => Ints(bytemuck::cast_slice::<_, i32>(v).to_vec()),
        UniformValue::Int4Array(v) => Ints(bytemuck::cast_slice::<_, i32>(v).to_vec()),
        UniformValue::UIntArray(v) => UInts(v.to_vec()),
        UniformValue::UInt2Array(v) => UInts(bytemuck::cast_slice::<_, u32>(v).to_vec()),
        UniformValue::UInt3Array(v) => UInts(bytemuck::cast_slice::<_, u32>(v).to_vec()),
        UniformValue::UInt4Array(v) => UInts(bytemuck::cast_slice::<_, u32>(v).to_vec()),
        UniformValue::FloatArray(v) => Floats(v.to_vec()),
        UniformValue::Float2Array(v) => Floats(bytemuck::cast_slice::<_, f32>(v).to_vec()),
        UniformValue::Float3Array(v) => Floats(bytemuck::cast_slice::<_, f32>(v).to_vec()),
        UniformValue::Float4Array(v) => Floats(bytemuck::cast_slice::<_, f32>(v).to_vec()),
        UniformValue::Mat3 { values, .. } => Floats(bytemuck::cast_slice::<_, f32>(values).to_vec()),
        UniformValue::Mat4 { values, .. } => Floats(bytemuck::cast_slice::<_, f32>(values).to_vec()),
    }
}

// GLSL inspection

#[derive(Debug, Default)]
struct Interface {
    has_main: bool,
    inputs: Vec<(String, String)>,
    outputs: Vec<(String, String)>,
    uniforms: Vec<String>,
}

fn tokenize(source: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for line in source.lines() {
        let line = line.split("//").next().unwrap_or("");
        if line.trim_start().starts_with('#') {
            continue;
        }
        let mut word = String::new();
        for ch in line.chars() {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' {
                word.push(ch);
                continue;
            }
            if !word.is_empty() {
                tokens.push(std::mem::take(&mut word));
            }
            if !ch.is_whitespace() {
                tokens.push(ch.to_string());
            }
        }
        if !word.is_empty() {
            tokens.push(word);
        }
    }
    tokens
}

fn check_syntax(source: &str) -> Result<Vec<String>, String> {
    if !source.lines().any(|l| l.trim_start().starts_with("#version")) {
        return Err("0:1(1): error: missing #version directive".to_string());
    }

    let tokens = tokenize(source);
    let mut braces = 0i32;
    let mut parens = 0i32;
    let mut previous: Option<&str> = None;

    for token in &tokens {
        match token.as_str() {
            "{" => braces += 1,
            "}" => {
                if !matches!(previous, Some(";") | Some("{") | Some("}")) {
                    return Err(format!(
                        "0:0(0): error: syntax error, unexpected '}}' after '{}', expecting ';'",
                        previous.unwrap_or("")
                    ));
                }
                braces -= 1;
            }
            "(" => parens += 1,
            ")" => parens -= 1,
            t if t.len() == 1 && "@$`\\\"'".contains(t) => {
                return Err(format!("0:0(0): error: syntax error, unexpected '{}'", t));
            }
            _ => {}
        }
        if braces < 0 || parens < 0 {
            return Err(format!("0:0(0): error: syntax error, unexpected '{}'", token));
        }
        previous = Some(token.as_str());
    }

    if braces != 0 || parens != 0 {
        return Err("0:0(0): error: syntax error, unexpected end of file".to_string());
    }
    Ok(tokens)
}

fn inspect(tokens: &[String]) -> Interface {
    let mut interface = Interface::default();
    let mut structs: HashMap<String, Vec<String>> = HashMap::new();
    let mut depth = 0i32;
    let mut i = 0;

    let array_len = |at: usize| -> Option<usize> {
        if tokens.get(at).map(String::as_str) == Some("[") {
            tokens.get(at + 1)?.parse().ok()
        } else {
            None
        }
    };

    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "{" => depth += 1,
            "}" => depth -= 1,
            "struct" if depth == 0 => {
                let name = tokens.get(i + 1).cloned().unwrap_or_default();
                let mut members = Vec::new();
                let mut j = i + 3;
                while j + 1 < tokens.len() && tokens[j] != "}" {
                    members.push(tokens[j + 1].clone());
                    while j < tokens.len() && tokens[j] != ";" {
                        j += 1;
                    }
                    j += 1;
                }
                structs.insert(name, members);
                i = j + 1;
                continue;
            }
            "uniform" if depth == 0 => {
                if let (Some(ty), Some(name)) = (tokens.get(i + 1), tokens.get(i + 2)) {
                    if let Some(members) = structs.get(ty) {
                        for member in members {
                            interface.uniforms.push(format!("{}.{}", name, member));
                        }
                    } else {
                        interface.uniforms.push(name.clone());
                        if let Some(len) = array_len(i + 3) {
                            for k in 0..len {
                                interface.uniforms.push(format!("{}[{}]", name, k));
                            }
                        }
                    }
                }
            }
            "in" | "out" if depth == 0 => {
                if let (Some(ty), Some(name)) = (tokens.get(i + 1), tokens.get(i + 2)) {
                    let entry = (ty.clone(), name.clone());
                    if token == "in" {
                        interface.inputs.push(entry);
                    } else {
                        interface.outputs.push(entry);
                    }
                }
            }
            "main" if depth == 0 && i > 0 && tokens[i - 1] == "void" => {
                interface.has_main = true;
            }
            _ => {}
        }
        i += 1;
    }
    interface
}

impl GlBackend for RecordingBackend {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;
    type Texture = u32;
    type UniformLocation = RecordedLocation;

    unsafe fn create_shader(&self, stage: u32) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let name = state.create(Object::Shader)?;
        state.shaders.insert(name, ShaderState {
            stage,
            source: String::new(),
            compiled: false,
            log: String::new(),
        });
        Ok(name)
    }

    unsafe fn shader_source(&self, shader: u32, source: &str) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
            s.source = source.to_string();
        }
    }

    unsafe fn compile_shader(&self, shader: u32) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
            match check_syntax(&s.source) {
                Ok(_) => {
                    s.compiled = true;
                    s.log.clear();
                }
                Err(log) => {
                    s.compiled = false;
                    s.log = log;
                }
            }
        }
    }

    unsafe fn get_shader_compile_status(&self, shader: u32) -> bool {
        self.state.borrow().shaders.get(&shader).map_or(false, |s| s.compiled)
    }

    unsafe fn get_shader_info_log(&self, shader: u32) -> String {
        self.state.borrow().shaders.get(&shader).map(|s| s.log.clone()).unwrap_or_default()
    }

    unsafe fn delete_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        state.shaders.remove(&shader);
        state.delete(Object::Shader(shader));
    }

    unsafe fn create_program(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let name = state.create(Object::Program)?;
        state.programs.insert(name, ProgramState::default());
        Ok(name)
    }

    unsafe fn attach_shader(&self, program: u32, shader: u32) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program) {
            p.attached.push(shader);
        }
    }

    unsafe fn detach_shader(&self, program: u32, shader: u32) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program) {
            p.attached.retain(|s| *s != shader);
        }
    }

    unsafe fn link_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        let attached = match state.programs.get(&program) {
            Some(p) => p.attached.clone(),
            None => {
                state.errors.push(glow::INVALID_VALUE);
                return;
            }
        };

        let mut vertex = None;
        let mut fragment = None;
        let mut log = String::new();
        for shader in attached {
            let Some(s) = state.shaders.get(&shader) else {
                continue;
            };
            if !s.compiled {
                log = "error: linking with uncompiled/unspecialized shader".to_string();
                break;
            }
            let interface = check_syntax(&s.source).map(|t| inspect(&t)).unwrap_or_default();
            if s.stage == glow::VERTEX_SHADER {
                vertex = Some(interface);
            } else if s.stage == glow::FRAGMENT_SHADER {
                fragment = Some(interface);
            }
        }

        let mut uniforms = HashSet::new();
        if log.is_empty() {
            match (vertex, fragment) {
                (Some(vs), Some(fs)) => {
                    if !vs.has_main {
                        log = "error: vertex shader lacks `main'".to_string();
                    } else if !fs.has_main {
                        log = "error: fragment shader lacks `main'".to_string();
                    } else if
                        let Some((ty, name)) = fs.inputs.iter().find(|input| !vs.outputs.contains(input))
                    {
                        log = format!(
                            "error: fragment shader input `{}' ({}) has no matching output in the previous stage",
                            name,
                            ty
                        );
                    }
                    uniforms.extend(vs.uniforms);
                    uniforms.extend(fs.uniforms);
                }
                _ => {
                    log = "error: program needs one vertex and one fragment shader".to_string();
                }
            }
        }

        if let Some(p) = state.programs.get_mut(&program) {
            p.linked = log.is_empty();
            p.uniforms = if p.linked { uniforms } else { HashSet::new() };
            p.log = log;
        }
    }

    unsafe fn get_program_link_status(&self, program: u32) -> bool {
        self.state.borrow().programs.get(&program).map_or(false, |p| p.linked)
    }

    unsafe fn get_program_info_log(&self, program: u32) -> String {
        self.state.borrow().programs.get(&program).map(|p| p.log.clone()).unwrap_or_default()
    }

    unsafe fn delete_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program);
        if state.current_program == Some(program) {
            state.current_program = None;
        }
        state.delete(Object::Program(program));
    }

    unsafe fn use_program(&self, program: Option<u32>) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::UseProgram(program));
        match program {
            None => state.current_program = None,
            Some(p) => {
                if state.programs.get(&p).map_or(false, |p| p.linked) {
                    state.current_program = Some(p);
                } else {
                    state.errors.push(glow::INVALID_OPERATION);
                }
            }
        }
    }

    unsafe fn current_program(&self) -> Option<u32> {
        self.state.borrow().current_program
    }

    unsafe fn get_uniform_location(&self, program: u32, name: &str) -> Option<RecordedLocation> {
        let state = self.state.borrow();
        let p = state.programs.get(&program)?;
        if p.linked && p.uniforms.contains(name) {
            Some(RecordedLocation { program, name: name.to_string() })
        } else {
            None
        }
    }

    unsafe fn upload_uniform(&self, location: &RecordedLocation, value: &UniformValue<'_>) {
        let mut state = self.state.borrow_mut();
        if state.current_program != Some(location.program) {
            state.errors.push(glow::INVALID_OPERATION);
            return;
        }
        state.uniforms.insert((location.program, location.name.clone()), flatten(value));
    }

    unsafe fn create_vertex_array(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let name = state.create(Object::VertexArray)?;
        state.vertex_arrays.insert(name, VertexArrayState::default());
        Ok(name)
    }

    unsafe fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::BindVertexArray(vertex_array));
        state.bound_vertex_array = vertex_array;
    }

    unsafe fn delete_vertex_array(&self, vertex_array: u32) {
        let mut state = self.state.borrow_mut();
        state.vertex_arrays.remove(&vertex_array);
        if state.bound_vertex_array == Some(vertex_array) {
            state.bound_vertex_array = None;
        }
        state.delete(Object::VertexArray(vertex_array));
    }

    unsafe fn create_buffer(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let name = state.create(Object::Buffer)?;
        state.buffers.insert(name, Vec::new());
        Ok(name)
    }

    unsafe fn bind_buffer(&self, target: u32, buffer: Option<u32>) {
        let mut state = self.state.borrow_mut();
        if target == glow::ARRAY_BUFFER {
            state.array_buffer = buffer;
        } else if target == glow::ELEMENT_ARRAY_BUFFER {
            match state.current_vertex_array() {
                Some(vao) => vao.element_buffer = buffer,
                None => state.errors.push(glow::INVALID_OPERATION),
            }
        } else {
            state.errors.push(glow::INVALID_ENUM);
        }
    }

    unsafe fn buffer_data_u8_slice(&self, target: u32, data: &[u8], _usage: u32) {
        let mut state = self.state.borrow_mut();
        let bound = if target == glow::ARRAY_BUFFER {
            state.array_buffer
        } else {
            state.current_vertex_array().and_then(|vao| vao.element_buffer)
        };
        match bound {
            Some(buffer) => {
                state.buffers.insert(buffer, data.to_vec());
            }
            None => state.errors.push(glow::INVALID_OPERATION),
        }
    }

    unsafe fn delete_buffer(&self, buffer: u32) {
        let mut state = self.state.borrow_mut();
        state.buffers.remove(&buffer);
        if state.array_buffer == Some(buffer) {
            state.array_buffer = None;
        }
        state.delete(Object::Buffer(buffer));
    }

    unsafe fn enable_vertex_attrib_array(&self, index: u32) {
        let mut state = self.state.borrow_mut();
        match state.current_vertex_array() {
            Some(vao) => {
                vao.enabled.insert(index);
            }
            None => state.errors.push(glow::INVALID_OPERATION),
        }
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
        let mut state = self.state.borrow_mut();
        let buffer = state.array_buffer;
        if buffer.is_none() {
            state.errors.push(glow::INVALID_OPERATION);
            return;
        }
        match state.current_vertex_array() {
            Some(vao) => {
                vao.attribs.insert(index, AttribPointer {
                    size,
                    data_type,
                    normalized,
                    stride,
                    offset,
                    buffer,
                    enabled: false,
                });
            }
            None => state.errors.push(glow::INVALID_OPERATION),
        }
    }

    unsafe fn create_texture(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let name = state.create(Object::Texture)?;
        state.textures.insert(name, RecordedTexture::default());
        Ok(name)
    }

    unsafe fn active_texture(&self, unit: u32) {
        let mut state = self.state.borrow_mut();
        if !(glow::TEXTURE0..glow::TEXTURE0 + 32).contains(&unit) {
            state.errors.push(glow::INVALID_ENUM);
            return;
        }
        let index = unit - glow::TEXTURE0;
        state.calls.push(Call::ActiveTexture(index));
        state.active_unit = index;
    }

    unsafe fn bind_texture(&self, _target: u32, texture: Option<u32>) {
        let mut state = self.state.borrow_mut();
        let unit = state.active_unit;
        state.calls.push(Call::BindTexture { unit, texture });
        match texture {
            Some(t) => {
                state.unit_bindings.insert(unit, t);
            }
            None => {
                state.unit_bindings.remove(&unit);
            }
        }
    }

    unsafe fn tex_parameter_i32(&self, _target: u32, parameter: u32, value: i32) {
        let mut state = self.state.borrow_mut();
        let unit = state.active_unit;
        match state.unit_bindings.get(&unit).copied() {
            Some(t) => {
                if let Some(tex) = state.textures.get_mut(&t) {
                    tex.parameters.insert(parameter, value);
                }
            }
            None => state.errors.push(glow::INVALID_OPERATION),
        }
    }

    unsafe fn tex_image_2d(
        &self,
        _target: u32,
        _level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        _format: u32,
        _ty: u32,
        pixels: Option<&[u8]>
    ) {
        let mut state = self.state.borrow_mut();
        let unit = state.active_unit;
        match state.unit_bindings.get(&unit).copied() {
            Some(t) => {
                if let Some(tex) = state.textures.get_mut(&t) {
                    tex.width = width;
                    tex.height = height;
                    tex.internal_format = internal_format;
                    tex.pixels = pixels.map(<[u8]>::to_vec).unwrap_or_default();
                }
            }
            None => state.errors.push(glow::INVALID_OPERATION),
        }
    }

    unsafe fn generate_mipmap(&self, _target: u32) {
        let mut state = self.state.borrow_mut();
        let unit = state.active_unit;
        match state.unit_bindings.get(&unit).copied() {
            Some(t) => {
                if let Some(tex) = state.textures.get_mut(&t) {
                    tex.mipmapped = true;
                }
            }
            None => state.errors.push(glow::INVALID_OPERATION),
        }
    }

    unsafe fn delete_texture(&self, texture: u32) {
        let mut state = self.state.borrow_mut();
        state.textures.remove(&texture);
        state.unit_bindings.retain(|_, t| *t != texture);
        state.delete(Object::Texture(texture));
    }

    unsafe fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::DrawElements { mode, count, element_type, offset });

        let element_size = match element_type {
            glow::UNSIGNED_INT => 4,
            glow::UNSIGNED_SHORT => 2,
            glow::UNSIGNED_BYTE => 1,
            _ => {
                state.errors.push(glow::INVALID_ENUM);
                return;
            }
        };
        if state.current_program.is_none() {
            state.errors.push(glow::INVALID_OPERATION);
            return;
        }
        let Some(element_buffer) = state.current_vertex_array().and_then(|vao| vao.element_buffer) else {
            state.errors.push(glow::INVALID_OPERATION);
            return;
        };
        let available = state.buffers.get(&element_buffer).map_or(0, Vec::len);
        if (offset as usize) + (count as usize) * element_size > available {
            state.errors.push(glow::INVALID_OPERATION);
        }
    }

    unsafe fn get_error(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        if state.errors.is_empty() {
            glow::NO_ERROR
        } else {
            state.errors.remove(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn struct_uniforms_expand_to_member_names() {
        let source = "#version 330 core
            struct Material { sampler2D texture_diffuse1; float shininess; };
            uniform Material material;
            uniform mat4 model;
            uniform vec3 lights[2];
            void main() { }";
        let tokens = check_syntax(source).expect("valid source");
        let interface = inspect(&tokens);
        assert!(interface.uniforms.contains(&"material.texture_diffuse1".to_string()));
        assert!(interface.uniforms.contains(&"material.shininess".to_string()));
        assert!(interface.uniforms.contains(&"model".to_string()));
        assert!(interface.uniforms.contains(&"lights[1]".to_string()));
        assert!(interface.has_main);
    }

    #[test]
    fn missing_semicolon_is_a_syntax_error() {
        let source = "#version 330 core\nvoid main() { gl_Position = vec4(0.0) }";
        assert!(check_syntax(source).unwrap_err().contains("syntax error"));
    }

    #[test]
    fn layout_qualified_inputs_are_found() {
        let source = "#version 330 core
            layout (location = 0) in vec3 aPos;
            out vec2 TexCoord;
            void main() { TexCoord = aPos.xy; }";
        let interface = inspect(&check_syntax(source).unwrap());
        assert_eq!(interface.inputs, vec![("vec3".to_string(), "aPos".to_string())]);
        assert_eq!(interface.outputs, vec![("vec2".to_string(), "TexCoord".to_string())]);
    }
}
