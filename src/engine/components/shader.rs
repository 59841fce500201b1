//! Vertex + fragment shader programs.
//!
//! A `ShaderProgram` owns exactly one linked program object and deletes it when
//! dropped. Uniforms are set by name through [`ShaderProgram::set_uniform`].

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{ Path, PathBuf };
use std::rc::Rc;

use serde::{ Deserialize, Serialize };

use crate::engine::backend::GlBackend;
use crate::engine::components::UniformValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// What `set_uniform` does when the program has no uniform of that name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingUniformPolicy {
    Ignore,
    /// Log a warning the first time each name is missed.
    #[default]
    Warn,
}

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("shader source {} does not exist", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("shader source {} could not be read", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{stage} shader failed to compile: {log}")]
    CompileFailed {
        stage: ShaderStage,
        log: String,
    },
    #[error("shader program failed to link: {log}")]
    LinkFailed {
        log: String,
    },
    #[error("driver refused to create a shader object: {0}")]
    ObjectCreation(String),
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| {
        let path = path.to_path_buf();
        if source.kind() == io::ErrorKind::NotFound {
            ShaderError::FileNotFound { path, source }
        } else {
            ShaderError::Unreadable { path, source }
        }
    })
}

/// Compiles one stage. A compile failure still hands back the shader object
/// together with the error so the caller decides whether to go on linking.
fn compile_stage<G: GlBackend>(
    gl: &G,
    stage: ShaderStage,
    source: &str
) -> Result<(G::Shader, Option<ShaderError>), ShaderError> {
    unsafe {
        let shader = gl.create_shader(stage.gl_enum()).map_err(ShaderError::ObjectCreation)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
        if gl.get_shader_compile_status(shader) {
            Ok((shader, None))
        } else {
            let log = gl.get_shader_info_log(shader);
            log::error!("{} shader compilation failed:\n{}", stage, log);
            Ok((shader, Some(ShaderError::CompileFailed { stage, log })))
        }
    }
}

pub struct ShaderProgram<G: GlBackend = glow::Context> {
    gl: Rc<G>,
    program: G::Program,
    linked: bool,
    missing_uniforms: MissingUniformPolicy,
    reported_missing: RefCell<HashSet<String>>,
}

impl<G: GlBackend> ShaderProgram<G> {
    /// Reads, compiles and links the two source files. Any compile or link
    /// failure is returned as an error and no program survives.
    pub fn create(
        gl: Rc<G>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>
    ) -> Result<Self, ShaderError> {
        let vertex_src = read_source(vertex_path.as_ref())?;
        let fragment_src = read_source(fragment_path.as_ref())?;
        Self::from_sources(gl, &vertex_src, &fragment_src)
    }

    pub fn from_sources(gl: Rc<G>, vertex_src: &str, fragment_src: &str) -> Result<Self, ShaderError> {
        match Self::build(gl, vertex_src, fragment_src)? {
            (program, None) => Ok(program),
            (_failed, Some(err)) => Err(err),
        }
    }

    /// Like [`create`](Self::create), but a compile or link failure still
    /// yields the program object (unlinked) next to the diagnostic. Missing or
    /// unreadable files are always errors.
    pub fn create_permissive(
        gl: Rc<G>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>
    ) -> Result<(Self, Option<ShaderError>), ShaderError> {
        let vertex_src = read_source(vertex_path.as_ref())?;
        let fragment_src = read_source(fragment_path.as_ref())?;
        Self::build(gl, &vertex_src, &fragment_src)
    }

    pub fn from_sources_permissive(
        gl: Rc<G>,
        vertex_src: &str,
        fragment_src: &str
    ) -> Result<(Self, Option<ShaderError>), ShaderError> {
        Self::build(gl, vertex_src, fragment_src)
    }

    fn build(gl: Rc<G>, vertex_src: &str, fragment_src: &str) -> Result<(Self, Option<ShaderError>), ShaderError> {
        let (vs, vs_error) = compile_stage(gl.as_ref(), ShaderStage::Vertex, vertex_src)?;
        let (fs, fs_error) = match compile_stage(gl.as_ref(), ShaderStage::Fragment, fragment_src) {
            Ok(compiled) => compiled,
            Err(err) => {
                unsafe { gl.delete_shader(vs) };
                return Err(err);
            }
        };

        let program = unsafe {
            match gl.create_program() {
                Ok(program) => program,
                Err(err) => {
                    gl.delete_shader(vs);
                    gl.delete_shader(fs);
                    return Err(ShaderError::ObjectCreation(err));
                }
            }
        };

        let (linked, link_log) = unsafe {
            gl.attach_shader(program, vs);
            gl.attach_shader(program, fs);
            gl.link_program(program);
            gl.detach_shader(program, vs);
            gl.detach_shader(program, fs);
            gl.delete_shader(vs);
            gl.delete_shader(fs);
            (gl.get_program_link_status(program), gl.get_program_info_log(program))
        };

        let shader_program = ShaderProgram {
            gl,
            program,
            linked,
            missing_uniforms: MissingUniformPolicy::default(),
            reported_missing: RefCell::new(HashSet::new()),
        };

        let failure = vs_error.or(fs_error).or_else(|| {
            if linked {
                None
            } else {
                log::error!("shader program linking failed:\n{}", link_log);
                Some(ShaderError::LinkFailed { log: link_log })
            }
        });

        if failure.is_none() {
            log::info!("linked shader program {:?}", shader_program.program);
        }
        Ok((shader_program, failure))
    }

    pub fn with_missing_uniforms(mut self, policy: MissingUniformPolicy) -> Self {
        self.missing_uniforms = policy;
        self
    }

    pub fn handle(&self) -> G::Program {
        self.program
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn use_program(&self) {
        if !self.linked {
            log::warn!("activating shader program {:?} which failed to link", self.program);
        }
        unsafe {
            self.gl.use_program(Some(self.program));
        }
    }

    /// Whether this is the program uniform writes currently go to.
    pub fn is_active(&self) -> bool {
        unsafe { self.gl.current_program() == Some(self.program) }
    }

    /// Writes `value` to the uniform called `name` of the active program.
    ///
    /// The location is looked up on every call. Returns `false` when the
    /// program has no such uniform, in which case nothing is written. Debug
    /// builds warn when another program is active.
    pub fn set_uniform<'a>(&self, name: &str, value: impl Into<UniformValue<'a>>) -> bool {
        let value = value.into();
        match unsafe { self.gl.get_uniform_location(self.program, name) } {
            Some(location) => {
                if cfg!(debug_assertions) && !self.is_active() {
                    log::warn!(
                        "uniform `{}` of program {:?} written while another program is active",
                        name,
                        self.program
                    );
                }
                unsafe {
                    self.gl.upload_uniform(&location, &value);
                }
                true
            }
            None => {
                self.report_missing(name, &value);
                false
            }
        }
    }

    fn report_missing(&self, name: &str, value: &UniformValue<'_>) {
        if self.missing_uniforms == MissingUniformPolicy::Ignore {
            return;
        }
        if self.reported_missing.borrow_mut().insert(name.to_string()) {
            log::warn!(
                "uniform `{}` ({}) not found in shader program {:?}",
                name,
                value.glsl_type(),
                self.program
            );
        }
    }

    /// Deletes the program now instead of at the end of scope.
    pub fn release(self) {
        drop(self);
    }
}

impl<G: GlBackend> fmt::Debug for ShaderProgram<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("program", &self.program)
            .field("linked", &self.linked)
            .field("missing_uniforms", &self.missing_uniforms)
            .finish()
    }
}

impl<G: GlBackend> Drop for ShaderProgram<G> {
    fn drop(&mut self) {
        log::debug!("deleting shader program {:?}", self.program);
        unsafe {
            self.gl.delete_program(self.program);
        }
    }
}
