use std::rc::Rc;

use super::geometry::triangle;
use super::{ clear, Chapter, ChapterError, InputAction, LoopFeedback, Viewport };
use crate::engine::components::mesh::Mesh;
use crate::engine::components::shader::ShaderProgram;
use crate::engine::config::AppConfig;

const VERTEX_SRC: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
void main() {
    gl_Position = vec4(aPos.x, aPos.y, aPos.z, 1.0);
}
";

const FRAGMENT_SRC: &str = "#version 330 core
out vec4 FragColor;
void main() {
    FragColor = vec4(1.0, 0.5, 0.2, 1.0);
}
";

const CLEAR_COLOR: [f32; 3] = [0.2, 0.3, 0.3];

struct HelloTriangle {
    gl: Rc<glow::Context>,
    viewport: Viewport,
    // declared before the shader so the mesh is released first
    mesh: Mesh,
    shader: ShaderProgram,
}

pub fn bootstrap(gl: Rc<glow::Context>, config: &AppConfig) -> Result<Box<dyn Chapter>, ChapterError> {
    let shader = ShaderProgram::from_sources(gl.clone(), VERTEX_SRC, FRAGMENT_SRC)?
        .with_missing_uniforms(config.missing_uniforms);
    let (vertices, indices) = triangle();
    let mesh = Mesh::new(gl.clone(), vertices, indices, Vec::new())?;

    Ok(Box::new(HelloTriangle { gl, viewport: Viewport::new(config), mesh, shader }))
}

impl Chapter for HelloTriangle {
    fn render_frame(&mut self, _time: f32, actions: &[InputAction]) -> LoopFeedback {
        let feedback = self.viewport.handle_actions(&self.gl, actions);
        clear(&self.gl, CLEAR_COLOR, false);
        self.mesh.draw(&self.shader);
        feedback
    }
}
