use std::rc::Rc;

use glow::HasContext;

use super::geometry::cube;
use super::{
    camera_from_config,
    clear,
    drive_camera,
    load_shader,
    Chapter,
    ChapterError,
    FrameClock,
    InputAction,
    LoopFeedback,
    Viewport,
};
use crate::engine::components::camera::FpsCamera;
use crate::engine::components::mesh::Mesh;
use crate::engine::components::shader::ShaderProgram;
use crate::engine::config::AppConfig;
use crate::engine::utils::math::{ mat3x3_normal_matrix, mat4x4_identity, mat4x4_mul, mat4x4_scale, mat4x4_translate, Vec3 };

const CLEAR_COLOR: [f32; 3] = [0.1, 0.1, 0.1];
const OBJECT_COLOR: Vec3 = [1.0, 0.5, 0.31];
const LIGHT_COLOR: Vec3 = [1.0, 1.0, 1.0];
const LAMP_SCALE: f32 = 0.2;

struct Lighting {
    gl: Rc<glow::Context>,
    viewport: Viewport,
    clock: FrameClock,
    camera: FpsCamera,
    cube: Mesh,
    lamp: Mesh,
    cube_shader: ShaderProgram,
    lamp_shader: ShaderProgram,
}

pub fn bootstrap(gl: Rc<glow::Context>, config: &AppConfig) -> Result<Box<dyn Chapter>, ChapterError> {
    let camera = camera_from_config(config)?;
    let cube_shader = load_shader(&gl, config, "lit_cube.vert", "lit_cube.frag")?;
    let lamp_shader = load_shader(&gl, config, "light_source.vert", "light_source.frag")?;

    let (vertices, indices) = cube();
    let cube = Mesh::new(gl.clone(), vertices.clone(), indices.clone(), Vec::new())?;
    let lamp = Mesh::new(gl.clone(), vertices, indices, Vec::new())?;

    unsafe {
        gl.enable(glow::DEPTH_TEST);
    }

    Ok(
        Box::new(Lighting {
            gl,
            viewport: Viewport::new(config),
            clock: FrameClock::default(),
            camera,
            cube,
            lamp,
            cube_shader,
            lamp_shader,
        })
    )
}

/// The lamp circles the cube once every 2π seconds.
fn light_position(time: f32) -> Vec3 {
    [time.cos(), 1.0, time.sin()]
}

impl Chapter for Lighting {
    fn render_frame(&mut self, time: f32, actions: &[InputAction]) -> LoopFeedback {
        let feedback = self.viewport.handle_actions(&self.gl, actions);
        let dt = self.clock.tick(time);
        drive_camera(&mut self.camera, actions, dt);

        clear(&self.gl, CLEAR_COLOR, true);

        let light_pos = light_position(time);
        let view = self.camera.view_matrix();
        let projection = self.camera.projection_matrix(self.viewport.aspect_ratio());
        let model = mat4x4_identity();
        let normal_matrix = mat3x3_normal_matrix(&model);

        self.cube_shader.use_program();
        self.cube_shader.set_uniform("objectColor", OBJECT_COLOR);
        self.cube_shader.set_uniform("lightColor", LIGHT_COLOR);
        self.cube_shader.set_uniform("lightPos", light_pos);
        self.cube_shader.set_uniform("viewPos", self.camera.position());
        self.cube_shader.set_uniform("model", &model);
        self.cube_shader.set_uniform("normalMatrix", &normal_matrix);
        self.cube_shader.set_uniform("view", &view);
        self.cube_shader.set_uniform("projection", &projection);
        self.cube.draw(&self.cube_shader);

        let lamp_model = mat4x4_mul(
            mat4x4_translate(light_pos[0], light_pos[1], light_pos[2]),
            mat4x4_scale(LAMP_SCALE, LAMP_SCALE, LAMP_SCALE)
        );
        self.lamp_shader.use_program();
        self.lamp_shader.set_uniform("model", &lamp_model);
        self.lamp_shader.set_uniform("view", &view);
        self.lamp_shader.set_uniform("projection", &projection);
        self.lamp_shader.set_uniform("lightColor", LIGHT_COLOR);
        self.lamp.draw(&self.lamp_shader);

        feedback
    }
}
