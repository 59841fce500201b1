use std::rc::Rc;

use glow::HasContext;

use super::geometry::{ cube, CUBE_POSITIONS };
use super::{
    camera_from_config,
    clear,
    drive_camera,
    load_shader,
    load_texture_or_checkerboard,
    Chapter,
    ChapterError,
    FrameClock,
    InputAction,
    LoopFeedback,
    Viewport,
};
use crate::engine::components::camera::FpsCamera;
use crate::engine::components::mesh::{ Mesh, MeshData };
use crate::engine::components::shader::ShaderProgram;
use crate::engine::components::texture::{ MeshTexture, TextureKind };
use crate::engine::config::AppConfig;
use crate::engine::utils::math::{ mat3x3_normal_matrix, mat4x4_mul, mat4x4_rotate, mat4x4_translate, Vec3 };

const CLEAR_COLOR: [f32; 3] = [0.1, 0.1, 0.1];
const SHININESS: f32 = 32.0;
const LIGHT_AMBIENT: Vec3 = [0.2, 0.2, 0.2];
const LIGHT_DIFFUSE: Vec3 = [0.5, 0.5, 0.5];
const LIGHT_SPECULAR: Vec3 = [1.0, 1.0, 1.0];

struct MeshChapter {
    gl: Rc<glow::Context>,
    viewport: Viewport,
    clock: FrameClock,
    camera: FpsCamera,
    mesh: Mesh,
    shader: ShaderProgram,
}

pub fn bootstrap(gl: Rc<glow::Context>, config: &AppConfig) -> Result<Box<dyn Chapter>, ChapterError> {
    let camera = camera_from_config(config)?;
    let shader = load_shader(&gl, config, "mesh.vert", "mesh.frag")?;

    let diffuse = load_texture_or_checkerboard(&gl, config.assets.diffuse_texture.as_deref(), (
        [150, 111, 51, 255],
        [96, 64, 32, 255],
    ))?;
    // alternating shiny and matte cells
    let specular = load_texture_or_checkerboard(&gl, config.assets.specular_texture.as_deref(), (
        [255, 255, 255, 255],
        [30, 30, 30, 255],
    ))?;

    let (vertices, indices) = cube();
    let data = MeshData::new(vertices, indices, vec![
        MeshTexture::new(diffuse, TextureKind::Diffuse),
        MeshTexture::new(specular, TextureKind::Specular)
    ]);
    let mesh = data.upload(gl.clone())?;

    unsafe {
        gl.enable(glow::DEPTH_TEST);
    }

    Ok(
        Box::new(MeshChapter {
            gl,
            viewport: Viewport::new(config),
            clock: FrameClock::default(),
            camera,
            mesh,
            shader,
        })
    )
}

impl Chapter for MeshChapter {
    fn render_frame(&mut self, time: f32, actions: &[InputAction]) -> LoopFeedback {
        let feedback = self.viewport.handle_actions(&self.gl, actions);
        let dt = self.clock.tick(time);
        drive_camera(&mut self.camera, actions, dt);

        clear(&self.gl, CLEAR_COLOR, true);

        let light_pos: Vec3 = [1.2 * time.cos(), 1.0, 2.0 * time.sin()];
        let view = self.camera.view_matrix();
        let projection = self.camera.projection_matrix(self.viewport.aspect_ratio());

        self.shader.use_program();
        self.shader.set_uniform("view", &view);
        self.shader.set_uniform("projection", &projection);
        self.shader.set_uniform("viewPos", self.camera.position());
        self.shader.set_uniform("material.shininess", SHININESS);
        self.shader.set_uniform("light.position", light_pos);
        self.shader.set_uniform("light.ambient", LIGHT_AMBIENT);
        self.shader.set_uniform("light.diffuse", LIGHT_DIFFUSE);
        self.shader.set_uniform("light.specular", LIGHT_SPECULAR);

        for (i, position) in CUBE_POSITIONS.iter().enumerate() {
            let model = mat4x4_mul(
                mat4x4_translate(position[0], position[1], position[2]),
                mat4x4_rotate((20.0 * (i as f32)).to_radians(), [1.0, 0.3, 0.5])
            );
            let normal_matrix = mat3x3_normal_matrix(&model);
            self.shader.set_uniform("model", &model);
            self.shader.set_uniform("normalMatrix", &normal_matrix);
            self.mesh.draw(&self.shader);
        }

        feedback
    }
}
