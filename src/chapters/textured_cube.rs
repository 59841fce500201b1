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
use crate::engine::components::mesh::Mesh;
use crate::engine::components::shader::ShaderProgram;
use crate::engine::components::texture::{ MeshTexture, TextureKind };
use crate::engine::config::AppConfig;
use crate::engine::utils::math::{ mat4x4_mul, mat4x4_rotate, mat4x4_translate };

const CLEAR_COLOR: [f32; 3] = [0.2, 0.3, 0.3];
const MIX_VALUE: f32 = 0.2;

struct TexturedCube {
    gl: Rc<glow::Context>,
    viewport: Viewport,
    clock: FrameClock,
    camera: FpsCamera,
    mesh: Mesh,
    shader: ShaderProgram,
}

pub fn bootstrap(gl: Rc<glow::Context>, config: &AppConfig) -> Result<Box<dyn Chapter>, ChapterError> {
    let camera = camera_from_config(config)?;
    let shader = load_shader(&gl, config, "textured_cube.vert", "textured_cube.frag")?;

    let wall = load_texture_or_checkerboard(&gl, config.assets.wall_texture.as_deref(), (
        [181, 101, 29, 255],
        [120, 66, 18, 255],
    ))?;
    let face = load_texture_or_checkerboard(&gl, config.assets.face_texture.as_deref(), (
        [255, 255, 255, 0],
        [255, 204, 0, 255],
    ))?;
    let textures = vec![
        MeshTexture::new(wall, TextureKind::Diffuse),
        MeshTexture::new(face, TextureKind::Diffuse)
    ];

    let (vertices, indices) = cube();
    let mesh = Mesh::new(gl.clone(), vertices, indices, textures)?;

    unsafe {
        gl.enable(glow::DEPTH_TEST);
    }

    Ok(
        Box::new(TexturedCube {
            gl,
            viewport: Viewport::new(config),
            clock: FrameClock::default(),
            camera,
            mesh,
            shader,
        })
    )
}

impl Chapter for TexturedCube {
    fn render_frame(&mut self, time: f32, actions: &[InputAction]) -> LoopFeedback {
        let feedback = self.viewport.handle_actions(&self.gl, actions);
        let dt = self.clock.tick(time);
        drive_camera(&mut self.camera, actions, dt);

        clear(&self.gl, CLEAR_COLOR, true);

        let view = self.camera.view_matrix();
        let projection = self.camera.projection_matrix(self.viewport.aspect_ratio());

        self.shader.use_program();
        self.shader.set_uniform("view", &view);
        self.shader.set_uniform("projection", &projection);
        self.shader.set_uniform("mixValue", MIX_VALUE);

        for (i, position) in CUBE_POSITIONS.iter().enumerate() {
            let angle = (20.0 * (i as f32)).to_radians() + time;
            let model = mat4x4_mul(
                mat4x4_translate(position[0], position[1], position[2]),
                mat4x4_rotate(angle, [0.5, 1.0, 0.0])
            );
            self.shader.set_uniform("model", &model);
            self.mesh.draw(&self.shader);
        }

        feedback
    }
}
