use serde::{ Deserialize, Serialize };

use crate::engine::utils::math::{
    mat4x4_look_at,
    mat4x4_perspective,
    vec3_add,
    vec3_cross,
    vec3_normalize,
    vec3_scale,
    Mat4x4,
    Vec3,
};

pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;
const PITCH_LIMIT: f32 = 89.0;
const WORLD_UP: Vec3 = [0.0, 1.0, 0.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Shift moves fast, Ctrl moves slow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementPace {
    #[default]
    Normal,
    Fast,
    Slow,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// World units per second.
    pub normal_speed: f32,
    pub fast_speed: f32,
    pub slow_speed: f32,
    /// Degrees per pixel of mouse travel.
    pub sensitivity: f32,
    /// Degrees.
    pub fov: f32,
    pub min_fov: f32,
    pub max_fov: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            normal_speed: 2.5,
            fast_speed: 4.5,
            slow_speed: 0.5,
            sensitivity: 0.1,
            fov: 45.0,
            min_fov: 1.0,
            max_fov: 45.0,
        }
    }
}

impl CameraSettings {
    pub fn speed(&self, pace: MovementPace) -> f32 {
        match pace {
            MovementPace::Normal => self.normal_speed,
            MovementPace::Fast => self.fast_speed,
            MovementPace::Slow => self.slow_speed,
        }
    }

    /// Keeps `fov` within the configured bounds. Inverted bounds resolve to
    /// `max_fov` instead of panicking.
    pub fn clamp_fov(&self, fov: f32) -> f32 {
        fov.max(self.min_fov).min(self.max_fov)
    }
}

/// Free-flying first person camera driven by keyboard, mouse and scroll wheel.
#[derive(Debug, Clone)]
pub struct FpsCamera {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    yaw: f32,
    pitch: f32,
    fov: f32,
    first_mouse: bool,
    last_cursor: [f32; 2],
    settings: CameraSettings,
}

impl FpsCamera {
    pub fn new(position: Vec3, settings: CameraSettings) -> Self {
        let mut camera = Self {
            position,
            front: [0.0, 0.0, -1.0],
            up: WORLD_UP,
            // -90 degrees of yaw looks down -Z, matching the initial front
            yaw: -90.0,
            pitch: 0.0,
            fov: settings.clamp_fov(settings.fov),
            first_mouse: true,
            last_cursor: [0.0, 0.0],
            settings,
        };
        camera.update_front();
        camera
    }

    pub fn process_movement(&mut self, direction: CameraMovement, pace: MovementPace, dt: f32) {
        let velocity = self.settings.speed(pace) * dt;
        let right = vec3_normalize(vec3_cross(self.front, self.up));

        let offset = match direction {
            CameraMovement::Forward => vec3_scale(self.front, velocity),
            CameraMovement::Backward => vec3_scale(self.front, -velocity),
            CameraMovement::Right => vec3_scale(right, velocity),
            CameraMovement::Left => vec3_scale(right, -velocity),
            CameraMovement::Up => vec3_scale(WORLD_UP, velocity),
            CameraMovement::Down => vec3_scale(WORLD_UP, -velocity),
        };
        self.position = vec3_add(self.position, offset);
    }

    /// Cursor position in window pixels. The first call only records it.
    pub fn process_mouse(&mut self, x: f32, y: f32) {
        if self.first_mouse {
            self.last_cursor = [x, y];
            self.first_mouse = false;
            return;
        }

        let x_offset = (x - self.last_cursor[0]) * self.settings.sensitivity;
        // window y grows downwards
        let y_offset = (self.last_cursor[1] - y) * self.settings.sensitivity;
        self.last_cursor = [x, y];

        self.yaw += x_offset;
        self.pitch = (self.pitch + y_offset).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_front();
    }

    /// Forget the last cursor position, e.g. after the cursor was released
    /// and captured again.
    pub fn reset_mouse(&mut self) {
        self.first_mouse = true;
    }

    pub fn process_scroll(&mut self, dy: f32) {
        self.fov = self.settings.clamp_fov(self.fov - dy);
    }

    fn update_front(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = vec3_normalize([yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()]);
    }

    pub fn view_matrix(&self) -> Mat4x4 {
        mat4x4_look_at(self.position, vec3_add(self.position, self.front), self.up)
    }

    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4x4 {
        mat4x4_perspective(self.fov.to_radians(), aspect_ratio, NEAR_PLANE, FAR_PLANE)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }
}

impl Default for FpsCamera {
    fn default() -> Self {
        Self::new([0.0, 0.0, 3.0], CameraSettings::default())
    }
}
