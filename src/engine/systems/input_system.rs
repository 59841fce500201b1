use std::collections::HashSet;

use winit::event::{ ElementState, MouseScrollDelta };
use winit::keyboard::KeyCode;
use winit::window::{ CursorGrabMode, Window };

use crate::engine::components::camera::{ CameraMovement, MovementPace };
use crate::engine::utils::input_utils::{ movement_directions, movement_pace };

// Pixels of touchpad travel that count as one wheel notch.
const PIXELS_PER_LINE: f64 = 20.0;

/// Input handed to a chapter each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    Quit,
    Resized {
        width: u32,
        height: u32,
    },
    /// Cursor position in window pixels, only reported while the cursor is
    /// captured.
    CursorMoved {
        x: f32,
        y: f32,
    },
    /// Vertical wheel travel in lines, positive away from the user.
    Scrolled(f32),
    Move(CameraMovement, MovementPace),
    CursorCaptured(bool),
}

/// Tracks held keys and cursor capture between frames.
#[derive(Debug, Default)]
pub struct InputSystem {
    pressed_keys: HashSet<KeyCode>,
    cursor_captured: bool,
}

impl InputSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor_captured(&self) -> bool {
        self.cursor_captured
    }

    pub fn receive_key(&mut self, key_code: KeyCode, state: ElementState, repeat: bool) -> Option<InputAction> {
        match state {
            ElementState::Pressed => {
                match key_code {
                    KeyCode::Escape => Some(InputAction::Quit),
                    KeyCode::Tab if !repeat => {
                        self.cursor_captured = !self.cursor_captured;
                        log::debug!("cursor capture toggled: {}", self.cursor_captured);
                        Some(InputAction::CursorCaptured(self.cursor_captured))
                    }
                    KeyCode::Tab => None,
                    _ => {
                        self.pressed_keys.insert(key_code);
                        None
                    }
                }
            }
            ElementState::Released => {
                self.pressed_keys.remove(&key_code);
                None
            }
        }
    }

    pub fn receive_cursor(&self, x: f64, y: f64) -> Option<InputAction> {
        self.cursor_captured.then_some(InputAction::CursorMoved { x: x as f32, y: y as f32 })
    }

    pub fn receive_scroll(&self, delta: MouseScrollDelta) -> InputAction {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(position) => (position.y / PIXELS_PER_LINE) as f32,
        };
        InputAction::Scrolled(lines)
    }

    /// Releases every key, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.pressed_keys.clear();
    }

    /// One `Move` action per held movement key.
    pub fn frame_actions(&self) -> Vec<InputAction> {
        let held = |codes: &[KeyCode]| codes.iter().any(|code| self.pressed_keys.contains(code));

        let pace = movement_pace(
            held(&[KeyCode::ShiftLeft, KeyCode::ShiftRight]),
            held(&[KeyCode::ControlLeft, KeyCode::ControlRight])
        );

        movement_directions(
            held(&[KeyCode::KeyW, KeyCode::ArrowUp]),
            held(&[KeyCode::KeyS, KeyCode::ArrowDown]),
            held(&[KeyCode::KeyA, KeyCode::ArrowLeft]),
            held(&[KeyCode::KeyD, KeyCode::ArrowRight]),
            held(&[KeyCode::KeyE]),
            held(&[KeyCode::KeyQ])
        )
            .into_iter()
            .map(|direction| InputAction::Move(direction, pace))
            .collect()
    }
}

/// Hides and grabs the cursor, or releases it again.
pub fn apply_cursor_capture(window: &Window, captured: bool) {
    if captured {
        window.set_cursor_visible(false);

        // Not every platform supports both grab modes
        let grab_result = window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
        if let Err(e) = grab_result {
            log::warn!("cursor grab not supported on this platform: {}", e);
        }
    } else {
        if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
            log::warn!("could not release cursor: {}", e);
        }
        window.set_cursor_visible(true);
    }
}
