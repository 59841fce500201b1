use std::rc::Rc;

use super::{ clear, Chapter, ChapterError, InputAction, LoopFeedback, Viewport };
use crate::engine::config::AppConfig;

const CLEAR_COLOR: [f32; 3] = [0.2, 0.3, 0.3];

struct HelloWindow {
    gl: Rc<glow::Context>,
    viewport: Viewport,
}

pub fn bootstrap(gl: Rc<glow::Context>, config: &AppConfig) -> Result<Box<dyn Chapter>, ChapterError> {
    Ok(Box::new(HelloWindow { gl, viewport: Viewport::new(config) }))
}

impl Chapter for HelloWindow {
    fn render_frame(&mut self, _time: f32, actions: &[InputAction]) -> LoopFeedback {
        let feedback = self.viewport.handle_actions(&self.gl, actions);
        clear(&self.gl, CLEAR_COLOR, false);
        feedback
    }
}
