//! In-memory surface that records draw calls

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use super::Surface;
use super::color::Rgba;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        width: f32,
        height: f32,
    },
    Disc {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
    },
    Present,
}

/// What a recording surface has seen
#[derive(Debug, Clone, Default)]
pub struct FrameLog {
    /// Commands since the most recent clear
    pub commands: Vec<DrawCommand>,
    /// Frames presented so far
    pub frames: u64,
    /// Backing store size from the last resize
    pub size: (u32, u32),
}

impl FrameLog {
    pub fn discs(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Disc { .. }))
            .count()
    }

    pub fn lines(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }
}

/// Clones share one log, so a host can keep a handle after handing the
/// surface to a mounted field.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    log: Rc<RefCell<FrameLog>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Rc<RefCell<FrameLog>> {
        Rc::clone(&self.log)
    }

    pub fn frames(&self) -> u64 {
        self.log.borrow().frames
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.log.borrow_mut().size = (width, height);
    }

    fn clear(&mut self, width: f32, height: f32) {
        let mut log = self.log.borrow_mut();
        log.commands.clear();
        log.commands.push(DrawCommand::Clear { width, height });
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.log.borrow_mut().commands.push(DrawCommand::Disc {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.log.borrow_mut().commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn present(&mut self) {
        let mut log = self.log.borrow_mut();
        log.commands.push(DrawCommand::Present);
        log.frames += 1;
    }
}
