//! Drawing-surface dimensions mirrored from the viewport

/// Width and height of the drawing target in pixels.
///
/// Written only by the resize path; read by the motion model (wall test)
/// and the renderer (clear region).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceState {
    pub width: f32,
    pub height: f32,
}

impl SurfaceState {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Replace the dimensions, leaving everything else untouched
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    #[inline]
    pub fn contains_x(&self, x: f32) -> bool {
        (0.0..=self.width).contains(&x)
    }

    #[inline]
    pub fn contains_y(&self, y: f32) -> bool {
        (0.0..=self.height).contains(&y)
    }
}
