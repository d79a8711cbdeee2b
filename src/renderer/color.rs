//! Translucent sRGB colour shared by all backends

/// 8-bit RGB with a floating opacity, the shape CSS `rgba()` takes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_rgb(rgb: [u8; 3], a: f32) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2], a)
    }

    /// Same colour, different opacity
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS colour string for Canvas2D fill/stroke styles
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }

    /// Premultiplied `[r, g, b, a]` for GPU vertices
    pub fn to_f32(&self) -> [f32; 4] {
        let a = self.a.clamp(0.0, 1.0);
        [
            self.r as f32 / 255.0 * a,
            self.g as f32 / 255.0 * a,
            self.b as f32 / 255.0 * a,
            a,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_matches_canvas_syntax() {
        assert_eq!(Rgba::new(139, 92, 246, 0.3).to_css(), "rgba(139, 92, 246, 0.3)");
        assert_eq!(Rgba::new(0, 0, 0, 0.0).to_css(), "rgba(0, 0, 0, 0)");
    }

    #[test]
    fn test_premultiplied() {
        let c = Rgba::new(255, 0, 51, 0.5).to_f32();
        assert!((c[0] - 0.5).abs() < 1e-6);
        assert_eq!(c[1], 0.0);
        assert!((c[2] - 0.1).abs() < 1e-6);
        assert_eq!(c[3], 0.5);
    }
}
