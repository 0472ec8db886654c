use std::fmt;

/// 8-bit RGB triple with a float alpha, formatted as a CSS `rgba()` string.
#[derive(Clone, Copy, Debug, PartialEq)]
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

    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
    }
}

// Palette
pub const STABLE: Rgba = Rgba::new(0, 255, 198, 1.0);
pub const TENSION: Rgba = Rgba::new(255, 176, 32, 1.0);
pub const RISK: Rgba = Rgba::new(255, 77, 77, 1.0);
pub const SOFT: Rgba = Rgba::new(26, 35, 48, 1.0);
pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);
