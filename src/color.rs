//! RGB and RGBA color values.

/// An RGB color with components in `[0,1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    /// White.
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    /// Black.
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Attach an alpha channel.
    pub fn with_alpha(self, a: f64) -> ColorA {
        ColorA::new(self.r, self.g, self.b, a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// An RGBA color. `a == 1` is fully opaque.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorA {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl ColorA {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Drop the alpha channel.
    pub fn rgb(self) -> Color {
        Color::new(self.r, self.g, self.b)
    }
}

impl Default for ColorA {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }
}

impl From<Color> for ColorA {
    fn from(c: Color) -> Self {
        c.with_alpha(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_conversion() {
        let c = Color::new(0.8, 0.8, 1.0);
        let ca = c.with_alpha(0.25);
        assert_eq!(ca.a, 0.25);
        assert_eq!(ca.rgb(), c);
        assert_eq!(ColorA::from(Color::BLACK), ColorA::new(0.0, 0.0, 0.0, 1.0));
    }
}
