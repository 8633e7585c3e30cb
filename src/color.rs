// Simple color struct, RGB bytes plus alpha.
// Alpha is kept as a float so faint link lines don't round down to nothing.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const CYAN: Color = Color {
        r: 0x00,
        g: 0xff,
        b: 0xff,
        a: 1.0,
    };

    pub fn with_alpha(self, a: f64) -> Color {
        Color { a, ..self }
    }

    // Multiplies the current alpha, e.g. base color * particle opacity
    pub fn fade(self, factor: f64) -> Color {
        self.with_alpha(self.a * factor)
    }

    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::CYAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_multiplies_alpha() {
        let c = Color::CYAN.with_alpha(0.5).fade(0.5);
        assert_eq!(c.a, 0.25);
        assert_eq!(c.g, 0xff);
    }

    #[test]
    fn css_string() {
        assert_eq!(Color::CYAN.with_alpha(0.5).to_css(), "rgba(0, 255, 255, 0.5)");
    }
}
