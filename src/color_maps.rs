use lazy_static::lazy_static;

// Linear RGB color. Palette entries are written as sRGB hex codes and decoded
// to linear space, which is what the blending in the shaders works in.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn from_hex(hex: &str) -> anyhow::Result<Color> {
        let srgb = scarlet::color::RGBColor::from_hex_code(hex)
            .map_err(|e| anyhow::anyhow!("Invalid hex color {}: {:?}", hex, e))?;
        Ok(Color {
            r: srgb_to_linear(srgb.r) as f32,
            g: srgb_to_linear(srgb.g) as f32,
            b: srgb_to_linear(srgb.b) as f32,
        })
    }

    pub fn scaled(&self, brightness: f64) -> Color {
        Color {
            r: (self.r as f64 * brightness) as f32,
            g: (self.g as f64 * brightness) as f32,
            b: (self.b as f64 * brightness) as f32,
        }
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

pub fn srgb_to_linear(c: f64) -> f64 {
    if c < 0.04045 {
        c * 0.0773993808
    } else {
        (c * 0.9478672986 + 0.0521327014).powf(2.4)
    }
}

fn palette(codes: &[&str]) -> Vec<Color> {
    codes
        .iter()
        .map(|code| match Color::from_hex(code) {
            Ok(color) => color,
            Err(e) => {
                log::error!("{:?}", e);
                Color::WHITE
            }
        })
        .collect()
}

// Hex codes used across the scene.
pub const ELECTRIC_BLUE: &str = "#38bdf8";
pub const SKY_BLUE: &str = "#0ea5e9";
pub const CYAN: &str = "#22d3ee";
pub const TEAL: &str = "#14b8a6";
pub const DEEP_CYAN: &str = "#06b6d4";
pub const OCEAN: &str = "#0284c7";

lazy_static! {
    pub static ref RING_PALETTE: Vec<Color> = palette(&[ELECTRIC_BLUE, SKY_BLUE, CYAN, TEAL]);
    pub static ref STREAM_PALETTE: Vec<Color> =
        palette(&[ELECTRIC_BLUE, CYAN, SKY_BLUE, TEAL, DEEP_CYAN, OCEAN]);
    pub static ref AMBIENT_BASE: Color = palette(&[ELECTRIC_BLUE])[0];
    pub static ref INNER_GLOW: Color = palette(&[ELECTRIC_BLUE])[0];
    pub static ref OUTER_GLOW: Color = palette(&[SKY_BLUE])[0];
}
