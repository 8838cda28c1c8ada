use crate::color_maps;
use log::info;

// Static stand-in drawn while the 3D surface isn't ready: a soft blurred disc
// centered in an image the size of the canvas, fading diagonally from sky
// blue to cyan. It never animates.

const DISC_DIAMETER: f32 = 256.0;
const BLUR_RADIUS: f32 = 64.0;
// Gradient endpoints, top-left to bottom-right, with their alphas.
const FROM: (&str, f32) = (color_maps::SKY_BLUE, 0.10);
const TO: (&str, f32) = (color_maps::DEEP_CYAN, 0.05);

pub struct Placeholder {
    image: image::RgbaImage,
}

fn hex_to_srgb8(hex: &str) -> [u8; 3] {
    match scarlet::color::RGBColor::from_hex_code(hex) {
        Ok(color) => [
            (color.r * 255.0).round() as u8,
            (color.g * 255.0).round() as u8,
            (color.b * 255.0).round() as u8,
        ],
        Err(e) => {
            log::error!("Invalid placeholder color {}: {:?}", hex, e);
            [0, 0, 0]
        }
    }
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).max(0.0).min(1.0);
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

impl Placeholder {
    /// Rasterizes the placeholder for a canvas of `width` x `height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let from = hex_to_srgb8(FROM.0);
        let to = hex_to_srgb8(TO.0);
        let center = (width as f32 / 2.0, height as f32 / 2.0);
        let radius = DISC_DIAMETER / 2.0;

        let image = image::RgbaImage::from_fn(width, height, |x, y| {
            let dx = x as f32 + 0.5 - center.0;
            let dy = y as f32 + 0.5 - center.1;
            let distance = (dx * dx + dy * dy).sqrt();
            let coverage = 1.0 - smoothstep(radius - BLUR_RADIUS, radius + BLUR_RADIUS, distance);

            // Diagonal gradient parameter across the disc's bounding square.
            let t = (((dx + dy) / (2.0 * DISC_DIAMETER)) + 0.5).max(0.0).min(1.0);
            let alpha = lerp(FROM.1, TO.1, t) * coverage;
            image::Rgba([
                lerp(from[0] as f32, to[0] as f32, t).round() as u8,
                lerp(from[1] as f32, to[1] as f32, t).round() as u8,
                lerp(from[2] as f32, to[2] as f32, t).round() as u8,
                (alpha * 255.0).round() as u8,
            ])
        });
        Placeholder { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    // Straight-alpha sRGB RGBA8 rows.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &image::RgbaImage {
        &self.image
    }

    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        self.image.save(path)?;
        info!(
            "Wrote {}x{} placeholder to {}",
            self.width(),
            self.height(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_canvas_bounds() {
        let placeholder = Placeholder::new(640, 360);
        assert_eq!(placeholder.width(), 640);
        assert_eq!(placeholder.height(), 360);
        assert_eq!(placeholder.pixels().len(), 640 * 360 * 4);
    }

    #[test]
    fn soft_disc_in_the_middle() {
        let placeholder = Placeholder::new(640, 360);
        let center = placeholder.image().get_pixel(320, 180);
        let corner = placeholder.image().get_pixel(0, 0);
        assert!(center[3] > 0);
        assert!(center[3] <= 26);
        assert_eq!(corner[3], 0);
        // Blue-dominant.
        assert!(center[2] > center[0]);
    }

    #[test]
    fn static_output() {
        let a = Placeholder::new(320, 200);
        let b = Placeholder::new(320, 200);
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn degenerate_size() {
        let placeholder = Placeholder::new(0, 0);
        assert_eq!(placeholder.width(), 1);
        assert_eq!(placeholder.height(), 1);
    }

    #[test]
    fn writes_png() {
        let path = std::env::temp_dir().join("convergence_placeholder_test.png");
        Placeholder::new(64, 64).save_png(&path).unwrap();
        let reloaded = image::open(&path).unwrap().to_rgba();
        assert_eq!(reloaded.dimensions(), (64, 64));
        let _ = std::fs::remove_file(&path);
    }
}
