use crate::color_maps::{Color, INNER_GLOW, OUTER_GLOW};

// A closed-form breathing function: base + sin(t * rate) * amplitude.
#[derive(Debug, Copy, Clone)]
pub struct Pulse {
    pub base: f64,
    pub amplitude: f64,
    pub rate: f64,
}

impl Pulse {
    pub const fn constant(value: f64) -> Pulse {
        Pulse {
            base: value,
            amplitude: 0.0,
            rate: 0.0,
        }
    }

    pub fn at(&self, t: f64) -> f64 {
        self.base + (t * self.rate).sin() * self.amplitude
    }
}

#[derive(Debug, Copy, Clone)]
pub struct Shell {
    pub radius: f32,
    pub color: Color,
    pub scale_pulse: Pulse,
    pub opacity_pulse: Pulse,

    // Animated material state.
    pub scale: f32,
    pub opacity: f32,
}

impl Shell {
    fn new(radius: f32, color: Color, scale_pulse: Pulse, opacity_pulse: Pulse) -> Self {
        Shell {
            radius,
            color,
            scale_pulse,
            opacity_pulse,
            scale: scale_pulse.at(0.0) as f32,
            opacity: opacity_pulse.at(0.0) as f32,
        }
    }

    fn update(&mut self, t: f64) {
        self.scale = self.scale_pulse.at(t) as f32;
        self.opacity = self.opacity_pulse.at(t) as f32;
    }
}

/// The glowing center: a bright core wrapped in two translucent shells. No
/// particles and no randomness, only scale and opacity as functions of time.
#[derive(Debug, Clone)]
pub struct CoreGlow {
    pub core: Shell,
    pub inner_glow: Shell,
    pub outer_glow: Shell,
}

impl CoreGlow {
    pub fn new() -> Self {
        CoreGlow {
            core: Shell::new(
                0.4,
                Color::WHITE,
                Pulse {
                    base: 1.0,
                    amplitude: 0.05,
                    rate: 2.0,
                },
                Pulse::constant(0.95),
            ),
            inner_glow: Shell::new(
                0.6,
                *INNER_GLOW,
                Pulse {
                    base: 1.3,
                    amplitude: 0.1,
                    rate: 1.2,
                },
                Pulse {
                    base: 0.3,
                    amplitude: 0.1,
                    rate: 1.5,
                },
            ),
            outer_glow: Shell::new(
                1.0,
                *OUTER_GLOW,
                Pulse {
                    base: 2.0,
                    amplitude: 0.2,
                    rate: 0.5,
                },
                Pulse {
                    base: 0.1,
                    amplitude: 0.05,
                    rate: 0.8,
                },
            ),
        }
    }

    pub fn update(&mut self, elapsed: f64) {
        self.core.update(elapsed);
        self.inner_glow.update(elapsed);
        self.outer_glow.update(elapsed);
    }

    // Innermost first; this is also the draw order.
    pub fn shells(&self) -> [&Shell; 3] {
        [&self.core, &self.inner_glow, &self.outer_glow]
    }
}

impl Default for CoreGlow {
    fn default() -> Self {
        CoreGlow::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_scale_breathes() {
        let mut glow = CoreGlow::new();
        for &t in &[0.0, 5.0, 10.0] {
            glow.update(t);
            let expected = (1.0 + (2.0 * t).sin() * 0.05) as f32;
            assert_eq!(glow.core.scale, expected);
        }
        glow.update(0.0);
        assert_eq!(glow.core.scale, 1.0);
        assert_eq!(glow.core.opacity, 0.95);
    }

    #[test]
    fn glow_shells_stay_in_band() {
        let mut glow = CoreGlow::new();
        let mut t = 0.0;
        while t < 60.0 {
            glow.update(t);
            assert!(glow.inner_glow.opacity >= 0.2 - 1e-6 && glow.inner_glow.opacity <= 0.4 + 1e-6);
            assert!(glow.inner_glow.scale >= 1.2 - 1e-6 && glow.inner_glow.scale <= 1.4 + 1e-6);
            assert!(glow.outer_glow.opacity >= 0.05 - 1e-6 && glow.outer_glow.opacity <= 0.15 + 1e-6);
            assert!(glow.outer_glow.scale >= 1.8 - 1e-6 && glow.outer_glow.scale <= 2.2 + 1e-6);
            t += 0.37;
        }
    }

    #[test]
    fn shells_nest() {
        let glow = CoreGlow::new();
        let radii: Vec<f32> = glow.shells().iter().map(|s| s.radius * s.scale).collect();
        assert!(radii[0] < radii[1] && radii[1] < radii[2]);
    }
}
