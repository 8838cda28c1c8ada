use crate::color_maps::AMBIENT_BASE;
use crate::particle_buffer::ParticleBuffer;
use crate::seeded_random::SeededRandom;
use std::f64::consts::PI;

pub const AMBIENT_PARTICLES: usize = 300;
pub const AMBIENT_SEED: i64 = 98765;
pub const AMBIENT_OPACITY: f32 = 0.4;
pub const AMBIENT_POINT_SIZE: f32 = 0.03;

pub const INNER_RADIUS: f64 = 3.0;
pub const RADIUS_BAND: f64 = 5.0;

// Per-axis drift: (rate, phase per particle index, amplitude).
const DRIFT_X: (f64, f64, f64) = (0.3, 1.0, 0.1);
const DRIFT_Y: (f64, f64, f64) = (0.2, 0.5, 0.15);
const DRIFT_Z: (f64, f64, f64) = (0.25, 0.3, 0.1);

/// Offset of particle `index` from its resting position at `elapsed`.
pub fn drift(index: usize, elapsed: f64) -> [f64; 3] {
    let i = index as f64;
    [
        (elapsed * DRIFT_X.0 + i * DRIFT_X.1).sin() * DRIFT_X.2,
        (elapsed * DRIFT_Y.0 + i * DRIFT_Y.1).cos() * DRIFT_Y.2,
        (elapsed * DRIFT_Z.0 + i * DRIFT_Z.1).sin() * DRIFT_Z.2,
    ]
}

// Dust scattered through a thick spherical shell around the scene, bobbing
// gently about fixed resting points.
#[derive(Debug)]
pub struct AmbientCloud {
    buffer: ParticleBuffer,
    rest_positions: Vec<[f32; 3]>,
}

impl AmbientCloud {
    pub fn new() -> Self {
        AmbientCloud::generate(AMBIENT_PARTICLES, AMBIENT_SEED)
    }

    pub fn generate(count: usize, seed: i64) -> Self {
        let mut random = SeededRandom::new(seed);
        let mut buffer = ParticleBuffer::new(count);
        let base_color = *AMBIENT_BASE;

        for i in 0..count {
            // Uniform on the sphere: azimuth uniform, cos(polar) uniform.
            let theta = random.next_f64() * PI * 2.0;
            let phi = (2.0 * random.next_f64() - 1.0).acos();
            let radius = INNER_RADIUS + random.next_f64() * RADIUS_BAND;

            buffer.set_position(
                i,
                [
                    radius * phi.sin() * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                    radius * phi.cos(),
                ],
            );

            let brightness = 0.3 + random.next_f64() * 0.7;
            buffer.set_color(i, base_color.scaled(brightness));
            buffer.set_size(i, 0.01 + random.next_f64() * 0.02);
        }

        let rest_positions = (0..count).map(|i| buffer.position(i)).collect();
        AmbientCloud {
            buffer,
            rest_positions,
        }
    }

    pub fn update(&mut self, elapsed: f64) {
        for (i, (position, rest)) in self
            .buffer
            .positions_mut()
            .zip(self.rest_positions.iter())
            .enumerate()
        {
            let offset = drift(i, elapsed);
            for axis in 0..3 {
                position[axis] = (rest[axis] as f64 + offset[axis]) as f32;
            }
        }
    }

    pub fn buffer(&self) -> &ParticleBuffer {
        &self.buffer
    }

    pub fn rest_positions(&self) -> &[[f32; 3]] {
        &self.rest_positions
    }
}

impl Default for AmbientCloud {
    fn default() -> Self {
        AmbientCloud::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(p: [f32; 3]) -> f64 {
        p.iter().map(|c| (*c as f64).powi(2)).sum::<f64>().sqrt()
    }

    #[test]
    fn generated_within_radius_band() {
        let cloud = AmbientCloud::new();
        assert_eq!(cloud.buffer().len(), AMBIENT_PARTICLES);
        for i in 0..cloud.buffer().len() {
            let d = norm(cloud.buffer().position(i));
            assert!(d >= 3.0 - 1e-5 && d <= 8.0 + 1e-5, "particle {} at {}", i, d);
        }
    }

    #[test]
    fn roughly_isotropic() {
        // The mean of points uniform on a sphere tends to the origin.
        let cloud = AmbientCloud::generate(5000, AMBIENT_SEED);
        let mut mean = [0.0f64; 3];
        for p in cloud.rest_positions() {
            for axis in 0..3 {
                mean[axis] += p[axis] as f64 / 5000.0;
            }
        }
        for axis in 0..3 {
            assert!(mean[axis].abs() < 0.35, "axis {} mean {}", axis, mean[axis]);
        }
    }

    #[test]
    fn deterministic_for_fixed_seed() {
        let a = AmbientCloud::new();
        let b = AmbientCloud::new();
        assert!(a.buffer().bit_identical(b.buffer()));
        assert_eq!(a.rest_positions(), b.rest_positions());
    }

    #[test]
    fn drifts_around_rest_position() {
        let mut cloud = AmbientCloud::new();
        for &t in &[0.0, 1.0, 17.5, 1000.0] {
            cloud.update(t);
            for (i, rest) in cloud.rest_positions().iter().enumerate() {
                let p = cloud.buffer().position(i);
                assert!((p[0] - rest[0]).abs() <= 0.1 + 1e-5);
                assert!((p[1] - rest[1]).abs() <= 0.15 + 1e-5);
                assert!((p[2] - rest[2]).abs() <= 0.1 + 1e-5);
            }
        }
    }

    #[test]
    fn neighbours_are_out_of_phase() {
        let a = drift(0, 3.0);
        let b = drift(1, 3.0);
        assert!((a[0] - b[0]).abs() > 1e-3);
    }

    #[test]
    fn update_is_idempotent() {
        let mut cloud = AmbientCloud::new();
        let colors = cloud.buffer().colors().to_vec();
        cloud.update(8.25);
        let first = cloud.buffer().clone();
        cloud.update(8.25);
        assert!(cloud.buffer().bit_identical(&first));
        assert_eq!(cloud.buffer().colors(), &colors[..]);
    }
}
