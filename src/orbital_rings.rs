use crate::color_maps::RING_PALETTE;
use crate::particle_buffer::ParticleBuffer;
use crate::seeded_random::SeededRandom;
use std::f64::consts::PI;

pub const PARTICLES_PER_RING: usize = 200;
pub const RING_SEED: i64 = 42;

// Everything in the ring system turns at a fraction of real time.
const TIME_SCALE: f64 = 0.15;
const GROUP_ANGULAR_RATE: f64 = 0.5;

#[derive(Debug, Copy, Clone)]
pub struct RingShape {
    pub radius: f64,
    // Rotation of the ring plane about the X axis.
    pub tilt: f64,
    // Angular phase so concentric rings don't line up.
    pub offset: f64,
    // Spin about the ring's own Z axis, in units of scaled time.
    pub angular_rate: f64,
    pub opacity: f32,
    // Material sprite size, shared by every particle of the ring.
    pub point_size: f32,
}

pub const RING_SHAPES: [RingShape; 3] = [
    RingShape {
        radius: 3.5,
        tilt: PI * 0.15,
        offset: 0.0,
        angular_rate: 0.8,
        opacity: 0.8,
        point_size: 0.05,
    },
    RingShape {
        radius: 2.8,
        tilt: PI * -0.2,
        offset: PI * 0.3,
        angular_rate: -0.6,
        opacity: 0.6,
        point_size: 0.04,
    },
    RingShape {
        radius: 4.2,
        tilt: PI * 0.08,
        offset: PI * 0.6,
        angular_rate: 0.4,
        opacity: 0.5,
        point_size: 0.035,
    },
];

impl RingShape {
    // Angle of particle i before any jitter.
    pub fn angle(&self, i: usize, count: usize) -> f64 {
        (i as f64 / count as f64) * PI * 2.0 + self.offset
    }
}

// Lays out `count` particles on a tilted circle. Consumes four values from
// `random` per particle: radius jitter, vertical jitter, color, size.
pub fn generate_ring(count: usize, shape: &RingShape, random: &mut SeededRandom) -> ParticleBuffer {
    let mut buffer = ParticleBuffer::new(count);
    let palette = &*RING_PALETTE;
    for i in 0..count {
        let angle = shape.angle(i, count);
        let r = shape.radius + (random.next_f64() - 0.5) * 0.3;

        let x = angle.cos() * r;
        let y = angle.sin() * r * shape.tilt.cos() + (random.next_f64() - 0.5) * 0.1;
        let z = angle.sin() * r * shape.tilt.sin();
        buffer.set_position(i, [x, y, z]);

        let pick = (random.next_f64() * palette.len() as f64).floor() as usize;
        buffer.set_color(i, palette[pick]);

        buffer.set_size(i, 0.02 + random.next_f64() * 0.04);
    }
    buffer
}

#[derive(Debug)]
pub struct Ring {
    pub shape: RingShape,
    pub buffer: ParticleBuffer,
    pub rotation_z: f32,
}

// Three concentric particle rings spinning inside a slowly turning group.
// Animation is rotation only; the buffers are never rewritten.
#[derive(Debug)]
pub struct OrbitalRings {
    rings: Vec<Ring>,
    group_rotation_y: f32,
}

impl OrbitalRings {
    pub fn new() -> Self {
        OrbitalRings::with_seed(RING_SEED)
    }

    // All rings draw from one generator, in order.
    pub fn with_seed(seed: i64) -> Self {
        let mut random = SeededRandom::new(seed);
        let rings = RING_SHAPES
            .iter()
            .map(|shape| Ring {
                shape: *shape,
                buffer: generate_ring(PARTICLES_PER_RING, shape, &mut random),
                rotation_z: 0.0,
            })
            .collect();
        OrbitalRings {
            rings,
            group_rotation_y: 0.0,
        }
    }

    pub fn update(&mut self, elapsed: f64) {
        let t = elapsed * TIME_SCALE;
        self.group_rotation_y = (t * GROUP_ANGULAR_RATE) as f32;
        for ring in self.rings.iter_mut() {
            ring.rotation_z = (t * ring.shape.angular_rate) as f32;
        }
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn group_rotation_y(&self) -> f32 {
        self.group_rotation_y
    }
}

impl Default for OrbitalRings {
    fn default() -> Self {
        OrbitalRings::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap_angle(a: f64) -> f64 {
        a.rem_euclid(2.0 * PI)
    }

    #[test]
    fn deterministic_for_fixed_seed() {
        let a = OrbitalRings::new();
        let b = OrbitalRings::new();
        for (ra, rb) in a.rings().iter().zip(b.rings()) {
            assert!(ra.buffer.bit_identical(&rb.buffer));
        }
        let c = OrbitalRings::with_seed(7);
        assert!(!a.rings()[0].buffer.bit_identical(&c.rings()[0].buffer));
    }

    #[test]
    fn rings_share_one_generator() {
        let rings = OrbitalRings::new();
        let mut random = SeededRandom::new(RING_SEED);
        let first = generate_ring(PARTICLES_PER_RING, &RING_SHAPES[0], &mut random);
        let second = generate_ring(PARTICLES_PER_RING, &RING_SHAPES[1], &mut random);
        assert!(rings.rings()[0].buffer.bit_identical(&first));
        assert!(rings.rings()[1].buffer.bit_identical(&second));
    }

    #[test]
    fn angles_evenly_spaced() {
        let shape = RING_SHAPES[1];
        let step = 2.0 * PI / PARTICLES_PER_RING as f64;
        assert_eq!(shape.angle(0, PARTICLES_PER_RING), shape.offset);
        for i in 1..PARTICLES_PER_RING {
            let delta = shape.angle(i, PARTICLES_PER_RING) - shape.angle(i - 1, PARTICLES_PER_RING);
            assert!((delta - step).abs() < 1e-12);
        }
    }

    #[test]
    fn generated_positions_follow_angles() {
        // Radius jitter scales x and z alike and the vertical jitter only
        // touches y, so the angle is recoverable from x and z.
        let mut random = SeededRandom::new(RING_SEED);
        for shape in RING_SHAPES.iter() {
            let buffer = generate_ring(PARTICLES_PER_RING, shape, &mut random);
            for i in 0..PARTICLES_PER_RING {
                let [x, _, z] = buffer.position(i);
                let recovered = (z as f64 / shape.tilt.sin()).atan2(x as f64);
                let expected = shape.angle(i, PARTICLES_PER_RING);
                let diff = wrap_angle(recovered - expected);
                assert!(diff.min(2.0 * PI - diff) < 1e-4, "ring particle {}", i);
            }
        }
    }

    #[test]
    fn radius_and_size_within_jitter() {
        let rings = OrbitalRings::new();
        for ring in rings.rings() {
            let buffer = &ring.buffer;
            assert_eq!(buffer.len(), PARTICLES_PER_RING);
            for i in 0..buffer.len() {
                let [x, _, z] = buffer.position(i);
                let shape = &ring.shape;
                // Distance in the ring plane, before the tilt squashes y.
                let sin_a = (z as f64) / shape.tilt.sin();
                let r = ((x as f64).powi(2) + sin_a.powi(2)).sqrt();
                assert!(r >= shape.radius - 0.15 - 1e-4 && r <= shape.radius + 0.15 + 1e-4);
                let size = buffer.size(i);
                assert!(size >= 0.02 && size < 0.06 + 1e-6);
                assert!(RING_PALETTE.iter().any(|c| c.to_array() == buffer.color(i)));
            }
        }
    }

    #[test]
    fn update_only_rotates() {
        let mut rings = OrbitalRings::new();
        let before: Vec<ParticleBuffer> = rings.rings().iter().map(|r| r.buffer.clone()).collect();
        rings.update(10.0);
        assert!((rings.group_rotation_y() - 0.75).abs() < 1e-6);
        assert!((rings.rings()[0].rotation_z - 1.2).abs() < 1e-6);
        assert!((rings.rings()[1].rotation_z + 0.9).abs() < 1e-6);
        assert!((rings.rings()[2].rotation_z - 0.6).abs() < 1e-6);
        for (ring, original) in rings.rings().iter().zip(before.iter()) {
            assert!(ring.buffer.bit_identical(original));
        }
    }
}
