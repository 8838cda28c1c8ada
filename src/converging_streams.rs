use crate::color_maps::STREAM_PALETTE;
use crate::particle_buffer::ParticleBuffer;
use crate::seeded_random::SeededRandom;
use std::f64::consts::PI;

pub const STREAM_COUNT: usize = 6;
pub const PARTICLES_PER_STREAM: usize = 80;
pub const STREAM_SEED: i64 = 12345;
pub const STREAM_OPACITY: f32 = 0.7;
pub const STREAM_POINT_SIZE: f32 = 0.06;

const OUTER_RADIUS: f64 = 6.0;
const RADIUS_SPAN: f64 = 5.5;
const SWEEP: f64 = PI * 0.8;
const HEIGHT_AMPLITUDE: f64 = 0.5;
const SPEED_SCALE: f64 = 0.15;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StreamParticle {
    // Base angle of the stream this particle belongs to.
    pub angle: f64,
    pub speed: f64,
    // Progress at t = 0.
    pub offset: f64,
    pub stream: usize,
}

/// Cyclic progress along the spiral. Wraps instead of stopping so particles
/// reaching the center reappear at the rim.
pub fn stream_progress(offset: f64, speed: f64, elapsed: f64) -> f64 {
    (offset + elapsed * speed * SPEED_SCALE).rem_euclid(1.0)
}

/// Point on a stream's inward spiral: radius shrinks from 6 to 0.5, the angle
/// sweeps 0.8π, height follows one period of a sine.
pub fn spiral_position(base_angle: f64, progress: f64) -> [f64; 3] {
    let radius = OUTER_RADIUS - progress * RADIUS_SPAN;
    let angle = base_angle + progress * SWEEP;
    let height = (progress * PI * 2.0).sin() * HEIGHT_AMPLITUDE;
    [angle.cos() * radius, height, angle.sin() * radius]
}

#[derive(Debug)]
pub struct ConvergingStreams {
    buffer: ParticleBuffer,
    particles: Vec<StreamParticle>,
}

impl ConvergingStreams {
    pub fn new() -> Self {
        ConvergingStreams::generate(STREAM_COUNT, PARTICLES_PER_STREAM, STREAM_SEED)
    }

    // Per particle this consumes brightness, size and speed from the
    // generator, in that order.
    pub fn generate(stream_count: usize, particles_per_stream: usize, seed: i64) -> Self {
        let mut random = SeededRandom::new(seed);
        let total = stream_count * particles_per_stream;
        let mut buffer = ParticleBuffer::new(total);
        let mut particles = Vec::with_capacity(total);
        let palette = &*STREAM_PALETTE;

        for s in 0..stream_count {
            let stream_angle = (s as f64 / stream_count as f64) * PI * 2.0;
            let stream_color = palette[s % palette.len()];

            for p in 0..particles_per_stream {
                let idx = s * particles_per_stream + p;
                let progress = p as f64 / particles_per_stream as f64;

                buffer.set_position(idx, spiral_position(stream_angle, progress));

                let brightness = 0.7 + random.next_f64() * 0.3;
                buffer.set_color(idx, stream_color.scaled(brightness));

                buffer.set_size(idx, (1.0 - progress * 0.5) * (0.03 + random.next_f64() * 0.03));

                particles.push(StreamParticle {
                    angle: stream_angle,
                    speed: 0.2 + random.next_f64() * 0.1,
                    offset: progress,
                    stream: s,
                });
            }
        }
        log::debug!(
            "Generated {} stream particles in {} streams",
            total,
            stream_count
        );

        ConvergingStreams { buffer, particles }
    }

    // Recomputes every position from its descriptor; no state carries over
    // between frames.
    pub fn update(&mut self, elapsed: f64) {
        for (position, particle) in self.buffer.positions_mut().zip(self.particles.iter()) {
            let progress = stream_progress(particle.offset, particle.speed, elapsed);
            let [x, y, z] = spiral_position(particle.angle, progress);
            position[0] = x as f32;
            position[1] = y as f32;
            position[2] = z as f32;
        }
    }

    pub fn buffer(&self) -> &ParticleBuffer {
        &self.buffer
    }

    pub fn particles(&self) -> &[StreamParticle] {
        &self.particles
    }
}

impl Default for ConvergingStreams {
    fn default() -> Self {
        ConvergingStreams::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_formula() {
        let mut t = 0.0;
        while t < 1000.0 {
            let progress = stream_progress(0.0, 0.2, t);
            let expected = (t * 0.2 * 0.15) % 1.0;
            assert!((progress - expected).abs() < 1e-12);
            assert!(progress >= 0.0 && progress < 1.0);
            t += 0.731;
        }
    }

    #[test]
    fn progress_wraps_for_large_times() {
        // 79 * 0.2 * 0.15 = 2.37
        let progress = stream_progress(0.0, 0.2, 79.0);
        assert!((progress - 0.37).abs() < 1e-9);

        for &t in &[1e3, 1e6, 1e9, 3.3e10] {
            let progress = stream_progress(0.5, 0.25, t);
            assert!(progress >= 0.0 && progress < 1.0, "t = {}", t);
        }
    }

    #[test]
    fn deterministic_for_fixed_seed() {
        let a = ConvergingStreams::new();
        let b = ConvergingStreams::new();
        assert!(a.buffer().bit_identical(b.buffer()));
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn descriptors_line_up_with_buffer() {
        let streams = ConvergingStreams::new();
        assert_eq!(streams.buffer().len(), STREAM_COUNT * PARTICLES_PER_STREAM);
        assert_eq!(streams.particles().len(), streams.buffer().len());
        for (i, particle) in streams.particles().iter().enumerate() {
            assert_eq!(particle.stream, i / PARTICLES_PER_STREAM);
            assert_eq!(
                particle.offset,
                (i % PARTICLES_PER_STREAM) as f64 / PARTICLES_PER_STREAM as f64
            );
            assert!(particle.speed >= 0.2 && particle.speed < 0.3);
        }
    }

    #[test]
    fn initial_layout_matches_time_zero() {
        let generated = ConvergingStreams::new();
        let mut animated = ConvergingStreams::new();
        animated.update(0.0);
        assert!(generated.buffer().bit_identical(animated.buffer()));
    }

    #[test]
    fn update_is_stateless() {
        let mut a = ConvergingStreams::new();
        a.update(12.5);
        let first = a.buffer().clone();
        a.update(12.5);
        assert!(a.buffer().bit_identical(&first));

        // Skipping frames lands on the same state as visiting them.
        let mut b = ConvergingStreams::new();
        for frame in 0..100 {
            b.update(frame as f64 * 0.016);
        }
        b.update(12.5);
        assert!(b.buffer().bit_identical(&first));
    }

    #[test]
    fn update_never_touches_color_or_size() {
        let mut streams = ConvergingStreams::new();
        let colors = streams.buffer().colors().to_vec();
        let sizes = streams.buffer().sizes().to_vec();
        streams.update(42.0);
        assert_eq!(streams.buffer().colors(), &colors[..]);
        assert_eq!(streams.buffer().sizes(), &sizes[..]);
    }

    #[test]
    fn positions_stay_on_spiral() {
        let mut streams = ConvergingStreams::new();
        streams.update(33.0);
        for i in 0..streams.buffer().len() {
            let [x, y, z] = streams.buffer().position(i);
            let r = ((x * x + z * z) as f64).sqrt();
            assert!(r > 0.5 - 1e-4 && r <= 6.0 + 1e-4);
            assert!(y.abs() <= 0.5 + 1e-6);
        }
    }
}
