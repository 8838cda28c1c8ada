use crate::color_maps::Color;

/// Per-particle attributes stored as parallel arrays, laid out the way they
/// are uploaded to the GPU: 3 floats of position, 3 of color, 1 of size.
///
/// The particle count is fixed at creation. Generators fill every attribute
/// once; afterwards only positions are writable from outside the crate.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleBuffer {
    positions: Vec<f32>,
    colors: Vec<f32>,
    sizes: Vec<f32>,
}

impl ParticleBuffer {
    pub fn new(count: usize) -> Self {
        ParticleBuffer {
            positions: vec![0.0; count * 3],
            colors: vec![0.0; count * 3],
            sizes: vec![0.0; count],
        }
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn position(&self, i: usize) -> [f32; 3] {
        [
            self.positions[i * 3],
            self.positions[i * 3 + 1],
            self.positions[i * 3 + 2],
        ]
    }

    pub fn color(&self, i: usize) -> [f32; 3] {
        [
            self.colors[i * 3],
            self.colors[i * 3 + 1],
            self.colors[i * 3 + 2],
        ]
    }

    pub fn size(&self, i: usize) -> f32 {
        self.sizes[i]
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    // Values are computed in double precision and narrowed on store.
    pub fn set_position(&mut self, i: usize, position: [f64; 3]) {
        self.positions[i * 3] = position[0] as f32;
        self.positions[i * 3 + 1] = position[1] as f32;
        self.positions[i * 3 + 2] = position[2] as f32;
    }

    /// Position triples, one chunk per particle.
    pub fn positions_mut(&mut self) -> std::slice::ChunksExactMut<'_, f32> {
        self.positions.chunks_exact_mut(3)
    }

    pub(crate) fn set_color(&mut self, i: usize, color: Color) {
        self.colors[i * 3] = color.r;
        self.colors[i * 3 + 1] = color.g;
        self.colors[i * 3 + 2] = color.b;
    }

    pub(crate) fn set_size(&mut self, i: usize, size: f64) {
        self.sizes[i] = size as f32;
    }

    /// Bitwise comparison of all attributes.
    pub fn bit_identical(&self, other: &ParticleBuffer) -> bool {
        fn same(a: &[f32], b: &[f32]) -> bool {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
        }
        same(&self.positions, &other.positions)
            && same(&self.colors, &other.colors)
            && same(&self.sizes, &other.sizes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_layout() {
        let mut buffer = ParticleBuffer::new(4);
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.positions().len(), 12);
        assert_eq!(buffer.colors().len(), 12);
        assert_eq!(buffer.sizes().len(), 4);

        buffer.set_position(2, [1.0, 2.0, 3.0]);
        buffer.set_color(2, Color::WHITE.scaled(0.25));
        buffer.set_size(2, 0.5);
        assert_eq!(buffer.position(2), [1.0, 2.0, 3.0]);
        assert_eq!(&buffer.positions()[6..9], &[1.0, 2.0, 3.0]);
        assert_eq!(buffer.color(2), [0.25, 0.25, 0.25]);
        assert_eq!(buffer.size(2), 0.5);
    }

    #[test]
    fn positions_mut_chunks_per_particle() {
        let mut buffer = ParticleBuffer::new(3);
        for (i, position) in buffer.positions_mut().enumerate() {
            position[1] = i as f32;
        }
        assert_eq!(buffer.position(2), [0.0, 2.0, 0.0]);
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn bit_identical_distinguishes_signed_zero() {
        let a = ParticleBuffer::new(1);
        let mut b = ParticleBuffer::new(1);
        assert!(a.bit_identical(&b));
        b.set_position(0, [-0.0, 0.0, 0.0]);
        assert!(!a.bit_identical(&b));
        assert_eq!(a, b);
    }
}
