// Park-Miller "minimal standard" generator. The particle fields draw all of
// their jitter from this so that a given seed always lays out the same scene.

const MULTIPLIER: i64 = 16807;
const MODULUS: i64 = 2147483647;

#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: i64,
}

impl SeededRandom {
    pub fn new(seed: i64) -> Self {
        // A state of 0 is a fixed point and negative states produce negative
        // output, so fold the seed into [1, MODULUS - 1]. Seeds already in
        // range are left untouched.
        let state = seed.rem_euclid(MODULUS);
        SeededRandom {
            state: if state == 0 { MODULUS - 1 } else { state },
        }
    }

    pub fn state(&self) -> i64 {
        self.state
    }

    /// Next value in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state * MULTIPLIER) % MODULUS;
        (self.state - 1) as f64 / (MODULUS - 1) as f64
    }
}

impl Iterator for SeededRandom {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_f64())
    }
}
