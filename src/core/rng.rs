// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f};

// Maps the top 24 bits of a draw onto [0, 1).
const INV_TWO_POW_24: Float = 1.0 / 16777216.0;

pub struct LcgRng {
    state: u64,
}

impl LcgRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seeds one path so the same `(pixel, iteration)` pair replays the same
    /// random sequence regardless of how pixels are scheduled.
    pub fn for_path(seed: u64, x: usize, y: usize, iteration: u32) -> Self {
        let key = ((seed & 0xFFF) << 52)
            ^ (((iteration as u64) & 0xFFFFF) << 32)
            ^ (((y as u64) & 0xFFFF) << 16)
            ^ ((x as u64) & 0xFFFF);
        let mut rng = Self { state: mix64(key) };
        // Decorrelate neighbouring seeds before the first user draw.
        rng.next_u32();
        rng
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.state >> 32) as u32
    }

    /// Uniform draw in `[0, 1)`.
    pub fn next_f32(&mut self) -> Float {
        ((self.next_u32() >> 8) as Float) * INV_TWO_POW_24
    }

    pub fn next_2d(&mut self) -> Vector2f {
        let u = self.next_f32();
        let v = self.next_f32();
        Vector2f::new(u, v)
    }
}

fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}
