// Copyright @yucwang 2026

use std::thread;

/// Knobs of the path tracer. Defaults suit interactive previews.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// Scattering events (surface or medium) per path.
    pub max_depth: u32,
    /// Russian roulette starts after this many events.
    pub rr_start_depth: u32,
    /// Jitter primary rays inside the pixel footprint.
    pub jitter: bool,
    pub seed: u64,
    pub threads: usize,
    pub block_size: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_depth: 16,
            rr_start_depth: 3,
            jitter: true,
            seed: 0,
            threads: thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            block_size: 32,
        }
    }
}

impl RenderSettings {
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_rr_start_depth(mut self, rr_start_depth: u32) -> Self {
        self.rr_start_depth = rr_start_depth;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_builders() {
        let settings = RenderSettings::default()
            .with_max_depth(4)
            .with_seed(9)
            .with_threads(0)
            .with_block_size(0)
            .with_jitter(false);
        assert_eq!(settings.max_depth, 4);
        assert_eq!(settings.seed, 9);
        assert_eq!(settings.threads, 1);
        assert_eq!(settings.block_size, 1);
        assert!(!settings.jitter);
        assert!(RenderSettings::default().threads >= 1);
    }
}
