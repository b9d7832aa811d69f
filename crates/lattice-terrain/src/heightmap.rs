//! Fractal Brownian motion over 2D simplex noise.

use noise::{NoiseFn, Simplex};

/// Octave layout of an fBm heightmap.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightmapParams {
    pub seed: u32,
    pub octaves: u32,
    /// Frequency of the broadest octave, in cycles per block.
    pub base_frequency: f64,
    /// Height contribution of the broadest octave, in blocks.
    pub amplitude: f64,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
}

impl Default for HeightmapParams {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 4,
            base_frequency: 0.01,
            amplitude: 12.0,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Samples an fBm height offset at world-space block columns.
pub struct HeightmapSampler {
    noise: Simplex,
    params: HeightmapParams,
}

impl HeightmapSampler {
    pub fn new(params: HeightmapParams) -> Self {
        Self {
            noise: Simplex::new(params.seed),
            params,
        }
    }

    /// Signed height offset at `(x, z)`, within `±max_amplitude()`.
    pub fn sample(&self, x: f64, z: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = self.params.base_frequency;
        let mut amplitude = self.params.amplitude;
        for _ in 0..self.params.octaves {
            total += self.noise.get([x * frequency, z * frequency]) * amplitude;
            frequency *= self.params.lacunarity;
            amplitude *= self.params.persistence;
        }
        total
    }

    /// Sum of all octave amplitudes.
    pub fn max_amplitude(&self) -> f64 {
        (0..self.params.octaves)
            .scan(self.params.amplitude, |amp, _| {
                let current = *amp;
                *amp *= self.params.persistence;
                Some(current)
            })
            .sum()
    }

    pub fn params(&self) -> &HeightmapParams {
        &self.params
    }
}
