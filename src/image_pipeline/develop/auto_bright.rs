//! Histogram-based white point for auto-brightness.

/// Histogram bins per channel; samples are binned by `value >> HISTOGRAM_SHIFT`.
const HISTOGRAM_BINS: usize = 0x2000;
const HISTOGRAM_SHIFT: u32 = 3;

/// Lowest bin the white point search may settle on.
const MIN_WHITE_BIN: usize = 32;

/// Per-channel histograms of a 16-bit RGB buffer.
pub struct Histogram {
    bins: Vec<[u32; 3]>,
    pixels: usize,
}

impl Histogram {
    pub fn new() -> Self {
        Self {
            bins: vec![[0; 3]; HISTOGRAM_BINS],
            pixels: 0,
        }
    }

    pub fn add(&mut self, rgb: [u16; 3]) {
        for (c, &v) in rgb.iter().enumerate() {
            self.bins[usize::from(v >> HISTOGRAM_SHIFT)][c] += 1;
        }
        self.pixels += 1;
    }

    /// Input value that maps to full scale so that no more than `threshold`
    /// of the pixels clip in any channel.
    pub fn white_point(&self, threshold: f32) -> u32 {
        let perc = (self.pixels as f64 * f64::from(threshold)) as u64;

        let white_bin = (0..3)
            .map(|c| {
                let mut total = 0u64;
                let mut bin = HISTOGRAM_BINS - 1;
                while bin > MIN_WHITE_BIN {
                    total += u64::from(self.bins[bin][c]);
                    if total > perc {
                        break;
                    }
                    bin -= 1;
                }
                bin
            })
            .max()
            .unwrap_or(MIN_WHITE_BIN);

        (white_bin as u32) << HISTOGRAM_SHIFT
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}
