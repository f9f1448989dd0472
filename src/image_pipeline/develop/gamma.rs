//! Output tone curve: a power law with a linear toe, stretched over `[0, imax]`.

/// Iterations of the bisection solving for the toe/power junction.
const SOLVER_ITERATIONS: usize = 48;

/// Lookup table mapping a 16-bit linear value to a 16-bit output value.
pub struct GammaCurve {
    lut: Vec<u16>,
}

impl GammaCurve {
    /// Builds the curve.
    ///
    /// `power` is the display gamma (2.222 for BT.709, 1.0 for linear) and
    /// `toe_slope` the slope of the linear segment near black. Inputs at or
    /// above `imax` saturate to `u16::MAX`.
    pub fn new(power: f64, toe_slope: f64, imax: u32) -> Self {
        let g0 = 1.0 / power;
        let g1 = toe_slope;
        let mut g2 = 0.0;
        let mut g3 = 0.0;
        let mut g4 = 0.0;

        if g1 > 0.0 && (g1 - 1.0) * (g0 - 1.0) <= 0.0 {
            let mut bounds = [0.0f64, 0.0];
            bounds[usize::from(g1 >= 1.0)] = 1.0;
            for _ in 0..SOLVER_ITERATIONS {
                g2 = (bounds[0] + bounds[1]) / 2.0;
                let above = ((g2 / g1).powf(-g0) - 1.0) / g0 - 1.0 / g2 > -1.0;
                bounds[usize::from(above)] = g2;
            }
            g3 = g2 / g1;
            g4 = g2 * (1.0 / g0 - 1.0);
        }

        let imax = f64::from(imax.max(1));
        let lut = (0..=u16::MAX as u32)
            .map(|i| {
                let r = f64::from(i) / imax;
                if r >= 1.0 {
                    return u16::MAX;
                }
                let v = if r < g3 {
                    r * g1
                } else {
                    r.powf(g0) * (1.0 + g4) - g4
                };
                (65536.0 * v).clamp(0.0, f64::from(u16::MAX)) as u16
            })
            .collect();

        Self { lut }
    }

    pub fn apply(&self, value: u16) -> u16 {
        self.lut[usize::from(value)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_full_range_is_identity() {
        let curve = GammaCurve::new(1.0, 1.0, 0x10000);
        for v in [0u16, 1, 255, 4096, 32768, 65534, 65535] {
            assert_eq!(curve.apply(v), v);
        }
    }

    #[test]
    fn test_linear_with_reduced_imax_scales_and_clips() {
        let curve = GammaCurve::new(1.0, 1.0, 0x8000);
        assert_eq!(curve.apply(0), 0);
        assert_eq!(curve.apply(1000), 2000);
        assert_eq!(curve.apply(0x8000), u16::MAX);
        assert_eq!(curve.apply(60000), u16::MAX);
    }

    #[test]
    fn test_bt709_curve_is_monotonic_and_brightens() {
        let curve = GammaCurve::new(2.222, 4.5, 0x10000);
        let mut previous = 0;
        for v in (0..=u16::MAX).step_by(97) {
            let out = curve.apply(v);
            assert!(out >= previous, "curve decreased at {}", v);
            previous = out;
        }
        assert_eq!(curve.apply(0), 0);
        assert!(curve.apply(8192) > 8192);
        // Linear toe near black
        assert_eq!(curve.apply(10), 45);
    }
}
