//! Numeric helpers shared by the analysis routines

use rand::Rng;

/// Arithmetic mean, NaN for an empty slice
#[inline]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Variance with `ddof` delta degrees of freedom, NaN when `len <= ddof`
pub fn variance(values: &[f64], ddof: usize) -> f64 {
    let n = values.len();
    if n <= ddof {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - ddof) as f64
}

#[inline]
pub fn std_dev(values: &[f64], ddof: usize) -> f64 {
    variance(values, ddof).sqrt()
}

/// `Z` multiplier of a two-sided interval at `conf_level`
#[inline]
pub fn z_score(conf_level: f64) -> f64 {
    norm_ppf(0.5 + conf_level / 2.0)
}

/// Inverse of the standard normal CDF (Acklam's rational approximation,
/// relative error below 1.2e-9).
pub fn norm_ppf(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969_683_028_665_376e1,
        2.209_460_984_245_205e2,
        -2.759_285_104_469_687e2,
        1.383_577_518_672_69e2,
        -3.066_479_806_614_716e1,
        2.506_628_277_459_239,
    ];
    const B: [f64; 5] = [
        -5.447_609_879_822_406e1,
        1.615_858_368_580_409e2,
        -1.556_989_798_598_866e2,
        6.680_131_188_771_972e1,
        -1.328_068_155_288_572e1,
    ];
    const C: [f64; 6] = [
        -7.784_894_002_430_293e-3,
        -3.223_964_580_411_365e-1,
        -2.400_758_277_161_838,
        -2.549_732_539_343_734,
        4.374_664_141_464_968,
        2.938_163_982_698_783,
    ];
    const D: [f64; 4] = [
        7.784_695_709_041_462e-3,
        3.224_671_290_700_398e-1,
        2.445_134_137_142_996,
        3.754_408_661_907_416,
    ];
    const P_LOW: f64 = 0.02425;

    if p.is_nan() || p <= 0.0 || p >= 1.0 {
        return match p {
            p if p == 0.0 => f64::NEG_INFINITY,
            p if p == 1.0 => f64::INFINITY,
            _ => f64::NAN,
        };
    }

    let tail = |q: f64| {
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    if p < P_LOW {
        tail((-2.0 * p.ln()).sqrt())
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    }
}

/// 1-based ordinal ranks; ties are ranked in order of appearance
pub fn ordinal_ranks(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    let mut ranks = vec![0; values.len()];
    for (rank, idx) in order.into_iter().enumerate() {
        ranks[idx] = rank + 1;
    }
    ranks
}

/// `num` evenly spaced points over `[start, end]`
pub fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num - 1) as f64;
            (0..num).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Trapezoidal integral of `y` over the abscissae `x`
pub fn trapz(y: &[f64], x: &[f64]) -> f64 {
    y.windows(2)
        .zip(x.windows(2))
        .map(|(yw, xw)| 0.5 * (yw[0] + yw[1]) * (xw[1] - xw[0]))
        .sum()
}

/// Draw `n` indices uniformly with replacement from `0..n`
pub fn bootstrap_indices<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<usize> {
    (0..n).map(|_| rng.random_range(0..n)).collect()
}

/// Independent stream seed derived from a base seed
#[inline]
pub fn derive_seed(seed: u64, stream: u64) -> u64 {
    seed ^ stream.wrapping_add(1).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

/// One-dimensional Gaussian kernel density estimate with Silverman's bandwidth
#[derive(Debug, Clone)]
pub struct GaussianKde {
    data: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Fit the estimate; `None` when the data has no spread
    pub fn new(data: &[f64]) -> Option<Self> {
        let n = data.len();
        if n < 2 {
            return None;
        }
        let factor = (n as f64 * 3.0 / 4.0).powf(-1.0 / 5.0);
        let bandwidth = factor * std_dev(data, 1);
        if !(bandwidth.is_finite() && bandwidth > 0.0) {
            return None;
        }
        Some(Self {
            data: data.to_vec(),
            bandwidth,
        })
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Density at each point of `grid`
    pub fn evaluate(&self, grid: &[f64]) -> Vec<f64> {
        let norm = 1.0 / (self.data.len() as f64 * self.bandwidth * (2.0 * std::f64::consts::PI).sqrt());
        grid.iter()
            .map(|&y| {
                self.data
                    .iter()
                    .map(|&xi| {
                        let u = (y - xi) / self.bandwidth;
                        (-0.5 * u * u).exp()
                    })
                    .sum::<f64>()
                    * norm
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_norm_ppf_known_values() {
        assert_abs_diff_eq!(norm_ppf(0.5), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(norm_ppf(0.975), 1.959_963_985, epsilon = 1e-6);
        assert_abs_diff_eq!(norm_ppf(0.01), -2.326_347_874, epsilon = 1e-6);
        assert_abs_diff_eq!(norm_ppf(0.999), 3.090_232_306, epsilon = 1e-6);
        assert_abs_diff_eq!(z_score(0.95), 1.959_963_985, epsilon = 1e-6);
    }

    #[test]
    fn test_variance_ddof() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_abs_diff_eq!(variance(&v, 0), 1.25, epsilon = 1e-12);
        assert_abs_diff_eq!(variance(&v, 1), 5.0 / 3.0, epsilon = 1e-12);
        assert!(variance(&[1.0], 1).is_nan());
    }

    #[test]
    fn test_ordinal_ranks_break_ties_by_position() {
        assert_eq!(ordinal_ranks(&[3.0, 1.0, 1.0, 2.0]), vec![4, 1, 2, 3]);
    }

    #[test]
    fn test_trapz_linear() {
        let x = linspace(0.0, 2.0, 5);
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v).collect();
        assert_abs_diff_eq!(trapz(&y, &x), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_kde_integrates_to_one() {
        let data: Vec<f64> = (0..50).map(|i| (i as f64 * 0.37).sin()).collect();
        let kde = GaussianKde::new(&data).unwrap();
        let grid = linspace(-4.0, 4.0, 2001);
        let density = kde.evaluate(&grid);
        assert_abs_diff_eq!(trapz(&density, &grid), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_kde_rejects_constant_data() {
        assert!(GaussianKde::new(&[2.0, 2.0, 2.0]).is_none());
    }
}
