use itertools::Itertools;
use std::f64::consts::PI;

/// Largest sample size for which the exact null distribution is computed
const EXACT_MAX_SAMPLE: usize = 10_000;

const SERIES_TERMS: usize = 100;
const SERIES_EPSILON: f64 = 1e-16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KsMethod {
    Exact,
    Asymptotic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KsResult {
    pub statistic: f64,
    pub p_value: f64,
    pub method: KsMethod,
}

fn sorted(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .copied()
        .sorted_by(|a, b| a.total_cmp(b))
        .collect()
}

/// Maximum absolute gap between the empirical CDFs of two sorted samples.
///
/// Tied values are consumed together on both sides before the gap is measured.
pub fn ks_statistic(a: &[f64], b: &[f64]) -> f64 {
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let (mut i, mut j) = (0, 0);
    let mut d: f64 = 0.0;

    while i < a.len() && j < b.len() {
        let value = a[i].min(b[j]);

        while i < a.len() && a[i] == value {
            i += 1;
        }
        while j < b.len() && b[j] == value {
            j += 1;
        }

        d = d.max((i as f64 / n1 - j as f64 / n2).abs());
    }

    d
}

/// P(D >= d) under the null, as the share of monotone lattice paths from
/// (0, 0) to (m, n) that touch the region |i/m - j/n| >= d.
///
/// `q[j]` holds that share for the paths ending at (i, j). Every update is a
/// convex combination of its two predecessors, so values stay in [0, 1].
fn exact_p_value(d: f64, m: usize, n: usize) -> f64 {
    let (m, n) = if m < n { (n, m) } else { (m, n) };
    let (mi, ni) = (m as i64, n as i64);

    // D is a difference of multiples of 1/m and 1/n, so D * m * n is integral
    let bound = (d * (m * n) as f64).round() as i64;
    let outside = |i: i64, j: i64| (i * ni - j * mi).abs() >= bound;

    let mut q = vec![0.0; n + 1];
    for j in 1..=n {
        q[j] = if outside(0, j as i64) { 1.0 } else { q[j - 1] };
    }

    for i in 1..=m {
        let ii = i as i64;
        if outside(ii, 0) {
            q[0] = 1.0;
        }

        let fi = i as f64;
        for j in 1..=n {
            q[j] = if outside(ii, j as i64) {
                1.0
            } else {
                let fj = j as f64;
                (q[j] * fi + q[j - 1] * fj) / (fi + fj)
            };
        }
    }

    q[n].clamp(0.0, 1.0)
}

/// Survival function of the Kolmogorov distribution, P(K > x)
pub fn kolmogorov_sf(x: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }

    let p = if x < 1.18 {
        // Jacobi theta form converges fast for small x
        let factor = -(PI * PI) / (8.0 * x * x);
        let mut sum = 0.0;
        for k in 1..=SERIES_TERMS {
            let odd = (2 * k - 1) as f64;
            let term = (factor * odd * odd).exp();
            sum += term;
            if term < SERIES_EPSILON {
                break;
            }
        }
        1.0 - (2.0 * PI).sqrt() / x * sum
    } else {
        let mut sum = 0.0;
        for k in 1..=SERIES_TERMS {
            let kf = k as f64;
            let term = (-2.0 * kf * kf * x * x).exp();
            sum += if k % 2 == 1 { term } else { -term };
            if term < SERIES_EPSILON {
                break;
            }
        }
        2.0 * sum
    };

    p.clamp(0.0, 1.0)
}

fn asymptotic_p_value(d: f64, m: usize, n: usize) -> f64 {
    let (md, nd) = (m as f64, n as f64);
    let en = md * nd / (md + nd);
    kolmogorov_sf(en.sqrt() * d)
}

/// Two-sided two-sample Kolmogorov-Smirnov test.
///
/// Returns `None` when either sample is empty. Identical samples give
/// `statistic = 0` and `p_value = 1`.
pub fn ks_2samp(reference: &[f64], production: &[f64]) -> Option<KsResult> {
    if reference.is_empty() || production.is_empty() {
        return None;
    }

    let a = sorted(reference);
    let b = sorted(production);
    let statistic = ks_statistic(&a, &b);
    let (m, n) = (a.len(), b.len());

    let method = if m.max(n) <= EXACT_MAX_SAMPLE {
        KsMethod::Exact
    } else {
        KsMethod::Asymptotic
    };

    let p_value = if statistic == 0.0 {
        1.0
    } else {
        match method {
            KsMethod::Exact => exact_p_value(statistic, m, n),
            KsMethod::Asymptotic => asymptotic_p_value(statistic, m, n),
        }
    };

    Some(KsResult {
        statistic,
        p_value,
        method,
    })
}
