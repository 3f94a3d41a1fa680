//! Dependence summaries: model-implied Kendall's τ, tail-dependence
//! coefficients, and the O(n log n) empirical τ.
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::copula::{
    density::FRANK_INDEPENDENCE_EPS,
    errors::{FitError, FitResult},
    family::CopulaFamily,
};

/// Model-implied Kendall's τ for a fitted parameter vector.
///
/// Closed forms throughout except Frank, which integrates the first Debye
/// function numerically.
///
/// # Errors
/// [`FitError::ParamLengthMismatch`] when `params` does not match the
/// family's parameter count.
pub fn model_tau(family: CopulaFamily, params: &[f64]) -> FitResult<f64> {
    check_param_len(family, params)?;
    Ok(match family {
        CopulaFamily::Gaussian => (2.0 / std::f64::consts::PI) * params[0].asin(),
        CopulaFamily::StudentT => (2.0 / std::f64::consts::PI) * params[0].asin(),
        CopulaFamily::Clayton => params[0] / (params[0] + 2.0),
        CopulaFamily::Gumbel => 1.0 - 1.0 / params[0],
        CopulaFamily::Frank => frank_tau(params[0]),
        CopulaFamily::Comonotonic => 1.0,
    })
}

/// Lower and upper tail-dependence coefficients (λ_L, λ_U).
///
/// # Errors
/// - [`FitError::ParamLengthMismatch`] on wrong parameter count.
/// - [`FitError::Distribution`] if the Student-t CDF cannot be built.
pub fn tail_dependence(family: CopulaFamily, params: &[f64]) -> FitResult<(f64, f64)> {
    check_param_len(family, params)?;
    Ok(match family {
        CopulaFamily::Gaussian | CopulaFamily::Frank => (0.0, 0.0),
        CopulaFamily::StudentT => {
            let (rho, nu) = (params[0], params[1]);
            let arg = -((nu + 1.0) * (1.0 - rho) / (1.0 + rho)).sqrt();
            let t_dist = StudentsT::new(0.0, 1.0, nu + 1.0)
                .map_err(|e| FitError::Distribution { text: e.to_string() })?;
            let lambda = 2.0 * t_dist.cdf(arg);
            (lambda, lambda)
        }
        CopulaFamily::Clayton => (2.0f64.powf(-1.0 / params[0]), 0.0),
        CopulaFamily::Gumbel => (0.0, 2.0 - 2.0f64.powf(1.0 / params[0])),
        CopulaFamily::Comonotonic => (1.0, 1.0),
    })
}

/// Kendall's τ for the Frank copula: τ(θ) = 1 − (4/θ)(1 − D₁(θ)).
pub fn frank_tau(theta: f64) -> f64 {
    if theta.abs() < FRANK_INDEPENDENCE_EPS {
        return 0.0;
    }
    1.0 - (4.0 / theta) * (1.0 - debye1(theta))
}

/// First Debye function D₁(x) = (1/x) ∫₀ˣ t/(eᵗ − 1) dt, extended to
/// negative arguments by D₁(−x) = D₁(x) + x/2.
pub fn debye1(x: f64) -> f64 {
    if x == 0.0 {
        return 1.0;
    }
    if x < 0.0 {
        return debye1(-x) + (-x) / 2.0;
    }
    // Simpson's rule; the integrand t/(eᵗ − 1) → 1 as t → 0.
    let integrand = |t: f64| if t == 0.0 { 1.0 } else { t / t.exp_m1() };
    let panels = 200;
    let h = x / panels as f64;
    let mut total = integrand(0.0) + integrand(x);
    for i in 1..panels {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        total += weight * integrand(i as f64 * h);
    }
    (total * h / 3.0) / x
}

/// Empirical Kendall's τ_b via Knight's O(n log n) algorithm.
///
/// Sorts by (x, y), counts tied-x, tied-y, and jointly tied pairs, then
/// counts discordant swaps with a merge sort over the y sequence. Handles
/// ties with the τ_b denominator correction.
///
/// # Errors
/// - [`FitError::MarginLengthMismatch`] / [`FitError::EmptySample`] on
///   malformed input.
pub fn empirical_tau(xs: &[f64], ys: &[f64]) -> FitResult<f64> {
    if xs.len() != ys.len() {
        return Err(FitError::MarginLengthMismatch { u_len: xs.len(), v_len: ys.len() });
    }
    let n = xs.len();
    if n < 2 {
        return Err(FitError::EmptySample);
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        xs[a].partial_cmp(&xs[b])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(ys[a].partial_cmp(&ys[b]).unwrap_or(std::cmp::Ordering::Equal))
    });

    // Tied-x pairs (n1) and jointly tied pairs (n3), from the sorted order.
    let mut n1 = 0u64;
    let mut n3 = 0u64;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && xs[order[j]] == xs[order[i]] {
            j += 1;
        }
        n1 += pairs(j - i);
        let mut k = i;
        while k < j {
            let mut m = k + 1;
            while m < j && ys[order[m]] == ys[order[k]] {
                m += 1;
            }
            n3 += pairs(m - k);
            k = m;
        }
        i = j;
    }

    // Discordant pairs: inversions of the y sequence in x order. Within a
    // tied-x block y is ascending, so no spurious inversions arise there.
    let mut y_in_x_order: Vec<f64> = order.iter().map(|&idx| ys[idx]).collect();
    let swaps = merge_count(&mut y_in_x_order);

    // Tied-y pairs (n2), from the y values alone.
    let mut y_sorted = ys.to_vec();
    y_sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mut n2 = 0u64;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && y_sorted[j] == y_sorted[i] {
            j += 1;
        }
        n2 += pairs(j - i);
        i = j;
    }

    let n0 = pairs(n);
    let concordant_minus_discordant =
        n0 as i64 - n1 as i64 - n2 as i64 + n3 as i64 - 2 * swaps as i64;
    let denom = (((n0 - n1) as f64) * ((n0 - n2) as f64)).sqrt();
    if denom == 0.0 {
        // One margin is constant; tau is undefined, report 0.
        return Ok(0.0);
    }
    Ok(concordant_minus_discordant as f64 / denom)
}

fn pairs(k: usize) -> u64 {
    (k as u64) * (k as u64 - 1) / 2
}

/// Merge sort counting inversions, where equal elements do not count.
fn merge_count(values: &mut [f64]) -> u64 {
    let n = values.len();
    if n < 2 {
        return 0;
    }
    let mid = n / 2;
    let mut swaps = {
        let (left, right) = values.split_at_mut(mid);
        merge_count(left) + merge_count(right)
    };
    let mut merged = Vec::with_capacity(n);
    let (mut i, mut j) = (0, mid);
    while i < mid && j < n {
        if values[i] <= values[j] {
            merged.push(values[i]);
            i += 1;
        } else {
            merged.push(values[j]);
            swaps += (mid - i) as u64;
            j += 1;
        }
    }
    merged.extend_from_slice(&values[i..mid]);
    merged.extend_from_slice(&values[j..n]);
    values.copy_from_slice(&merged);
    swaps
}

fn check_param_len(family: CopulaFamily, params: &[f64]) -> FitResult<()> {
    let expected = family.param_count();
    if params.len() != expected {
        return Err(FitError::ParamLengthMismatch {
            family: family.name(),
            expected,
            actual: params.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    /*
    Scope
    -----
    Closed-form tau values, the Debye integral, tail-dependence formulas,
    and Knight's empirical tau against a naive O(n²) count.
    */
    use super::*;

    #[test]
    // Purpose: D₁(1) matches the tabulated value 0.777505.
    fn debye_matches_tabulated_value() {
        assert!((debye1(1.0) - 0.777505).abs() < 1e-5);
    }

    #[test]
    // Purpose: closed-form taus at reference parameters.
    fn model_tau_reference_values() {
        let tau_g = model_tau(CopulaFamily::Gaussian, &[0.5]).unwrap();
        assert!((tau_g - (2.0 / std::f64::consts::PI) * 0.5f64.asin()).abs() < 1e-12);
        assert!((model_tau(CopulaFamily::Clayton, &[2.0]).unwrap() - 0.5).abs() < 1e-12);
        assert!((model_tau(CopulaFamily::Gumbel, &[2.0]).unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(model_tau(CopulaFamily::Comonotonic, &[]).unwrap(), 1.0);
        // Frank tau is odd in theta and increasing.
        let t4 = frank_tau(4.0);
        assert!((frank_tau(-4.0) + t4).abs() < 1e-9);
        assert!(t4 > frank_tau(2.0) && t4 < 1.0);
    }

    #[test]
    // Purpose: tail-dependence formulas at reference parameters.
    fn tail_dependence_reference_values() {
        assert_eq!(tail_dependence(CopulaFamily::Gaussian, &[0.9]).unwrap(), (0.0, 0.0));
        let (lo, up) = tail_dependence(CopulaFamily::Clayton, &[1.0]).unwrap();
        assert!((lo - 0.5).abs() < 1e-12 && up == 0.0);
        let (lo, up) = tail_dependence(CopulaFamily::Gumbel, &[2.0]).unwrap();
        assert!(lo == 0.0 && (up - (2.0 - 2.0f64.sqrt())).abs() < 1e-12);
        let (lo, up) = tail_dependence(CopulaFamily::StudentT, &[0.5, 4.0]).unwrap();
        assert!(lo > 0.0 && (lo - up).abs() < 1e-15);
    }

    /// Direct O(n²) τ_b: n1/n2 count pairs tied in x / in y (joint ties
    /// included in both), C and D count pairs untied in either margin.
    fn naive_tau_b(xs: &[f64], ys: &[f64]) -> f64 {
        let n = xs.len();
        let (mut c, mut d, mut n1, mut n2) = (0i64, 0i64, 0i64, 0i64);
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = xs[i] - xs[j];
                let dy = ys[i] - ys[j];
                if dx == 0.0 {
                    n1 += 1;
                }
                if dy == 0.0 {
                    n2 += 1;
                }
                if dx != 0.0 && dy != 0.0 {
                    if dx * dy > 0.0 {
                        c += 1;
                    } else {
                        d += 1;
                    }
                }
            }
        }
        let n0 = (n * (n - 1) / 2) as f64;
        (c - d) as f64 / (((n0 - n1 as f64) * (n0 - n2 as f64)).sqrt())
    }

    #[test]
    // Purpose: Knight's algorithm agrees with the naive O(n²) count,
    // including under heavy ties.
    fn knight_matches_naive() {
        // Deterministic pseudo-random data with ties from rounding.
        let n = 300;
        let xs: Vec<f64> =
            (0..n).map(|i| ((i as f64 * 0.61803).fract() * 20.0).round() / 2.0).collect();
        let ys: Vec<f64> = (0..n)
            .map(|i| {
                let noise = (i as f64 * 0.41421).fract();
                ((xs[i] * 0.7 + noise * 6.0) * 2.0).round() / 2.0
            })
            .collect();
        let fast = empirical_tau(&xs, &ys).unwrap();
        let naive = naive_tau_b(&xs, &ys);
        assert!((fast - naive).abs() < 1e-12, "fast {fast} vs naive {naive}");
    }

    #[test]
    // Purpose: perfect concordance and discordance hit ±1.
    fn knight_perfect_dependence() {
        let xs: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let ys = xs.clone();
        assert!((empirical_tau(&xs, &ys).unwrap() - 1.0).abs() < 1e-12);
        let ys_rev: Vec<f64> = xs.iter().map(|x| -x).collect();
        assert!((empirical_tau(&xs, &ys_rev).unwrap() + 1.0).abs() < 1e-12);
    }
}
