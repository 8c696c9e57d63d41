use rand::Rng;

use crate::misc::logsumexp;

/// Maximum allowed deviation of a normalized distribution's total mass from
/// one.
pub const NORMALIZATION_TOL: f64 = 1E-4;

/// Convert unnormalized log weights into probabilities.
///
/// # Panics
///
/// Panics if `ln_weights` is empty, or if the normalized weights do not sum
/// to one within [`NORMALIZATION_TOL`]. Both indicate a bug in whatever
/// computed the weights.
pub fn ln_normalize(ln_weights: &[f64]) -> Vec<f64> {
    assert!(!ln_weights.is_empty(), "Cannot normalize empty log weights");

    let z = logsumexp(ln_weights);
    let ps: Vec<f64> = ln_weights.iter().map(|&w| (w - z).exp()).collect();
    let total: f64 = ps.iter().sum();

    // NaN fails both comparisons
    assert!(
        total > 0.0 && (total - 1.0).abs() < NORMALIZATION_TOL,
        "Improperly normalized distribution (sum = {total}) from log \
        weights {ln_weights:?}"
    );
    ps
}

/// Select an index from normalized probabilities given a uniform draw `u`.
///
/// Returns the first index whose cumulative probability exceeds `u`. If
/// rounding leaves `u` beyond the accumulated mass, the last index with
/// positive probability is chosen.
pub fn pflip_with(ps: &[f64], u: f64) -> usize {
    assert!((0.0..=1.0).contains(&u), "Uniform draw {u} out of [0, 1]");

    let mut cut = u;
    for (ix, &p) in ps.iter().enumerate() {
        cut -= p;
        if cut < 0.0 {
            return ix;
        }
    }

    ps.iter()
        .rposition(|&p| p > 0.0)
        .unwrap_or_else(|| panic!("No positive mass in {ps:?}"))
}

/// Draw an index from a categorical distribution given by unnormalized log
/// weights.
///
/// # Example
///
/// ```rust
/// # use softcc_utils::ln_pflip;
/// let mut rng = rand::thread_rng();
/// let ln_weights = vec![f64::NEG_INFINITY, 0.0, f64::NEG_INFINITY];
/// assert_eq!(ln_pflip(&ln_weights, &mut rng), 1);
/// ```
pub fn ln_pflip<R: Rng>(ln_weights: &[f64], rng: &mut R) -> usize {
    let ps = ln_normalize(ln_weights);
    let u: f64 = rng.gen();
    pflip_with(&ps, u)
}

/// Draw a label from `(label, log weight)` candidates.
pub fn ln_pflip_labeled<T: Copy, R: Rng>(
    candidates: &[(T, f64)],
    rng: &mut R,
) -> T {
    let ln_weights: Vec<f64> = candidates.iter().map(|(_, w)| *w).collect();
    let ix = ln_pflip(&ln_weights, rng);
    candidates[ix].0
}
