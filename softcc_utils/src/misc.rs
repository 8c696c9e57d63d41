/// Numerically stable `log(sum(exp(xs))`
///
/// Entries of negative infinity contribute nothing. If every entry is
/// negative infinity, so is the result.
///
/// # Example
///
/// ```rust
/// # use softcc_utils::logsumexp;
/// let xs = vec![0.0_f64; 4];
/// assert!((logsumexp(&xs) - 4_f64.ln()).abs() < 1E-12);
/// ```
#[inline]
pub fn logsumexp(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        panic!("Empty container");
    } else if xs.len() == 1 {
        xs[0]
    } else {
        let maxval = xs
            .iter()
            .copied()
            .max_by(|x, y| {
                x.partial_cmp(y)
                    .unwrap_or_else(|| panic!("NaN in log weights {:?}", xs))
            })
            .unwrap_or(f64::NEG_INFINITY);

        if maxval == f64::NEG_INFINITY {
            return f64::NEG_INFINITY;
        }

        xs.iter()
            .fold(0.0_f64, |acc, x| acc + (x - maxval).exp())
            .ln()
            + maxval
    }
}

/// Perform ln(exp(x) + exp(y)) in a more numerically stable way
#[inline]
pub fn logaddexp(x: f64, y: f64) -> f64 {
    if x == f64::NEG_INFINITY {
        y
    } else if y == f64::NEG_INFINITY {
        x
    } else if x > y {
        (y - x).exp().ln_1p() + x
    } else {
        (x - y).exp().ln_1p() + y
    }
}

/// Returns the `k` largest `(key, count)` pairs, largest count first. Ties
/// go to the smaller key.
pub fn top_k_counts<'a, I>(counts: I, k: usize) -> Vec<(usize, usize)>
where
    I: IntoIterator<Item = (&'a usize, &'a usize)>,
{
    let mut pairs: Vec<(usize, usize)> =
        counts.into_iter().map(|(&key, &ct)| (key, ct)).collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    pairs.truncate(k);
    pairs
}
