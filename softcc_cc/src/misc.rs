/// Natural log of the gamma function
#[inline]
pub(crate) fn ln_gamma(x: f64) -> f64 {
    ::special::Gamma::ln_gamma(x).0
}
