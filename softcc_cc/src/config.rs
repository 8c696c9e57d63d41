use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_n_views() -> usize {
    1
}

fn default_alpha() -> f64 {
    1.0
}

fn default_xi() -> f64 {
    1.0
}

fn default_eta() -> f64 {
    0.1
}

/// Model configuration for the sampler
///
/// Fixed for the lifetime of a [`crate::SoftCrossCat`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SamplerConfig {
    /// Number of views, `M`
    #[serde(default = "default_n_views")]
    pub n_views: usize,
    /// Maximum number of clusters per view. `None` is unlimited.
    #[serde(default)]
    pub k_max: Option<usize>,
    /// Smoother on the document-to-cluster assignments (cluster birth)
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Smoother on the token-to-view assignments
    #[serde(default = "default_xi")]
    pub xi: f64,
    /// Symmetric Dirichlet smoother on each cluster's word distribution
    #[serde(default = "default_eta")]
    pub eta: f64,
    /// Pin view 0 to a single "noise" cluster
    #[serde(default)]
    pub noise_view: bool,
}

impl SamplerConfig {
    pub fn new() -> Self {
        SamplerConfig {
            n_views: default_n_views(),
            k_max: None,
            alpha: default_alpha(),
            xi: default_xi(),
            eta: default_eta(),
            noise_view: false,
        }
    }

    #[must_use]
    pub fn n_views(mut self, n_views: usize) -> Self {
        self.n_views = n_views;
        self
    }

    #[must_use]
    pub fn k_max(mut self, k_max: Option<usize>) -> Self {
        self.k_max = k_max;
        self
    }

    #[must_use]
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    #[must_use]
    pub fn xi(mut self, xi: f64) -> Self {
        self.xi = xi;
        self
    }

    #[must_use]
    pub fn eta(mut self, eta: f64) -> Self {
        self.eta = eta;
        self
    }

    #[must_use]
    pub fn noise_view(mut self, noise_view: bool) -> Self {
        self.noise_view = noise_view;
        self
    }

    /// Whether `view_ix` is the view pinned to a single cluster
    #[inline]
    pub fn is_noise_view(&self, view_ix: usize) -> bool {
        self.noise_view && view_ix == 0
    }

    /// Whether a fresh cluster may be proposed in `view_ix` when it holds
    /// `n_live` clusters.
    ///
    /// A view with no live clusters can always take a fresh one, otherwise
    /// the document being placed would have nowhere to go.
    pub fn may_grow(&self, view_ix: usize, n_live: usize) -> bool {
        if n_live == 0 {
            return true;
        }
        let under_cap = self.k_max.map_or(true, |k_max| n_live < k_max);
        under_cap && !self.is_noise_view(view_ix)
    }

    /// Convert a command-line style cluster cap, where `-1` means unlimited.
    ///
    /// Zero is passed through so that [`SamplerConfig::validate`] rejects
    /// it; any other negative value is an error.
    pub fn k_max_from_sentinel(
        value: i64,
    ) -> Result<Option<usize>, ConfigError> {
        match value {
            -1 => Ok(None),
            _ => usize::try_from(value)
                .map(Some)
                .map_err(|_| ConfigError::InvalidKMax(value)),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_views == 0 {
            return Err(ConfigError::NoViews);
        }
        if self.k_max == Some(0) {
            return Err(ConfigError::ZeroKMax);
        }
        for (name, value) in
            [("alpha", self.alpha), ("xi", self.xi), ("eta", self.eta)]
        {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidSmoother { name, value });
            }
        }
        Ok(())
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SamplerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_views_is_invalid() {
        let config = SamplerConfig::new().n_views(0);
        assert_eq!(config.validate(), Err(ConfigError::NoViews));
    }

    #[test]
    fn zero_k_max_is_invalid() {
        let config = SamplerConfig::new().k_max(Some(0));
        assert_eq!(config.validate(), Err(ConfigError::ZeroKMax));
    }

    #[test]
    fn non_positive_smoothers_are_invalid() {
        let config = SamplerConfig::new().alpha(0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSmoother { name: "alpha", .. })
        ));

        let config = SamplerConfig::new().xi(-1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSmoother { name: "xi", .. })
        ));

        let config = SamplerConfig::new().eta(f64::NAN);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSmoother { name: "eta", .. })
        ));
    }

    #[test]
    fn k_max_sentinel() {
        assert_eq!(SamplerConfig::k_max_from_sentinel(-1), Ok(None));
        assert_eq!(SamplerConfig::k_max_from_sentinel(0), Ok(Some(0)));
        assert_eq!(SamplerConfig::k_max_from_sentinel(25), Ok(Some(25)));
        assert_eq!(
            SamplerConfig::k_max_from_sentinel(-2),
            Err(ConfigError::InvalidKMax(-2))
        );
        assert_eq!(
            SamplerConfig::k_max_from_sentinel(i64::MIN),
            Err(ConfigError::InvalidKMax(i64::MIN))
        );
    }

    #[test]
    fn may_grow_respects_k_max() {
        let config = SamplerConfig::new().n_views(2).k_max(Some(3));
        assert!(config.may_grow(1, 2));
        assert!(!config.may_grow(1, 3));

        let unlimited = SamplerConfig::new();
        assert!(unlimited.may_grow(0, 10_000));
    }

    #[test]
    fn noise_view_never_grows_unless_empty() {
        let config = SamplerConfig::new().n_views(3).noise_view(true);
        assert!(!config.may_grow(0, 1));
        assert!(config.may_grow(0, 0));
        assert!(config.may_grow(1, 1));
    }

    #[test]
    fn deserialize_fills_defaults() {
        let config: SamplerConfig =
            serde_json::from_str(r#"{"n_views": 4, "noise_view": true}"#)
                .unwrap();
        assert_eq!(config.n_views, 4);
        assert!(config.noise_view);
        assert_eq!(config.k_max, None);
        assert_eq!(config.alpha, 1.0);
        assert_eq!(config.eta, 0.1);
    }

    #[test]
    fn deserialize_rejects_unknown_fields() {
        let res: Result<SamplerConfig, _> =
            serde_json::from_str(r#"{"n_views": 4, "beta": 2.0}"#);
        assert!(res.is_err());
    }
}
