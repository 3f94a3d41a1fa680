//! Copula family vocabulary.
use serde::{Deserialize, Serialize};

/// The six candidate dependence structures.
///
/// `Comonotonic` is the perfect-dependence reference model; it carries no
/// parameters and a fixed sentinel AIC/BIC so it can appear in every
/// comparison table without ever winning one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopulaFamily {
    Gaussian,
    #[serde(rename = "t")]
    StudentT,
    Clayton,
    Gumbel,
    Frank,
    Comonotonic,
}

impl CopulaFamily {
    /// All candidate families in canonical order.
    pub const ALL: [CopulaFamily; 6] = [
        CopulaFamily::Gaussian,
        CopulaFamily::StudentT,
        CopulaFamily::Clayton,
        CopulaFamily::Gumbel,
        CopulaFamily::Frank,
        CopulaFamily::Comonotonic,
    ];

    /// Number of free parameters (the `k` in AIC/BIC).
    pub fn param_count(self) -> usize {
        match self {
            CopulaFamily::StudentT => 2,
            CopulaFamily::Comonotonic => 0,
            _ => 1,
        }
    }

    /// Lowercase wire name, matching the serde representation.
    pub fn name(self) -> &'static str {
        match self {
            CopulaFamily::Gaussian => "gaussian",
            CopulaFamily::StudentT => "t",
            CopulaFamily::Clayton => "clayton",
            CopulaFamily::Gumbel => "gumbel",
            CopulaFamily::Frank => "frank",
            CopulaFamily::Comonotonic => "comonotonic",
        }
    }
}

impl std::fmt::Display for CopulaFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
