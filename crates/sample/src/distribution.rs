//! Value-generation rules for synthetic rasters

use floodmap_core::{Error, Result};
use rand::Rng;
use rand_distr::{Distribution, Exp, Uniform};
use serde::{Deserialize, Serialize};

/// How cell values of a synthetic raster are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ValueRule {
    /// Independent draws from `[low, high)`
    Uniform { low: f64, high: f64 },
    /// Independent draws from an exponential distribution with the given
    /// mean (scale)
    Exponential { scale: f64 },
}

impl ValueRule {
    /// Elevation-like data: uniform over [0, 1000) meters
    pub fn elevation() -> Self {
        Self::Uniform {
            low: 0.0,
            high: 1000.0,
        }
    }

    /// Rainfall-like data: exponential with mean 50 mm
    pub fn rainfall() -> Self {
        Self::Exponential { scale: 50.0 }
    }

    /// Draw `count` independent values with the given RNG.
    pub fn sample<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Result<Vec<f64>> {
        match *self {
            ValueRule::Uniform { low, high } => {
                if !(low < high) {
                    return Err(Error::InvalidParameter {
                        name: "uniform range",
                        value: format!("[{}, {})", low, high),
                        reason: "low must be less than high".to_string(),
                    });
                }
                let dist = Uniform::new(low, high);
                Ok((0..count).map(|_| dist.sample(rng)).collect())
            }
            ValueRule::Exponential { scale } => {
                if !scale.is_finite() || scale <= 0.0 {
                    return Err(Error::InvalidParameter {
                        name: "exponential scale",
                        value: scale.to_string(),
                        reason: "scale must be positive and finite".to_string(),
                    });
                }
                // rand_distr parameterizes by rate lambda = 1 / mean
                let dist = Exp::new(1.0 / scale).map_err(|e| Error::Other(e.to_string()))?;
                Ok((0..count).map(|_| dist.sample(rng)).collect())
            }
        }
    }
}
