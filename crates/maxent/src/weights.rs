use std::collections::BTreeMap;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::WeightsError;

/// Learned weight of every feature, keyed by feature name.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct FeatureWeights {
    weights: BTreeMap<String, f64>,
}

impl FeatureWeights {
    /// Pair `feature_map[i]` with `x[i]` for every feature.
    pub fn new(feature_map: &[String], x: &[f64]) -> Result<Self, WeightsError> {
        if feature_map.len() != x.len() {
            return Err(WeightsError::LengthMismatch {
                features: feature_map.len(),
                weights: x.len(),
            });
        }
        Ok(Self {
            weights: feature_map.iter().cloned().zip(x.iter().copied()).collect(),
        })
    }

    pub fn get(&self, feature: &str) -> Option<f64> {
        self.weights.get(feature).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Feature names in output order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.weights.keys().map(String::as_str)
    }

    /// Write the weights as a single JSON object.
    pub fn write_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer(writer, self)
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
