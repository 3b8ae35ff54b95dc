//! Typed forms of the classifier's raw answers.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::ContractViolation;

/// Binary verdict label. Serialized as the classifier's integer label.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Prediction {
    Human,
    Ai,
}

impl Prediction {
    pub fn is_ai(self) -> bool {
        matches!(self, Prediction::Ai)
    }

    pub fn label(self) -> u8 {
        match self {
            Prediction::Human => 0,
            Prediction::Ai => 1,
        }
    }

    /// Interpret a raw JSON value from the classifier.
    ///
    /// Only the integers `0` and `1` are accepted; `1.0`, `true` or `"1"` are not.
    pub fn from_json(value: &JsonValue) -> Result<Self, ContractViolation> {
        match value.as_u64() {
            Some(0) => Ok(Prediction::Human),
            Some(1) => Ok(Prediction::Ai),
            _ => Err(ContractViolation::InvalidLabel(value.to_string())),
        }
    }
}

impl From<Prediction> for u8 {
    fn from(p: Prediction) -> Self {
        p.label()
    }
}

impl TryFrom<u8> for Prediction {
    type Error = ContractViolation;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Prediction::Human),
            1 => Ok(Prediction::Ai),
            other => Err(ContractViolation::InvalidLabel(other.to_string())),
        }
    }
}

/// `[pHuman, pAI]` as returned by the classifier.
///
/// Each value is finite and within `[0, 1]`. The sum is not checked; the
/// classifier is trusted to return a normalized distribution.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProbabilityPair {
    human: f64,
    ai: f64,
}

impl ProbabilityPair {
    pub fn new(human: f64, ai: f64) -> Result<Self, ContractViolation> {
        Ok(Self {
            human: check_probability(human)?,
            ai: check_probability(ai)?,
        })
    }

    /// Interpret a raw JSON value (expected: a 2-element array of numbers).
    pub fn from_json(value: &JsonValue) -> Result<Self, ContractViolation> {
        let items = value
            .as_array()
            .ok_or_else(|| ContractViolation::ProbabilityOutOfRange(value.to_string()))?;
        if items.len() != 2 {
            return Err(ContractViolation::PairLength(items.len()));
        }

        let number = |v: &JsonValue| {
            v.as_f64()
                .ok_or_else(|| ContractViolation::ProbabilityOutOfRange(v.to_string()))
        };
        Self::new(number(&items[0])?, number(&items[1])?)
    }

    pub fn human(&self) -> f64 {
        self.human
    }

    pub fn ai(&self) -> f64 {
        self.ai
    }

    /// The probability of the given verdict (not the larger of the two).
    pub fn aligned_with(&self, prediction: Prediction) -> f64 {
        match prediction {
            Prediction::Human => self.human,
            Prediction::Ai => self.ai,
        }
    }
}

fn check_probability(p: f64) -> Result<f64, ContractViolation> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(ContractViolation::ProbabilityOutOfRange(p.to_string()))
    }
}
