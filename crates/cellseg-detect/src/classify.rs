//! Positive-cell classification
//!
//! Cells are scored by one measurement against either a single threshold
//! (negative / positive) or three ascending thresholds (negative, 1+, 2+,
//! 3+). With three thresholds the summary also carries the H-score,
//! `1 * %1+ + 2 * %2+ + 3 * %3+`, ranging from 0 to 300.

use crate::object::CellObject;
use crate::{DetectError, DetectResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositivityParams {
    /// Name of the measurement to score, e.g. `"Nucleus: DAB OD mean"`
    pub measurement: String,
    /// One threshold, or three ascending thresholds
    pub thresholds: Vec<f64>,
}

impl PositivityParams {
    /// Single-threshold classification
    pub fn single(measurement: impl Into<String>, threshold: f64) -> Self {
        Self {
            measurement: measurement.into(),
            thresholds: vec![threshold],
        }
    }

    /// Three-tier (1+, 2+, 3+) classification
    pub fn three_tier(measurement: impl Into<String>, t1: f64, t2: f64, t3: f64) -> Self {
        Self {
            measurement: measurement.into(),
            thresholds: vec![t1, t2, t3],
        }
    }

    /// Check the threshold count and order
    pub fn validate(&self) -> DetectResult<()> {
        if self.thresholds.len() != 1 && self.thresholds.len() != 3 {
            return Err(DetectError::InvalidParameters(format!(
                "positivity needs 1 or 3 thresholds, got {}",
                self.thresholds.len()
            )));
        }
        if self.thresholds.iter().any(|t| !t.is_finite()) {
            return Err(DetectError::InvalidParameters(
                "positivity thresholds must be finite".to_string(),
            ));
        }
        if self.thresholds.windows(2).any(|w| w[0] > w[1]) {
            return Err(DetectError::InvalidParameters(
                "positivity thresholds must be ascending".to_string(),
            ));
        }
        if self.measurement.is_empty() {
            return Err(DetectError::InvalidParameters(
                "positivity measurement name is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Classify a measurement value
    ///
    /// Missing or NaN values are negative. A value equal to a threshold
    /// falls in the class above it.
    pub fn classify(&self, value: Option<f64>) -> CellClass {
        let Some(v) = value.filter(|v| !v.is_nan()) else {
            return CellClass::Negative;
        };
        let tier = self.thresholds.iter().take_while(|&&t| v >= t).count();
        match (self.thresholds.len(), tier) {
            (_, 0) => CellClass::Negative,
            (1, _) => CellClass::Positive,
            (_, 1) => CellClass::OnePlus,
            (_, 2) => CellClass::TwoPlus,
            _ => CellClass::ThreePlus,
        }
    }

    /// True for the three-tier scheme
    pub fn is_three_tier(&self) -> bool {
        self.thresholds.len() == 3
    }
}

/// Classification of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellClass {
    /// Below the (first) threshold
    Negative,
    /// Above the single threshold
    Positive,
    /// Weakly positive
    OnePlus,
    /// Moderately positive
    TwoPlus,
    /// Strongly positive
    ThreePlus,
}

impl CellClass {
    /// True for every class except `Negative`
    pub fn is_positive(self) -> bool {
        self != CellClass::Negative
    }
}

impl fmt::Display for CellClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CellClass::Negative => "Negative",
            CellClass::Positive => "Positive",
            CellClass::OnePlus => "1+",
            CellClass::TwoPlus => "2+",
            CellClass::ThreePlus => "3+",
        })
    }
}

/// Counts over a set of classified cells
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClassificationSummary {
    /// Number of cells
    pub total: usize,
    /// Number of non-negative cells
    pub positive: usize,
    /// Per-tier counts (1+, 2+, 3+), zero for the single-threshold scheme
    pub tiers: [usize; 3],
    /// H-score for the three-tier scheme
    pub h_score: Option<f64>,
}

impl ClassificationSummary {
    /// Percentage of positive cells (0 when there are no cells)
    pub fn percent_positive(&self) -> f64 {
        percent(self.positive, self.total)
    }
}

fn percent(n: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * n as f64 / total as f64
    }
}

/// Classify every object in place and summarise the result
pub fn classify_objects(objects: &mut [CellObject], params: &PositivityParams) -> ClassificationSummary {
    let mut summary = ClassificationSummary {
        total: objects.len(),
        ..Default::default()
    };
    for obj in objects.iter_mut() {
        let class = params.classify(obj.measurements().get(&params.measurement));
        match class {
            CellClass::Negative => {}
            CellClass::Positive => summary.positive += 1,
            CellClass::OnePlus => summary.tiers[0] += 1,
            CellClass::TwoPlus => summary.tiers[1] += 1,
            CellClass::ThreePlus => summary.tiers[2] += 1,
        }
        obj.set_class(class);
    }
    if params.is_three_tier() {
        summary.positive = summary.tiers.iter().sum();
        let h = (1..=3)
            .zip(summary.tiers)
            .map(|(w, n)| w as f64 * percent(n, summary.total))
            .sum();
        summary.h_score = Some(h);
    }
    summary
}

/// Human-readable summary line
pub fn summary_text(count: usize, classification: Option<&ClassificationSummary>) -> String {
    let mut text = format!("{count} {}", if count == 1 { "cell detected" } else { "cells detected" });
    if let Some(c) = classification {
        text.push_str(&format!(
            ", {} positive ({:.1}%)",
            c.positive,
            c.percent_positive()
        ));
        if let Some(h) = c.h_score {
            text.push_str(&format!(
                ", 1+: {}, 2+: {}, 3+: {}, H-score: {h:.1}",
                c.tiers[0], c.tiers[1], c.tiers[2]
            ));
        }
    }
    text
}
