//! Odds ratio and risk ratio estimators with log-scale confidence intervals.

use std::{fmt, str::FromStr};

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

use super::crosstab::ContingencyTable;
use crate::error::AssocError;

const ADJUSTMENT: f64 = 0.5;

/// Which ratio the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioKind {
    OddsRatio,
    RelRisk,
}

impl RatioKind {
    /// Header of the point-estimate column.
    pub fn column_name(&self) -> &'static str {
        match self {
            RatioKind::OddsRatio => "oddsratio",
            RatioKind::RelRisk => "relrisk",
        }
    }

    /// Header of the per-level odds or risk column.
    pub fn measure_name(&self) -> &'static str {
        match self {
            RatioKind::OddsRatio => "odds",
            RatioKind::RelRisk => "risk",
        }
    }
}

impl fmt::Display for RatioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for RatioKind {
    type Err = AssocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "oddsratio" => Ok(RatioKind::OddsRatio),
            "relrisk" => Ok(RatioKind::RelRisk),
            other => Err(AssocError::bad_config("unknown ratio kind", other)),
        }
    }
}

/// Variance formula, chosen together with the point-estimate formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CiMethod {
    Woolf,
    Gart,
    Katz,
    AdjLog,
}

impl CiMethod {
    /// Pick the method from the ratio kind and whether any cell of the table is zero.
    pub fn select(kind: RatioKind, table: &ContingencyTable) -> Self {
        let has_zero = table.min_cell() == 0;
        match (kind, has_zero) {
            (RatioKind::OddsRatio, false) => CiMethod::Woolf,
            (RatioKind::OddsRatio, true) => CiMethod::Gart,
            (RatioKind::RelRisk, false) => CiMethod::Katz,
            (RatioKind::RelRisk, true) => CiMethod::AdjLog,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            CiMethod::Woolf => "woolf",
            CiMethod::Gart => "gart",
            CiMethod::Katz => "katz",
            CiMethod::AdjLog => "adj_log",
        }
    }

    pub fn kind(&self) -> RatioKind {
        match self {
            CiMethod::Woolf | CiMethod::Gart => RatioKind::OddsRatio,
            CiMethod::Katz | CiMethod::AdjLog => RatioKind::RelRisk,
        }
    }

    fn adjusted(&self) -> bool {
        matches!(self, CiMethod::Gart | CiMethod::AdjLog)
    }

    /// Odds (OR methods) or risk (RR methods) of one level, with the +0.5
    /// adjustment applied by the zero-tolerant methods.
    pub fn measure(&self, cases: u64, controls: u64) -> f64 {
        let (a, b) = (cases as f64, controls as f64);
        let k = if self.adjusted() { ADJUSTMENT } else { 0.0 };
        match self.kind() {
            RatioKind::OddsRatio => (a + k) / (b + k),
            RatioKind::RelRisk => (a + k) / (a + b + k),
        }
    }

    /// Point estimate and log-scale standard error for a level `(a, b)`
    /// against the base level `(c, d)`.
    pub fn estimate(&self, stratum: (u64, u64), base: (u64, u64)) -> Option<Estimate> {
        let (a, b) = (stratum.0 as f64, stratum.1 as f64);
        let (c, d) = (base.0 as f64, base.1 as f64);
        let point = self.measure(stratum.0, stratum.1) / self.measure(base.0, base.1);
        let variance = match self {
            CiMethod::Woolf => 1.0 / a + 1.0 / b + 1.0 / c + 1.0 / d,
            CiMethod::Gart => {
                1.0 / (a + ADJUSTMENT)
                    + 1.0 / (b + ADJUSTMENT)
                    + 1.0 / (c + ADJUSTMENT)
                    + 1.0 / (d + ADJUSTMENT)
            }
            CiMethod::Katz => b / (a * (a + b)) + d / (c * (c + d)),
            CiMethod::AdjLog => {
                1.0 / (a + ADJUSTMENT) + 1.0 / (c + ADJUSTMENT)
                    - 1.0 / (a + b + ADJUSTMENT)
                    - 1.0 / (c + d + ADJUSTMENT)
            }
        };
        if !(point.is_finite() && point > 0.0 && variance.is_finite() && variance >= 0.0) {
            return None;
        }
        Some(Estimate {
            point,
            log_se: variance.sqrt(),
        })
    }
}

impl fmt::Display for CiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Ratio on the original scale with its standard error on the log scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Estimate {
    pub point: f64,
    pub log_se: f64,
}

impl Estimate {
    /// Two-sided interval `exp(ln(point) ± z·se)`.
    pub fn interval(&self, z: f64) -> Interval {
        let log_point = self.point.ln();
        Interval {
            lower: (log_point - z * self.log_se).exp(),
            upper: (log_point + z * self.log_se).exp(),
        }
    }
}

/// Raw confidence limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

/// Reject significance levels outside the open unit interval.
pub fn check_alpha(alpha: f64) -> Result<f64, AssocError> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(alpha)
    } else {
        Err(AssocError::bad_config(
            "significance level must lie in (0, 1)",
            alpha,
        ))
    }
}

/// Reliability coefficient `z = Φ⁻¹(1 − α/2)`.
pub fn reliability_coefficient(alpha: f64) -> Result<f64, AssocError> {
    let alpha = check_alpha(alpha)?;
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AssocError::bad_config(e.to_string(), alpha))?;
    Ok(normal.inverse_cdf(1.0 - alpha / 2.0))
}

/// Confidence level as a whole percentage, `round(100·(1−α))` with ties to even.
pub fn confidence_pct(alpha: f64) -> u32 {
    (100.0 * (1.0 - alpha)).round_ties_even() as u32
}

/// Round half away from zero to four decimals and format with four digits.
pub fn format_limit(value: f64) -> String {
    format!("{:.4}", round4(value))
}

pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
