//! Measures-of-association engine: validate, normalise, cross-tabulate, select, compute, assemble.

pub mod crosstab;
pub mod level;
pub mod normalize;
pub mod ratio;
pub mod table;
pub mod validate;

use polars::prelude::DataFrame;
use tracing::{debug, instrument};

pub use self::{
    crosstab::{ContingencyTable, Stratum},
    level::{Level, Missing},
    ratio::{CiMethod, Estimate, Interval, RatioKind},
    table::{AssociationTable, StratumRow, BASE_SENTINEL},
};
use crate::error::AssocError;

pub type Result<T> = std::result::Result<T, AssocError>;

/// Default significance level.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Knobs shared by both entry points.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub missing: Missing,
    pub alpha: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            missing: Missing::NaN,
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl Options {
    pub fn with_missing(mut self, missing: Missing) -> Self {
        self.missing = missing;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

/// Odds ratios of every level of `factor` against `base`, for outcome value `case`.
pub fn odds_ratio(
    df: &DataFrame,
    outcome: &str,
    case: impl Into<Level>,
    factor: &str,
    base: impl Into<Level>,
    options: &Options,
) -> Result<AssociationTable> {
    measure(
        df,
        RatioKind::OddsRatio,
        outcome,
        &case.into(),
        factor,
        &base.into(),
        options,
    )
}

/// Risk ratios of every level of `factor` against `base`, for outcome value `case`.
pub fn relative_risk(
    df: &DataFrame,
    outcome: &str,
    case: impl Into<Level>,
    factor: &str,
    base: impl Into<Level>,
    options: &Options,
) -> Result<AssociationTable> {
    measure(
        df,
        RatioKind::RelRisk,
        outcome,
        &case.into(),
        factor,
        &base.into(),
        options,
    )
}

/// Run the whole pipeline for one ratio kind. All-or-nothing: any failure returns no table.
#[instrument(skip(df, options), fields(rows = df.height(), alpha = options.alpha))]
pub fn measure(
    df: &DataFrame,
    kind: RatioKind,
    outcome: &str,
    case: &Level,
    factor: &str,
    base: &Level,
    options: &Options,
) -> Result<AssociationTable> {
    let z = ratio::reliability_coefficient(options.alpha)?;
    let validated = validate::validate(df, outcome, case, factor, base, &options.missing)?;
    let observations = normalize::normalise(df, outcome, factor, &options.missing)?;
    let counts = crosstab::crosstab(&observations, &validated);
    let method = CiMethod::select(kind, &counts);
    debug!(%method, min_cell = counts.min_cell(), "selected estimator");
    AssociationTable::assemble(factor, &counts, method, options.alpha, z)
}
