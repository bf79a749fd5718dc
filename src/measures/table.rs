//! Result assembly: the contingency table annotated with ratios and confidence limits.

use std::collections::BTreeSet;

use polars::prelude::{CsvWriter, DataFrame, NamedFrom, SerWriter, Series};
use serde::Serialize;

use super::{
    crosstab::ContingencyTable,
    level::Level,
    ratio::{self, CiMethod, Estimate, Interval, RatioKind},
};
use crate::error::AssocError;

/// Placeholder written into the CI cells of the base level.
pub const BASE_SENTINEL: &str = "---";

/// Header of the row-total column of risk ratio tables.
pub const TOTAL_COLUMN: &str = "total";

/// One output row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StratumRow {
    pub level: Level,
    pub cases: u64,
    pub controls: u64,
    /// Row total, reported for risk ratios only.
    pub total: Option<u64>,
    /// Odds or risk of this level.
    pub measure: f64,
    /// Odds ratio or risk ratio against the base level; exactly 1 on the base row.
    pub ratio: f64,
    /// Formatted lower limit, or [`BASE_SENTINEL`].
    pub lower: String,
    /// Formatted upper limit, or [`BASE_SENTINEL`].
    pub upper: String,
    /// Unrounded limits; `None` on the base row.
    pub interval: Option<Interval>,
    pub log_se: Option<f64>,
    pub is_base: bool,
}

/// Annotated contingency table returned by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociationTable {
    /// Name of the risk-factor column.
    pub factor: String,
    pub kind: RatioKind,
    pub method: CiMethod,
    pub alpha: f64,
    pub case: Level,
    pub control: Level,
    pub base: Level,
    pub rows: Vec<StratumRow>,
}

impl AssociationTable {
    /// Build the annotated table from the counts, the chosen method and `z`.
    pub fn assemble(
        factor: &str,
        table: &ContingencyTable,
        method: CiMethod,
        alpha: f64,
        z: f64,
    ) -> Result<Self, AssocError> {
        let base = table.base_stratum()?;
        let base_counts = (base.cases, base.controls);
        let kind = method.kind();

        let mut rows = Vec::with_capacity(table.strata.len());
        for stratum in &table.strata {
            let is_base = stratum.level == table.base;
            let total = match kind {
                RatioKind::RelRisk => Some(stratum.total()),
                RatioKind::OddsRatio => None,
            };
            let measure = method.measure(stratum.cases, stratum.controls);
            if is_base {
                rows.push(StratumRow {
                    level: stratum.level.clone(),
                    cases: stratum.cases,
                    controls: stratum.controls,
                    total,
                    measure,
                    ratio: 1.0,
                    lower: BASE_SENTINEL.to_string(),
                    upper: BASE_SENTINEL.to_string(),
                    interval: None,
                    log_se: None,
                    is_base,
                });
                continue;
            }

            let estimate: Estimate = method
                .estimate((stratum.cases, stratum.controls), base_counts)
                .ok_or_else(|| AssocError::Undefined {
                    level: stratum.level.to_string(),
                    quantity: format!("{kind} ({method})"),
                })?;
            let interval = estimate.interval(z);
            rows.push(StratumRow {
                level: stratum.level.clone(),
                cases: stratum.cases,
                controls: stratum.controls,
                total,
                measure,
                ratio: estimate.point,
                lower: ratio::format_limit(interval.lower),
                upper: ratio::format_limit(interval.upper),
                interval: Some(interval),
                log_se: Some(estimate.log_se),
                is_base,
            });
        }

        let assembled = Self {
            factor: factor.to_string(),
            kind,
            method,
            alpha,
            case: table.case.clone(),
            control: table.control.clone(),
            base: table.base.clone(),
            rows,
        };
        assembled.check_headers()?;
        Ok(assembled)
    }

    /// Headers come partly from data values; every rendering needs them unique.
    fn check_headers(&self) -> Result<(), AssocError> {
        let mut seen = BTreeSet::new();
        seen.insert(self.factor.clone());
        for header in self.columns() {
            if !seen.insert(header.clone()) {
                return Err(AssocError::bad_config(
                    "outcome value or risk-factor column name collides with an output column",
                    header,
                ));
            }
        }
        Ok(())
    }

    /// Header of the lower limit column, e.g. `ci95_woolf_llim`.
    pub fn lower_column(&self) -> String {
        format!(
            "ci{}_{}_llim",
            ratio::confidence_pct(self.alpha),
            self.method.tag()
        )
    }

    /// Header of the upper limit column, e.g. `ci95_woolf_ulim`.
    pub fn upper_column(&self) -> String {
        format!(
            "ci{}_{}_ulim",
            ratio::confidence_pct(self.alpha),
            self.method.tag()
        )
    }

    /// Column headers in output order, excluding the level column.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = vec![self.case.to_string(), self.control.to_string()];
        if self.kind == RatioKind::RelRisk {
            columns.push(TOTAL_COLUMN.to_string());
        }
        columns.push(self.kind.measure_name().to_string());
        columns.push(self.kind.column_name().to_string());
        columns.push(self.lower_column());
        columns.push(self.upper_column());
        columns
    }

    pub fn row(&self, level: &Level) -> Option<&StratumRow> {
        self.rows.iter().find(|r| r.level == *level)
    }

    /// Sum of all case and control counts.
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|r| r.cases + r.controls).sum()
    }

    /// Render as a polars frame: the level column, then the headers of [`Self::columns`].
    pub fn to_dataframe(&self) -> Result<DataFrame, AssocError> {
        let headers = self.columns();
        let mut names = headers.iter().map(String::as_str);
        let mut next = || names.next().unwrap_or_default();

        let mut series = vec![
            Series::new(
                self.factor.as_str().into(),
                self.rows
                    .iter()
                    .map(|r| r.level.to_string())
                    .collect::<Vec<_>>(),
            ),
            Series::new(
                next().into(),
                self.rows.iter().map(|r| r.cases as i64).collect::<Vec<_>>(),
            ),
            Series::new(
                next().into(),
                self.rows
                    .iter()
                    .map(|r| r.controls as i64)
                    .collect::<Vec<_>>(),
            ),
        ];
        if self.kind == RatioKind::RelRisk {
            series.push(Series::new(
                next().into(),
                self.rows
                    .iter()
                    .map(|r| r.total.map(|n| n as i64))
                    .collect::<Vec<_>>(),
            ));
        }
        series.push(Series::new(
            next().into(),
            self.rows.iter().map(|r| r.measure).collect::<Vec<_>>(),
        ));
        series.push(Series::new(
            next().into(),
            self.rows.iter().map(|r| r.ratio).collect::<Vec<_>>(),
        ));
        series.push(Series::new(
            next().into(),
            self.rows.iter().map(|r| r.lower.clone()).collect::<Vec<_>>(),
        ));
        series.push(Series::new(
            next().into(),
            self.rows.iter().map(|r| r.upper.clone()).collect::<Vec<_>>(),
        ));
        Ok(DataFrame::new(series)?)
    }

    /// CSV text of [`Self::to_dataframe`].
    pub fn to_csv(&self) -> Result<String, AssocError> {
        let mut df = self.to_dataframe()?;
        let mut buf = Vec::new();
        CsvWriter::new(&mut buf).finish(&mut df)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
