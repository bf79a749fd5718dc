//! Projection of the frame onto the outcome and risk-factor columns, with missing rows purged.

use polars::prelude::{DataFrame, DataType, Series};
use tracing::{debug, warn};

use super::level::{Level, Missing};
use crate::error::AssocError;

/// Two-column view of the input with every missing row removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Observations {
    pub outcome: Vec<Level>,
    pub factor: Vec<Level>,
    /// Rows removed because either column was missing.
    pub dropped: usize,
}

impl Observations {
    pub fn len(&self) -> usize {
        self.outcome.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcome.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Level, &Level)> {
        self.outcome.iter().zip(self.factor.iter())
    }
}

/// Look up a column by name, mapping absence to [`AssocError::MissingColumn`].
pub(crate) fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series, AssocError> {
    df.column(name).map_err(|_| AssocError::MissingColumn {
        column: name.to_string(),
    })
}

/// Read every cell of a column as a [`Level`], `None` where the missing policy applies.
pub(crate) fn read_levels(
    series: &Series,
    missing: &Missing,
) -> Result<Vec<Option<Level>>, AssocError> {
    let raw: Vec<Option<Level>> = match series.dtype() {
        DataType::Boolean => series
            .bool()?
            .into_iter()
            .map(|v| v.map(Level::Bool))
            .collect(),
        dt if dt.is_integer() => series
            .cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .map(|v| v.map(Level::Int))
            .collect(),
        dt if dt.is_float() => series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            // `+ 0.0` folds -0.0 into 0.0
            .map(|v| v.map(|f| Level::Float(f + 0.0)))
            .collect(),
        _ => series
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|v| v.map(|s| Level::Str(s.to_string())))
            .collect(),
    };
    Ok(raw.into_iter().map(|v| missing.filter(v)).collect())
}

/// Build the two-column view used by the cross-tabulator.
///
/// The caller's frame is only read; the projection is an independent copy.
/// Rows are kept in their original relative order.
pub fn normalise(
    df: &DataFrame,
    outcome: &str,
    factor: &str,
    missing: &Missing,
) -> Result<Observations, AssocError> {
    let projected = df.select([outcome, factor])?;
    let outcome_values = read_levels(column(&projected, outcome)?, missing)?;
    let factor_values = read_levels(column(&projected, factor)?, missing)?;

    let total = outcome_values.len();
    let mut observations = Observations {
        outcome: Vec::with_capacity(total),
        factor: Vec::with_capacity(total),
        dropped: 0,
    };
    for (y, x) in outcome_values.into_iter().zip(factor_values) {
        match (y, x) {
            (Some(y), Some(x)) => {
                observations.outcome.push(y);
                observations.factor.push(x);
            }
            _ => observations.dropped += 1,
        }
    }

    if observations.dropped > 0 {
        warn!(
            dropped = observations.dropped,
            kept = observations.len(),
            "dropped rows with missing outcome or risk factor"
        );
    }
    debug!(rows = total, kept = observations.len(), "normalised input");
    Ok(observations)
}

#[cfg(test)]
mod tests {
    use polars::prelude::{NamedFrom, Series};

    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("ill".into(), &["y", "n", "", "missing", "y"]),
            Series::new(
                "food".into(),
                &[Some(1.0), Some(2.0), Some(1.0), Some(2.0), None],
            ),
            Series::new("other".into(), &[1i64, 2, 3, 4, 5]),
        ])
        .unwrap()
    }

    #[test]
    fn drops_blank_sentinel_and_null_rows() {
        let obs = normalise(
            &frame(),
            "ill",
            "food",
            &Missing::Value("missing".into()),
        )
        .unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs.dropped, 3);
        assert_eq!(obs.outcome, vec![Level::from("y"), Level::from("n")]);
        assert_eq!(obs.factor, vec![Level::Float(1.0), Level::Float(2.0)]);
    }

    #[test]
    fn leaves_the_input_frame_untouched() {
        let df = frame();
        let before = df.clone();
        normalise(&df, "ill", "food", &Missing::NaN).unwrap();
        assert!(df.equals_missing(&before));
    }

    #[test]
    fn negative_zero_reads_as_zero() {
        let levels = read_levels(&Series::new("x".into(), &[0.0, -0.0, 1.0]), &Missing::NaN).unwrap();
        assert_eq!(levels[1].as_ref().map(ToString::to_string), Some("0".to_string()));
        assert_eq!(levels[0], levels[1]);
    }

    #[test]
    fn integer_columns_read_as_int_levels() {
        let levels = read_levels(&Series::new("x".into(), &[1i32, 2]), &Missing::NaN).unwrap();
        assert_eq!(levels, vec![Some(Level::Int(1)), Some(Level::Int(2))]);
    }
}
