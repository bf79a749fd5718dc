//! Argument checks run before any numerical work.

use std::collections::BTreeSet;

use polars::prelude::DataFrame;
use tracing::debug;

use super::{
    level::{Level, Missing},
    normalize::{column, read_levels},
};
use crate::error::AssocError;

/// Outcome and risk-factor values confirmed to be usable.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub case: Level,
    pub control: Level,
    pub base: Level,
}

/// Check the request against the frame, in order:
/// outcome column exists, outcome is dichotomous, case value occurs,
/// risk-factor column exists, base value occurs.
pub fn validate(
    df: &DataFrame,
    outcome: &str,
    case: &Level,
    factor: &str,
    base: &Level,
    missing: &Missing,
) -> Result<Validated, AssocError> {
    let outcome_values: BTreeSet<Level> = read_levels(column(df, outcome)?, missing)?
        .into_iter()
        .flatten()
        .collect();
    if outcome_values.len() != 2 {
        return Err(AssocError::NotDichotomous {
            column: outcome.to_string(),
            found: outcome_values.len(),
            values: join(&outcome_values),
        });
    }
    if !outcome_values.contains(case) {
        return Err(AssocError::ValueNotFound {
            column: outcome.to_string(),
            value: case.to_string(),
        });
    }
    // Exactly one value is left once the case is removed.
    let control = outcome_values
        .iter()
        .find(|v| *v != case)
        .cloned()
        .ok_or_else(|| AssocError::NotDichotomous {
            column: outcome.to_string(),
            found: 1,
            values: join(&outcome_values),
        })?;

    let factor_present = read_levels(column(df, factor)?, missing)?
        .into_iter()
        .flatten()
        .any(|v| v == *base);
    if !factor_present {
        return Err(AssocError::ValueNotFound {
            column: factor.to_string(),
            value: base.to_string(),
        });
    }

    debug!(%case, %control, %base, "validated request");
    Ok(Validated {
        case: case.clone(),
        control,
        base: base.clone(),
    })
}

fn join(values: &BTreeSet<Level>) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
