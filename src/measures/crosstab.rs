//! Contingency table construction: one row per risk-factor level, case column first.

use std::collections::BTreeMap;

use tracing::debug;

use super::{level::Level, normalize::Observations, validate::Validated};
use crate::error::AssocError;

/// Case and control counts for one risk-factor level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stratum {
    pub level: Level,
    pub cases: u64,
    pub controls: u64,
}

impl Stratum {
    pub fn total(&self) -> u64 {
        self.cases + self.controls
    }
}

/// Levels in natural order, each with `cases + controls >= 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContingencyTable {
    pub case: Level,
    pub control: Level,
    pub base: Level,
    pub strata: Vec<Stratum>,
}

impl ContingencyTable {
    /// Row of the base level.
    pub fn base_stratum(&self) -> Result<&Stratum, AssocError> {
        self.strata
            .iter()
            .find(|s| s.level == self.base)
            .ok_or_else(|| AssocError::InsufficientData {
                level: self.base.to_string(),
                message: "no complete rows remain for the base level".to_string(),
            })
    }

    /// Smallest count over every row and both outcome columns.
    pub fn min_cell(&self) -> u64 {
        self.strata
            .iter()
            .flat_map(|s| [s.cases, s.controls])
            .min()
            .unwrap_or(0)
    }

    /// Sum of all cells; equals the number of retained observations.
    pub fn total(&self) -> u64 {
        self.strata.iter().map(Stratum::total).sum()
    }
}

/// Count observations per risk-factor level and outcome.
pub fn crosstab(observations: &Observations, validated: &Validated) -> ContingencyTable {
    let mut counts: BTreeMap<Level, (u64, u64)> = BTreeMap::new();
    for (y, x) in observations.iter() {
        let entry = counts.entry(x.clone()).or_insert((0, 0));
        if *y == validated.case {
            entry.0 += 1;
        } else {
            entry.1 += 1;
        }
    }

    let strata: Vec<Stratum> = counts
        .into_iter()
        .map(|(level, (cases, controls))| Stratum {
            level,
            cases,
            controls,
        })
        .collect();
    debug!(levels = strata.len(), "cross-tabulated");

    ContingencyTable {
        case: validated.case.clone(),
        control: validated.control.clone(),
        base: validated.base.clone(),
        strata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observations(rows: &[(&str, i64)]) -> Observations {
        Observations {
            outcome: rows.iter().map(|(y, _)| Level::from(*y)).collect(),
            factor: rows.iter().map(|(_, x)| Level::Int(*x)).collect(),
            dropped: 0,
        }
    }

    fn validated() -> Validated {
        Validated {
            case: "case".into(),
            control: "control".into(),
            base: Level::Int(0),
        }
    }

    #[test]
    fn levels_are_sorted_and_counted() {
        let obs = observations(&[
            ("case", 10),
            ("control", 2),
            ("case", 2),
            ("control", 0),
            ("case", 0),
            ("case", 2),
        ]);
        let table = crosstab(&obs, &validated());
        let levels: Vec<_> = table.strata.iter().map(|s| s.level.clone()).collect();
        assert_eq!(levels, vec![Level::Int(0), Level::Int(2), Level::Int(10)]);
        assert_eq!(table.strata[1].cases, 2);
        assert_eq!(table.strata[1].controls, 1);
        assert_eq!(table.total(), 6);
        assert_eq!(table.min_cell(), 0);
    }

    #[test]
    fn missing_base_is_insufficient_data() {
        let obs = observations(&[("case", 1), ("control", 1)]);
        let table = crosstab(&obs, &validated());
        assert!(matches!(
            table.base_stratum(),
            Err(AssocError::InsufficientData { .. })
        ));
    }
}
